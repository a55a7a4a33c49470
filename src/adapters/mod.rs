//! Adapters layer: Concrete implementations of ports.
//!
//! - `whatsapp`: WhatsApp Cloud API client for escalation messages
//! - `sanitize`: phone number / secret filtering for logs

pub mod sanitize;
pub mod whatsapp;

pub use whatsapp::{WhatsAppConfig, WhatsAppNotifier};
