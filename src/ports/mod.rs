//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (messaging provider).

mod notifier;

pub use notifier::{NotifyError, Notifier};
