//! # HeartGuard
//!
//! Simulated remote-monitoring backend for community health workers caring
//! for patients with hypertension and stroke risk.
//!
//! This crate provides:
//! - Seeded synthetic wearable and communication data for a patient roster
//! - A bounded heuristic risk score with per-component breakdown
//! - Alert review, a canned triage assistant and voice-message triage
//! - Nurse escalation over the WhatsApp Cloud API
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (Patient, WearableReading, AiAlert, ...)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (WhatsApp, log sanitizing)
//! - `application`: Generators, scorer, snapshot and services
//! - `worker`: Background voice transcription

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod worker;

pub use application::{PatientSort, SimulatedDataset, SimulationConfig, SortOrder};
pub use domain::{Patient, RiskLevel};

/// Result type for HeartGuard operations
pub type Result<T> = std::result::Result<T, HeartguardError>;

/// Main error type for HeartGuard
#[derive(Debug, thiserror::Error)]
pub enum HeartguardError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] application::DatasetError),

    #[error("Alert error: {0}")]
    Alert(#[from] domain::AlertError),

    #[error("Notification failed: {0}")]
    Notify(#[from] ports::NotifyError),

    #[error("Voice triage failed: {0}")]
    Voice(#[from] application::VoiceError),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Unknown sort key: {0}")]
    InvalidSort(String),

    #[error("Voice worker failed: {0}")]
    Worker(String),
}
