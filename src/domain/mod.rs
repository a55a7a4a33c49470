//! Domain layer: Core business types and invariants.
//!
//! Pure Rust types with no I/O. Everything here is serializable so the
//! snapshot can be handed to any presentation layer as JSON.

mod alert;
mod communication;
mod patient;
mod risk;
mod voice;
mod wearable;

pub use alert::{AiAlert, AlertError, AlertKind, AlertStatus};
pub use communication::{Channel, CommunicationLogEntry, Direction, Mood, Severity};
pub use patient::{AlcoholUse, Gender, LifestyleRisks, Patient, SaltIntake, StressLevel};
pub use risk::{RiskLevel, MAX_RISK_SCORE};
pub use voice::{DetectedIntent, IntentCategory, VoiceAnalysis, MAX_VOICE_SEVERITY};
pub use wearable::{DailyWearableAggregate, WearableBaseline, WearableReading};

#[cfg(test)]
pub(crate) use patient::fixtures;
