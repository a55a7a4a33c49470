//! Application layer: Use cases and services.
//!
//! Generators and the scorer are pure functions over domain types. The
//! dataset snapshot composes them; the remaining services act on it.

pub mod alerts;
pub mod assistant;
pub mod communication;
pub mod dataset;
pub mod escalation;
pub mod scoring;
pub mod voice;
pub mod wearable;

pub use alerts::AlertBoard;
pub use dataset::{
    DashboardStats, DatasetError, PatientSort, SimulatedDataset, SimulationConfig, SortOrder,
};
pub use escalation::{EscalationConfig, EscalationReport, EscalationService};
pub use scoring::{assess_risk, calculate_risk_score, RiskBreakdown};
pub use voice::{VoiceConfig, VoiceError, VoiceTriageService};

/// Owned copies of authored string lists.
fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
