//! Pre-authored AI alerts and their review lifecycle.
//!
//! An alert moves forward only: `Pending -> Acknowledged -> Resolved`.
//! Skipping straight to `Resolved` is allowed; moving back is not, and there
//! is no reopen operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::RiskLevel;

/// Errors raised by alert lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Alert {id} cannot move from {from} back to {to}")]
    InvalidTransition {
        id: String,
        from: AlertStatus,
        to: AlertStatus,
    },
}

/// Which signal produced the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Wearable,
    Communication,
    Combined,
}

/// Review status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 3] = [
        AlertStatus::Pending,
        AlertStatus::Acknowledged,
        AlertStatus::Resolved,
    ];
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Acknowledged => write!(f, "acknowledged"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAlert {
    pub id: String,
    pub patient_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub recommended_action: String,
    pub status: AlertStatus,
    /// Descriptive label only; no rule engine evaluates it.
    pub rule_triggered: String,
}

impl AiAlert {
    /// Move the alert to `next`.
    ///
    /// Re-applying the current status is a no-op.
    ///
    /// # Errors
    /// Returns `AlertError::InvalidTransition` for any backward move.
    pub fn transition_to(&mut self, next: AlertStatus) -> Result<(), AlertError> {
        if next < self.status {
            return Err(AlertError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// # Errors
    /// Fails if the alert is already resolved.
    pub fn acknowledge(&mut self) -> Result<(), AlertError> {
        self.transition_to(AlertStatus::Acknowledged)
    }

    /// Resolve from any status.
    ///
    /// # Errors
    /// Currently infallible.
    pub fn resolve(&mut self) -> Result<(), AlertError> {
        self.transition_to(AlertStatus::Resolved)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status != AlertStatus::Resolved
    }
}
