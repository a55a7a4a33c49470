//! Risk tier classification.
//!
//! A patient's numeric stroke-risk score (0-100) is bucketed into one of
//! three tiers that drive alert colouring and triage priority.

use serde::{Deserialize, Serialize};

/// Upper bound of any risk score.
pub const MAX_RISK_SCORE: u8 = 100;

/// Scores at or above this are high risk.
const HIGH_RISK_THRESHOLD: u8 = 70;

/// Scores at or above this (and below high) are moderate risk.
const MODERATE_RISK_THRESHOLD: u8 = 40;

/// Risk level classification for stroke/hypertension follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Stable, standard monitoring schedule
    Low,
    /// Follow-up recommended
    Moderate,
    /// Contact patient promptly
    High,
}

impl RiskLevel {
    /// Classify a risk score.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MODERATE_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Continue standard monitoring",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Contact patient promptly",
        }
    }

    /// Lowercase label, matching the serialized form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}
