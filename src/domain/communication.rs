//! Patient communication log entries (WhatsApp, SMS, IVR).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport a message was exchanged over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Chat-style conversation with the check-in bot
    WhatsApp,
    /// Plain text message
    Sms,
    /// Interactive voice response call, stored as a transcript
    Ivr,
}

impl Channel {
    /// All channels, in generation order.
    pub const ALL: [Channel; 3] = [Channel::WhatsApp, Channel::Sms, Channel::Ivr];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Sms => "SMS",
            Self::Ivr => "IVR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Patient to health service
    Inbound,
    /// Health service (bot) to patient
    Outbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

/// Urgency attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

/// A single logged message with its triage annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationLogEntry {
    pub id: String,
    pub patient_id: String,
    pub channel: Channel,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub message: String,
    pub extracted_symptoms: Vec<String>,
    pub mood: Mood,
    pub risk_keywords: Vec<String>,
    pub severity: Severity,
}

impl CommunicationLogEntry {
    #[must_use]
    pub fn is_inbound(&self) -> bool {
        self.direction == Direction::Inbound
    }
}
