//! Voice message triage types.

use serde::{Deserialize, Serialize};

/// Maximum severity a voice result can carry.
pub const MAX_VOICE_SEVERITY: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Medication,
    Symptom,
    /// Needs a nurse immediately (e.g. chest pain)
    RedFlag,
    /// Patient explicitly asked to be called
    Escalation,
}

/// A keyword recognised in a patient's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIntent {
    pub keyword: String,
    pub category: IntentCategory,
    /// 1 (informational) to 5 (red flag)
    pub weight: u8,
}

/// Outcome of processing one voice message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAnalysis {
    pub transcript: String,
    /// Transcription confidence (0.0 to 1.0)
    pub confidence: f64,
    pub detected_intents: Vec<DetectedIntent>,
    /// 0 to [`MAX_VOICE_SEVERITY`]
    pub severity_score: u8,
    /// Reply played back to the patient
    pub auto_response: String,
}

impl VoiceAnalysis {
    #[must_use]
    pub fn has_red_flag(&self) -> bool {
        self.detected_intents
            .iter()
            .any(|i| i.category == IntentCategory::RedFlag)
    }

    /// Keywords of all detected intents, in detection order.
    #[must_use]
    pub fn intent_keywords(&self) -> Vec<&str> {
        self.detected_intents
            .iter()
            .map(|i| i.keyword.as_str())
            .collect()
    }
}
