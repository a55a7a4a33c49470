//! Voice message triage.
//!
//! Transcription is simulated: after a configurable delay the service picks
//! one of a few prepared results. Keyword detection over arbitrary
//! transcripts is real and uses the intent dictionary below.
//!
//! # Mutex Behavior
//!
//! The RNG sits behind a `Mutex` so one service can be shared with the
//! background worker. A poisoned mutex returns [`VoiceError::RngPoisoned`].

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::{DetectedIntent, IntentCategory, VoiceAnalysis};

const LATENCY_ENV: &str = "HEARTGUARD_VOICE_LATENCY_MS";
const DEFAULT_LATENCY_MS: u64 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Voice RNG lock poisoned")]
    RngPoisoned,
}

#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Simulated transcription delay
    pub latency: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}

impl VoiceConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - HEARTGUARD_VOICE_LATENCY_MS
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(LATENCY_ENV) {
            if let Ok(ms) = v.trim().parse::<u64>() {
                cfg.latency = Duration::from_millis(ms);
            }
        }

        cfg
    }

    /// No delay; used by tests and batch runs.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

/// One entry of the intent dictionary.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub keyword: &'static str,
    pub category: IntentCategory,
    pub weight: u8,
    /// Patient-facing reply when this keyword is heard
    pub response: &'static str,
}

pub const INTENT_DICTIONARY: [IntentRule; 7] = [
    IntentRule {
        keyword: "stopped",
        category: IntentCategory::Medication,
        weight: 3,
        response: "I understand you've stopped your medication. Let me connect you with a nurse.",
    },
    IntentRule {
        keyword: "ran out",
        category: IntentCategory::Medication,
        weight: 3,
        response: "Running out of medication is important to address. A nurse will help you.",
    },
    IntentRule {
        keyword: "forgot",
        category: IntentCategory::Medication,
        weight: 2,
        response: "It happens! Try setting a daily alarm reminder.",
    },
    IntentRule {
        keyword: "dizzy",
        category: IntentCategory::Symptom,
        weight: 2,
        response: "Dizziness can be serious with high BP. Please sit down and rest.",
    },
    IntentRule {
        keyword: "headache",
        category: IntentCategory::Symptom,
        weight: 2,
        response: "Headaches with high BP need attention. Let me get a nurse to check on you.",
    },
    IntentRule {
        keyword: "chest pain",
        category: IntentCategory::RedFlag,
        weight: 5,
        response: "🚨 CHEST PAIN IS SERIOUS. A nurse is calling you NOW.",
    },
    IntentRule {
        keyword: "call me",
        category: IntentCategory::Escalation,
        weight: 3,
        response: "I've requested a nurse to call you. They'll reach out shortly.",
    },
];

impl IntentRule {
    fn to_intent(self) -> DetectedIntent {
        DetectedIntent {
            keyword: self.keyword.to_string(),
            category: self.category,
            weight: self.weight,
        }
    }
}

/// Dictionary rules whose keyword occurs in `transcript`, in dictionary order.
#[must_use]
pub fn matching_rules(transcript: &str) -> Vec<&'static IntentRule> {
    let lowered = transcript.to_lowercase();
    INTENT_DICTIONARY
        .iter()
        .filter(|rule| lowered.contains(rule.keyword))
        .collect()
}

/// Detect intents in a transcript (case-insensitive substring match).
#[must_use]
pub fn detect_intents(transcript: &str) -> Vec<DetectedIntent> {
    matching_rules(transcript)
        .into_iter()
        .map(|rule| rule.to_intent())
        .collect()
}

/// Reply for the heaviest matching rule, if any keyword matched.
#[must_use]
pub fn suggested_response(transcript: &str) -> Option<&'static str> {
    matching_rules(transcript)
        .into_iter()
        .max_by_key(|rule| rule.weight)
        .map(|rule| rule.response)
}

struct CannedResult {
    transcript: &'static str,
    confidence: f64,
    intents: &'static [(&'static str, IntentCategory, u8)],
    severity: u8,
    auto_response: &'static str,
}

const CANNED_RESULTS: [CannedResult; 3] = [
    CannedResult {
        transcript: "I've been feeling very dizzy today and I think I forgot to take my morning medication. My head is pounding.",
        confidence: 0.94,
        intents: &[
            ("dizzy", IntentCategory::Symptom, 2),
            ("forgot", IntentCategory::Medication, 2),
            ("headache", IntentCategory::Symptom, 2),
        ],
        severity: 6,
        auto_response: "📞 Your symptoms need review. A nurse will call you within 1 hour. Please rest meanwhile.",
    },
    CannedResult {
        transcript: "My blood pressure was 185 over 110 this morning and I have chest pain when I walk.",
        confidence: 0.96,
        intents: &[
            ("chest pain", IntentCategory::RedFlag, 5),
            ("high BP", IntentCategory::Symptom, 3),
        ],
        severity: 9,
        auto_response: "🚨 CRITICAL ALERT: A nurse is calling you NOW. Please stay by your phone.",
    },
    CannedResult {
        transcript: "I ran out of my amlodipine tablets three days ago and I'm starting to feel unwell.",
        confidence: 0.92,
        intents: &[
            ("ran out", IntentCategory::Medication, 3),
            ("unwell", IntentCategory::Symptom, 2),
        ],
        severity: 7,
        auto_response: "💊 Medication issue detected. Nurse will arrange refill and call within 30 minutes.",
    },
];

impl CannedResult {
    fn to_analysis(&self) -> VoiceAnalysis {
        VoiceAnalysis {
            transcript: self.transcript.to_string(),
            confidence: self.confidence,
            detected_intents: self
                .intents
                .iter()
                .map(|(keyword, category, weight)| DetectedIntent {
                    keyword: (*keyword).to_string(),
                    category: *category,
                    weight: *weight,
                })
                .collect(),
            severity_score: self.severity,
            auto_response: self.auto_response.to_string(),
        }
    }
}

/// Simulated voice transcription service.
pub struct VoiceTriageService {
    config: VoiceConfig,
    rng: Mutex<ChaCha20Rng>,
}

impl VoiceTriageService {
    /// Create a service with an entropy-seeded RNG.
    #[must_use]
    pub fn new(config: VoiceConfig) -> Self {
        Self::with_seed(config, OsRng.next_u64())
    }

    #[must_use]
    pub fn with_seed(config: VoiceConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    #[must_use]
    pub fn latency(&self) -> Duration {
        self.config.latency
    }

    /// "Transcribe" a voice message.
    ///
    /// Blocks for the configured latency, then returns one of the prepared
    /// results.
    ///
    /// # Errors
    /// Returns `HeartguardError::Voice` if the RNG mutex is poisoned.
    pub fn transcribe(&self) -> crate::Result<VoiceAnalysis> {
        if !self.config.latency.is_zero() {
            std::thread::sleep(self.config.latency);
        }

        let index = {
            let mut rng = self.rng.lock().map_err(|_| VoiceError::RngPoisoned)?;
            rng.gen_range(0..CANNED_RESULTS.len())
        };

        let analysis = CANNED_RESULTS[index].to_analysis();
        tracing::info!(
            "Voice message transcribed: severity={} intents={}",
            analysis.severity_score,
            analysis.detected_intents.len()
        );
        Ok(analysis)
    }
}
