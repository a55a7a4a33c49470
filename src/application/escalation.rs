//! Escalation service: pages the on-call nurse.
//!
//! Two triggers:
//! - a voice message whose severity meets the threshold or that carries a
//!   red-flag intent
//! - a pending high-risk alert on the review board

use std::sync::Arc;

use crate::domain::{AiAlert, Patient, RiskLevel, VoiceAnalysis};
use crate::ports::{NotifyError, Notifier};

use super::alerts::{patient_name, AlertBoard};

const SEVERITY_ENV: &str = "HEARTGUARD_ESCALATION_SEVERITY";
const NURSE_ENV: &str = "NURSE_NUMBER";
const DEFAULT_SEVERITY_THRESHOLD: u8 = 8;

#[derive(Debug, Clone)]
pub struct EscalationConfig {
    /// Nurse phone number; escalation is impossible without it
    pub nurse_number: Option<String>,
    /// Voice severity at or above which the nurse is paged
    pub severity_threshold: u8,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            nurse_number: None,
            severity_threshold: DEFAULT_SEVERITY_THRESHOLD,
        }
    }
}

impl EscalationConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - NURSE_NUMBER
    /// - HEARTGUARD_ESCALATION_SEVERITY (1-10)
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(NURSE_ENV) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.nurse_number = Some(v.to_string());
            }
        }

        if let Ok(v) = std::env::var(SEVERITY_ENV) {
            if let Ok(x) = v.trim().parse::<u8>() {
                if (1..=crate::domain::MAX_VOICE_SEVERITY).contains(&x) {
                    cfg.severity_threshold = x;
                }
            }
        }

        cfg
    }
}

/// Result of escalating the pending high-risk alerts.
#[derive(Debug, Default)]
pub struct EscalationReport {
    /// Alert ids delivered to the nurse
    pub sent: Vec<String>,
    pub failed: Vec<(String, NotifyError)>,
}

/// Format the nurse red alert for a voice message.
#[must_use]
pub fn format_red_alert(patient: &str, analysis: &VoiceAnalysis) -> String {
    format!(
        "🚨 *HEARTGUARD RED ALERT*\n\nPatient: {}\nSeverity: {}\nIntents: {}\nTranscript: {}\n\nPlease call patient NOW.",
        patient,
        analysis.severity_score,
        analysis.intent_keywords().join(", "),
        analysis.transcript
    )
}

/// Format the nurse message for a pending alert.
#[must_use]
pub fn format_alert_escalation(patient: &str, alert: &AiAlert) -> String {
    format!(
        "⚠️ *HEARTGUARD {} RISK ALERT*\n\nPatient: {}\nAlert: {}\nDetails: {}\nAction: {}\n\nRef: {}",
        alert.risk_level,
        patient,
        alert.title,
        alert.description,
        alert.recommended_action,
        alert.id
    )
}

/// Sends nurse escalations through a [`Notifier`].
pub struct EscalationService<N: Notifier> {
    notifier: Arc<N>,
    nurse_number: String,
    severity_threshold: u8,
}

impl<N: Notifier> EscalationService<N> {
    /// Create a service.
    ///
    /// # Errors
    /// Returns `NotifyError::MissingConfig` if no nurse number is configured.
    pub fn new(notifier: Arc<N>, config: &EscalationConfig) -> Result<Self, NotifyError> {
        let nurse_number = config
            .nurse_number
            .clone()
            .ok_or(NotifyError::MissingConfig(NURSE_ENV))?;

        Ok(Self {
            notifier,
            nurse_number,
            severity_threshold: config.severity_threshold,
        })
    }

    /// Whether a voice result warrants paging the nurse.
    #[must_use]
    pub fn should_escalate(&self, analysis: &VoiceAnalysis) -> bool {
        analysis.severity_score >= self.severity_threshold || analysis.has_red_flag()
    }

    /// Page the nurse about a voice message if it is serious enough.
    ///
    /// Returns `Ok(true)` when a message was sent, `Ok(false)` when the
    /// result stayed below the threshold.
    ///
    /// # Errors
    /// Returns `HeartguardError::Notify` if delivery to the provider failed.
    pub fn escalate_voice(&self, patient: &str, analysis: &VoiceAnalysis) -> crate::Result<bool> {
        if !self.should_escalate(analysis) {
            tracing::debug!(
                "Voice severity {} below threshold {}",
                analysis.severity_score,
                self.severity_threshold
            );
            return Ok(false);
        }

        self.notifier
            .send_text(&self.nurse_number, &format_red_alert(patient, analysis))?;
        tracing::info!("Nurse paged for voice message (severity={})", analysis.severity_score);
        Ok(true)
    }

    /// Send one alert to the nurse.
    ///
    /// # Errors
    /// Returns `NotifyError` if delivery to the provider failed.
    pub fn escalate_alert(&self, patient: &str, alert: &AiAlert) -> Result<(), NotifyError> {
        self.notifier
            .send_text(&self.nurse_number, &format_alert_escalation(patient, alert))
    }

    /// Escalate every pending high-risk alert on the board.
    ///
    /// Keeps going after a failed send; failures are logged and reported.
    pub fn escalate_pending_high(
        &self,
        board: &AlertBoard,
        patients: &[Patient],
    ) -> EscalationReport {
        let mut report = EscalationReport::default();

        for alert in board.pending_at(RiskLevel::High) {
            match self.escalate_alert(patient_name(patients, alert), alert) {
                Ok(()) => {
                    tracing::info!("Escalated alert {}", alert.id);
                    report.sent.push(alert.id.clone());
                }
                Err(e) => {
                    tracing::warn!("Failed to escalate alert {}: {}", alert.id, e);
                    report.failed.push((alert.id.clone(), e));
                }
            }
        }

        report
    }

    /// Escalate pending high-risk alerts, then acknowledge the delivered ones.
    ///
    /// Alerts whose send failed stay pending.
    ///
    /// # Errors
    /// Returns `HeartguardError::Alert` if a delivered id is no longer on the board.
    pub fn escalate_and_acknowledge(
        &self,
        board: &mut AlertBoard,
        patients: &[Patient],
    ) -> crate::Result<EscalationReport> {
        let report = self.escalate_pending_high(board, patients);
        for id in &report.sent {
            board.acknowledge(id)?;
        }
        Ok(report)
    }
}
