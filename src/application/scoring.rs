//! Rule-based stroke-risk scoring.
//!
//! The score is an additive heuristic over three signal groups:
//! - baseline clinical and lifestyle risk (enrollment data)
//! - the last two days of wearable readings
//! - the severity of the last five inbound messages
//!
//! Every term is non-negative and the sum is clamped to 100.

use serde::{Deserialize, Serialize};

use crate::domain::{
    AlcoholUse, CommunicationLogEntry, Patient, SaltIntake, Severity, StressLevel, WearableReading,
    MAX_RISK_SCORE,
};

/// Readings considered by the wearable rules (two days at four per day).
pub const WEARABLE_WINDOW: usize = 8;

/// Inbound messages considered by the communication rules.
pub const COMMUNICATION_WINDOW: usize = 5;

const HYPERTENSION_POINTS: u32 = 10;
const STROKE_HISTORY_POINTS: u32 = 15;
const LIFESTYLE_POINTS: u32 = 5;

const HIGH_SEVERITY_POINTS: u32 = 10;
const MODERATE_SEVERITY_POINTS: u32 = 5;

fn heart_rate_points(avg_bpm: f64) -> u32 {
    if avg_bpm > 90.0 {
        15
    } else if avg_bpm > 85.0 {
        8
    } else {
        0
    }
}

fn sleep_points(avg_hours: f64) -> u32 {
    if avg_hours < 5.0 {
        12
    } else if avg_hours < 6.0 {
        6
    } else {
        0
    }
}

fn steps_points(avg_steps: f64) -> u32 {
    if avg_steps < 2000.0 {
        10
    } else if avg_steps < 3000.0 {
        5
    } else {
        0
    }
}

/// Points contributed by each signal group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub baseline: u32,
    pub wearable: u32,
    pub communication: u32,
}

impl RiskBreakdown {
    /// Sum of all groups, clamped to [`MAX_RISK_SCORE`].
    #[must_use]
    pub fn total(&self) -> u8 {
        let sum = self.baseline + self.wearable + self.communication;
        sum.min(u32::from(MAX_RISK_SCORE)) as u8
    }
}

/// Mean heart rate, sleep and steps over a reading window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WearableWindow {
    pub avg_heart_rate: f64,
    pub avg_sleep_hours: f64,
    pub avg_steps: f64,
}

impl WearableWindow {
    /// Average the most recent [`WEARABLE_WINDOW`] readings.
    ///
    /// Returns `None` when there are no readings; a shorter history is
    /// averaged over what exists.
    #[must_use]
    pub fn recent(readings: &[WearableReading]) -> Option<Self> {
        let window = &readings[readings.len().saturating_sub(WEARABLE_WINDOW)..];
        if window.is_empty() {
            return None;
        }

        let n = window.len() as f64;
        Some(Self {
            avg_heart_rate: window.iter().map(|r| f64::from(r.heart_rate)).sum::<f64>() / n,
            avg_sleep_hours: window.iter().map(|r| r.sleep_hours).sum::<f64>() / n,
            avg_steps: window.iter().map(|r| f64::from(r.step_count)).sum::<f64>() / n,
        })
    }

    fn points(&self) -> u32 {
        heart_rate_points(self.avg_heart_rate)
            + sleep_points(self.avg_sleep_hours)
            + steps_points(self.avg_steps)
    }
}

/// Points from enrollment data alone.
#[must_use]
pub fn baseline_points(patient: &Patient) -> u32 {
    let lifestyle = patient.lifestyle_risks;
    [
        (patient.known_hypertension, HYPERTENSION_POINTS),
        (patient.past_stroke_history, STROKE_HISTORY_POINTS),
        (lifestyle.salt_intake == SaltIntake::High, LIFESTYLE_POINTS),
        (lifestyle.stress == StressLevel::High, LIFESTYLE_POINTS),
        (lifestyle.alcohol == AlcoholUse::Frequent, LIFESTYLE_POINTS),
    ]
    .iter()
    .filter(|(applies, _)| *applies)
    .map(|(_, points)| points)
    .sum()
}

/// Points from the severity of the most recent inbound messages.
#[must_use]
pub fn communication_points(logs: &[CommunicationLogEntry]) -> u32 {
    let inbound: Vec<&CommunicationLogEntry> = logs.iter().filter(|e| e.is_inbound()).collect();
    let recent = &inbound[inbound.len().saturating_sub(COMMUNICATION_WINDOW)..];

    recent
        .iter()
        .map(|e| match e.severity {
            Severity::High => HIGH_SEVERITY_POINTS,
            Severity::Moderate => MODERATE_SEVERITY_POINTS,
            Severity::Low => 0,
        })
        .sum()
}

/// Score a patient, keeping the per-group breakdown.
///
/// `readings` and `logs` must be in chronological order; only their tails
/// are used.
#[must_use]
pub fn assess_risk(
    patient: &Patient,
    readings: &[WearableReading],
    logs: &[CommunicationLogEntry],
) -> RiskBreakdown {
    let breakdown = RiskBreakdown {
        baseline: baseline_points(patient),
        wearable: WearableWindow::recent(readings).map_or(0, |w| w.points()),
        communication: communication_points(logs),
    };

    tracing::debug!(
        "Risk for {}: baseline={} wearable={} communication={} total={}",
        patient.id,
        breakdown.baseline,
        breakdown.wearable,
        breakdown.communication,
        breakdown.total()
    );

    breakdown
}

/// Score a patient on the 0-100 scale.
#[must_use]
pub fn calculate_risk_score(
    patient: &Patient,
    readings: &[WearableReading],
    logs: &[CommunicationLogEntry],
) -> u8 {
    assess_risk(patient, readings, logs).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::wearable::simulation_epoch;
    use crate::domain::fixtures::healthy_patient;
    use crate::domain::{Channel, Direction, LifestyleRisks, Mood};
    use chrono::Duration;
    use proptest::prelude::*;

    fn reading(i: usize, heart_rate: u32, sleep_hours: f64, step_count: u32) -> WearableReading {
        WearableReading {
            id: format!("wr-T-{i}"),
            patient_id: "T001".to_string(),
            timestamp: simulation_epoch() + Duration::hours(6 * i as i64),
            heart_rate,
            heart_rate_variability: 40,
            step_count,
            sleep_hours,
        }
    }

    fn steady(n: usize, heart_rate: u32, sleep_hours: f64, steps: u32) -> Vec<WearableReading> {
        (0..n).map(|i| reading(i, heart_rate, sleep_hours, steps)).collect()
    }

    fn message(i: usize, direction: Direction, severity: Severity) -> CommunicationLogEntry {
        CommunicationLogEntry {
            id: format!("cl-T-{i}"),
            patient_id: "T001".to_string(),
            channel: Channel::Sms,
            timestamp: simulation_epoch() + Duration::hours(i as i64),
            direction,
            message: "test".to_string(),
            extracted_symptoms: Vec::new(),
            mood: Mood::Neutral,
            risk_keywords: Vec::new(),
            severity,
        }
    }

    fn calm_logs() -> Vec<CommunicationLogEntry> {
        (0..5).map(|i| message(i, Direction::Inbound, Severity::Low)).collect()
    }

    #[test]
    fn test_no_risk_factors_scores_zero() {
        let readings = steady(8, 70, 7.5, 5000);
        let score = calculate_risk_score(&healthy_patient(), &readings, &calm_logs());
        assert_eq!(score, 0);
    }

    #[test]
    fn test_only_lifestyle_terms_apply() {
        let patient = Patient {
            lifestyle_risks: LifestyleRisks {
                salt_intake: SaltIntake::High,
                alcohol: AlcoholUse::Frequent,
                stress: StressLevel::Moderate,
            },
            ..healthy_patient()
        };
        let score = calculate_risk_score(&patient, &steady(8, 70, 7.5, 5000), &calm_logs());
        assert_eq!(score, 10);
    }

    #[test]
    fn test_baseline_for_stroke_survivor_with_high_salt() {
        // Profile of P002: hypertension, past stroke, high salt, moderate stress,
        // occasional alcohol.
        let patient = Patient {
            known_hypertension: true,
            past_stroke_history: true,
            lifestyle_risks: LifestyleRisks {
                salt_intake: SaltIntake::High,
                alcohol: AlcoholUse::Occasional,
                stress: StressLevel::Moderate,
            },
            ..healthy_patient()
        };
        assert_eq!(baseline_points(&patient), 30);
        assert!(calculate_risk_score(&patient, &steady(8, 70, 7.5, 5000), &calm_logs()) >= 25);
    }

    #[test]
    fn test_wearable_ladders() {
        let p = healthy_patient();
        let logs = calm_logs();

        assert_eq!(calculate_risk_score(&p, &steady(8, 91, 7.5, 5000), &logs), 15);
        assert_eq!(calculate_risk_score(&p, &steady(8, 90, 7.5, 5000), &logs), 8);
        assert_eq!(calculate_risk_score(&p, &steady(8, 85, 7.5, 5000), &logs), 0);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 4.9, 5000), &logs), 12);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 5.0, 5000), &logs), 6);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 6.0, 5000), &logs), 0);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 7.5, 1999), &logs), 10);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 7.5, 2000), &logs), 5);
        assert_eq!(calculate_risk_score(&p, &steady(8, 70, 7.5, 3000), &logs), 0);
    }

    #[test]
    fn test_only_last_eight_readings_count() {
        let mut readings = steady(48, 120, 3.0, 100);
        readings.extend((48..56).map(|i| reading(i, 70, 7.5, 5000)));
        assert_eq!(calculate_risk_score(&healthy_patient(), &readings, &calm_logs()), 0);
    }

    #[test]
    fn test_short_history_is_averaged_over_what_exists() {
        let readings = steady(3, 95, 7.5, 5000);
        assert_eq!(calculate_risk_score(&healthy_patient(), &readings, &calm_logs()), 15);
    }

    #[test]
    fn test_empty_inputs_contribute_nothing() {
        let patient = Patient {
            known_hypertension: true,
            ..healthy_patient()
        };
        assert_eq!(calculate_risk_score(&patient, &[], &[]), 10);
        assert!(WearableWindow::recent(&[]).is_none());
    }

    #[test]
    fn test_communication_uses_last_five_inbound() {
        let mut logs: Vec<_> = (0..5)
            .map(|i| message(i, Direction::Inbound, Severity::High))
            .collect();
        logs.push(message(5, Direction::Inbound, Severity::High));
        logs.push(message(6, Direction::Inbound, Severity::Moderate));
        // Outbound entries are ignored even when severe.
        logs.push(message(7, Direction::Outbound, Severity::High));

        // Last five inbound: High x4, Moderate x1
        assert_eq!(communication_points(&logs), 45);
    }

    #[test]
    fn test_score_is_clamped() {
        let patient = Patient {
            known_hypertension: true,
            past_stroke_history: true,
            lifestyle_risks: LifestyleRisks {
                salt_intake: SaltIntake::High,
                alcohol: AlcoholUse::Frequent,
                stress: StressLevel::High,
            },
            ..healthy_patient()
        };
        let logs: Vec<_> = (0..5)
            .map(|i| message(i, Direction::Inbound, Severity::High))
            .collect();

        let breakdown = assess_risk(&patient, &steady(8, 120, 3.0, 0), &logs);
        assert_eq!(breakdown.baseline, 40);
        assert_eq!(breakdown.wearable, 37);
        assert_eq!(breakdown.communication, 50);
        assert_eq!(breakdown.total(), 100);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(
            hypertension in any::<bool>(),
            stroke in any::<bool>(),
            hr in proptest::collection::vec(40u32..180, 1..20),
            sleep in 3.0f64..9.0,
            steps in 0u32..20000,
            severities in proptest::collection::vec(0u8..3, 0..12),
        ) {
            let patient = Patient {
                known_hypertension: hypertension,
                past_stroke_history: stroke,
                ..healthy_patient()
            };
            let readings: Vec<_> = hr
                .iter()
                .enumerate()
                .map(|(i, h)| reading(i, *h, sleep, steps))
                .collect();
            let logs: Vec<_> = severities
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let severity = match s {
                        0 => Severity::Low,
                        1 => Severity::Moderate,
                        _ => Severity::High,
                    };
                    message(i, Direction::Inbound, severity)
                })
                .collect();

            let score = calculate_risk_score(&patient, &readings, &logs);
            prop_assert!(score <= MAX_RISK_SCORE);
        }
    }
}
