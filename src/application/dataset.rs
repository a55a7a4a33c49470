//! Simulated dataset: the immutable snapshot every dashboard view reads.
//!
//! Built once by the composition root from a [`SimulationConfig`] and then
//! shared by reference. A fixed seed reproduces the snapshot exactly.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use super::communication::generate_communication_logs;
use super::scoring::calculate_risk_score;
use super::to_strings;
use super::wearable::{daily_aggregates, generate_wearable_series};
use crate::domain::{
    AiAlert, AlcoholUse, AlertKind, AlertStatus, CommunicationLogEntry, DailyWearableAggregate,
    Gender, LifestyleRisks, Patient, RiskLevel, SaltIntake, StressLevel, WearableBaseline,
    WearableReading,
};
use crate::HeartguardError;

const SEED_ENV: &str = "HEARTGUARD_SEED";

/// Errors raised while assembling the snapshot from authored data.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Invalid date {value:?} for {field}: {source}")]
    InvalidDate {
        field: &'static str,
        value: &'static str,
        source: chrono::ParseError,
    },

    #[error("Alert {alert} references unknown patient {patient}")]
    UnknownPatient { alert: String, patient: String },

    #[error("Invalid patient {id}: {}", .errors.join("; "))]
    InvalidPatient { id: String, errors: Vec<String> },
}

/// Configuration for snapshot generation.
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    /// RNG seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - HEARTGUARD_SEED
    #[must_use]
    pub fn from_env_or_default() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(SEED_ENV) {
            match parse_seed(&v) {
                Some(seed) => cfg.seed = Some(seed),
                None => tracing::warn!("Ignoring non-numeric {SEED_ENV}"),
            }
        }

        cfg
    }
}

/// Parse a seed in decimal or in the `0x` hex form it is logged in.
#[must_use]
pub fn parse_seed(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

struct RosterEntry {
    id: &'static str,
    name: &'static str,
    age: u8,
    age_bracket: &'static str,
    gender: Gender,
    known_hypertension: bool,
    past_stroke_history: bool,
    medications: &'static [&'static str],
    symptoms: &'static [&'static str],
    lifestyle: LifestyleRisks,
    last_contact: &'static str,
    adherence_score: u8,
    enrollment_date: &'static str,
    baseline: WearableBaseline,
}

const ROSTER: [RosterEntry; 5] = [
    RosterEntry {
        id: "P001",
        name: "Grace Nakamura",
        age: 58,
        age_bracket: "55-64",
        gender: Gender::Female,
        known_hypertension: true,
        past_stroke_history: false,
        medications: &["Lisinopril 10mg", "Amlodipine 5mg"],
        symptoms: &["occasional headaches", "fatigue"],
        lifestyle: LifestyleRisks {
            salt_intake: SaltIntake::Moderate,
            alcohol: AlcoholUse::None,
            stress: StressLevel::High,
        },
        last_contact: "2024-01-14",
        adherence_score: 85,
        enrollment_date: "2023-11-15",
        baseline: WearableBaseline {
            heart_rate: 82.0,
            steps: 2500.0,
            sleep_hours: 6.5,
        },
    },
    RosterEntry {
        id: "P002",
        name: "James Okonkwo",
        age: 62,
        age_bracket: "55-64",
        gender: Gender::Male,
        known_hypertension: true,
        past_stroke_history: true,
        medications: &["Metoprolol 50mg", "Hydrochlorothiazide 25mg"],
        symptoms: &["dizziness", "chest discomfort"],
        lifestyle: LifestyleRisks {
            salt_intake: SaltIntake::High,
            alcohol: AlcoholUse::Occasional,
            stress: StressLevel::Moderate,
        },
        last_contact: "2024-01-14",
        adherence_score: 72,
        enrollment_date: "2023-09-20",
        baseline: WearableBaseline {
            heart_rate: 88.0,
            steps: 1800.0,
            sleep_hours: 5.5,
        },
    },
    RosterEntry {
        id: "P003",
        name: "Maria Santos",
        age: 45,
        age_bracket: "45-54",
        gender: Gender::Female,
        known_hypertension: true,
        past_stroke_history: false,
        medications: &["Losartan 50mg"],
        symptoms: &["occasional palpitations"],
        lifestyle: LifestyleRisks {
            salt_intake: SaltIntake::Low,
            alcohol: AlcoholUse::None,
            stress: StressLevel::Moderate,
        },
        last_contact: "2024-01-13",
        adherence_score: 92,
        enrollment_date: "2023-12-01",
        baseline: WearableBaseline {
            heart_rate: 75.0,
            steps: 3500.0,
            sleep_hours: 7.0,
        },
    },
    RosterEntry {
        id: "P004",
        name: "Robert Chen",
        age: 52,
        age_bracket: "45-54",
        gender: Gender::Male,
        known_hypertension: false,
        past_stroke_history: false,
        medications: &[],
        symptoms: &["mild stress"],
        lifestyle: LifestyleRisks {
            salt_intake: SaltIntake::Moderate,
            alcohol: AlcoholUse::Occasional,
            stress: StressLevel::Low,
        },
        last_contact: "2024-01-12",
        adherence_score: 95,
        enrollment_date: "2024-01-01",
        baseline: WearableBaseline {
            heart_rate: 72.0,
            steps: 4500.0,
            sleep_hours: 7.5,
        },
    },
    RosterEntry {
        id: "P005",
        name: "Fatima Hassan",
        age: 67,
        age_bracket: "65+",
        gender: Gender::Female,
        known_hypertension: true,
        past_stroke_history: true,
        medications: &["Enalapril 10mg", "Aspirin 81mg"],
        symptoms: &["vision changes", "headaches"],
        lifestyle: LifestyleRisks {
            salt_intake: SaltIntake::Moderate,
            alcohol: AlcoholUse::None,
            stress: StressLevel::High,
        },
        last_contact: "2024-01-14",
        adherence_score: 88,
        enrollment_date: "2023-08-10",
        baseline: WearableBaseline {
            heart_rate: 85.0,
            steps: 2000.0,
            sleep_hours: 6.0,
        },
    },
];

struct AuthoredAlert {
    id: &'static str,
    patient_id: &'static str,
    timestamp: &'static str,
    kind: AlertKind,
    title: &'static str,
    description: &'static str,
    risk_level: RiskLevel,
    recommended_action: &'static str,
    status: AlertStatus,
    rule_triggered: &'static str,
}

const AUTHORED_ALERTS: [AuthoredAlert; 12] = [
    AuthoredAlert {
        id: "ALT001",
        patient_id: "P002",
        timestamp: "2024-01-14T09:30:00Z",
        kind: AlertKind::Combined,
        title: "High Risk - Immediate BP Check Recommended",
        description: "Elevated resting heart rate (95 bpm) combined with reported dizziness and chest tightness. Past stroke history increases risk.",
        risk_level: RiskLevel::High,
        recommended_action: "Contact patient immediately. Recommend urgent BP check and potential clinic visit within 24 hours.",
        status: AlertStatus::Pending,
        rule_triggered: "RULE C: Combined wearable + text pattern",
    },
    AuthoredAlert {
        id: "ALT002",
        patient_id: "P005",
        timestamp: "2024-01-14T08:15:00Z",
        kind: AlertKind::Communication,
        title: "Vision Changes Reported",
        description: "Patient reported vision changes during IVR call. Combined with existing hypertension and past stroke history.",
        risk_level: RiskLevel::High,
        recommended_action: "Urgent follow-up call. Assess for stroke symptoms (FAST protocol). Consider immediate medical attention.",
        status: AlertStatus::Acknowledged,
        rule_triggered: "RULE B: High-risk keyword detection",
    },
    AuthoredAlert {
        id: "ALT003",
        patient_id: "P001",
        timestamp: "2024-01-13T14:20:00Z",
        kind: AlertKind::Wearable,
        title: "Reduced Activity + HR Drift",
        description: "Step count below 1500 for 3 consecutive days. Resting heart rate increased from baseline 82 to 89 bpm.",
        risk_level: RiskLevel::Moderate,
        recommended_action: "Schedule check-in call within 48 hours. Inquire about energy levels and potential barriers to activity.",
        status: AlertStatus::Pending,
        rule_triggered: "RULE A: Low steps + rising HR",
    },
    AuthoredAlert {
        id: "ALT004",
        patient_id: "P001",
        timestamp: "2024-01-12T11:00:00Z",
        kind: AlertKind::Communication,
        title: "Stress and Sleep Issues",
        description: "Patient reported high work stress and difficulty sleeping. Combined with existing high stress risk profile.",
        risk_level: RiskLevel::Moderate,
        recommended_action: "Discuss stress management techniques. Consider referral to counseling services.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE B: Moderate-risk keywords",
    },
    AuthoredAlert {
        id: "ALT005",
        patient_id: "P002",
        timestamp: "2024-01-12T16:45:00Z",
        kind: AlertKind::Wearable,
        title: "Poor Sleep Affecting BP Stability",
        description: "Sleep duration below 4 hours for 2 nights. Heart rate variability shows increased volatility.",
        risk_level: RiskLevel::High,
        recommended_action: "Priority follow-up. Assess sleep patterns and potential causes. Review medication timing.",
        status: AlertStatus::Acknowledged,
        rule_triggered: "RULE A: Sleep < 4hrs + HR volatility",
    },
    AuthoredAlert {
        id: "ALT006",
        patient_id: "P003",
        timestamp: "2024-01-11T10:30:00Z",
        kind: AlertKind::Communication,
        title: "Palpitations Reported",
        description: "Patient mentioned palpitations during stressful period. No concerning wearable patterns observed.",
        risk_level: RiskLevel::Moderate,
        recommended_action: "Monitor over next 48 hours. If symptoms persist, recommend ECG evaluation.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE B: Moderate-risk keywords",
    },
    AuthoredAlert {
        id: "ALT007",
        patient_id: "P005",
        timestamp: "2024-01-11T09:00:00Z",
        kind: AlertKind::Combined,
        title: "BP Trending Upward",
        description: "Self-reported BP readings trending upward over 4 days. Wearable shows corresponding HR increase.",
        risk_level: RiskLevel::High,
        recommended_action: "Schedule home visit. Review medication adherence. Consider dosage adjustment consultation.",
        status: AlertStatus::Pending,
        rule_triggered: "RULE C: Combined pattern + baseline risk",
    },
    AuthoredAlert {
        id: "ALT008",
        patient_id: "P002",
        timestamp: "2024-01-10T13:15:00Z",
        kind: AlertKind::Communication,
        title: "Missed Medication Dose",
        description: "Patient reported missing morning dose. History of adherence challenges noted.",
        risk_level: RiskLevel::Moderate,
        recommended_action: "Reinforce medication importance. Discuss reminder strategies.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE B: Missed dose keyword",
    },
    AuthoredAlert {
        id: "ALT009",
        patient_id: "P001",
        timestamp: "2024-01-09T17:30:00Z",
        kind: AlertKind::Wearable,
        title: "Possible Stress Episode",
        description: "Heart rate spike to 118 bpm during period of low physical activity.",
        risk_level: RiskLevel::Moderate,
        recommended_action: "Check in on emotional wellbeing. Review stress management plan.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE A: HR max > 120 with inactivity",
    },
    AuthoredAlert {
        id: "ALT010",
        patient_id: "P003",
        timestamp: "2024-01-08T11:45:00Z",
        kind: AlertKind::Wearable,
        title: "Activity Pattern Change",
        description: "Significant increase in daily steps (from 3500 to 5200). Positive lifestyle modification detected.",
        risk_level: RiskLevel::Low,
        recommended_action: "Acknowledge improvement. Encourage continued activity.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE A: Positive trend detection",
    },
    AuthoredAlert {
        id: "ALT011",
        patient_id: "P004",
        timestamp: "2024-01-07T09:00:00Z",
        kind: AlertKind::Communication,
        title: "Routine Check - All Clear",
        description: "Patient reports feeling well. No concerning symptoms or keywords detected.",
        risk_level: RiskLevel::Low,
        recommended_action: "Continue standard monitoring schedule.",
        status: AlertStatus::Resolved,
        rule_triggered: "RULE B: Low-risk keywords",
    },
    AuthoredAlert {
        id: "ALT012",
        patient_id: "P005",
        timestamp: "2024-01-06T14:00:00Z",
        kind: AlertKind::Combined,
        title: "Headache with Elevated HR",
        description: "Recurring headaches reported via WhatsApp. Wearable shows resting HR 10% above baseline.",
        risk_level: RiskLevel::High,
        recommended_action: "Urgent BP measurement. If elevated, recommend clinic visit same day.",
        status: AlertStatus::Acknowledged,
        rule_triggered: "RULE C: Symptom + vital sign correlation",
    },
];

fn parse_date(field: &'static str, value: &'static str) -> Result<NaiveDate, DatasetError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| DatasetError::InvalidDate {
        field,
        value,
        source,
    })
}

fn parse_timestamp(
    field: &'static str,
    value: &'static str,
) -> Result<DateTime<Utc>, DatasetError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| DatasetError::InvalidDate {
            field,
            value,
            source,
        })
}

impl RosterEntry {
    /// Profile without a score; the caller attaches one.
    fn to_patient(&self) -> Result<Patient, DatasetError> {
        Ok(Patient {
            id: self.id.to_string(),
            name: self.name.to_string(),
            age: self.age,
            age_bracket: self.age_bracket.to_string(),
            gender: self.gender,
            known_hypertension: self.known_hypertension,
            past_stroke_history: self.past_stroke_history,
            medications: to_strings(self.medications),
            symptoms: to_strings(self.symptoms),
            lifestyle_risks: self.lifestyle,
            risk_score: 0,
            risk_level: RiskLevel::Low,
            last_contact: parse_date("lastContact", self.last_contact)?,
            adherence_score: self.adherence_score,
            enrollment_date: parse_date("enrollmentDate", self.enrollment_date)?,
        })
    }
}

impl AuthoredAlert {
    fn to_alert(&self) -> Result<AiAlert, DatasetError> {
        Ok(AiAlert {
            id: self.id.to_string(),
            patient_id: self.patient_id.to_string(),
            timestamp: parse_timestamp("timestamp", self.timestamp)?,
            kind: self.kind,
            title: self.title.to_string(),
            description: self.description.to_string(),
            risk_level: self.risk_level,
            recommended_action: self.recommended_action.to_string(),
            status: self.status,
            rule_triggered: self.rule_triggered.to_string(),
        })
    }
}

/// Roster sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientSort {
    Name,
    #[default]
    Risk,
    Adherence,
}

impl FromStr for PatientSort {
    type Err = HeartguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "risk" => Ok(Self::Risk),
            "adherence" => Ok(Self::Adherence),
            other => Err(HeartguardError::InvalidSort(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortOrder {
    type Err = HeartguardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(HeartguardError::InvalidSort(other.to_string())),
        }
    }
}

/// Headline numbers for the dashboard overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub high_risk_patients: usize,
    pub moderate_risk_patients: usize,
    pub low_risk_patients: usize,
    pub pending_alerts: usize,
    /// Mean adherence, rounded to a whole percentage
    pub average_adherence: u8,
    pub total_communications: usize,
    pub total_wearable_readings: usize,
}

/// Immutable snapshot of all simulated data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedDataset {
    seed: u64,
    patients: Vec<Patient>,
    wearable_data: BTreeMap<String, Vec<WearableReading>>,
    communication_logs: BTreeMap<String, Vec<CommunicationLogEntry>>,
    alerts: Vec<AiAlert>,
}

impl SimulatedDataset {
    /// Build the snapshot.
    ///
    /// # Errors
    /// Returns `HeartguardError::Dataset` if the authored roster or alerts
    /// are malformed.
    pub fn build(config: &SimulationConfig) -> crate::Result<Self> {
        let seed = config.seed.unwrap_or_else(|| OsRng.next_u64());
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let mut patients = Vec::with_capacity(ROSTER.len());
        let mut wearable_data = BTreeMap::new();
        let mut communication_logs = BTreeMap::new();

        for entry in &ROSTER {
            let readings = generate_wearable_series(entry.id, entry.baseline, &mut rng);
            let logs = generate_communication_logs(entry.id);

            let profile = entry.to_patient()?;
            let score = calculate_risk_score(&profile, &readings, &logs);
            let patient = profile.with_risk_score(score);
            patient.validate().map_err(|errors| DatasetError::InvalidPatient {
                id: patient.id.clone(),
                errors,
            })?;

            wearable_data.insert(patient.id.clone(), readings);
            communication_logs.insert(patient.id.clone(), logs);
            patients.push(patient);
        }

        let alerts = AUTHORED_ALERTS
            .iter()
            .map(AuthoredAlert::to_alert)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(orphan) = alerts
            .iter()
            .find(|a| !patients.iter().any(|p| p.id == a.patient_id))
        {
            return Err(DatasetError::UnknownPatient {
                alert: orphan.id.clone(),
                patient: orphan.patient_id.clone(),
            }
            .into());
        }

        tracing::info!(
            "Built simulated dataset: {} patients, {} alerts (seed={:#x})",
            patients.len(),
            alerts.len(),
            seed
        );

        Ok(Self {
            seed,
            patients,
            wearable_data,
            communication_logs,
            alerts,
        })
    }

    /// Seed the snapshot was generated from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Look up a patient; `None` means "not found".
    #[must_use]
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Look up a patient that must exist.
    ///
    /// # Errors
    /// Returns `HeartguardError::PatientNotFound` for an unknown id.
    pub fn require_patient(&self, id: &str) -> crate::Result<&Patient> {
        self.patient(id)
            .ok_or_else(|| HeartguardError::PatientNotFound(id.to_string()))
    }

    /// Roster search: case-insensitive substring match on name or id,
    /// sorted, optionally truncated to `limit` rows.
    ///
    /// Risk sorts by tier, then score.
    #[must_use]
    pub fn search_patients(
        &self,
        query: &str,
        sort_by: PatientSort,
        order: SortOrder,
        limit: Option<usize>,
    ) -> Vec<&Patient> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.id.to_lowercase().contains(&needle)
            })
            .collect();

        found.sort_by(|a, b| {
            let ascending = match sort_by {
                PatientSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                PatientSort::Risk => a
                    .risk_level
                    .cmp(&b.risk_level)
                    .then(a.risk_score.cmp(&b.risk_score)),
                PatientSort::Adherence => a.adherence_score.cmp(&b.adherence_score),
            };
            match order {
                SortOrder::Ascending => ascending,
                SortOrder::Descending => ascending.reverse(),
            }
        });

        if let Some(limit) = limit {
            found.truncate(limit);
        }
        found
    }

    /// Wearable series for a patient (empty for unknown ids).
    #[must_use]
    pub fn wearable_readings(&self, patient_id: &str) -> &[WearableReading] {
        self.wearable_data
            .get(patient_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Communication log for a patient (empty for unknown ids).
    #[must_use]
    pub fn communication_logs(&self, patient_id: &str) -> &[CommunicationLogEntry] {
        self.communication_logs
            .get(patient_id)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn daily_wearable_aggregates(&self, patient_id: &str) -> Vec<DailyWearableAggregate> {
        daily_aggregates(self.wearable_readings(patient_id))
    }

    /// Alerts as authored, before any review actions.
    #[must_use]
    pub fn alerts(&self) -> &[AiAlert] {
        &self.alerts
    }

    /// Patients at or above `level`, highest score first.
    #[must_use]
    pub fn patients_at_risk(&self, level: RiskLevel) -> Vec<&Patient> {
        let mut at_risk: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|p| p.risk_level >= level)
            .collect();
        at_risk.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
        at_risk
    }

    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        let count_level =
            |level: RiskLevel| self.patients.iter().filter(|p| p.risk_level == level).count();
        let adherence_sum: u32 = self
            .patients
            .iter()
            .map(|p| u32::from(p.adherence_score))
            .sum();
        let average_adherence = if self.patients.is_empty() {
            0
        } else {
            (f64::from(adherence_sum) / self.patients.len() as f64).round() as u8
        };

        DashboardStats {
            total_patients: self.patients.len(),
            high_risk_patients: count_level(RiskLevel::High),
            moderate_risk_patients: count_level(RiskLevel::Moderate),
            low_risk_patients: count_level(RiskLevel::Low),
            pending_alerts: self
                .alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Pending)
                .count(),
            average_adherence,
            total_communications: self.communication_logs.values().map(Vec::len).sum(),
            total_wearable_readings: self.wearable_data.values().map(Vec::len).sum(),
        }
    }
}
