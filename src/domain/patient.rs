//! Patient profile types for hypertension/stroke-risk monitoring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::risk::{RiskLevel, MAX_RISK_SCORE};

/// Self-reported dietary salt intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltIntake {
    Low,
    Moderate,
    High,
}

/// Self-reported alcohol consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlcoholUse {
    None,
    Occasional,
    Frequent,
}

/// Self-reported stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

macro_rules! lowercase_display {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }
    };
}

lowercase_display!(SaltIntake { Low => "low", Moderate => "moderate", High => "high" });
lowercase_display!(AlcoholUse {
    None => "none",
    Occasional => "occasional",
    Frequent => "frequent",
});
lowercase_display!(StressLevel { Low => "low", Moderate => "moderate", High => "high" });

/// Lifestyle risk factors collected at enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleRisks {
    pub salt_intake: SaltIntake,
    pub alcohol: AlcoholUse,
    pub stress: StressLevel,
}

impl LifestyleRisks {
    /// No lifestyle risk factors at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            salt_intake: SaltIntake::Low,
            alcohol: AlcoholUse::None,
            stress: StressLevel::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
        }
    }
}

/// An enrolled patient as shown on the CHW dashboard.
///
/// `risk_score` and `risk_level` are filled in once the wearable and
/// communication history is available (see [`Patient::with_risk_score`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub age_bracket: String,
    pub gender: Gender,
    pub known_hypertension: bool,
    pub past_stroke_history: bool,
    /// Current prescriptions, in the order recorded
    pub medications: Vec<String>,
    /// Symptoms reported at enrollment
    pub symptoms: Vec<String>,
    pub lifestyle_risks: LifestyleRisks,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub last_contact: NaiveDate,
    /// Medication adherence percentage (0-100)
    pub adherence_score: u8,
    pub enrollment_date: NaiveDate,
}

impl Patient {
    /// Attach a computed risk score, deriving the risk tier from it.
    ///
    /// Scores above the maximum are clamped.
    #[must_use]
    pub fn with_risk_score(mut self, score: u8) -> Self {
        let score = score.min(MAX_RISK_SCORE);
        self.risk_score = score;
        self.risk_level = RiskLevel::from_score(score);
        self
    }

    /// Validate that the profile is internally consistent.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push("Patient id must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push(format!("Patient {} has an empty name", self.id));
        }
        if !(18..=120).contains(&self.age) {
            errors.push(format!("Age {} out of range [18, 120]", self.age));
        }
        if self.adherence_score > 100 {
            errors.push(format!(
                "Adherence score {} out of range [0, 100]",
                self.adherence_score
            ));
        }
        if self.risk_score > MAX_RISK_SCORE {
            errors.push(format!("Risk score {} out of range [0, 100]", self.risk_score));
        }
        if self.last_contact < self.enrollment_date {
            errors.push(format!(
                "Last contact {} precedes enrollment {}",
                self.last_contact, self.enrollment_date
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A patient with no clinical or lifestyle risk factors.
    pub fn healthy_patient() -> Patient {
        Patient {
            id: "T001".to_string(),
            name: "Test Patient".to_string(),
            age: 40,
            age_bracket: "35-44".to_string(),
            gender: Gender::Female,
            known_hypertension: false,
            past_stroke_history: false,
            medications: Vec::new(),
            symptoms: Vec::new(),
            lifestyle_risks: LifestyleRisks::none(),
            risk_score: 0,
            risk_level: RiskLevel::Low,
            last_contact: NaiveDate::from_ymd_opt(2024, 1, 14).expect("valid date"),
            adherence_score: 90,
            enrollment_date: NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date"),
        }
    }
}
