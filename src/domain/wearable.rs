//! Wearable device readings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One sample from a patient's wearable, taken every six hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearableReading {
    pub id: String,
    pub patient_id: String,
    pub timestamp: DateTime<Utc>,
    /// Beats per minute
    pub heart_rate: u32,
    /// Milliseconds
    pub heart_rate_variability: u32,
    pub step_count: u32,
    pub sleep_hours: f64,
}

/// Baseline vitals a synthetic series is perturbed around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WearableBaseline {
    pub heart_rate: f64,
    pub steps: f64,
    pub sleep_hours: f64,
}

impl WearableBaseline {
    #[must_use]
    pub fn new(heart_rate: f64, steps: f64, sleep_hours: f64) -> Self {
        Self {
            heart_rate,
            steps,
            sleep_hours,
        }
    }
}

/// Per-day rollup used by the vitals charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWearableAggregate {
    pub date: NaiveDate,
    /// Mean heart rate, rounded to the nearest bpm
    pub avg_heart_rate: u32,
    pub total_steps: u64,
    /// Mean sleep, rounded to one decimal place
    pub avg_sleep: f64,
}
