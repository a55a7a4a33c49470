//! Synthetic wearable series generation and daily rollups.
//!
//! Each patient gets 14 days of readings at four readings per day, perturbed
//! around their baseline. Heart rate drifts up 5% over the final three days.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rand::Rng;

use crate::domain::{DailyWearableAggregate, WearableBaseline, WearableReading};

/// Readings per generated series (14 days x 4 per day).
pub const READINGS_PER_SERIES: usize = 56;

pub const READINGS_PER_DAY: usize = 4;

const READING_INTERVAL_HOURS: i64 = 6;

/// Day index after which the heart-rate trend factor applies.
const TREND_START_DAY: usize = 10;
const TREND_FACTOR: f64 = 1.05;

const HEART_RATE_NOISE_BPM: f64 = 7.0;
const HRV_BASELINE_MS: f64 = 40.0;
const HRV_NOISE_MS: f64 = 10.0;
const STEPS_NOISE: f64 = 1200.0;
const SLEEP_NOISE_HOURS: f64 = 1.0;
const MIN_SLEEP_HOURS: f64 = 3.0;
const MAX_SLEEP_HOURS: f64 = 9.0;

/// First instant of every simulated series and log (2024-01-01T00:00:00Z).
#[must_use]
pub fn simulation_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("2024-01-01T00:00:00Z is a valid UTC instant")
}

/// Generate a patient's wearable series.
///
/// Always returns exactly [`READINGS_PER_SERIES`] readings in ascending
/// timestamp order. The values depend only on `baseline` and the state of
/// `rng`, so a seeded RNG reproduces the series exactly.
pub fn generate_wearable_series<R>(
    patient_id: &str,
    baseline: WearableBaseline,
    rng: &mut R,
) -> Vec<WearableReading>
where
    R: Rng + ?Sized,
{
    let epoch = simulation_epoch();

    (0..READINGS_PER_SERIES)
        .map(|i| {
            let day = i / READINGS_PER_DAY;
            let trend = if day > TREND_START_DAY { TREND_FACTOR } else { 1.0 };

            let heart_rate = (baseline.heart_rate
                + rng.gen_range(-HEART_RATE_NOISE_BPM..HEART_RATE_NOISE_BPM))
                * trend;
            let hrv = HRV_BASELINE_MS + rng.gen_range(-HRV_NOISE_MS..HRV_NOISE_MS);
            let steps = baseline.steps + rng.gen_range(-STEPS_NOISE..STEPS_NOISE);
            let sleep = (baseline.sleep_hours
                + rng.gen_range(-SLEEP_NOISE_HOURS..SLEEP_NOISE_HOURS))
            .clamp(MIN_SLEEP_HOURS, MAX_SLEEP_HOURS);

            WearableReading {
                id: format!("wr-{patient_id}-{i}"),
                patient_id: patient_id.to_string(),
                timestamp: epoch + Duration::hours(READING_INTERVAL_HOURS * i as i64),
                heart_rate: non_negative_round(heart_rate),
                heart_rate_variability: non_negative_round(hrv),
                step_count: non_negative_round(steps),
                sleep_hours: sleep,
            }
        })
        .collect()
}

fn non_negative_round(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Roll readings up per UTC calendar day, oldest day first.
#[must_use]
pub fn daily_aggregates(readings: &[WearableReading]) -> Vec<DailyWearableAggregate> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&WearableReading>> = BTreeMap::new();
    for reading in readings {
        by_day
            .entry(reading.timestamp.date_naive())
            .or_default()
            .push(reading);
    }

    by_day
        .into_iter()
        .map(|(date, day)| {
            let n = day.len() as f64;
            let hr_sum: f64 = day.iter().map(|r| f64::from(r.heart_rate)).sum();
            let sleep_sum: f64 = day.iter().map(|r| r.sleep_hours).sum();

            DailyWearableAggregate {
                date,
                avg_heart_rate: (hr_sum / n).round() as u32,
                total_steps: day.iter().map(|r| u64::from(r.step_count)).sum(),
                avg_sleep: (sleep_sum / n * 10.0).round() / 10.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn baseline() -> WearableBaseline {
        WearableBaseline::new(82.0, 2500.0, 6.5)
    }

    #[test]
    fn test_series_shape() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let series = generate_wearable_series("P001", baseline(), &mut rng);

        assert_eq!(series.len(), READINGS_PER_SERIES);
        assert_eq!(series[0].timestamp, simulation_epoch());
        assert_eq!(series[0].id, "wr-P001-0");
        assert_eq!(series[55].id, "wr-P001-55");
        assert_eq!(series[55].timestamp, simulation_epoch() + Duration::hours(330));
        assert!(series.iter().all(|r| r.patient_id == "P001"));
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = generate_wearable_series("P003", baseline(), &mut ChaCha20Rng::seed_from_u64(42));
        let b = generate_wearable_series("P003", baseline(), &mut ChaCha20Rng::seed_from_u64(42));
        assert_eq!(a, b);

        let c = generate_wearable_series("P003", baseline(), &mut ChaCha20Rng::seed_from_u64(43));
        assert_ne!(a, c);
        assert_eq!(a.len(), c.len());
    }

    #[test]
    fn test_heart_rate_bounds_respect_trend() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let series = generate_wearable_series("P002", baseline(), &mut rng);

        for (i, r) in series.iter().enumerate() {
            let hr = f64::from(r.heart_rate);
            if i < 44 {
                assert!((75.0..=89.0).contains(&hr), "reading {i}: {hr}");
            } else {
                // (82 +/- 7) * 1.05, rounded
                assert!((79.0..=94.0).contains(&hr), "reading {i}: {hr}");
            }
            assert!((30..=50).contains(&r.heart_rate_variability));
        }
    }

    #[test]
    fn test_trend_applies_to_last_twelve_readings() {
        // (1000 +/- 7) and (1000 +/- 7) * 1.05 are disjoint after rounding.
        let untrended = 993..=1007u32;
        let trended = 1042..=1058u32;
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let series =
            generate_wearable_series("P001", WearableBaseline::new(1000.0, 2500.0, 6.5), &mut rng);

        assert!(untrended.contains(&series[43].heart_rate));
        assert!(trended.contains(&series[44].heart_rate));
        for (i, r) in series.iter().enumerate() {
            let expected = if i < 44 { &untrended } else { &trended };
            assert!(expected.contains(&r.heart_rate), "reading {i}: {}", r.heart_rate);
        }
        let drifted = series
            .iter()
            .filter(|r| trended.contains(&r.heart_rate))
            .count();
        assert_eq!(drifted, 12);
    }

    #[test]
    fn test_steps_never_negative_for_low_baseline() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let series =
            generate_wearable_series("P004", WearableBaseline::new(70.0, 100.0, 7.0), &mut rng);
        assert!(series.iter().any(|r| r.step_count == 0));
        assert!(series.iter().all(|r| r.step_count <= 1300));
    }

    #[test]
    fn test_daily_aggregates() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let series = generate_wearable_series("P001", baseline(), &mut rng);
        let days = daily_aggregates(&series);

        assert_eq!(days.len(), 14);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));

        let first_day_steps: u64 = series[..4].iter().map(|r| u64::from(r.step_count)).sum();
        assert_eq!(days[0].total_steps, first_day_steps);
        assert!((days[0].avg_sleep * 10.0 - (days[0].avg_sleep * 10.0).round()).abs() < 1e-9);
    }

    #[test]
    fn test_daily_aggregates_empty() {
        assert!(daily_aggregates(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_series_is_well_formed(
            seed in any::<u64>(),
            hr in 40.0f64..140.0,
            steps in 0.0f64..15000.0,
            sleep in 0.0f64..12.0,
        ) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let baseline = WearableBaseline::new(hr, steps, sleep);
            let series = generate_wearable_series("PX", baseline, &mut rng);

            prop_assert_eq!(series.len(), READINGS_PER_SERIES);
            prop_assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            for r in &series {
                prop_assert!((MIN_SLEEP_HOURS..=MAX_SLEEP_HOURS).contains(&r.sleep_hours));
            }
        }
    }
}
