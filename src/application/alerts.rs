//! Alert review board.
//!
//! Owns the working copy of the alert list. The snapshot keeps the alerts as
//! authored; acknowledge/resolve actions only touch the board.

use std::collections::BTreeMap;

use crate::domain::{AiAlert, AlertError, AlertStatus, Patient, RiskLevel};

/// Shown when an alert's patient is not on the roster.
pub const UNKNOWN_PATIENT: &str = "Unknown";

/// Mutable alert list for CHW review.
#[derive(Debug, Clone, Default)]
pub struct AlertBoard {
    alerts: Vec<AiAlert>,
}

impl AlertBoard {
    #[must_use]
    pub fn new(alerts: Vec<AiAlert>) -> Self {
        Self { alerts }
    }

    #[must_use]
    pub fn all(&self) -> &[AiAlert] {
        &self.alerts
    }

    /// Alerts with the given status, or all of them for `None`.
    #[must_use]
    pub fn filter(&self, status: Option<AlertStatus>) -> Vec<&AiAlert> {
        self.alerts
            .iter()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AiAlert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Count per status; every status is present, possibly with zero.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<AlertStatus, usize> {
        let mut counts: BTreeMap<AlertStatus, usize> =
            AlertStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for alert in &self.alerts {
            *counts.entry(alert.status).or_default() += 1;
        }
        counts
    }

    /// Pending alerts at the given risk level.
    #[must_use]
    pub fn pending_at(&self, level: RiskLevel) -> Vec<&AiAlert> {
        self.alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Pending && a.risk_level == level)
            .collect()
    }

    /// Acknowledge an alert.
    ///
    /// # Errors
    /// `AlertError::NotFound` for an unknown id, `InvalidTransition` if the
    /// alert is already resolved.
    pub fn acknowledge(&mut self, id: &str) -> Result<&AiAlert, AlertError> {
        self.update(id, AlertStatus::Acknowledged)
    }

    /// Resolve an alert.
    ///
    /// # Errors
    /// `AlertError::NotFound` for an unknown id.
    pub fn resolve(&mut self, id: &str) -> Result<&AiAlert, AlertError> {
        self.update(id, AlertStatus::Resolved)
    }

    fn update(&mut self, id: &str, next: AlertStatus) -> Result<&AiAlert, AlertError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlertError::NotFound(id.to_string()))?;

        let previous = alert.status;
        alert.transition_to(next)?;
        if previous != next {
            tracing::info!("Alert {} moved {} -> {}", alert.id, previous, next);
        }
        Ok(alert)
    }
}

/// Name of the patient an alert refers to.
#[must_use]
pub fn patient_name<'a>(patients: &'a [Patient], alert: &AiAlert) -> &'a str {
    patients
        .iter()
        .find(|p| p.id == alert.patient_id)
        .map_or(UNKNOWN_PATIENT, |p| p.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dataset::{SimulatedDataset, SimulationConfig};
    use crate::domain::fixtures::healthy_patient;

    fn board() -> (SimulatedDataset, AlertBoard) {
        let data = SimulatedDataset::build(&SimulationConfig::with_seed(1)).expect("dataset");
        let board = AlertBoard::new(data.alerts().to_vec());
        (data, board)
    }

    #[test]
    fn test_counts_and_filter() {
        let (_, board) = board();
        let counts = board.counts();

        assert_eq!(counts[&AlertStatus::Pending], 3);
        assert_eq!(counts[&AlertStatus::Acknowledged], 3);
        assert_eq!(counts[&AlertStatus::Resolved], 6);
        assert_eq!(board.filter(None).len(), 12);
        assert_eq!(board.filter(Some(AlertStatus::Pending)).len(), 3);
    }

    #[test]
    fn test_counts_empty_board() {
        let counts = AlertBoard::default().counts();
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|c| *c == 0));
    }

    #[test]
    fn test_acknowledge_then_resolve() {
        let (data, mut board) = board();

        let alert = board.acknowledge("ALT001").expect("acknowledge");
        assert_eq!(alert.status, AlertStatus::Acknowledged);
        let alert = board.resolve("ALT001").expect("resolve");
        assert_eq!(alert.status, AlertStatus::Resolved);

        assert_eq!(board.counts()[&AlertStatus::Pending], 2);
        // Snapshot keeps the authored status.
        assert_eq!(data.alerts()[0].status, AlertStatus::Pending);
    }

    #[test]
    fn test_resolved_alert_cannot_be_acknowledged() {
        let (_, mut board) = board();
        let err = board.acknowledge("ALT004").unwrap_err();
        assert!(matches!(err, AlertError::InvalidTransition { .. }));
        assert_eq!(
            board.get("ALT004").map(|a| a.status),
            Some(AlertStatus::Resolved)
        );
    }

    #[test]
    fn test_unknown_alert() {
        let (_, mut board) = board();
        assert_eq!(
            board.resolve("ALT999").unwrap_err(),
            AlertError::NotFound("ALT999".to_string())
        );
    }

    #[test]
    fn test_pending_high() {
        let (_, board) = board();
        let ids: Vec<_> = board
            .pending_at(RiskLevel::High)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ALT001", "ALT007"]);
    }

    #[test]
    fn test_patient_name_lookup() {
        let (data, board) = board();
        let alert = board.get("ALT001").expect("alert");
        assert_eq!(patient_name(data.patients(), alert), "James Okonkwo");

        let others = vec![healthy_patient()];
        assert_eq!(patient_name(&others, alert), UNKNOWN_PATIENT);
    }
}
