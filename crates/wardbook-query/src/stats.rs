// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use wardbook_model::{PatientRecord, PatientStatus};

/// Aggregate counters shown on the dashboard. Unrecognized statuses count
/// toward the total but toward no per-status bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientStats {
    pub total_patients: usize,
    pub active_patients: usize,
    pub follow_up_patients: usize,
    pub discharged_patients: usize,
    pub total_visits: u64,
}

#[must_use]
pub fn compute_stats(records: &[PatientRecord]) -> PatientStats {
    let mut stats = PatientStats {
        total_patients: records.len(),
        ..PatientStats::default()
    };
    for record in records {
        match record.status.known() {
            Some(PatientStatus::Active) => stats.active_patients += 1,
            Some(PatientStatus::FollowUp) => stats.follow_up_patients += 1,
            Some(PatientStatus::Discharged) => stats.discharged_patients += 1,
            None => {}
        }
        stats.total_visits += u64::from(record.visit_count);
    }
    stats
}
