use crate::domain::entities::{AuditRecord, ConflictRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of a conflict wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    UseLocal,
    UseServer,
}

/// Pure conflict detection and last-write-wins resolution. Same inputs,
/// same decision, no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// A conflict exists only if the local record was modified after the
    /// last known sync point AND at least one business field differs.
    /// Differences confined to system fields never raise a conflict.
    pub fn detect(
        &self,
        local: &AuditRecord,
        remote: &AuditRecord,
        local_modified: DateTime<Utc>,
        server_modified: DateTime<Utc>,
        baseline: Option<DateTime<Utc>>,
    ) -> Option<ConflictRecord> {
        let baseline = baseline.unwrap_or(DateTime::<Utc>::MIN_UTC);
        if local_modified <= baseline {
            return None;
        }
        if local.business_eq(remote) {
            return None;
        }
        Some(ConflictRecord::new(
            local.external_id.to_string(),
            local_modified,
            server_modified,
        ))
    }

    /// Last-write-wins by modification timestamp. Ties go to the server,
    /// which is treated as the authoritative source of truth.
    pub fn resolve(&self, conflict: &ConflictRecord) -> Resolution {
        if conflict.local_modified > conflict.server_modified {
            Resolution::UseLocal
        } else {
            Resolution::UseServer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RecordId;
    use chrono::{Duration, NaiveDate};

    fn record(id: &str, comments: &str) -> AuditRecord {
        AuditRecord {
            external_id: RecordId::new(id.to_string()).unwrap(),
            slot_number: "A-12".to_string(),
            primary_barcode: "4006381333931".to_string(),
            warehouse_logistics: "inbound".to_string(),
            comments: comments.to_string(),
            date_received: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            time_received: "09:30".to_string(),
            auditors: "R. Vega".to_string(),
            warehouse_location: "Dock 4".to_string(),
            synced: false,
        }
    }

    fn conflict_at(local_offset_secs: i64) -> ConflictRecord {
        let server_modified = Utc::now();
        ConflictRecord::new(
            "8841".to_string(),
            server_modified + Duration::seconds(local_offset_secs),
            server_modified,
        )
    }

    #[test]
    fn test_identical_fields_never_conflict() {
        let detector = ConflictDetector;
        let local = record("8841", "pallet intact");
        let remote = record("8841", "pallet intact");
        let now = Utc::now();

        // timestamps say "modified", fields say "same" -> no conflict
        let detected = detector.detect(&local, &remote, now, now, Some(now - Duration::hours(1)));
        assert!(detected.is_none());
    }

    #[test]
    fn test_divergent_fields_after_baseline_conflict() {
        let detector = ConflictDetector;
        let local = record("8841", "recounted: 37");
        let remote = record("8841", "recounted: 40");
        let now = Utc::now();

        let detected = detector.detect(&local, &remote, now, now, Some(now - Duration::hours(1)));
        assert!(detected.is_some());
        assert_eq!(detected.unwrap().item_id, "8841");
    }

    #[test]
    fn test_unmodified_local_never_conflicts() {
        let detector = ConflictDetector;
        let local = record("8841", "recounted: 37");
        let remote = record("8841", "recounted: 40");
        let baseline = Utc::now();

        let detected = detector.detect(
            &local,
            &remote,
            baseline - Duration::minutes(5),
            baseline,
            Some(baseline),
        );
        assert!(detected.is_none());
    }

    #[test]
    fn test_resolve_prefers_later_writer() {
        let detector = ConflictDetector;
        assert_eq!(detector.resolve(&conflict_at(10)), Resolution::UseLocal);
        assert_eq!(detector.resolve(&conflict_at(-10)), Resolution::UseServer);
    }

    #[test]
    fn test_resolve_tie_goes_to_server() {
        let detector = ConflictDetector;
        assert_eq!(detector.resolve(&conflict_at(0)), Resolution::UseServer);
    }
}
