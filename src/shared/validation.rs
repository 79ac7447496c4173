use crate::domain::entities::{AuditRecordChanges, AuditRecordDraft};
use crate::shared::error::AppError;

/// Checks a create request before anything touches storage or the network.
/// Every blank required field is reported, not just the first one.
pub fn validate_draft(draft: &AuditRecordDraft) -> Result<(), AppError> {
    let mut blank: Vec<&str> = Vec::new();

    if draft.slot_number.trim().is_empty() {
        blank.push("slot_number");
    }
    if draft.primary_barcode.trim().is_empty() {
        blank.push("primary_barcode");
    }
    if draft.warehouse_logistics.trim().is_empty() {
        blank.push("warehouse_logistics");
    }
    if draft.time_received.trim().is_empty() {
        blank.push("time_received");
    }
    if draft.auditors.trim().is_empty() {
        blank.push("auditors");
    }
    if draft.warehouse_location.trim().is_empty() {
        blank.push("warehouse_location");
    }

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(blank))
    }
}

/// Checks an update request: a field may be omitted, but a field that is
/// provided must not be blank.
pub fn validate_changes(changes: &AuditRecordChanges) -> Result<(), AppError> {
    let mut blank: Vec<&str> = Vec::new();

    let provided = [
        ("slot_number", &changes.slot_number),
        ("primary_barcode", &changes.primary_barcode),
        ("warehouse_logistics", &changes.warehouse_logistics),
        ("time_received", &changes.time_received),
        ("auditors", &changes.auditors),
        ("warehouse_location", &changes.warehouse_location),
    ];
    for (name, value) in provided {
        if let Some(value) = value {
            if value.trim().is_empty() {
                blank.push(name);
            }
        }
    }

    if blank.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(blank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_draft() -> AuditRecordDraft {
        AuditRecordDraft {
            slot_number: "A-12".to_string(),
            primary_barcode: "4006381333931".to_string(),
            warehouse_logistics: "inbound".to_string(),
            comments: String::new(),
            date_received: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            time_received: "09:30".to_string(),
            auditors: "R. Vega".to_string(),
            warehouse_location: "Dock 4".to_string(),
        }
    }

    #[test]
    fn test_complete_draft_passes() {
        assert!(validate_draft(&sample_draft()).is_ok());
    }

    #[test]
    fn test_blank_fields_are_all_listed() {
        let mut draft = sample_draft();
        draft.slot_number = "  ".to_string();
        draft.auditors = String::new();

        let err = validate_draft(&draft).unwrap_err();
        match err {
            AppError::Validation { fields } => {
                assert_eq!(fields, vec!["slot_number", "auditors"]);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_changes_allow_omitted_but_not_blank() {
        let changes = AuditRecordChanges {
            comments: Some("recount requested".to_string()),
            ..Default::default()
        };
        assert!(validate_changes(&changes).is_ok());

        let changes = AuditRecordChanges {
            primary_barcode: Some(String::new()),
            ..Default::default()
        };
        let err = validate_changes(&changes).unwrap_err();
        match err {
            AppError::Validation { fields } => assert_eq!(fields, vec!["primary_barcode"]),
            other => panic!("expected validation error, got {other}"),
        }
    }
}
