use crate::domain::value_objects::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A warehouse audit record as seen by callers of the engine.
///
/// `external_id` is stable once the remote source has assigned it; until
/// then it holds a locally minted identifier. `synced` is derived from the
/// stored status and never compared during conflict detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub external_id: RecordId,
    pub slot_number: String,
    pub primary_barcode: String,
    pub warehouse_logistics: String,
    pub comments: String,
    pub date_received: NaiveDate,
    pub time_received: String,
    pub auditors: String,
    pub warehouse_location: String,
    pub synced: bool,
}

impl AuditRecord {
    pub fn from_draft(draft: AuditRecordDraft, external_id: RecordId) -> Self {
        Self {
            external_id,
            slot_number: draft.slot_number,
            primary_barcode: draft.primary_barcode,
            warehouse_logistics: draft.warehouse_logistics,
            comments: draft.comments,
            date_received: draft.date_received,
            time_received: draft.time_received,
            auditors: draft.auditors,
            warehouse_location: draft.warehouse_location,
            synced: false,
        }
    }

    /// Field-by-field equality over the business fields only. Ids and the
    /// synced flag are system fields and never count as divergence.
    pub fn business_eq(&self, other: &AuditRecord) -> bool {
        self.slot_number == other.slot_number
            && self.primary_barcode == other.primary_barcode
            && self.warehouse_logistics == other.warehouse_logistics
            && self.comments == other.comments
            && self.auditors == other.auditors
            && self.warehouse_location == other.warehouse_location
    }

    pub fn to_draft(&self) -> AuditRecordDraft {
        AuditRecordDraft {
            slot_number: self.slot_number.clone(),
            primary_barcode: self.primary_barcode.clone(),
            warehouse_logistics: self.warehouse_logistics.clone(),
            comments: self.comments.clone(),
            date_received: self.date_received,
            time_received: self.time_received.clone(),
            auditors: self.auditors.clone(),
            warehouse_location: self.warehouse_location.clone(),
        }
    }

    pub fn to_changes(&self) -> AuditRecordChanges {
        AuditRecordChanges {
            slot_number: Some(self.slot_number.clone()),
            primary_barcode: Some(self.primary_barcode.clone()),
            warehouse_logistics: Some(self.warehouse_logistics.clone()),
            comments: Some(self.comments.clone()),
            date_received: Some(self.date_received),
            time_received: Some(self.time_received.clone()),
            auditors: Some(self.auditors.clone()),
            warehouse_location: Some(self.warehouse_location.clone()),
        }
    }

    pub fn merged_with(&self, changes: &AuditRecordChanges) -> AuditRecord {
        let mut merged = self.clone();
        if let Some(value) = &changes.slot_number {
            merged.slot_number = value.clone();
        }
        if let Some(value) = &changes.primary_barcode {
            merged.primary_barcode = value.clone();
        }
        if let Some(value) = &changes.warehouse_logistics {
            merged.warehouse_logistics = value.clone();
        }
        if let Some(value) = &changes.comments {
            merged.comments = value.clone();
        }
        if let Some(value) = changes.date_received {
            merged.date_received = value;
        }
        if let Some(value) = &changes.time_received {
            merged.time_received = value.clone();
        }
        if let Some(value) = &changes.auditors {
            merged.auditors = value.clone();
        }
        if let Some(value) = &changes.warehouse_location {
            merged.warehouse_location = value.clone();
        }
        merged
    }
}

/// Canonical create request. All business fields, no identifier; the engine
/// mints a local one before the remote source has its say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecordDraft {
    pub slot_number: String,
    pub primary_barcode: String,
    pub warehouse_logistics: String,
    pub comments: String,
    pub date_received: NaiveDate,
    pub time_received: String,
    pub auditors: String,
    pub warehouse_location: String,
}

/// Canonical partial-update request. An omitted field keeps its stored
/// value; a provided field must pass validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRecordChanges {
    pub slot_number: Option<String>,
    pub primary_barcode: Option<String>,
    pub warehouse_logistics: Option<String>,
    pub comments: Option<String>,
    pub date_received: Option<NaiveDate>,
    pub time_received: Option<String>,
    pub auditors: Option<String>,
    pub warehouse_location: Option<String>,
}
