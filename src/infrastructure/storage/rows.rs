use crate::domain::entities::{AuditRecord, LocalRecord};
use crate::domain::value_objects::{RecordId, RecordStatus};
use crate::shared::error::AppError;
use chrono::{DateTime, NaiveDate};
use sqlx::FromRow;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, FromRow)]
pub struct LocalRecordRow {
    pub local_id: String,
    pub external_id: String,
    pub slot_number: String,
    pub primary_barcode: String,
    pub warehouse_logistics: String,
    pub comments: String,
    pub date_received: String,
    pub time_received: String,
    pub auditors: String,
    pub warehouse_location: String,
    pub status: String,
    pub last_modified: i64,
    pub conflict_snapshot: Option<String>,
}

impl LocalRecordRow {
    pub fn into_domain(self) -> Result<LocalRecord, AppError> {
        let status: RecordStatus = self
            .status
            .parse()
            .map_err(AppError::Database)?;
        let external_id = RecordId::new(self.external_id).map_err(AppError::Database)?;
        let date_received = NaiveDate::parse_from_str(&self.date_received, DATE_FORMAT)
            .map_err(|e| AppError::Database(format!("bad date_received column: {e}")))?;
        let last_modified = DateTime::from_timestamp_millis(self.last_modified)
            .ok_or_else(|| AppError::Database("last_modified out of range".to_string()))?;
        let conflict_snapshot: Option<AuditRecord> = self
            .conflict_snapshot
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(LocalRecord {
            local_id: self.local_id,
            record: AuditRecord {
                external_id,
                slot_number: self.slot_number,
                primary_barcode: self.primary_barcode,
                warehouse_logistics: self.warehouse_logistics,
                comments: self.comments,
                date_received,
                time_received: self.time_received,
                auditors: self.auditors,
                warehouse_location: self.warehouse_location,
                synced: status == RecordStatus::Synced,
            },
            status,
            last_modified,
            conflict_snapshot,
        })
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
