use crate::application::ports::RecordStore;
use crate::domain::entities::{AuditRecord, LocalRecord};
use crate::domain::value_objects::{RecordId, RecordStatus};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::storage::rows::{format_date, LocalRecordRow};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Sqlite-backed [`RecordStore`]. One row per external id; the status
/// column is indexed for the pending/deleted queries manual sync relies on.
pub struct SqliteRecordStore {
    pool: ConnectionPool,
}

impl SqliteRecordStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_status(&self, status: RecordStatus) -> Result<Vec<LocalRecord>, AppError> {
        let rows = sqlx::query_as::<_, LocalRecordRow>(
            r#"
            SELECT * FROM audit_records
            WHERE status = ?1
            ORDER BY last_modified ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(self.pool.get_pool())
        .await?;

        rows.into_iter().map(LocalRecordRow::into_domain).collect()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get_all_active(&self) -> Result<Vec<LocalRecord>, AppError> {
        let rows = sqlx::query_as::<_, LocalRecordRow>(
            r#"
            SELECT * FROM audit_records
            WHERE status != 'deleted'
            ORDER BY last_modified ASC
            "#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        rows.into_iter().map(LocalRecordRow::into_domain).collect()
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<Option<LocalRecord>, AppError> {
        let row = sqlx::query_as::<_, LocalRecordRow>(
            r#"
            SELECT * FROM audit_records
            WHERE external_id = ?1 AND status != 'deleted'
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool.get_pool())
        .await?;

        row.map(LocalRecordRow::into_domain).transpose()
    }

    async fn save(
        &self,
        record: AuditRecord,
        status: RecordStatus,
    ) -> Result<LocalRecord, AppError> {
        let now = Utc::now().timestamp_millis();

        // keep last_modified monotonic per record even within one tick
        let previous: Option<(String, i64)> = sqlx::query_as(
            "SELECT local_id, last_modified FROM audit_records WHERE external_id = ?1",
        )
        .bind(record.external_id.as_str())
        .fetch_optional(self.pool.get_pool())
        .await?;

        let (local_id, last_modified) = match previous {
            Some((existing_id, previous_ms)) => (existing_id, now.max(previous_ms + 1)),
            None => (Uuid::new_v4().to_string(), now),
        };

        sqlx::query(
            r#"
            INSERT INTO audit_records (
                local_id, external_id, slot_number, primary_barcode,
                warehouse_logistics, comments, date_received, time_received,
                auditors, warehouse_location, status, last_modified,
                conflict_snapshot
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL)
            ON CONFLICT(external_id) DO UPDATE SET
                slot_number = excluded.slot_number,
                primary_barcode = excluded.primary_barcode,
                warehouse_logistics = excluded.warehouse_logistics,
                comments = excluded.comments,
                date_received = excluded.date_received,
                time_received = excluded.time_received,
                auditors = excluded.auditors,
                warehouse_location = excluded.warehouse_location,
                status = excluded.status,
                last_modified = excluded.last_modified,
                conflict_snapshot = NULL
            "#,
        )
        .bind(&local_id)
        .bind(record.external_id.as_str())
        .bind(&record.slot_number)
        .bind(&record.primary_barcode)
        .bind(&record.warehouse_logistics)
        .bind(&record.comments)
        .bind(format_date(record.date_received))
        .bind(&record.time_received)
        .bind(&record.auditors)
        .bind(&record.warehouse_location)
        .bind(status.as_str())
        .bind(last_modified)
        .execute(self.pool.get_pool())
        .await?;

        let last_modified = DateTime::from_timestamp_millis(last_modified)
            .ok_or_else(|| AppError::Database("last_modified out of range".to_string()))?;

        let mut record = record;
        record.synced = status == RecordStatus::Synced;

        Ok(LocalRecord {
            local_id,
            record,
            status,
            last_modified,
            conflict_snapshot: None,
        })
    }

    async fn mark_deleted(&self, id: &RecordId) -> Result<(), AppError> {
        let now = Utc::now().timestamp_millis();
        sqlx::query(
            r#"
            UPDATE audit_records
            SET status = 'deleted', last_modified = MAX(last_modified + 1, ?1)
            WHERE external_id = ?2
            "#,
        )
        .bind(now)
        .bind(id.as_str())
        .execute(self.pool.get_pool())
        .await?;

        Ok(())
    }

    async fn mark_synced(&self, id: &RecordId) -> Result<(), AppError> {
        sqlx::query("UPDATE audit_records SET status = 'synced' WHERE external_id = ?1")
            .bind(id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }

    async fn remove(&self, id: &RecordId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM audit_records WHERE external_id = ?1")
            .bind(id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }

    async fn get_by_status(&self, status: RecordStatus) -> Result<Vec<LocalRecord>, AppError> {
        self.fetch_by_status(status).await
    }

    async fn set_conflict_snapshot(
        &self,
        id: &RecordId,
        snapshot: Option<AuditRecord>,
    ) -> Result<(), AppError> {
        let json = snapshot.map(|s| serde_json::to_string(&s)).transpose()?;
        sqlx::query("UPDATE audit_records SET conflict_snapshot = ?1 WHERE external_id = ?2")
            .bind(json)
            .bind(id.as_str())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }
}
