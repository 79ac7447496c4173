pub mod audit_record;
pub mod conflict_record;
pub mod local_record;
pub mod sync_state;

pub use audit_record::{AuditRecord, AuditRecordChanges, AuditRecordDraft};
pub use conflict_record::ConflictRecord;
pub use local_record::LocalRecord;
pub use sync_state::{SyncOperation, SyncPhase, SyncState};
