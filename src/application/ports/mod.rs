pub mod record_store;
pub mod remote_source;

pub use record_store::RecordStore;
pub use remote_source::RemoteAuditSource;
