pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{RecordStore, RemoteAuditSource};
pub use application::services::{
    AuditViewSnapshot, ConflictDetector, ConnectionQuality, NetworkMonitor, Resolution,
    SessionStateStore, SyncOrchestrator, SyncReport, SyncStrategy,
};
pub use domain::entities::{
    AuditRecord, AuditRecordChanges, AuditRecordDraft, ConflictRecord, LocalRecord, SyncOperation,
    SyncPhase, SyncState,
};
pub use domain::value_objects::{RecordId, RecordStatus};
pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;

/// Initialize tracing output. Honors `RUST_LOG`; defaults to debug-level
/// logs for this crate and info elsewhere.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audit_sync=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
