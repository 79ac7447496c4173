pub mod conflict_resolution;
pub mod network_monitor;
pub mod session_state;
pub mod sync_orchestrator;

pub use conflict_resolution::{ConflictDetector, Resolution};
pub use network_monitor::{ConnectionClass, ConnectionQuality, NetworkMonitor, SyncStrategy};
pub use session_state::{AuditViewSnapshot, SessionStateStore};
pub use sync_orchestrator::{SyncOrchestrator, SyncReport};
