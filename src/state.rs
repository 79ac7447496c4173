use crate::application::ports::{RecordStore, RemoteAuditSource};
use crate::application::services::{NetworkMonitor, SessionStateStore, SyncOrchestrator};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::storage::SqliteRecordStore;
use crate::shared::config::AppConfig;
use std::sync::Arc;

/// Composition root: opens the local store, wires the engine together, and
/// starts the background connectivity mirror and (when configured) the
/// periodic sync.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub store: Arc<dyn RecordStore>,
    pub network: Arc<NetworkMonitor>,
    pub session: Arc<SessionStateStore>,
    pub orchestrator: SyncOrchestrator,
}

impl AppState {
    pub async fn new(
        config: AppConfig,
        remote: Arc<dyn RemoteAuditSource>,
    ) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let pool = ConnectionPool::new(&config.database).await?;
        pool.migrate().await?;

        let store: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::new(pool.clone()));
        let network = Arc::new(NetworkMonitor::new(config.network.clone()));
        let session = Arc::new(SessionStateStore::new());

        let orchestrator = SyncOrchestrator::new(
            store.clone(),
            remote,
            network.clone(),
            session.clone(),
        );
        orchestrator.mirror_connectivity();
        if config.sync.auto_sync {
            orchestrator.schedule_sync(config.sync.sync_interval);
        }

        Ok(Self {
            config,
            pool,
            store,
            network,
            session,
            orchestrator,
        })
    }
}
