use crate::domain::entities::{AuditRecord, SyncState};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// One consistent snapshot of everything a subscriber may render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditViewSnapshot {
    pub records: Vec<AuditRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<AuditRecord>,
    pub sync: SyncState,
    pub online: bool,
}

impl Default for AuditViewSnapshot {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            selected: None,
            sync: SyncState::new(),
            online: true,
        }
    }
}

/// The published state container: an injectable, resettable store that
/// broadcasts immutable snapshots over a watch channel. Subscribers always
/// observe a complete snapshot, never a half-updated collection.
pub struct SessionStateStore {
    tx: watch::Sender<AuditViewSnapshot>,
}

impl SessionStateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuditViewSnapshot::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuditViewSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> AuditViewSnapshot {
        self.tx.borrow().clone()
    }

    /// Applies a mutation and publishes the result as one atomic snapshot.
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut AuditViewSnapshot),
    {
        self.tx.send_modify(mutate);
    }

    pub fn reset(&self) {
        self.tx.send_modify(|snapshot| *snapshot = AuditViewSnapshot::default());
    }
}

impl Default for SessionStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_publishes_to_subscribers() {
        let store = SessionStateStore::new();
        let mut rx = store.subscribe();

        store.update(|s| s.loading = true);

        rx.changed().await.unwrap();
        assert!(rx.borrow().loading);
    }

    #[tokio::test]
    async fn test_snapshot_reflects_latest_update() {
        let store = SessionStateStore::new();
        store.update(|s| s.sync.pending_count = 2);
        assert_eq!(store.snapshot().sync.pending_count, 2);
    }

    #[tokio::test]
    async fn test_reset_restores_initial_snapshot() {
        let store = SessionStateStore::new();
        store.update(|s| {
            s.loading = true;
            s.error = Some("boom".to_string());
        });

        store.reset();
        assert_eq!(store.snapshot(), AuditViewSnapshot::default());
    }
}
