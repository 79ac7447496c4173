use crate::application::ports::{RecordStore, RemoteAuditSource};
use crate::application::services::conflict_resolution::{ConflictDetector, Resolution};
use crate::application::services::network_monitor::{NetworkMonitor, SyncStrategy};
use crate::application::services::session_state::SessionStateStore;
use crate::domain::entities::{
    AuditRecord, AuditRecordChanges, AuditRecordDraft, LocalRecord, SyncOperation, SyncPhase,
};
use crate::domain::value_objects::{RecordId, RecordStatus};
use crate::shared::error::AppError;
use crate::shared::validation;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome summary of one manual sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SyncReport {
    pub dispatched: u32,
    pub succeeded: u32,
    pub failed: u32,
}

/// A pending or deleted row classified into the remote operation that will
/// reconcile it. Pending rows still carrying a locally minted id were never
/// acknowledged by the remote source and go out as creates.
enum SyncWorkItem {
    Create(LocalRecord),
    Update(LocalRecord),
    Delete(LocalRecord),
}

impl SyncWorkItem {
    fn classify(row: LocalRecord) -> Self {
        match row.status {
            RecordStatus::Deleted => SyncWorkItem::Delete(row),
            _ if row.external_id().is_local() => SyncWorkItem::Create(row),
            _ => SyncWorkItem::Update(row),
        }
    }

    fn item_id(&self) -> String {
        match self {
            SyncWorkItem::Create(row) | SyncWorkItem::Update(row) | SyncWorkItem::Delete(row) => {
                row.external_id().to_string()
            }
        }
    }

    fn operation(&self) -> SyncOperation {
        match self {
            SyncWorkItem::Create(_) => SyncOperation::Create,
            SyncWorkItem::Update(_) => SyncOperation::Update,
            SyncWorkItem::Delete(_) => SyncOperation::Delete,
        }
    }
}

/// Coordinates local-first reads, optimistic writes, and reconciliation
/// against the remote source. All published state flows through the
/// [`SessionStateStore`]; the local store stays the single source of truth
/// for durable data.
pub struct SyncOrchestrator {
    store: Arc<dyn RecordStore>,
    remote: Arc<dyn RemoteAuditSource>,
    network: Arc<NetworkMonitor>,
    state: Arc<SessionStateStore>,
    detector: ConflictDetector,
    /// Bumped on every load; a reconciliation holding an older value
    /// discards its publish instead of clobbering fresher data.
    load_generation: Arc<AtomicU64>,
    syncing: Arc<AtomicBool>,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        remote: Arc<dyn RemoteAuditSource>,
        network: Arc<NetworkMonitor>,
        state: Arc<SessionStateStore>,
    ) -> Self {
        Self {
            store,
            remote,
            network,
            state,
            detector: ConflictDetector,
            load_generation: Arc::new(AtomicU64::new(0)),
            syncing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Loads the active view: local store first, remote only when the store
    /// is empty or as a non-blocking background refresh.
    pub async fn load(&self) -> Result<(), AppError> {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let online = self.network.is_online();
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
            s.online = online;
        });

        let stored = match self.store.get_all_active().await {
            Ok(stored) => stored,
            Err(err) => {
                warn!("local store unavailable during load: {err}");
                return self.load_without_store(online, err).await;
            }
        };

        if stored.is_empty() {
            if !online {
                // offline with an empty store is not an error
                self.state.update(|s| {
                    s.records.clear();
                    s.loading = false;
                });
                return Ok(());
            }
            return self.load_from_remote().await;
        }

        // fast path: publish stored records without waiting on the network
        let pending = stored.iter().filter(|r| r.is_pending()).count() as u32;
        let records: Vec<AuditRecord> = stored.into_iter().map(|r| r.record).collect();
        self.state.update(|s| {
            s.records = records;
            s.loading = false;
            s.sync.pending_count = pending;
        });

        if online {
            let this = self.clone();
            tokio::spawn(async move {
                // a failure here must not disturb the already-published data
                if let Err(err) = this.reconcile(generation).await {
                    warn!("background reconciliation failed: {err}");
                }
            });
        }
        Ok(())
    }

    /// Load fallback when the store cannot be read: fetch straight from the
    /// remote source when online, otherwise the error is terminal.
    async fn load_without_store(&self, online: bool, store_err: AppError) -> Result<(), AppError> {
        if online {
            match self.remote.list_all().await {
                Ok(mut records) => {
                    for record in &mut records {
                        record.synced = true;
                    }
                    self.state.update(|s| {
                        s.records = records;
                        s.loading = false;
                    });
                    return Ok(());
                }
                Err(err) => {
                    let message = err.to_string();
                    self.state.update(|s| {
                        s.loading = false;
                        s.error = Some(message);
                    });
                    return Err(err);
                }
            }
        }
        let message = store_err.to_string();
        self.state.update(|s| {
            s.loading = false;
            s.error = Some(message);
        });
        Err(store_err)
    }

    /// First fetch into an empty store: persist everything as synced, then
    /// publish.
    async fn load_from_remote(&self) -> Result<(), AppError> {
        self.state.update(|s| s.sync.begin(SyncOperation::Fetch, None));

        let remote_records = match self.remote.list_all().await {
            Ok(records) => records,
            Err(err) => {
                let message = err.to_string();
                self.state.update(|s| {
                    s.loading = false;
                    s.error = Some(message.clone());
                    s.sync.finish_error(message);
                });
                return Err(err);
            }
        };

        let mut published = Vec::with_capacity(remote_records.len());
        for mut record in remote_records {
            record.synced = true;
            match self.store.save(record.clone(), RecordStatus::Synced).await {
                Ok(saved) => published.push(saved.record),
                Err(err) => {
                    // still show the fetched record; only persistence failed
                    warn!(id = %record.external_id, "failed to persist fetched record: {err}");
                    published.push(record);
                }
            }
        }

        info!(count = published.len(), "initial load fetched from remote");
        self.state.update(|s| {
            s.records = published;
            s.loading = false;
            s.sync.pending_count = 0;
            s.sync.finish_success();
        });
        Ok(())
    }

    /// On-demand reconciliation with the remote source. Overwrites local
    /// synced copies, drops synced rows the remote no longer has, and never
    /// touches rows with local pending or deleted state.
    pub async fn reconcile_now(&self) -> Result<(), AppError> {
        let generation = self.load_generation.load(Ordering::SeqCst);
        self.reconcile(generation).await
    }

    async fn reconcile(&self, generation: u64) -> Result<(), AppError> {
        let remote_records = self.remote.list_all().await?;

        let locally_dirty: HashSet<String> = {
            let pending = self.store.get_by_status(RecordStatus::Pending).await?;
            let deleted = self.store.get_by_status(RecordStatus::Deleted).await?;
            pending
                .iter()
                .chain(deleted.iter())
                .map(|r| r.external_id().to_string())
                .collect()
        };

        let remote_ids: HashSet<String> = remote_records
            .iter()
            .map(|r| r.external_id.to_string())
            .collect();

        for mut record in remote_records {
            if locally_dirty.contains(record.external_id.as_str()) {
                continue;
            }
            record.synced = true;
            self.store.save(record, RecordStatus::Synced).await?;
        }

        // synced rows the remote no longer knows were deleted elsewhere
        for row in self.store.get_by_status(RecordStatus::Synced).await? {
            if !remote_ids.contains(row.external_id().as_str()) {
                self.store.remove(row.external_id()).await?;
            }
        }

        if self.load_generation.load(Ordering::SeqCst) != generation {
            debug!("discarding reconciliation publish superseded by a newer load");
            return Ok(());
        }
        self.refresh_view().await
    }

    /// Creates a record optimistically: it is durable and visible before
    /// any network round trip. Returns the stored record, confirmed by the
    /// remote source when that succeeds, still carrying its local id when
    /// it does not.
    pub async fn create(&self, draft: AuditRecordDraft) -> Result<AuditRecord, AppError> {
        validation::validate_draft(&draft)?;

        let local_id = RecordId::mint_local();
        let record = AuditRecord::from_draft(draft.clone(), local_id.clone());
        let saved = self.store.save(record, RecordStatus::Pending).await?;
        self.refresh_view().await?;

        if !self.network.is_online() {
            debug!(id = %local_id, "created offline, record stays pending");
            return Ok(saved.record);
        }

        self.state
            .update(|s| s.sync.begin(SyncOperation::Create, Some(local_id.to_string())));

        match self.remote.create(draft).await {
            Ok(mut confirmed) => {
                confirmed.synced = true;
                // swap the optimistic row for the acknowledged one
                self.store.remove(&local_id).await?;
                let stored = self.store.save(confirmed, RecordStatus::Synced).await?;
                self.state.update(|s| s.sync.finish_success());
                self.refresh_view().await?;
                Ok(stored.record)
            }
            Err(err) => {
                // the optimistic record survives; a later manual sync retries it
                warn!(id = %local_id, "remote create failed: {err}");
                self.state.update(|s| s.sync.finish_error(err.to_string()));
                Ok(saved.record)
            }
        }
    }

    /// Updates go straight to the remote source; the local copy changes
    /// only once the remote has acknowledged.
    pub async fn update(
        &self,
        id: &RecordId,
        changes: AuditRecordChanges,
    ) -> Result<AuditRecord, AppError> {
        validation::validate_changes(&changes)?;

        self.state
            .update(|s| s.sync.begin(SyncOperation::Update, Some(id.to_string())));

        match self.remote.update(id, changes).await {
            Ok(mut updated) => {
                updated.synced = true;
                let stored = self.store.save(updated, RecordStatus::Synced).await?;
                self.state.update(|s| s.sync.finish_success());
                self.refresh_view().await?;
                Ok(stored.record)
            }
            Err(AppError::ConflictDetected {
                server_modified, ..
            }) => self.handle_conflict(id, server_modified).await,
            Err(err) => {
                self.state.update(|s| s.sync.finish_error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Deletes optimistically: the record leaves the active view at once.
    /// A remote failure rolls the exact record back; offline deletion stays
    /// soft until a manual sync.
    pub async fn delete(&self, id: &RecordId) -> Result<(), AppError> {
        let existing = self
            .store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        if id.is_local() {
            // never acknowledged remotely, so there is nothing to tell the server
            self.store.remove(id).await?;
            self.refresh_view().await?;
            return Ok(());
        }

        self.store.mark_deleted(id).await?;
        self.refresh_view().await?;

        if !self.network.is_online() {
            debug!(id = %id, "deleted offline, awaiting manual sync");
            return Ok(());
        }

        self.state
            .update(|s| s.sync.begin(SyncOperation::Delete, Some(id.to_string())));

        match self.remote.delete(id).await {
            Ok(()) => {
                self.store.remove(id).await?;
                self.state.update(|s| s.sync.finish_success());
                self.refresh_view().await?;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                // already gone remotely, which is all a delete asks for
                self.store.remove(id).await?;
                self.state.update(|s| s.sync.finish_success());
                self.refresh_view().await?;
                Ok(())
            }
            Err(err) => {
                warn!(id = %id, "remote delete failed, restoring record: {err}");
                self.store
                    .save(existing.record.clone(), existing.status)
                    .await?;
                self.state.update(|s| s.sync.finish_error(err.to_string()));
                self.refresh_view().await?;
                Err(err)
            }
        }
    }

    /// Manual "sync to server": pushes every pending and deleted record,
    /// each item independently. Errors when offline or already syncing.
    pub async fn sync_now(&self) -> Result<SyncReport, AppError> {
        if !self.network.is_online() {
            let err = AppError::NetworkUnavailable("cannot sync while offline".to_string());
            self.state
                .update(|s| s.sync.error = Some(err.to_string()));
            return Err(err);
        }
        if self.syncing.swap(true, Ordering::SeqCst) {
            return Err(AppError::SyncFailure("sync already in progress".to_string()));
        }

        let result = self.run_manual_sync().await;
        self.syncing.store(false, Ordering::SeqCst);
        result
    }

    async fn run_manual_sync(&self) -> Result<SyncReport, AppError> {
        let pending = self.store.get_by_status(RecordStatus::Pending).await?;
        let deleted = self.store.get_by_status(RecordStatus::Deleted).await?;

        let items: Vec<SyncWorkItem> = pending
            .into_iter()
            .chain(deleted)
            .map(SyncWorkItem::classify)
            .collect();
        let total = items.len();

        if total == 0 {
            self.state.update(|s| s.sync.finish_success());
            return Ok(SyncReport::default());
        }

        info!(total, "manual sync dispatching items");
        self.state.update(|s| {
            s.sync.status = SyncPhase::Syncing;
            s.sync.error = None;
        });

        let completed = Arc::new(AtomicUsize::new(0));
        let succeeded = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = items
            .into_iter()
            .map(|item| {
                let this = self.clone();
                let completed = completed.clone();
                let succeeded = succeeded.clone();
                async move {
                    let item_id = item.item_id();
                    let operation = item.operation();
                    this.state.update(|s| {
                        s.sync.current_operation = Some(operation);
                        s.sync.current_item_id = Some(item_id.clone());
                    });

                    match this.process_item(item).await {
                        Ok(()) => {
                            succeeded.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(err) => {
                            warn!(id = %item_id, "manual sync item failed: {err}");
                        }
                    }

                    // completion check must be an atomic increment-and-compare:
                    // concurrent items may finish in any interleaving
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if done == total {
                        this.finish_manual_sync().await;
                    }
                }
            })
            .collect();
        join_all(tasks).await;

        let succeeded = succeeded.load(Ordering::SeqCst) as u32;
        let total = total as u32;
        Ok(SyncReport {
            dispatched: total,
            succeeded,
            failed: total - succeeded,
        })
    }

    async fn finish_manual_sync(&self) {
        if let Err(err) = self.refresh_view().await {
            warn!("failed to refresh view after manual sync: {err}");
        }
        self.state.update(|s| s.sync.finish_success());
    }

    async fn process_item(&self, item: SyncWorkItem) -> Result<(), AppError> {
        match item {
            SyncWorkItem::Create(row) => {
                let mut confirmed = self.remote.create(row.record.to_draft()).await?;
                confirmed.synced = true;
                self.store.remove(row.external_id()).await?;
                self.store.save(confirmed, RecordStatus::Synced).await?;
                Ok(())
            }
            SyncWorkItem::Update(row) => {
                let id = row.external_id().clone();
                match self.remote.update(&id, row.record.to_changes()).await {
                    Ok(mut updated) => {
                        updated.synced = true;
                        self.store.save(updated, RecordStatus::Synced).await?;
                        Ok(())
                    }
                    Err(AppError::ConflictDetected {
                        server_modified, ..
                    }) => self
                        .handle_conflict(&id, server_modified)
                        .await
                        .map(|_| ()),
                    Err(err) => Err(err),
                }
            }
            SyncWorkItem::Delete(row) => {
                let id = row.external_id();
                if id.is_local() {
                    // the remote never heard of it; dropping the row is the ack
                    self.store.remove(id).await?;
                    return Ok(());
                }
                match self.remote.delete(id).await {
                    Ok(()) => {}
                    Err(err) if err.is_not_found() => {}
                    Err(err) => return Err(err),
                }
                self.store.remove(id).await?;
                Ok(())
            }
        }
    }

    /// Conflict path: confirm the divergence against the live remote
    /// version, record it, and apply last-write-wins.
    async fn handle_conflict(
        &self,
        id: &RecordId,
        server_modified: DateTime<Utc>,
    ) -> Result<AuditRecord, AppError> {
        let mut remote_version = self.remote.get_by_id(id).await?;

        let local = match self.store.get_by_id(id).await? {
            Some(local) => local,
            None => {
                // nothing local to dispute; adopt the server version
                remote_version.synced = true;
                let stored = self.store.save(remote_version, RecordStatus::Synced).await?;
                self.state.update(|s| s.sync.finish_success());
                self.refresh_view().await?;
                return Ok(stored.record);
            }
        };

        let baseline = self.state.snapshot().sync.last_sync_time;
        let detected = self.detector.detect(
            &local.record,
            &remote_version,
            local.last_modified,
            server_modified,
            baseline,
        );

        let Some(mut conflict) = detected else {
            // the server signalled a conflict but the business fields agree;
            // accept its copy and move on
            remote_version.synced = true;
            let stored = self.store.save(remote_version, RecordStatus::Synced).await?;
            self.state.update(|s| s.sync.finish_success());
            self.refresh_view().await?;
            return Ok(stored.record);
        };

        self.store
            .set_conflict_snapshot(id, Some(remote_version.clone()))
            .await?;
        info!(item = %conflict.item_id, "conflict detected, applying last-write-wins");

        let resolution = self.detector.resolve(&conflict);
        let resolved_record = match resolution {
            Resolution::UseServer => {
                remote_version.synced = true;
                let stored = self.store.save(remote_version, RecordStatus::Synced).await?;
                stored.record
            }
            Resolution::UseLocal => {
                // keep the local version pending so the next manual sync
                // re-pushes it to the server
                self.store
                    .save(local.record.clone(), RecordStatus::Pending)
                    .await?;
                local.record.clone()
            }
        };

        conflict.resolved = true;
        self.state.update(|s| {
            s.sync.record_conflict(conflict);
            s.sync.finish_success();
        });
        self.refresh_view().await?;
        Ok(resolved_record)
    }

    /// Marks a record as the current selection in the published view.
    pub fn select_record(&self, id: Option<&RecordId>) {
        self.state.update(|s| {
            let found = id.and_then(|id| s.records.iter().find(|r| &r.external_id == id).cloned());
            s.selected = found;
        });
    }

    /// Restores the published state to its initial values and invalidates
    /// any in-flight background reconciliation.
    pub fn reset(&self) {
        self.load_generation.fetch_add(1, Ordering::SeqCst);
        self.state.reset();
    }

    /// Periodic background sync. A skip or delayed recommendation from the
    /// network gate falls through to the next tick.
    pub fn schedule_sync(&self, interval_secs: u64) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                interval.tick().await;
                if this.network.sync_strategy().await != SyncStrategy::Immediate {
                    continue;
                }
                if let Err(err) = this.sync_now().await {
                    debug!("scheduled sync skipped: {err}");
                }
            }
        });
    }

    /// Mirrors the network gate's online flag into the published view.
    pub fn mirror_connectivity(&self) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut rx = this.network.subscribe_online();
            while rx.changed().await.is_ok() {
                let online = *rx.borrow();
                this.state.update(|s| s.online = online);
            }
        });
    }

    /// Re-reads the active records from the store and publishes them plus
    /// the recomputed pending count as one snapshot.
    async fn refresh_view(&self) -> Result<(), AppError> {
        let active = self.store.get_all_active().await?;
        let pending = active.iter().filter(|r| r.is_pending()).count() as u32;
        let records: Vec<AuditRecord> = active.into_iter().map(|r| r.record).collect();
        self.state.update(|s| {
            if let Some(selected) = &s.selected {
                if !records
                    .iter()
                    .any(|r| r.external_id == selected.external_id)
                {
                    s.selected = None;
                }
            }
            s.records = records;
            s.sync.pending_count = pending;
        });
        Ok(())
    }
}

impl Clone for SyncOrchestrator {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            remote: self.remote.clone(),
            network: self.network.clone(),
            state: self.state.clone(),
            detector: self.detector,
            load_generation: self.load_generation.clone(),
            syncing: self.syncing.clone(),
        }
    }
}
