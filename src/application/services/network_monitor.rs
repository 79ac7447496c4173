use crate::shared::config::NetworkConfig;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::debug;

/// Recommendation for how eagerly a sync should run under current
/// connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    Immediate,
    Delayed,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionClass {
    Online,
    Slow,
    Offline,
}

/// Raw connectivity signals as reported by the platform. All fields are
/// best-effort; a missing signal defaults the classification to online.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionQuality {
    pub effective_type: Option<String>,
    pub downlink_mbps: Option<f64>,
    pub rtt_ms: Option<u64>,
    pub save_data: bool,
}

const SLOW_EFFECTIVE_TYPES: [&str; 3] = ["slow-2g", "2g", "3g"];

/// Classifies connectivity into online/offline/slow and recommends a sync
/// strategy. Online/offline reports are debounced so that rapid flapping
/// commits only the latest report.
pub struct NetworkMonitor {
    online_tx: watch::Sender<bool>,
    quality: RwLock<Option<ConnectionQuality>>,
    debounce: Duration,
    report_seq: AtomicU64,
    slow_rtt_ms: u64,
    slow_downlink_mbps: f64,
}

impl NetworkMonitor {
    pub fn new(config: NetworkConfig) -> Self {
        let (online_tx, _rx) = watch::channel(true);
        Self {
            online_tx,
            quality: RwLock::new(None),
            debounce: Duration::from_millis(config.debounce_ms),
            report_seq: AtomicU64::new(0),
            slow_rtt_ms: config.slow_rtt_ms,
            slow_downlink_mbps: config.slow_downlink_mbps,
        }
    }

    pub fn is_online(&self) -> bool {
        *self.online_tx.borrow()
    }

    pub fn subscribe_online(&self) -> watch::Receiver<bool> {
        self.online_tx.subscribe()
    }

    /// Feeds a platform connectivity signal. The flag commits only if no
    /// newer report arrives within the debounce window.
    pub async fn report_online(&self, online: bool) {
        let seq = self.report_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if self.report_seq.load(Ordering::SeqCst) != seq {
            debug!(online, "connectivity report superseded within debounce window");
            return;
        }
        self.online_tx.send_if_modified(|current| {
            if *current != online {
                *current = online;
                true
            } else {
                false
            }
        });
    }

    pub async fn report_quality(&self, quality: ConnectionQuality) {
        *self.quality.write().await = Some(quality);
    }

    pub async fn classify(&self) -> ConnectionClass {
        if !self.is_online() {
            return ConnectionClass::Offline;
        }
        match self.quality.read().await.as_ref() {
            // no signal: assume a normal connection
            None => ConnectionClass::Online,
            Some(quality) => {
                if self.is_slow(quality) {
                    ConnectionClass::Slow
                } else {
                    ConnectionClass::Online
                }
            }
        }
    }

    /// Skip when offline, delayed when slow or data-saving, immediate when
    /// the connection looks fast.
    pub async fn sync_strategy(&self) -> SyncStrategy {
        match self.classify().await {
            ConnectionClass::Offline => SyncStrategy::Skip,
            ConnectionClass::Slow => SyncStrategy::Delayed,
            ConnectionClass::Online => {
                let save_data = self
                    .quality
                    .read()
                    .await
                    .as_ref()
                    .map(|q| q.save_data)
                    .unwrap_or(false);
                if save_data {
                    SyncStrategy::Delayed
                } else {
                    SyncStrategy::Immediate
                }
            }
        }
    }

    fn is_slow(&self, quality: &ConnectionQuality) -> bool {
        if let Some(effective_type) = &quality.effective_type {
            if SLOW_EFFECTIVE_TYPES.contains(&effective_type.as_str()) {
                return true;
            }
        }
        if let Some(rtt) = quality.rtt_ms {
            if rtt > self.slow_rtt_ms {
                return true;
            }
        }
        if let Some(downlink) = quality.downlink_mbps {
            if downlink < self.slow_downlink_mbps {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::AppConfig;

    fn monitor_with_debounce(debounce_ms: u64) -> NetworkMonitor {
        let mut network = AppConfig::default().network;
        network.debounce_ms = debounce_ms;
        NetworkMonitor::new(network)
    }

    #[tokio::test]
    async fn test_starts_online_with_immediate_strategy() {
        let monitor = monitor_with_debounce(0);
        assert!(monitor.is_online());
        assert_eq!(monitor.sync_strategy().await, SyncStrategy::Immediate);
    }

    #[tokio::test]
    async fn test_offline_skips_sync() {
        let monitor = monitor_with_debounce(0);
        monitor.report_online(false).await;
        assert!(!monitor.is_online());
        assert_eq!(monitor.sync_strategy().await, SyncStrategy::Skip);
    }

    #[tokio::test]
    async fn test_slow_connection_delays_sync() {
        let monitor = monitor_with_debounce(0);
        monitor
            .report_quality(ConnectionQuality {
                effective_type: Some("3g".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(monitor.classify().await, ConnectionClass::Slow);
        assert_eq!(monitor.sync_strategy().await, SyncStrategy::Delayed);
    }

    #[tokio::test]
    async fn test_high_rtt_counts_as_slow() {
        let monitor = monitor_with_debounce(0);
        monitor
            .report_quality(ConnectionQuality {
                rtt_ms: Some(900),
                ..Default::default()
            })
            .await;
        assert_eq!(monitor.sync_strategy().await, SyncStrategy::Delayed);
    }

    #[tokio::test]
    async fn test_save_data_delays_even_when_fast() {
        let monitor = monitor_with_debounce(0);
        monitor
            .report_quality(ConnectionQuality {
                effective_type: Some("4g".to_string()),
                downlink_mbps: Some(12.0),
                rtt_ms: Some(40),
                save_data: true,
            })
            .await;
        assert_eq!(monitor.sync_strategy().await, SyncStrategy::Delayed);
    }

    #[tokio::test]
    async fn test_debounce_commits_only_latest_report() {
        let monitor = monitor_with_debounce(30);
        // both reports land inside one debounce window; the later one wins
        tokio::join!(monitor.report_online(false), monitor.report_online(true));
        assert!(monitor.is_online());
    }
}
