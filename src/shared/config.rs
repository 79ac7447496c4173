use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub network: NetworkConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Window for collapsing rapid online/offline flapping, in milliseconds.
    pub debounce_ms: u64,
    pub slow_rtt_ms: u64,
    pub slow_downlink_mbps: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub sync_interval: u64,
    pub max_retry: u32,
    pub batch_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/audit.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            network: NetworkConfig {
                debounce_ms: 100,
                slow_rtt_ms: 500,
                slow_downlink_mbps: 1.0,
            },
            sync: SyncConfig {
                auto_sync: true,
                sync_interval: 300, // 5 minutes
                max_retry: 3,
                batch_size: 100,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("AUDIT_SYNC_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_MAX_CONNECTIONS") {
            if let Some(value) = parse_u64(&v) {
                cfg.database.max_connections = value.max(1) as u32;
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_DEBOUNCE_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.network.debounce_ms = value;
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_SLOW_RTT_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.network.slow_rtt_ms = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_SLOW_DOWNLINK_MBPS") {
            if let Some(value) = parse_f64(&v) {
                cfg.network.slow_downlink_mbps = value.max(0.0);
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_INTERVAL") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.sync_interval = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("AUDIT_SYNC_MAX_RETRY") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.max_retry = value as u32;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.sync_interval == 0 {
            return Err("Sync sync_interval must be greater than 0".to_string());
        }
        if self.network.slow_rtt_ms == 0 {
            return Err("Network slow_rtt_ms must be greater than 0".to_string());
        }
        if self.network.slow_downlink_mbps < 0.0 {
            return Err("Network slow_downlink_mbps must not be negative".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
