use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sync status of a locally stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Matches the remote source.
    Synced,
    /// Local create or update awaiting remote acknowledgment.
    Pending,
    /// Local deletion awaiting remote acknowledgment.
    Deleted,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Synced => "synced",
            RecordStatus::Pending => "pending",
            RecordStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "synced" => Ok(RecordStatus::Synced),
            "pending" => Ok(RecordStatus::Pending),
            "deleted" => Ok(RecordStatus::Deleted),
            other => Err(format!("Unknown record status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            RecordStatus::Synced,
            RecordStatus::Pending,
            RecordStatus::Deleted,
        ] {
            assert_eq!(status.as_str().parse::<RecordStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("stale".parse::<RecordStatus>().is_err());
    }
}
