use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detected divergence between the local and remote version of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub item_id: String,
    pub local_modified: DateTime<Utc>,
    pub server_modified: DateTime<Utc>,
    pub resolved: bool,
}

impl ConflictRecord {
    pub fn new(
        item_id: String,
        local_modified: DateTime<Utc>,
        server_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id,
            local_modified,
            server_modified,
            resolved: false,
        }
    }
}
