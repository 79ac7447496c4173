use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix for identifiers minted on this device. The remote source never
/// assigns ids of this shape, so a record carrying one has not been
/// acknowledged yet.
const LOCAL_ID_PREFIX: &str = "local-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn mint_local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_local_and_unique() {
        let a = RecordId::mint_local();
        let b = RecordId::mint_local();
        assert!(a.is_local());
        assert!(b.is_local());
        assert_ne!(a, b);
    }

    #[test]
    fn test_remote_assigned_ids_are_not_local() {
        let id = RecordId::new("8841".to_string()).unwrap();
        assert!(!id.is_local());
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(RecordId::new("  ".to_string()).is_err());
    }
}
