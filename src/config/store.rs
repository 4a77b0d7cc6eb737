//! Store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Store configuration: where the store file and ticket file live.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the store YAML (catalog, settings, price table)
    #[serde(default = "default_store_file")]
    pub file: String,

    /// Path to the append-only kitchen ticket file
    #[serde(default = "default_ticket_file")]
    pub ticket_file: String,

    /// Idle minutes before an in-memory session is evicted
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u64,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.file.trim().is_empty() {
            return Err(ValidationError::MissingStoreFile);
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: default_store_file(),
            ticket_file: default_ticket_file(),
            session_ttl_minutes: default_session_ttl_minutes(),
        }
    }
}

fn default_store_file() -> String {
    "store.yaml".to_string()
}

fn default_ticket_file() -> String {
    "tickets.txt".to_string()
}

fn default_session_ttl_minutes() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.file, "store.yaml");
        assert_eq!(config.session_ttl_minutes, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_store_file_is_invalid() {
        let config = StoreConfig {
            file: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::MissingStoreFile));
    }
}
