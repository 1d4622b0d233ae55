//! Catalog configuration via `catalog.toml`
//!
//! On first start the demo writes a default `catalog.toml`. To change
//! settings, edit the file and restart.

use serde::{Deserialize, Serialize};
use std::path::Path;

use catalog_core::{Error, Result};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

/// How brand events travel from the write path to the cache maintainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Background worker threads, sharded by brand
    Dispatcher,
    /// On the writing thread, right after the commit
    Inline,
}

/// Catalog configuration loaded from `catalog.toml`.
///
/// # Example
///
/// ```toml
/// delivery = "dispatcher"
/// event_workers = 2
/// event_queue_capacity = 4096
/// event_max_attempts = 3
/// warmup_on_open = true
/// log_filter = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Event delivery: `"dispatcher"` or `"inline"`.
    #[serde(default = "default_delivery")]
    pub delivery: DeliveryMode,
    /// Worker threads for the dispatcher.
    #[serde(default = "default_event_workers")]
    pub event_workers: usize,
    /// Events that may wait in the dispatcher before new ones are rejected.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
    /// Tries per event before it is dead-lettered.
    #[serde(default = "default_event_max_attempts")]
    pub event_max_attempts: u32,
    /// Rebuild the ranking cache from the store when the catalog opens.
    #[serde(default = "default_warmup_on_open")]
    pub warmup_on_open: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_delivery() -> DeliveryMode {
    DeliveryMode::Dispatcher
}

fn default_event_workers() -> usize {
    2
}

fn default_event_queue_capacity() -> usize {
    4096
}

fn default_event_max_attempts() -> u32 {
    3
}

fn default_warmup_on_open() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            delivery: default_delivery(),
            event_workers: default_event_workers(),
            event_queue_capacity: default_event_queue_capacity(),
            event_max_attempts: default_event_max_attempts(),
            warmup_on_open: default_warmup_on_open(),
            log_filter: default_log_filter(),
        }
    }
}

impl CatalogConfig {
    /// Config with inline delivery, handy for deterministic tests.
    pub fn inline() -> Self {
        Self {
            delivery: DeliveryMode::Inline,
            ..Self::default()
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.event_workers == 0 {
            return Err(Error::config("event_workers must be at least 1"));
        }
        if self.event_queue_capacity == 0 {
            return Err(Error::config("event_queue_capacity must be at least 1"));
        }
        if self.event_max_attempts == 0 {
            return Err(Error::config("event_max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Catalog configuration
#
# Event delivery: "dispatcher" (default) or "inline"
#   "dispatcher" = background workers, events of one brand stay in order
#   "inline"     = handled on the writing thread right after the commit
delivery = "dispatcher"

# Dispatcher worker threads (default: 2)
event_workers = 2

# Events allowed to wait before new ones are rejected (default: 4096)
event_queue_capacity = 4096

# Tries per event before it is dead-lettered (default: 3)
event_max_attempts = 3

# Rebuild the ranking cache from the store on open (default: true)
warmup_on_open = true

# Log filter used when RUST_LOG is not set (default: "info")
log_filter = "info"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: CatalogConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_dispatcher() {
        let config = CatalogConfig::default();
        assert_eq!(config.delivery, DeliveryMode::Dispatcher);
        assert_eq!(config.event_workers, 2);
        assert!(config.warmup_on_open);
        config.validate().unwrap();
    }

    #[test]
    fn default_toml_matches_default() {
        let config: CatalogConfig = toml::from_str(CatalogConfig::default_toml()).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: CatalogConfig = toml::from_str("delivery = \"inline\"").unwrap();
        assert_eq!(config.delivery, DeliveryMode::Inline);
        assert_eq!(config.event_queue_capacity, 4096);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn unknown_delivery_fails_to_parse() {
        assert!(toml::from_str::<CatalogConfig>("delivery = \"carrier-pigeon\"").is_err());
    }

    #[test]
    fn validate_rejects_zeroes() {
        for config in [
            CatalogConfig {
                event_workers: 0,
                ..CatalogConfig::default()
            },
            CatalogConfig {
                event_queue_capacity: 0,
                ..CatalogConfig::default()
            },
            CatalogConfig {
                event_max_attempts: 0,
                ..CatalogConfig::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(Error::Config(_))));
        }
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        CatalogConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "delivery = \"inline\"\n").unwrap();

        CatalogConfig::write_default_if_missing(&path).unwrap();
        let config = CatalogConfig::from_file(&path).unwrap();
        assert_eq!(config.delivery, DeliveryMode::Inline);
    }

    #[test]
    fn write_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = CatalogConfig {
            event_workers: 8,
            log_filter: "catalog=debug".to_string(),
            ..CatalogConfig::inline()
        };

        config.write_to_file(&path).unwrap();
        assert_eq!(CatalogConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn from_file_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "event_workers = 0\n").unwrap();
        assert!(matches!(
            CatalogConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = CatalogConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
