//! Application and ordering configuration
//!
//! Loaded from a JSON file; every field has a default so a partial file works.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

/// Numeric constants of the positioning scheme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// Gap left after the last item on append, and between items after reindex
    pub spacing: f64,
    /// Key of the first item placed into an empty container
    pub empty_position: f64,
    /// Adjacent keys closer than this trigger a reindex
    pub min_gap: f64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            spacing: 100.0,
            empty_position: 100.0,
            min_gap: 1e-4,
        }
    }
}

impl OrderingConfig {
    pub fn validate(&self) -> DomainResult<()> {
        for (name, value) in [
            ("spacing", self.spacing),
            ("empty_position", self.empty_position),
            ("min_gap", self.min_gap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::invalid(format!(
                    "ordering.{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        if self.min_gap >= self.spacing {
            return Err(DomainError::invalid("ordering.min_gap must be smaller than ordering.spacing"));
        }
        Ok(())
    }

    /// Number of consecutive bisections of one `spacing` gap that still leave
    /// a gap of at least `min_gap`.
    ///
    /// With the defaults (100, 1e-4) this is 19: the 20th insertion into the
    /// same slot yields a gap of ~9.5e-5 and forces a reindex. Doubles near
    /// 100 resolve ~1.4e-14, so precision is never the binding limit.
    pub fn guaranteed_bisections(&self) -> u32 {
        (self.spacing / self.min_gap).log2().floor() as u32
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file path, or `:memory:`
    pub database_path: PathBuf,
    /// Directory for rolling log files; logging to file is off when unset
    pub log_dir: Option<PathBuf>,
    pub ordering: OrderingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("trellis.db"),
            log_dir: None,
            ordering: OrderingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file
    pub fn from_file(path: &Path) -> DomainResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Internal(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&raw)
            .map_err(|e| DomainError::invalid(format!("Malformed config {}: {}", path.display(), e)))?;
        config.ordering.validate()?;
        Ok(config)
    }

    /// In-memory database, no file logging
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = OrderingConfig::default();
        assert_eq!(cfg.spacing, 100.0);
        assert_eq!(cfg.empty_position, 100.0);
        assert_eq!(cfg.min_gap, 1e-4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_guaranteed_bisections() {
        let cfg = OrderingConfig::default();
        assert_eq!(cfg.guaranteed_bisections(), 19);
        assert!(cfg.spacing / 2f64.powi(19) >= cfg.min_gap);
        assert!(cfg.spacing / 2f64.powi(20) < cfg.min_gap);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let cfg = OrderingConfig { spacing: f64::NAN, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().kind(), ErrorKind::InvalidArgument);

        let cfg = OrderingConfig { min_gap: 0.0, ..Default::default() };
        assert!(cfg.validate().is_err());

        let cfg = OrderingConfig { min_gap: 500.0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"database_path": ":memory:", "ordering": {{"spacing": 1000.0}}}}"#).unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from(":memory:"));
        assert_eq!(cfg.ordering.spacing, 1000.0);
        assert_eq!(cfg.ordering.min_gap, 1e-4);
        assert!(cfg.log_dir.is_none());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file(Path::new("/nonexistent/trellis.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
