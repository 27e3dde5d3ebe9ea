//! Process configuration read from environment variables.

use std::path::PathBuf;

use thiserror::Error;

use storefront_catalog::DEFAULT_PAGE_SIZE;
use storefront_observability::LogFormat;

pub const PAGE_SIZE_VAR: &str = "STOREFRONT_PAGE_SIZE";
pub const CATALOG_PATH_VAR: &str = "STOREFRONT_CATALOG_PATH";
pub const LOG_FORMAT_VAR: &str = "STOREFRONT_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOREFRONT_PAGE_SIZE must be a positive integer, got {0:?}")]
    InvalidPageSize(String),

    #[error("STOREFRONT_CATALOG_PATH must not be blank")]
    BlankCatalogPath,

    #[error("STOREFRONT_LOG_FORMAT: {0}")]
    InvalidLogFormat(#[from] storefront_observability::UnknownLogFormat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    pub page_size: usize,
    /// Catalog JSON file; the bundled demo catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            catalog_path: None,
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            config.page_size = match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPageSize(raw)),
            };
        }

        if let Some(raw) = lookup(CATALOG_PATH_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::BlankCatalogPath);
            }
            config.catalog_path = Some(PathBuf::from(raw));
        }

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            config.log_format = raw.parse()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.page_size, 12);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_all_variables() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            (PAGE_SIZE_VAR, "24"),
            (CATALOG_PATH_VAR, "/srv/catalog.json"),
            (LOG_FORMAT_VAR, "pretty"),
        ]))
        .unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_invalid_values() {
        for bad in ["0", "-3", "twelve", ""] {
            let err = StorefrontConfig::from_lookup(lookup_from(&[(PAGE_SIZE_VAR, bad)])).unwrap_err();
            assert_eq!(err, ConfigError::InvalidPageSize(bad.to_string()));
        }

        let err = StorefrontConfig::from_lookup(lookup_from(&[(CATALOG_PATH_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::BlankCatalogPath);

        let err = StorefrontConfig::from_lookup(lookup_from(&[(LOG_FORMAT_VAR, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogFormat(_)));
    }
}
