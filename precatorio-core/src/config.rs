//! Crawler configuration.
//!
//! Built once at process start and passed by reference into the query
//! builder, transport and engine. Loaded from TOML; every section is optional
//! and falls back to the public court report settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the path of a TOML config file.
pub const CONFIG_PATH_ENV: &str = "PRECATORIOS_CONFIG";
/// Environment override for `source.api_url`.
pub const API_URL_ENV: &str = "PRECATORIOS_API_URL";
/// Environment override for `source.resource_key`.
pub const RESOURCE_KEY_ENV: &str = "PRECATORIOS_RESOURCE_KEY";

/// Largest window the source accepts in one request.
pub const MAX_PAGE_SIZE: u32 = 30_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CrawlerConfig {
    pub source: SourceConfig,
    pub pagination: PaginationConfig,
    pub transport: TransportConfig,
    pub workers: WorkerConfig,
    pub logging: LoggingConfig,
}

/// Where the report lives and how to address it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceConfig {
    pub api_url: String,
    pub resource_key: String,
    pub model_id: u64,
    pub dataset_id: String,
    pub report_id: String,
    pub visual_id: String,
    /// Semantic model table holding the payment schedule.
    pub source_table: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PaginationConfig {
    /// Rows requested per page.
    pub page_size: u32,
    /// Hard ceiling on pages fetched per crawl.
    pub max_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TransportConfig {
    /// Total attempts per page, first one included.
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_ms: u64,
    pub min_timeout_secs: u64,
    pub max_timeout_secs: u64,
    /// Extra timeout granted per thousand requested rows.
    pub timeout_secs_per_1000_rows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WorkerConfig {
    /// Independent crawls allowed in flight at once.
    pub max_concurrent_crawls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self::default_settings()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://wabi-brazil-south-b-primary-api.analysis.windows.net/public/reports/querydata?synchronous=true".to_string(),
            resource_key: "e8c26605-679c-4da5-80d5-423cc8062db2".to_string(),
            model_id: 4_287_487,
            dataset_id: "4c290280-9235-4dd4-a48e-888f14efb2d8".to_string(),
            report_id: "e610bea8-b5e1-4bdf-84b5-db63928dfcd9".to_string(),
            visual_id: "99f187e38dbe0509eab4".to_string(),
            source_table: "dfslcp_SAPRE_LISTA_CRONO_PRECATORIO".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 500,
            max_pages: 100,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 4_000,
            max_backoff_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_ms: 250,
            min_timeout_secs: 30,
            max_timeout_secs: 180,
            timeout_secs_per_1000_rows: 60,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_crawls: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl TransportConfig {
    /// Request timeout scaled to the expected page size, capped at
    /// `max_timeout_secs` and never below `min_timeout_secs`.
    pub fn timeout_for(&self, page_size: u32) -> Duration {
        let extra = self.timeout_secs_per_1000_rows.saturating_mul(u64::from(page_size)) / 1000;
        let secs = self
            .min_timeout_secs
            .saturating_add(extra)
            .min(self.max_timeout_secs)
            .max(self.min_timeout_secs);
        Duration::from_secs(secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl CrawlerConfig {
    /// Settings for the public court report.
    pub fn default_settings() -> Self {
        Self {
            source: SourceConfig::default(),
            pagination: PaginationConfig::default(),
            transport: TransportConfig::default(),
            workers: WorkerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load from `PRECATORIOS_CONFIG` if set, apply environment overrides and
    /// validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_path(Path::new(&path))?,
            None => Self::default_settings(),
        };
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse, normalize and validate a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse, normalize and validate TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: CrawlerConfig = toml::from_str(contents)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.source.api_url = url;
        }
        if let Ok(key) = std::env::var(RESOURCE_KEY_ENV) {
            self.source.resource_key = key;
        }
    }

    /// Ask the endpoint for a synchronous answer unless the URL already does.
    pub fn normalize(&mut self) {
        let url = &mut self.source.api_url;
        if !url.is_empty() && !url.contains("synchronous=true") {
            let separator = if url.contains('?') { '&' } else { '?' };
            *url = format!("{}{}synchronous=true", url, separator);
        }
    }

    /// Check every value. Does not modify the config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let source = &self.source;
        for (field, value) in [
            ("source.api_url", &source.api_url),
            ("source.resource_key", &source.resource_key),
            ("source.dataset_id", &source.dataset_id),
            ("source.report_id", &source.report_id),
            ("source.visual_id", &source.visual_id),
            ("source.source_table", &source.source_table),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if !source.api_url.starts_with("http://") && !source.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "source.api_url",
                reason: format!("'{}' is not an http(s) URL", source.api_url),
            });
        }

        let pagination = &self.pagination;
        if pagination.page_size == 0 || pagination.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_size",
                reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }
        if pagination.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_pages",
                reason: "must be > 0".to_string(),
            });
        }

        let transport = &self.transport;
        if transport.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transport.max_attempts",
                reason: "must be > 0".to_string(),
            });
        }
        if transport.max_backoff_ms < transport.initial_backoff_ms {
            return Err(ConfigError::InvalidValue {
                field: "transport.max_backoff_ms",
                reason: "must be >= transport.initial_backoff_ms".to_string(),
            });
        }
        if !transport.backoff_multiplier.is_finite() || transport.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "transport.backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            });
        }
        if transport.min_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transport.min_timeout_secs",
                reason: "must be > 0".to_string(),
            });
        }
        if transport.max_timeout_secs < transport.min_timeout_secs {
            return Err(ConfigError::InvalidValue {
                field: "transport.max_timeout_secs",
                reason: "must be >= transport.min_timeout_secs".to_string(),
            });
        }

        if self.workers.max_concurrent_crawls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers.max_concurrent_crawls",
                reason: "must be > 0".to_string(),
            });
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_validate() {
        let config = CrawlerConfig::default_settings();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.max_pages, 100);
        assert_eq!(config.transport.max_attempts, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CrawlerConfig::from_toml_str(
            r#"
            [pagination]
            page_size = 1000

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.pagination.page_size, 1000);
        assert_eq!(config.pagination.max_pages, 100);
        assert!(config.logging.json);
        assert_eq!(config.source.model_id, 4_287_487);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = CrawlerConfig::from_toml_str("[pagination]\npages = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_normalize_appends_synchronous_flag() {
        let mut config = CrawlerConfig::default_settings();
        config.source.api_url = "https://example.test/querydata".to_string();
        config.normalize();
        assert_eq!(config.source.api_url, "https://example.test/querydata?synchronous=true");

        config.source.api_url = "https://example.test/querydata?a=1".to_string();
        config.normalize();
        config.normalize();
        assert_eq!(config.source.api_url, "https://example.test/querydata?a=1&synchronous=true");
    }

    #[test]
    fn test_validate_leaves_config_untouched() {
        let mut config = CrawlerConfig::default_settings();
        config.source.api_url = "https://example.test/querydata".to_string();
        let before = config.clone();
        config.validate().unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_toml_is_normalized_on_load() {
        let config = CrawlerConfig::from_toml_str(
            "[source]\napi_url = \"https://example.test/querydata\"\n",
        )
        .unwrap();
        assert_eq!(config.source.api_url, "https://example.test/querydata?synchronous=true");
    }

    #[test]
    fn test_inverted_timeouts_rejected_on_load() {
        let err = CrawlerConfig::from_toml_str(
            "[transport]\nmin_timeout_secs = 200\nmax_timeout_secs = 100\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "transport.max_timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_timeout_with_inverted_bounds_does_not_panic() {
        let transport = TransportConfig {
            min_timeout_secs: 200,
            max_timeout_secs: 100,
            ..TransportConfig::default()
        };
        assert_eq!(transport.timeout_for(500), Duration::from_secs(200));
        assert_eq!(transport.timeout_for(u32::MAX), Duration::from_secs(200));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CrawlerConfig::default_settings();
        config.pagination.page_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "pagination.page_size",
                ..
            })
        ));

        let mut config = CrawlerConfig::default_settings();
        config.transport.max_backoff_ms = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "transport.max_backoff_ms",
                ..
            })
        ));

        let mut config = CrawlerConfig::default_settings();
        config.source.resource_key = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "source.resource_key",
                ..
            })
        ));
    }

    #[test]
    fn test_timeout_scales_with_page_size() {
        let transport = TransportConfig::default();
        assert_eq!(transport.timeout_for(0), Duration::from_secs(30));
        assert_eq!(transport.timeout_for(500), Duration::from_secs(60));
        assert_eq!(transport.timeout_for(30_000), Duration::from_secs(180));
    }
}
