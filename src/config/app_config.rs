use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::TtlPolicy;
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cache store and lifetime settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    /// Namespace for every key (Redis only)
    pub key_prefix: Option<String>,
    /// Entry bound for the in-memory store
    pub max_capacity: u64,
    /// Upper bound on any single cache operation
    pub operation_timeout_ms: u64,
    /// Upper bound on a prefix purge, which may walk many keys
    pub purge_timeout_ms: u64,
    pub ttl: TtlSettings,
}

/// Cache lifetimes per request class, in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtlSettings {
    pub dashboard_secs: u64,
    pub list_secs: u64,
    pub item_secs: u64,
    pub default_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheType::InMemory.to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
            operation_timeout_ms: 250,
            purge_timeout_ms: 2000,
            ttl: TtlSettings::default(),
        }
    }
}

impl Default for TtlSettings {
    fn default() -> Self {
        let policy = TtlPolicy::default();

        Self {
            dashboard_secs: policy.dashboard.as_secs(),
            list_secs: policy.list_query.as_secs(),
            item_secs: policy.single_item_query.as_secs(),
            default_secs: policy.default.as_secs(),
        }
    }
}

impl CacheSettings {
    /// Resolves the backend settings for the cache factory
    pub fn cache_config(&self) -> Result<CacheConfig, DomainError> {
        let cache_type: CacheType = self.backend.parse()?;

        if cache_type == CacheType::Redis && self.redis_url.is_none() {
            return Err(DomainError::configuration(
                "cache.redis_url is required when cache.backend is redis",
            ));
        }

        if self.operation_timeout_ms == 0 || self.purge_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "cache.operation_timeout_ms and cache.purge_timeout_ms must be greater than zero",
            ));
        }

        Ok(CacheConfig {
            cache_type,
            redis_url: self.redis_url.clone(),
            key_prefix: self.key_prefix.clone(),
            max_capacity: Some(self.max_capacity),
            operation_timeout: Duration::from_millis(self.operation_timeout_ms),
            purge_timeout: Duration::from_millis(self.purge_timeout_ms),
        })
    }

    pub fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            dashboard: Duration::from_secs(self.ttl.dashboard_secs),
            list_query: Duration::from_secs(self.ttl.list_secs),
            single_item_query: Duration::from_secs(self.ttl.item_secs),
            default: Duration::from_secs(self.ttl.default_secs),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.backend, "in_memory");
        assert_eq!(config.cache.ttl_policy(), TtlPolicy::default());
    }

    #[test]
    fn test_partial_sources_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("cache.ttl.list_secs", 30)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.cache.ttl_policy().list_query, Duration::from_secs(30));
        assert_eq!(config.cache.ttl_policy().dashboard, Duration::from_secs(60));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_cache_config() {
        let settings = CacheSettings {
            backend: "redis".to_string(),
            redis_url: Some("redis://cache:6379".to_string()),
            operation_timeout_ms: 100,
            ..Default::default()
        };

        let config = settings.cache_config().unwrap();
        assert_eq!(config.cache_type, CacheType::Redis);
        assert_eq!(config.operation_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_redis_without_url_is_rejected() {
        let settings = CacheSettings {
            backend: "redis".to_string(),
            ..Default::default()
        };

        let err = settings.cache_config().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let settings = CacheSettings {
            operation_timeout_ms: 0,
            ..Default::default()
        };
        let err = settings.cache_config().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));

        let settings = CacheSettings {
            purge_timeout_ms: 0,
            ..Default::default()
        };
        assert!(settings.cache_config().is_err());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let settings = CacheSettings {
            backend: "memcached".to_string(),
            ..Default::default()
        };

        assert!(settings.cache_config().is_err());
    }
}
