use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::cache::DEFAULT_PER_CALL_COST;
use crate::domain::learning::{DEFAULT_CATEGORY, DEFAULT_PROMOTION_THRESHOLD};
use crate::infrastructure::services::DEFAULT_TOP_N;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub cache: CacheConfig,
    pub learning: LearningConfig,
    pub stats: StatsConfig,
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

/// Where the two stores keep their documents
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// "file" or "memory"
    pub backend: String,
    pub data_dir: PathBuf,
    pub cache_file: String,
    pub patterns_file: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Estimated dollars saved per served hit
    pub per_call_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Observations after which a pattern counts as frequent
    pub promotion_threshold: u64,
    pub default_category: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub top_n: usize,
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

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            data_dir: PathBuf::from("data"),
            cache_file: "response_cache.json".to_string(),
            patterns_file: "learned_patterns.json".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            per_call_cost: DEFAULT_PER_CALL_COST,
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }
}

impl AppConfig {
    /// Loads `config/default`, `config/local` and `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Same layering, with the files looked up in `dir`
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
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
        assert_eq!(config.storage.backend, "file");
        assert_eq!(
            config.storage.data_dir.join(&config.storage.cache_file),
            PathBuf::from("data/response_cache.json")
        );
        assert_eq!(config.cache.per_call_cost, 0.002);
        assert_eq!(config.learning.promotion_threshold, 3);
        assert_eq!(config.learning.default_category, "general");
        assert_eq!(config.stats.top_n, 10);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[storage]\nbackend = \"memory\"\n\n[learning]\npromotion_threshold = 5\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.patterns_file, "learned_patterns.json");
        assert_eq!(config.learning.promotion_threshold, 5);
        assert_eq!(config.learning.default_category, "general");
        assert!(matches!(config.logging.format, LogFormat::Pretty));
    }
}
