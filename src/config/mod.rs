//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, LearningConfig, LogFormat, LoggingConfig, ServerConfig, StatsConfig,
    StorageSettings,
};
