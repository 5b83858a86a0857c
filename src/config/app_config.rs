use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
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

/// Where model artifacts live and which ones to load
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub dir: String,
    pub extension: String,
    pub datasets: Vec<String>,
    pub slots: Vec<String>,
    /// Seed for the synthetic data fallback slots are fitted on
    pub fallback_seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Rows handed to one blocking task
    pub chunk_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
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

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: "models".to_string(),
            extension: "json".to_string(),
            datasets: vec!["breast".to_string(), "gastric".to_string(), "lung".to_string()],
            slots: vec!["xgb_svm".to_string(), "xgb_lr".to_string(), "xgb_rf".to_string()],
            fallback_seed: 42,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024 * 1024,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { chunk_size: 256 }
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
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("models.datasets")
                    .with_list_parse_key("models.slots")
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

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.models.dir, "models");
        assert_eq!(config.models.slots, vec!["xgb_svm", "xgb_lr", "xgb_rf"]);
        assert_eq!(config.uploads.max_bytes, 1 << 30);
        assert!(config.observability.metrics.enabled);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 9090}, "logging": {"format": "json"}, "models": {"dir": "/srv/models"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.models.dir, "/srv/models");
        assert_eq!(config.models.extension, "json");
        assert_eq!(config.batch.chunk_size, 256);
    }
}
