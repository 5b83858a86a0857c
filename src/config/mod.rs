//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, BatchConfig, LogFormat, LoggingConfig, ModelsConfig, ServerConfig, UploadConfig,
};
