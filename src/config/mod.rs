//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, BootstrapConfig, CorsConfig, EmailConfig, LogFormat, LoggingConfig,
    PasswordConfig, ServerConfig, StorageBackend, StorageSettings,
};
