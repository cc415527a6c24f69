/// Application settings from `config.toml` and the environment
pub mod settings;

/// Sounds directory and per-community directory preparation
pub mod storage;

pub use settings::AppConfig;
