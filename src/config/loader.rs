//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{EngineError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (`APP_ENGINE__WINDOW_CAPACITY=20` style)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    // Pick up a local .env before reading the environment
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("engine.instruments")
            .try_parsing(true),
    );

    let config: AppConfig = builder
        .build()
        .map_err(|e| EngineError::Configuration(e.to_string()))?
        .try_deserialize()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("definitely/not/here.toml")).unwrap();
        assert_eq!(config.engine.window_capacity, 10);
        assert_eq!(config.narration.min_interval_ms, 500);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("momentum_signals_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("engine.toml");
        std::fs::write(
            &path,
            "[engine]\ninstruments = [\"AAPL\", \"MSFT\"]\nema_fold_order = \"chronological\"\n\n[narration]\nbacklog_alarm_threshold = 5\n",
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.engine.instruments, vec!["AAPL", "MSFT"]);
        assert_eq!(
            config.engine.ema_fold_order,
            crate::config::types::EmaFoldOrder::Chronological
        );
        assert_eq!(config.narration.backlog_alarm_threshold, 5);
        assert_eq!(config.narration.max_per_drain, 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}
