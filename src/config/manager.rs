use super::{analysis::AnalysisConfig, dataset::DataConfig, traits::ConfigSection};
use crate::error::StocklensError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), StocklensError> {
        self.data.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StocklensError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| StocklensError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| StocklensError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StocklensError> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| StocklensError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| StocklensError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    pub fn set(&self, config: AppConfig) -> Result<(), StocklensError> {
        config.validate()?;
        *self.config.write().unwrap() = config;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data.csv_path, config.data.csv_path);
        assert_eq!(parsed.analysis.risk_free_rate, config.analysis.risk_free_rate);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [analysis]
            risk_free_rate = 0.02
            "#,
        )
        .unwrap();
        assert_eq!(parsed.analysis.risk_free_rate, 0.02);
        assert_eq!(parsed.data.min_rows, 2);
    }

    #[test]
    fn test_set_rejects_invalid() {
        let manager = ConfigManager::new();
        let mut config = AppConfig::default();
        config.data.min_rows = 0;
        assert!(manager.set(config).is_err());
    }
}
