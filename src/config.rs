use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

const CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub generator: GeneratorConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/price_intelligence.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub days: u32,
    pub volatility: f64,
    /// Fixed seed for reproducible runs. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: 30,
            volatility: 0.02,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub trend_sku: String,
    pub top_deals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trend_sku: "MBA-M3-256".to_string(),
            top_deals: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `config/default.toml` if present, otherwise fall back to the
    /// built-in defaults. The tool is usable with zero configuration.
    pub fn load() -> Result<Self, AppError> {
        let path = Path::new(CONFIG_PATH);
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| AppError::Config(format!("failed to parse {}: {}", CONFIG_PATH, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.generator.days == 0 {
            return Err(AppError::Config(
                "generator.days must be > 0".to_string(),
            ));
        }
        if self.generator.volatility < 0.0 {
            return Err(AppError::Config(
                "generator.volatility must be >= 0".to_string(),
            ));
        }
        if self.report.top_deals == 0 {
            return Err(AppError::Config(
                "report.top_deals must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
