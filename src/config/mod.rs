use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    core::{indicators::EngineSettings, series::ChartView},
    currency::{CurrencyCode, LocaleConfig, MoneyFormatter, NegativeStyle},
    errors::LedgerError,
    utils::persistence::{app_data_dir, config_file_in, write_atomic},
};

/// User preferences plus the engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub negative_style: NegativeStyle,
    #[serde(default)]
    pub default_view: ChartView,
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: LocaleConfig::default(),
            negative_style: NegativeStyle::default(),
            default_view: ChartView::default(),
            engine: EngineSettings::default(),
        }
    }
}

impl Config {
    pub fn money(&self) -> MoneyFormatter {
        MoneyFormatter::new(self.currency.clone(), self.locale.clone(), self.negative_style)
    }

    /// Rejects settings that would make the indicators meaningless.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let engine = &self.engine;
        let figures = [
            ("fixed_capital", engine.fixed_capital),
            ("first_home_seed", engine.first_home_seed),
            ("retirement_seed", engine.retirement_seed),
            ("first_home_rate", engine.first_home_rate),
            ("retirement_rate", engine.retirement_rate),
            ("emergency_rate", engine.emergency_rate),
            ("tax_free_rate", engine.tax_free_rate),
        ];
        if let Some((name, _)) = figures.iter().find(|(_, value)| !value.is_finite()) {
            return Err(LedgerError::Config(format!("`{name}` must be a finite number")));
        }
        for (name, tiers) in [
            ("needs_thresholds", engine.needs_thresholds),
            ("wants_thresholds", engine.wants_thresholds),
        ] {
            if !(tiers.sustainable.is_finite() && tiers.shutdown.is_finite())
                || tiers.sustainable > tiers.shutdown
            {
                return Err(LedgerError::Config(format!(
                    "`{name}` must satisfy sustainable <= shutdown"
                )));
            }
        }
        if self.currency.as_str().is_empty() {
            return Err(LedgerError::Config("currency code is empty".into()));
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] as JSON under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(&app_data_dir())
    }

    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            config_path: config_file_in(base),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the stored configuration, falling back to defaults when absent.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.config_path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.config_path, &json)?;
        info!(path = %self.config_path.display(), "configuration saved");
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
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path());
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path());
        let mut config = Config::default();
        config.engine.fixed_capital = 5000.0;
        config.default_view = ChartView::Quarterly;
        manager.save(&config).unwrap();

        assert!(manager.config_path().ends_with("config/config.json"));
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path());
        write_atomic(
            manager.config_path(),
            r#"{"currency":"cad","engine":{"fixed_capital":10.0}}"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.engine.fixed_capital, 10.0);
        assert_eq!(config.engine.retirement_seed, 12000.0);
        assert_eq!(config.default_view, ChartView::Bimonthly);
        assert_eq!(config.currency.as_str(), "CAD");
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut config = Config::default();
        config.engine.needs_thresholds.sustainable = 0.5;
        assert!(matches!(config.validate(), Err(LedgerError::Config(_))));
    }
}
