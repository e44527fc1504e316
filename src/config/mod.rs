use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::services::{SortDirection, SortField, TypeFilter};
use crate::domain::Granularity;
use crate::errors::{ExpenseError, Result};
use crate::storage::json_backend::write_atomic;

const CONFIG_FILE: &str = "config.json";

/// User preferences applied when a command leaves an option unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub default_view: Granularity,
    #[serde(default)]
    pub default_type_filter: TypeFilter,
    #[serde(default)]
    pub default_sort_field: SortField,
    #[serde(default)]
    pub default_sort_direction: SortDirection,
    /// Upper bound on drawn chart bars. Totals are never capped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_cap: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            default_view: Granularity::default(),
            default_type_filter: TypeFilter::default(),
            default_sort_field: SortField::default(),
            default_sort_direction: SortDirection::default(),
            chart_cap: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    /// Keys accepted by [`Config::set_value`].
    pub const KEYS: [&'static str; 6] = [
        "currency_symbol",
        "default_view",
        "default_type_filter",
        "default_sort_field",
        "default_sort_direction",
        "chart_cap",
    ];

    /// Updates one field from its textual form. `chart_cap` accepts `none`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "default_view" => self.default_view = value.parse()?,
            "default_type_filter" => self.default_type_filter = value.parse()?,
            "default_sort_field" => self.default_sort_field = value.parse()?,
            "default_sort_direction" => self.default_sort_direction = value.parse()?,
            "chart_cap" => {
                self.chart_cap = if value.trim().eq_ignore_ascii_case("none") {
                    None
                } else {
                    let cap: f64 = value.trim().parse().map_err(|_| {
                        ExpenseError::Config(format!("chart_cap `{value}` is not a number"))
                    })?;
                    if !cap.is_finite() || cap <= 0.0 {
                        return Err(ExpenseError::Config(
                            "chart_cap must be a positive number".into(),
                        ));
                    }
                    Some(cap)
                }
            }
            other => {
                return Err(ExpenseError::Config(format!(
                    "unknown key `{other}` (known: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] as JSON under a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self> {
        fs::create_dir_all(base)?;
        Ok(Self::new(base.join(CONFIG_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            ExpenseError::Config(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        let config = manager.load().expect("load config");
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.default_sort_direction, SortDirection::Desc);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        let mut config = Config::default();
        config.set_value("currency_symbol", "€").unwrap();
        config.set_value("default_view", "year").unwrap();
        config.set_value("chart_cap", "250").unwrap();
        manager.save(&config).expect("save config");

        let loaded = manager.load().expect("load config");
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.default_view, Granularity::Year);
        assert_eq!(loaded.chart_cap, Some(250.0));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");
        fs::write(manager.path(), r#"{"default_type_filter":"expense"}"#).unwrap();
        let loaded = manager.load().expect("load config");
        assert_eq!(loaded.default_type_filter, TypeFilter::Expense);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn set_value_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("theme", "dark"),
            Err(ExpenseError::Config(_))
        ));
        assert!(config.set_value("chart_cap", "-3").is_err());
        assert!(config.set_value("default_view", "week").is_err());
        config.set_value("chart_cap", "none").unwrap();
        assert_eq!(config.chart_cap, None);
    }
}
