//! Run configuration.
//!
//! Every field has a default reproducing the fixed DESTEST setup, so the
//! binary runs without a config file. A TOML file can override any section:
//!
//! ```toml
//! [paths]
//! raw_series = "data/Destest_heat_demand.csv"
//! plot_dir = "plots"
//!
//! [dataset]
//! unit_convention = "power_w"
//! interval_seconds = 900.0
//! # a quoted string; bare TOML datetimes are not accepted
//! origin = "2010-01-01T00:00:00"
//!
//! [archetype]
//! shlp_type = "EFH"
//! building_class = 1
//! wind_class = 1
//! ```

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use destest_core::{default_origin, DestestResult, EnergyUnit, UnitConvention};
use destest_slp::BuildingArchetype;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DestestConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub archetype: BuildingArchetype,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_raw_series")]
    pub raw_series: PathBuf,
    /// Pre-integrated kWh export, cross-checked against `raw_series` when set.
    #[serde(default)]
    pub energy_series: Option<PathBuf>,
    #[serde(default = "default_temperature")]
    pub temperature: PathBuf,
    #[serde(default = "default_holidays")]
    pub holidays: PathBuf,
    #[serde(default = "default_annual_output")]
    pub annual_output: PathBuf,
    /// Chart directory; no directory means text summary only.
    #[serde(default)]
    pub plot_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_series: default_raw_series(),
            energy_series: None,
            temperature: default_temperature(),
            holidays: default_holidays(),
            annual_output: default_annual_output(),
            plot_dir: None,
        }
    }
}

fn default_raw_series() -> PathBuf {
    PathBuf::from("data/Destest_heat_demand.csv")
}

fn default_temperature() -> PathBuf {
    PathBuf::from("data/example_data.csv")
}

fn default_holidays() -> PathBuf {
    PathBuf::from("data/holidays_2010.toml")
}

fn default_annual_output() -> PathBuf {
    PathBuf::from("demand_annual.csv")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetConfig {
    #[serde(default = "default_year")]
    pub year: i32,
    /// `power_w` or `energy_kwh`; both use `interval_seconds`.
    #[serde(default = "default_unit_convention")]
    pub unit_convention: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: Option<f64>,
    /// Unit of the totals for `energy_kwh` sources.
    #[serde(default)]
    pub energy_unit: Option<EnergyUnit>,
    /// Timestamp the row index counts seconds from, written as a quoted
    /// `"YYYY-MM-DDTHH:MM:SS"` string.
    #[serde(default = "default_origin")]
    pub origin: NaiveDateTime,
    #[serde(default = "default_temperature_column")]
    pub temperature_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            unit_convention: default_unit_convention(),
            interval_seconds: default_interval_seconds(),
            energy_unit: None,
            origin: default_origin(),
            temperature_column: default_temperature_column(),
        }
    }
}

fn default_year() -> i32 {
    2010
}

fn default_unit_convention() -> String {
    "power_w".to_string()
}

fn default_interval_seconds() -> Option<f64> {
    Some(destest_core::convention::DEFAULT_INTERVAL_SECONDS)
}

fn default_temperature_column() -> String {
    "temperature".to_string()
}

impl DatasetConfig {
    pub fn unit_convention(&self) -> DestestResult<UnitConvention> {
        UnitConvention::from_config(&self.unit_convention, self.interval_seconds, self.energy_unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesisConfig {
    #[serde(default = "default_geometric_temperature")]
    pub geometric_temperature: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            geometric_temperature: default_geometric_temperature(),
        }
    }
}

fn default_geometric_temperature() -> bool {
    true
}

impl DestestConfig {
    /// Defaults, overridden by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: DestestConfig = toml::from_str(text)?;
        config.archetype.validate()?;
        Ok(config)
    }
}
