//! Named conversion paths from per-sample readings to annual energy.
//!
//! The DESTEST exports come in two shapes: instantaneous power sampled at a
//! fixed interval, and energy already integrated per sample. Which one a
//! file holds is a property of the file's documentation, so it is always
//! stated in configuration and never guessed from the numbers.

use serde::{Deserialize, Serialize};

use crate::error::{DestestError, DestestResult};
use crate::units::{EnergyUnit, KilowattHours, Watts};

/// Sampling interval of the preprocessed DESTEST exports.
pub const DEFAULT_INTERVAL_SECONDS: f64 = 900.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitConvention {
    /// Samples are watts held for `interval_seconds`; totals come out in kWh.
    PowerWatts { interval_seconds: f64 },
    /// Samples are kWh integrated over `interval_seconds`; totals are
    /// expressed in `target`.
    EnergyKilowattHours {
        interval_seconds: f64,
        target: EnergyUnit,
    },
}

impl Default for UnitConvention {
    fn default() -> Self {
        UnitConvention::PowerWatts {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
        }
    }
}

impl UnitConvention {
    /// Resolve a convention from its configuration name.
    ///
    /// Accepted names are `power_w` and `energy_kwh`. Both need the sampling
    /// interval; the energy target unit defaults to kWh.
    pub fn from_config(
        name: &str,
        interval_seconds: Option<f64>,
        target: Option<EnergyUnit>,
    ) -> DestestResult<Self> {
        let convention = match name.trim().to_ascii_lowercase().as_str() {
            "power_w" | "power" => UnitConvention::PowerWatts {
                interval_seconds: require_interval("power_w", interval_seconds)?,
            },
            "energy_kwh" | "energy" => UnitConvention::EnergyKilowattHours {
                interval_seconds: require_interval("energy_kwh", interval_seconds)?,
                target: target.unwrap_or_default(),
            },
            other => {
                return Err(DestestError::UnknownUnitConvention(format!(
                    "'{other}'; expected power_w or energy_kwh"
                )))
            }
        };
        convention.validate()?;
        Ok(convention)
    }

    pub fn validate(&self) -> DestestResult<()> {
        let interval_seconds = self.interval_seconds();
        if interval_seconds.is_finite() && interval_seconds > 0.0 {
            Ok(())
        } else {
            Err(DestestError::UnknownUnitConvention(format!(
                "sampling interval must be a positive number of seconds, got {interval_seconds}"
            )))
        }
    }

    pub fn interval_seconds(&self) -> f64 {
        match *self {
            UnitConvention::PowerWatts { interval_seconds }
            | UnitConvention::EnergyKilowattHours {
                interval_seconds, ..
            } => interval_seconds,
        }
    }

    /// Annual total, in [`output_unit`](Self::output_unit), of a plain
    /// sample sum.
    pub fn annual_total(&self, sample_sum: f64) -> f64 {
        match *self {
            UnitConvention::PowerWatts { interval_seconds } => {
                Watts(sample_sum).over_seconds(interval_seconds).value()
            }
            UnitConvention::EnergyKilowattHours { target, .. } => {
                target.from_kilowatt_hours(KilowattHours(sample_sum))
            }
        }
    }

    /// Unit of the totals this convention produces.
    pub fn output_unit(&self) -> EnergyUnit {
        match *self {
            UnitConvention::PowerWatts { .. } => EnergyUnit::KilowattHours,
            UnitConvention::EnergyKilowattHours { target, .. } => target,
        }
    }

    /// Factor turning one raw sample into kW for plotting.
    pub fn sample_to_kilowatts(&self) -> f64 {
        match *self {
            UnitConvention::PowerWatts { .. } => Watts(1.0).to_kilowatts().value(),
            UnitConvention::EnergyKilowattHours {
                interval_seconds, ..
            } => KilowattHours(1.0).mean_power_over(interval_seconds).value(),
        }
    }
}

fn require_interval(name: &str, interval_seconds: Option<f64>) -> DestestResult<f64> {
    interval_seconds.ok_or_else(|| {
        DestestError::UnknownUnitConvention(format!("{name} convention requires interval_seconds"))
    })
}
