//! Unit newtypes for power and energy quantities.
//!
//! DESTEST ships power samples in watts while the load-profile generator
//! works in kilowatt-hours per year. Keeping both as raw `f64` made it easy
//! to feed a watt-hour total into a kWh slot, so the quantities that cross
//! crate boundaries are wrapped here.
//!
//! ```
//! use destest_core::units::{KilowattHours, Watts};
//!
//! // 1 kW held for a quarter hour
//! let e = Watts(1000.0).over_seconds(900.0);
//! assert_eq!(e, KilowattHours(0.25));
//! assert_eq!(e.mean_power_over(900.0).value(), 1.0);
//! ```

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const WATTS_PER_KILOWATT: f64 = 1000.0;

macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }
    };
}

/// Instantaneous power in watts (W)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Watts(pub f64);

impl_unit_ops!(Watts, "W");

/// Instantaneous power in kilowatts (kW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

/// Energy in kilowatt-hours (kWh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilowattHours(pub f64);

impl_unit_ops!(KilowattHours, "kWh");

/// Energy in watt-hours (Wh)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WattHours(pub f64);

impl_unit_ops!(WattHours, "Wh");

impl Watts {
    #[inline]
    pub fn to_kilowatts(self) -> Kilowatts {
        Kilowatts(self.0 / WATTS_PER_KILOWATT)
    }

    /// Energy delivered when this power is held for `seconds`.
    #[inline]
    pub fn over_seconds(self, seconds: f64) -> KilowattHours {
        KilowattHours(self.to_kilowatts().0 * seconds / SECONDS_PER_HOUR)
    }
}

impl WattHours {
    #[inline]
    pub fn to_kilowatt_hours(self) -> KilowattHours {
        KilowattHours(self.0 / WATTS_PER_KILOWATT)
    }
}

impl KilowattHours {
    #[inline]
    pub fn to_watt_hours(self) -> WattHours {
        WattHours(self.0 * WATTS_PER_KILOWATT)
    }

    /// Mean power when this energy is spread over `seconds`.
    #[inline]
    pub fn mean_power_over(self, seconds: f64) -> Kilowatts {
        Kilowatts(self.0 * SECONDS_PER_HOUR / seconds)
    }
}

/// Unit a whole [`AnnualDemandTable`](crate::AnnualDemandTable) is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnergyUnit {
    #[default]
    #[serde(rename = "kwh")]
    KilowattHours,
    #[serde(rename = "wh")]
    WattHours,
}

impl EnergyUnit {
    /// Multiplier applied to a kWh quantity to express it in this unit.
    pub fn per_kilowatt_hour(self) -> f64 {
        match self {
            EnergyUnit::KilowattHours => 1.0,
            EnergyUnit::WattHours => WATTS_PER_KILOWATT,
        }
    }

    /// Factor converting a value in `self` to a value in `target`.
    pub fn factor_to(self, target: EnergyUnit) -> f64 {
        target.per_kilowatt_hour() / self.per_kilowatt_hour()
    }

    /// Express a kWh quantity in this unit.
    pub fn from_kilowatt_hours(self, energy: KilowattHours) -> f64 {
        match self {
            EnergyUnit::KilowattHours => energy.value(),
            EnergyUnit::WattHours => energy.to_watt_hours().value(),
        }
    }

    /// Read a value in this unit as kWh.
    pub fn to_kilowatt_hours(self, value: f64) -> KilowattHours {
        match self {
            EnergyUnit::KilowattHours => KilowattHours(value),
            EnergyUnit::WattHours => WattHours(value).to_kilowatt_hours(),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            EnergyUnit::KilowattHours => "kWh",
            EnergyUnit::WattHours => "Wh",
        }
    }
}

impl std::fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
