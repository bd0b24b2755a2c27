//! Building archetypes and their standard-load-profile coefficients.
//!
//! Coefficients follow the SigLinDe heat profiles: a sigmoid of the daily
//! mean temperature gives the day's weight, a weekday factor adjusts it and
//! an hourly shape spreads it over the day.

use destest_core::{DestestError, DestestResult};
use serde::{Deserialize, Serialize};

/// Profile family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShlpType {
    /// Single-family house (Einfamilienhaus)
    #[serde(rename = "EFH")]
    Efh,
    /// Multi-family house (Mehrfamilienhaus)
    #[serde(rename = "MFH")]
    Mfh,
    /// Offices and public administration
    #[serde(rename = "GKO")]
    Gko,
}

impl std::fmt::Display for ShlpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShlpType::Efh => "EFH",
            ShlpType::Mfh => "MFH",
            ShlpType::Gko => "GKO",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingArchetype {
    pub shlp_type: ShlpType,
    /// Insulation class, 1 (oldest) to 11.
    pub building_class: u8,
    /// 0 for normal sites, 1 for windy sites.
    pub wind_class: u8,
}

impl Default for BuildingArchetype {
    fn default() -> Self {
        Self {
            shlp_type: ShlpType::Efh,
            building_class: 1,
            wind_class: 1,
        }
    }
}

impl BuildingArchetype {
    pub fn validate(&self) -> DestestResult<()> {
        if !(1..=11).contains(&self.building_class) {
            return Err(DestestError::Config(format!(
                "building_class must be within 1..=11, got {}",
                self.building_class
            )));
        }
        if self.wind_class > 1 {
            return Err(DestestError::Config(format!(
                "wind_class must be 0 or 1, got {}",
                self.wind_class
            )));
        }
        Ok(())
    }

    pub fn sigmoid(&self) -> SigmoidParameters {
        let windy = self.wind_class == 1;
        match (self.shlp_type, windy) {
            (ShlpType::Efh, false) => SigmoidParameters::new(1.6209544, -37.1833141, 5.6727847, 0.0716431),
            (ShlpType::Efh, true) => SigmoidParameters::new(1.3819663, -37.4124155, 6.1723179, 0.0396284),
            (ShlpType::Mfh, false) => SigmoidParameters::new(1.2570953, -34.7213605, 5.8164303, 0.0873352),
            (ShlpType::Mfh, true) => SigmoidParameters::new(1.1732137, -34.8985736, 6.3022287, 0.0519637),
            (ShlpType::Gko, false) => SigmoidParameters::new(1.3759880, -36.6078453, 5.3897680, 0.1096053),
            (ShlpType::Gko, true) => SigmoidParameters::new(1.4211090, -36.2066010, 5.3244433, 0.0994245),
        }
    }

    /// Weekday factor, Monday first. Holidays use the Sunday entry.
    pub fn weekday_factors(&self) -> [f64; 7] {
        match self.shlp_type {
            ShlpType::Efh | ShlpType::Mfh => [1.0; 7],
            ShlpType::Gko => [1.0322, 1.0353, 1.0198, 1.0153, 1.0110, 0.9482, 0.8681],
        }
    }

    /// How strongly the diurnal shape deviates from a flat day. Older
    /// buildings (low class) carry the full swing, well insulated ones are
    /// flatter.
    pub fn diurnal_amplitude(&self) -> f64 {
        1.0 - 0.04 * f64::from(self.building_class.saturating_sub(1))
    }
}

/// `h(T) = A / (1 + (B / (T - T0))^C) + D`, with `T0 = 40 °C`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SigmoidParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

const SIGMOID_T0: f64 = 40.0;
// keeps (T - T0) negative so B / (T - T0) stays positive
const SIGMOID_T_CEILING: f64 = 39.0;

impl SigmoidParameters {
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn daily_factor(&self, temperature: f64) -> f64 {
        let t = temperature.min(SIGMOID_T_CEILING);
        self.a / (1.0 + (self.b / (t - SIGMOID_T0)).powf(self.c)) + self.d
    }
}

/// Temperature class of a day, by its (geometric) mean temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureClass {
    Cold,
    Mild,
    Warm,
}

impl TemperatureClass {
    pub fn of(mean_temperature: f64) -> Self {
        if mean_temperature < 0.0 {
            TemperatureClass::Cold
        } else if mean_temperature < 15.0 {
            TemperatureClass::Mild
        } else {
            TemperatureClass::Warm
        }
    }

    fn swing(self) -> f64 {
        match self {
            TemperatureClass::Cold => 0.45,
            TemperatureClass::Mild => 0.75,
            TemperatureClass::Warm => 1.0,
        }
    }
}

// Residential heat shapes; hour_factors rescales them to a mean of 1.
const WORKDAY_SHAPE: [f64; 24] = [
    0.62, 0.58, 0.56, 0.56, 0.60, 0.84, 1.32, 1.46, 1.34, 1.12, 1.02, 0.98, //
    0.98, 0.94, 0.92, 0.96, 1.08, 1.26, 1.38, 1.36, 1.24, 1.08, 0.90, 0.74,
];
const SUNDAY_SHAPE: [f64; 24] = [
    0.64, 0.60, 0.58, 0.56, 0.56, 0.62, 0.80, 1.12, 1.38, 1.40, 1.26, 1.14, //
    1.08, 1.00, 0.96, 0.98, 1.06, 1.22, 1.34, 1.32, 1.20, 1.06, 0.92, 0.78,
];

/// Hourly multipliers for one day; they average to 1.
pub fn hour_factors(
    archetype: &BuildingArchetype,
    class: TemperatureClass,
    sunday_like: bool,
) -> [f64; 24] {
    let shape = if sunday_like { &SUNDAY_SHAPE } else { &WORKDAY_SHAPE };
    let mean = shape.iter().sum::<f64>() / 24.0;
    let amplitude = class.swing() * archetype.diurnal_amplitude();
    let mut out = [0.0; 24];
    for (slot, &s) in out.iter_mut().zip(shape) {
        *slot = 1.0 + amplitude * (s / mean - 1.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_falls_with_temperature() {
        let p = BuildingArchetype::default().sigmoid();
        let cold = p.daily_factor(-10.0);
        let mild = p.daily_factor(5.0);
        let warm = p.daily_factor(20.0);
        assert!(cold > mild && mild > warm);
        assert!(warm > 0.0);
    }

    #[test]
    fn sigmoid_is_finite_above_reference_temperature() {
        let p = BuildingArchetype::default().sigmoid();
        assert!(p.daily_factor(45.0).is_finite());
        assert!(p.daily_factor(40.0).is_finite());
    }

    #[test]
    fn hour_factors_average_to_one() {
        let arch = BuildingArchetype::default();
        for class in [TemperatureClass::Cold, TemperatureClass::Mild, TemperatureClass::Warm] {
            for sunday in [false, true] {
                let f = hour_factors(&arch, class, sunday);
                let mean = f.iter().sum::<f64>() / 24.0;
                assert!((mean - 1.0).abs() < 1e-12);
                assert!(f.iter().all(|&x| x > 0.0));
            }
        }
    }

    #[test]
    fn higher_building_class_is_flatter() {
        let old = BuildingArchetype::default();
        let new = BuildingArchetype {
            building_class: 11,
            ..old
        };
        let spread = |a: &BuildingArchetype| {
            let f = hour_factors(a, TemperatureClass::Warm, false);
            f.iter().cloned().fold(f64::MIN, f64::max) - f.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(spread(&new) < spread(&old));
    }

    #[test]
    fn validation_bounds() {
        let bad_class = BuildingArchetype {
            building_class: 12,
            ..BuildingArchetype::default()
        };
        assert!(bad_class.validate().is_err());
        let bad_wind = BuildingArchetype {
            wind_class: 2,
            ..BuildingArchetype::default()
        };
        assert!(bad_wind.validate().is_err());
        assert!(BuildingArchetype::default().validate().is_ok());
    }

    #[test]
    fn shlp_type_uses_profile_codes() {
        let json = serde_json::to_string(&ShlpType::Efh).unwrap();
        assert_eq!(json, "\"EFH\"");
        let parsed: ShlpType = serde_json::from_str("\"GKO\"").unwrap();
        assert_eq!(parsed, ShlpType::Gko);
    }
}
