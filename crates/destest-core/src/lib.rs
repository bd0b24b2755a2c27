//! # destest-core: DESTEST heat-demand domain model
//!
//! Shared data structures for validating the DESTEST benchmark against a
//! synthetic standard load profile.
//!
//! ## Data flow
//!
//! ```text
//! RawSeriesTable ──aggregate──▶ AnnualDemandTable ──select──▶ ExtremumPair
//!                                       │
//!                                       └──synthesize──▶ SyntheticProfile
//! ```
//!
//! Every table is built once and passed by reference to the next stage;
//! nothing here is mutated after construction.
//!
//! ## ID System
//!
//! Apartments are numbered `1..=N` in the DESTEST export. [`ApartmentId`]
//! is a newtype around that 1-based number so it can't be confused with a
//! 0-based column position.
//!
//! ## Modules
//!
//! - [`calendar`] - holiday table and reference-year hours
//! - [`convention`] - named per-sample → annual-energy conversion paths
//! - [`error`] - [`DestestError`] and [`DestestResult`]
//! - [`units`] - power and energy newtypes

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod calendar;
pub mod convention;
pub mod error;
pub mod units;

pub use calendar::{hourly_index, hours_in_year, HolidaySet};
pub use convention::UnitConvention;
pub use error::{DestestError, DestestResult};
pub use units::{EnergyUnit, KilowattHours, Kilowatts, WattHours, Watts};

/// Synthetic origin of the preprocessed DESTEST index. It lines up with the
/// reference year of the load profile, not with the measurement date.
pub fn default_origin() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(u32);

impl ApartmentId {
    #[inline]
    pub fn new(value: u32) -> Self {
        ApartmentId(value)
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ApartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-apartment readings on a shared sample index.
///
/// `index` holds the row offsets in seconds from an origin chosen by the
/// caller. Columns are kept in ascending id order and all have
/// `index.len()` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesTable {
    index: Vec<i64>,
    columns: Vec<(ApartmentId, Vec<f64>)>,
}

impl RawSeriesTable {
    /// Build a table, checking the shape invariants.
    ///
    /// `source` only labels error messages.
    pub fn new(
        source: &str,
        index: Vec<i64>,
        columns: Vec<(ApartmentId, Vec<f64>)>,
    ) -> DestestResult<Self> {
        for (pos, (id, samples)) in columns.iter().enumerate() {
            let expected = ApartmentId::new(pos as u32 + 1);
            if *id != expected {
                return Err(DestestError::malformed(
                    source,
                    format!("apartment ids must be contiguous from 1; found {id} at position {expected}"),
                ));
            }
            if samples.is_empty() {
                return Err(DestestError::malformed(
                    source,
                    format!("apartment {id} has no samples"),
                ));
            }
            if samples.len() != index.len() {
                return Err(DestestError::malformed(
                    source,
                    format!(
                        "apartment {id} has {} samples, index has {}",
                        samples.len(),
                        index.len()
                    ),
                ));
            }
        }
        Ok(Self { index, columns })
    }

    /// Convenience constructor numbering `columns` as apartments `1..=N` on a
    /// fixed-interval index.
    pub fn from_columns(
        interval_seconds: i64,
        columns: Vec<Vec<f64>>,
    ) -> DestestResult<Self> {
        let len = columns.first().map(Vec::len).unwrap_or(0);
        let index = (0..len as i64).map(|i| i * interval_seconds).collect();
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(i, c)| (ApartmentId::new(i as u32 + 1), c))
            .collect();
        Self::new("in-memory table", index, columns)
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn columns(&self) -> &[(ApartmentId, Vec<f64>)] {
        &self.columns
    }

    pub fn column(&self, id: ApartmentId) -> Option<&[f64]> {
        self.columns
            .get((id.value() as usize).checked_sub(1)?)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn apartment_count(&self) -> usize {
        self.columns.len()
    }

    pub fn sample_count(&self) -> usize {
        self.index.len()
    }

    /// Index converted to timestamps, treating each entry as seconds past
    /// `origin`.
    pub fn timestamps(&self, origin: NaiveDateTime) -> Vec<NaiveDateTime> {
        self.index
            .iter()
            .map(|&s| origin + Duration::seconds(s))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualDemandRecord {
    pub apartment_id: ApartmentId,
    pub annual_demand: f64,
}

/// One annual total per apartment, ascending by id, in a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDemandTable {
    unit: EnergyUnit,
    records: Vec<AnnualDemandRecord>,
}

impl AnnualDemandTable {
    pub fn new(unit: EnergyUnit, records: Vec<AnnualDemandRecord>) -> DestestResult<Self> {
        for pair in records.windows(2) {
            if pair[0].apartment_id >= pair[1].apartment_id {
                return Err(DestestError::malformed(
                    "annual demand table",
                    format!(
                        "apartment ids out of order: {} before {}",
                        pair[0].apartment_id, pair[1].apartment_id
                    ),
                ));
            }
        }
        if let Some(bad) = records
            .iter()
            .find(|r| !(r.annual_demand.is_finite() && r.annual_demand >= 0.0))
        {
            return Err(DestestError::malformed(
                "annual demand table",
                format!(
                    "apartment {} has invalid annual demand {}",
                    bad.apartment_id, bad.annual_demand
                ),
            ));
        }
        Ok(Self { unit, records })
    }

    pub fn unit(&self) -> EnergyUnit {
        self.unit
    }

    pub fn records(&self) -> &[AnnualDemandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ApartmentId) -> Option<&AnnualDemandRecord> {
        self.records.iter().find(|r| r.apartment_id == id)
    }

    /// Same table expressed in `unit`.
    pub fn to_unit(&self, unit: EnergyUnit) -> AnnualDemandTable {
        let factor = self.unit.factor_to(unit);
        AnnualDemandTable {
            unit,
            records: self
                .records
                .iter()
                .map(|r| AnnualDemandRecord {
                    apartment_id: r.apartment_id,
                    annual_demand: r.annual_demand * factor,
                })
                .collect(),
        }
    }
}

/// Representative apartments with the lowest and highest annual demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremumPair {
    pub min: ApartmentId,
    pub max: ApartmentId,
}

/// Hourly synthetic curves for one reference year, ascending by apartment.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProfile {
    pub timestamps: Vec<NaiveDateTime>,
    pub curves: Vec<(ApartmentId, Vec<f64>)>,
}

impl SyntheticProfile {
    pub fn curve(&self, id: ApartmentId) -> Option<&[f64]> {
        self.curves
            .iter()
            .find(|(a, _)| *a == id)
            .map(|(_, c)| c.as_slice())
    }

    /// Annual sum per apartment, in the curve unit (kWh).
    pub fn sums(&self) -> Vec<(ApartmentId, f64)> {
        self.curves
            .iter()
            .map(|(id, c)| (*id, c.iter().sum()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, demand: f64) -> AnnualDemandRecord {
        AnnualDemandRecord {
            apartment_id: ApartmentId::new(id),
            annual_demand: demand,
        }
    }

    #[test]
    fn raw_table_rejects_gaps_in_ids() {
        let err = RawSeriesTable::new(
            "t.csv",
            vec![0, 900],
            vec![
                (ApartmentId::new(1), vec![1.0, 2.0]),
                (ApartmentId::new(3), vec![1.0, 2.0]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DestestError::MalformedInput { .. }));
    }

    #[test]
    fn raw_table_rejects_mismatched_lengths() {
        let err = RawSeriesTable::from_columns(900, vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("apartment 2"));
    }

    #[test]
    fn raw_table_rejects_empty_column() {
        let err = RawSeriesTable::new("t.csv", vec![], vec![(ApartmentId::new(1), vec![])])
            .unwrap_err();
        assert!(err.to_string().contains("no samples"));
    }

    #[test]
    fn timestamps_follow_origin() {
        let table = RawSeriesTable::from_columns(900, vec![vec![0.0; 3]]).unwrap();
        let ts = table.timestamps(default_origin());
        assert_eq!(ts[2], default_origin() + Duration::seconds(1800));
        assert_eq!(table.column(ApartmentId::new(1)).unwrap().len(), 3);
        assert!(table.column(ApartmentId::new(0)).is_none());
    }

    #[test]
    fn annual_table_rejects_negative_and_unordered() {
        assert!(AnnualDemandTable::new(EnergyUnit::KilowattHours, vec![record(1, -1.0)]).is_err());
        assert!(AnnualDemandTable::new(
            EnergyUnit::KilowattHours,
            vec![record(2, 1.0), record(1, 1.0)]
        )
        .is_err());
    }

    #[test]
    fn annual_table_unit_conversion() {
        let table =
            AnnualDemandTable::new(EnergyUnit::WattHours, vec![record(1, 1500.0)]).unwrap();
        let kwh = table.to_unit(EnergyUnit::KilowattHours);
        assert_eq!(kwh.unit(), EnergyUnit::KilowattHours);
        assert!((kwh.records()[0].annual_demand - 1.5).abs() < 1e-12);
    }

    #[test]
    fn synthetic_sums_per_apartment() {
        let profile = SyntheticProfile {
            timestamps: vec![default_origin(); 2],
            curves: vec![(ApartmentId::new(1), vec![1.0, 2.0])],
        };
        assert_eq!(profile.sums(), vec![(ApartmentId::new(1), 3.0)]);
        assert!(profile.curve(ApartmentId::new(2)).is_none());
    }
}
