//! Synthetic standard-load-profile curves for DESTEST apartments.
//!
//! [`ProfileSynthesizer`] is the seam the pipeline calls; [`BdewHeatProfile`]
//! is the implementation shipped here. Any generator that returns one
//! hourly value per hour of the reference year, integrating to the
//! requested annual total, can stand in for it.

use destest_core::{
    hourly_index, AnnualDemandTable, ApartmentId, DestestResult, HolidaySet, KilowattHours,
    SyntheticProfile,
};
use tracing::{debug, info};

mod archetype;
mod bdew;

pub use archetype::{BuildingArchetype, ShlpType, SigmoidParameters, TemperatureClass};
pub use bdew::BdewHeatProfile;

/// Inputs for one synthetic building instance.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// Labels errors and logs.
    pub apartment: ApartmentId,
    pub year: i32,
    pub holidays: &'a HolidaySet,
    /// Hourly °C for every hour of `year`.
    pub temperature: &'a [f64],
    pub archetype: BuildingArchetype,
    pub annual_demand: KilowattHours,
}

pub trait ProfileSynthesizer {
    fn name(&self) -> &str;

    /// Hourly kWh for every hour of the requested year. Must be
    /// deterministic for fixed inputs.
    fn synthesize(&self, request: &SynthesisRequest<'_>) -> DestestResult<Vec<f64>>;
}

/// Run `synthesizer` once per apartment, in ascending id order.
///
/// The table is converted to kWh first; the returned curves are kWh per
/// hour.
pub fn synthesize_all(
    synthesizer: &dyn ProfileSynthesizer,
    table: &AnnualDemandTable,
    year: i32,
    holidays: &HolidaySet,
    temperature: &[f64],
    archetype: BuildingArchetype,
) -> DestestResult<SyntheticProfile> {
    let unit = table.unit();
    info!(
        synthesizer = synthesizer.name(),
        apartments = table.len(),
        year,
        archetype = %archetype.shlp_type,
        "synthesizing profiles"
    );

    let mut curves = Vec::with_capacity(table.len());
    for record in table.records() {
        let annual_demand = unit.to_kilowatt_hours(record.annual_demand);
        let request = SynthesisRequest {
            apartment: record.apartment_id,
            year,
            holidays,
            temperature,
            archetype,
            annual_demand,
        };
        let curve = synthesizer.synthesize(&request)?;
        debug!(
            apartment = record.apartment_id.value(),
            annual = %annual_demand,
            peak = curve.iter().cloned().fold(0.0, f64::max),
            "synthesized profile"
        );
        curves.push((record.apartment_id, curve));
    }

    Ok(SyntheticProfile {
        timestamps: hourly_index(year)?,
        curves,
    })
}
