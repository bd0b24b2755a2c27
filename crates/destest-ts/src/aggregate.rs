use destest_core::{
    AnnualDemandRecord, AnnualDemandTable, ApartmentId, DestestError, DestestResult, EnergyUnit,
    RawSeriesTable, UnitConvention,
};
use tracing::debug;

/// Reduce every apartment column to its annual energy total.
///
/// The total is the plain sample sum run through the convention, so for
/// watts sampled every 900 s it is `sum × 900 / 3600 / 1000` kWh. Records
/// come out in ascending apartment order, one per column.
pub fn aggregate_annual_demand(
    table: &RawSeriesTable,
    convention: &UnitConvention,
) -> DestestResult<AnnualDemandTable> {
    convention.validate()?;
    if table.apartment_count() == 0 {
        return Err(DestestError::EmptyTable(
            "raw series table has no apartment columns".into(),
        ));
    }

    let mut records = Vec::with_capacity(table.apartment_count());
    for (id, samples) in table.columns() {
        let stats = SeriesStats::from_samples(samples);
        if stats.count == 0 {
            return Err(DestestError::malformed(
                "raw series table",
                format!("apartment {id} has no samples"),
            ));
        }
        let annual_demand = convention.annual_total(stats.sum);
        if !annual_demand.is_finite() || annual_demand < 0.0 {
            return Err(DestestError::malformed(
                "raw series table",
                format!("apartment {id} integrates to {annual_demand}, expected a finite total >= 0"),
            ));
        }
        debug!(
            apartment = id.value(),
            samples = stats.count,
            min = stats.min,
            max = stats.max,
            annual_demand,
            "aggregated apartment"
        );
        records.push(AnnualDemandRecord {
            apartment_id: *id,
            annual_demand,
        });
    }

    AnnualDemandTable::new(convention.output_unit(), records)
}

/// Relative deviation of `other` from `reference`, per apartment.
///
/// Used to cross-check the power export against the pre-integrated energy
/// export. Both tables are compared in kWh; they must list the same
/// apartments.
pub fn compare_annual_tables(
    reference: &AnnualDemandTable,
    other: &AnnualDemandTable,
) -> DestestResult<Vec<(ApartmentId, f64)>> {
    if reference.len() != other.len() {
        return Err(DestestError::malformed(
            "annual demand tables",
            format!(
                "cannot compare {} apartments with {}",
                reference.len(),
                other.len()
            ),
        ));
    }
    let reference = reference.to_unit(EnergyUnit::KilowattHours);
    let other = other.to_unit(EnergyUnit::KilowattHours);
    reference
        .records()
        .iter()
        .zip(other.records())
        .map(|(a, b)| {
            if a.apartment_id != b.apartment_id {
                return Err(DestestError::malformed(
                    "annual demand tables",
                    format!("apartment {} paired with {}", a.apartment_id, b.apartment_id),
                ));
            }
            let deviation = if a.annual_demand == 0.0 {
                if b.annual_demand == 0.0 { 0.0 } else { f64::INFINITY }
            } else {
                (b.annual_demand - a.annual_demand) / a.annual_demand
            };
            Ok((a.apartment_id, deviation))
        })
        .collect()
}

struct SeriesStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl SeriesStats {
    fn from_samples(samples: &[f64]) -> Self {
        samples.iter().fold(
            SeriesStats {
                count: 0,
                sum: 0.0,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |mut acc, &v| {
                acc.count += 1;
                acc.sum += v;
                acc.min = acc.min.min(v);
                acc.max = acc.max.max(v);
                acc
            },
        )
    }
}
