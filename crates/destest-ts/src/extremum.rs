use destest_core::{AnnualDemandTable, DestestError, DestestResult, ExtremumPair};

/// Apartments with the lowest and highest annual demand.
///
/// Ties resolve to the smallest apartment id: the scan runs in ascending id
/// order and only a strictly smaller (or larger) value replaces the current
/// pick.
pub fn select_extremes(table: &AnnualDemandTable) -> DestestResult<ExtremumPair> {
    let mut records = table.records().iter();
    let first = records.next().ok_or_else(|| {
        DestestError::EmptyTable("annual demand table has no records".into())
    })?;

    let (mut min, mut max) = (first, first);
    for record in records {
        if record.annual_demand < min.annual_demand {
            min = record;
        }
        if record.annual_demand > max.annual_demand {
            max = record;
        }
    }
    Ok(ExtremumPair {
        min: min.apartment_id,
        max: max.apartment_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use destest_core::{AnnualDemandRecord, ApartmentId, EnergyUnit};

    fn table(values: &[f64]) -> AnnualDemandTable {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &v)| AnnualDemandRecord {
                apartment_id: ApartmentId::new(i as u32 + 1),
                annual_demand: v,
            })
            .collect();
        AnnualDemandTable::new(EnergyUnit::KilowattHours, records).unwrap()
    }

    #[test]
    fn unique_extremes() {
        let pair = select_extremes(&table(&[1.0, 0.5])).unwrap();
        assert_eq!(pair.min, ApartmentId::new(2));
        assert_eq!(pair.max, ApartmentId::new(1));
    }

    #[test]
    fn ties_go_to_the_smallest_id() {
        let pair = select_extremes(&table(&[3.0, 1.0, 7.0, 1.0, 7.0])).unwrap();
        assert_eq!(pair.min, ApartmentId::new(2));
        assert_eq!(pair.max, ApartmentId::new(3));
    }

    #[test]
    fn single_record_is_both_extremes() {
        let pair = select_extremes(&table(&[4.2])).unwrap();
        assert_eq!(pair.min, pair.max);
    }

    #[test]
    fn bounds_hold_for_every_record() {
        let values = [5.5, 2.25, 9.0, 2.5, 8.75, 3.0];
        let t = table(&values);
        let pair = select_extremes(&t).unwrap();
        let min = t.get(pair.min).unwrap().annual_demand;
        let max = t.get(pair.max).unwrap().annual_demand;
        assert!(values.iter().all(|&v| min <= v && v <= max));
    }

    #[test]
    fn empty_table_is_an_error() {
        let err = select_extremes(&table(&[])).unwrap_err();
        assert!(matches!(err, DestestError::EmptyTable(_)));
    }
}
