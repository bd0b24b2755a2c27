use std::{fs, fs::File, path::Path};

use destest_core::{
    hours_in_year, ApartmentId, DestestError, DestestResult, HolidaySet, RawSeriesTable,
};
use polars::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

/// Read the per-apartment export.
///
/// Layout: a header row, the row index in the first column (integer seconds
/// past the synthetic origin), then one column per apartment headed `1`,
/// `2`, ... `N`.
pub fn load_raw_series(path: impl AsRef<Path>) -> DestestResult<RawSeriesTable> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let df = read_frame(path)?;
    let columns = df.get_columns();
    let Some((index_col, apartment_cols)) = columns.split_first() else {
        return Err(DestestError::malformed(&source, "file has no columns"));
    };
    if df.height() == 0 {
        return Err(DestestError::malformed(&source, "file has no rows"));
    }

    let index = numeric_column(&source, index_col)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            if v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(DestestError::malformed(
                    &source,
                    format!("row {row}: index {v} is not a whole number of seconds"),
                ))
            }
        })
        .collect::<DestestResult<Vec<_>>>()?;

    let mut apartments = Vec::with_capacity(apartment_cols.len());
    for series in apartment_cols {
        let id = parse_apartment_header(&source, series.name())?;
        apartments.push((id, numeric_column(&source, series)?));
    }
    debug!(
        file = %source,
        apartments = apartments.len(),
        samples = index.len(),
        "loaded raw series"
    );
    RawSeriesTable::new(&source, index, apartments)
}

/// Read one year of hourly temperatures (°C) from `column`.
pub fn load_temperature(path: impl AsRef<Path>, column: &str, year: i32) -> DestestResult<Vec<f64>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let df = read_frame(path)?;
    let series = df.column(column).map_err(|_| {
        DestestError::malformed(&source, format!("missing temperature column '{column}'"))
    })?;
    let values = numeric_column(&source, series)?;
    let expected = hours_in_year(year)?;
    if values.len() != expected {
        return Err(DestestError::malformed(
            &source,
            format!(
                "temperature series has {} rows, year {year} has {expected} hours",
                values.len()
            ),
        ));
    }
    Ok(values)
}

#[derive(Debug, Deserialize)]
struct HolidayFile {
    #[serde(default)]
    holidays: HolidaySet,
}

/// Read the holiday table from a TOML file with a `[holidays]` section of
/// `"YYYY-MM-DD" = "label"` entries.
pub fn load_holidays(path: impl AsRef<Path>, year: i32) -> DestestResult<HolidaySet> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|err| DestestError::malformed(&source, format!("reading holidays: {err}")))?;
    let parsed: HolidayFile = toml::from_str(&text)
        .map_err(|err| DestestError::malformed(&source, format!("parsing holidays: {err}")))?;
    let stale = parsed.holidays.outside_year(year);
    if !stale.is_empty() {
        warn!(
            file = %source,
            count = stale.len(),
            first = %stale[0],
            "holiday table has dates outside reference year {year}; they will never match"
        );
    }
    Ok(parsed.holidays)
}

pub(crate) fn read_frame(path: &Path) -> DestestResult<DataFrame> {
    let source = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    if extension != "csv" {
        return Err(DestestError::malformed(
            &source,
            format!("unsupported file extension '{extension}'; use .csv"),
        ));
    }
    let mut file = File::open(path)
        .map_err(|err| DestestError::malformed(&source, format!("opening file: {err}")))?;
    CsvReader::new(&mut file)
        .has_header(true)
        // full scan: integer-looking leading rows must not fix a column to i64
        .infer_schema(None)
        .finish()
        .map_err(|err| DestestError::malformed(&source, format!("reading CSV: {err}")))
}

/// Column as plain `f64`s; any missing or non-numeric cell is an error.
pub(crate) fn numeric_column(source: &str, series: &Series) -> DestestResult<Vec<f64>> {
    let name = series.name().to_string();
    let cast = series.cast(&DataType::Float64).map_err(|err| {
        DestestError::malformed(source, format!("column '{name}' is not numeric: {err}"))
    })?;
    if cast.null_count() > 0 {
        return Err(DestestError::malformed(
            source,
            format!(
                "column '{name}' has {} missing or non-numeric value(s)",
                cast.null_count()
            ),
        ));
    }
    let values = cast
        .f64()
        .map_err(|err| DestestError::malformed(source, format!("column '{name}': {err}")))?;
    Ok(values.into_no_null_iter().collect())
}

fn parse_apartment_header(source: &str, header: &str) -> DestestResult<ApartmentId> {
    header
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&n| n > 0)
        .map(ApartmentId::new)
        .ok_or_else(|| {
            DestestError::malformed(
                source,
                format!("column header '{header}' is not a positive apartment number"),
            )
        })
}
