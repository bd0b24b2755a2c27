use std::{
    ffi::OsStr,
    fs::{self, File},
    path::{Path, PathBuf},
};

use destest_core::{
    AnnualDemandRecord, AnnualDemandTable, ApartmentId, DestestError, DestestResult, EnergyUnit,
};
use polars::prelude::*;
use tracing::{info, warn};

use crate::load::{numeric_column, read_frame};

pub const APARTMENT_COLUMN: &str = "Apartment No.";
pub const DEMAND_COLUMN: &str = "Total annual demand";

/// Write the annual table as CSV, replacing any previous file.
///
/// The frame is written next to the target first and renamed over it, so a
/// failed write never leaves a truncated table behind.
pub fn write_annual_demand(table: &AnnualDemandTable, path: impl AsRef<Path>) -> DestestResult<()> {
    let output = path.as_ref();
    let ids: Vec<i64> = table
        .records()
        .iter()
        .map(|r| i64::from(r.apartment_id.value()))
        .collect();
    let demands: Vec<f64> = table.records().iter().map(|r| r.annual_demand).collect();
    let mut df = DataFrame::new(vec![
        Series::new(APARTMENT_COLUMN, ids),
        Series::new(DEMAND_COLUMN, demands),
    ])
    .map_err(|err| DestestError::Io(std::io::Error::other(err.to_string())))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    commit_staged(output, |file| {
        CsvWriter::new(file)
            .finish(&mut df)
            .map_err(|err| DestestError::Io(std::io::Error::other(err.to_string())))
    })?;
    info!(
        path = %output.display(),
        rows = table.len(),
        unit = %table.unit(),
        "wrote annual demand table"
    );
    Ok(())
}

/// Read a table written by [`write_annual_demand`]. The file carries no
/// unit, so the caller states it.
pub fn read_annual_demand(
    path: impl AsRef<Path>,
    unit: EnergyUnit,
) -> DestestResult<AnnualDemandTable> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let df = read_frame(path)?;
    let column = |name: &str| {
        df.column(name)
            .map_err(|_| DestestError::malformed(&source, format!("missing column '{name}'")))
    };
    let ids = numeric_column(&source, column(APARTMENT_COLUMN)?)?;
    let demands = numeric_column(&source, column(DEMAND_COLUMN)?)?;

    let records = ids
        .into_iter()
        .zip(demands)
        .map(|(id, annual_demand)| {
            if id.fract() != 0.0 || id < 1.0 || id > f64::from(u32::MAX) {
                return Err(DestestError::malformed(
                    &source,
                    format!("'{id}' is not an apartment number"),
                ));
            }
            Ok(AnnualDemandRecord {
                apartment_id: ApartmentId::new(id as u32),
                annual_demand,
            })
        })
        .collect::<DestestResult<Vec<_>>>()?;
    AnnualDemandTable::new(unit, records)
}

/// Run `write` against the staged sibling of `output`, then move it into
/// place. The staged file is removed if either step fails.
fn commit_staged(
    output: &Path,
    write: impl FnOnce(&mut File) -> DestestResult<()>,
) -> DestestResult<()> {
    let staged = staged_output_path(output);
    let result = File::create(&staged)
        .map_err(DestestError::from)
        .and_then(|mut file| write(&mut file))
        .and_then(|()| fs::rename(&staged, output).map_err(DestestError::from));
    if result.is_err() && staged.exists() {
        if let Err(err) = fs::remove_file(&staged) {
            warn!(path = %staged.display(), error = %err, "could not remove staged file");
        }
    }
    result
}

fn staged_output_path(output: &Path) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let file_name = output
        .file_name()
        .unwrap_or_else(|| OsStr::new("demand_annual.csv"))
        .to_string_lossy();
    parent.join(format!(".{file_name}.staged"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_table() -> AnnualDemandTable {
        let records = [1234.5678, 0.125, 98765.4321]
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
    fn round_trip_preserves_pairs_and_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demand_annual.csv");
        let table = sample_table();
        write_annual_demand(&table, &path).unwrap();
        let back = read_annual_demand(&path, EnergyUnit::KilowattHours).unwrap();
        assert_eq!(back.len(), table.len());
        for (a, b) in table.records().iter().zip(back.records()) {
            assert_eq!(a.apartment_id, b.apartment_id);
            assert!((a.annual_demand - b.annual_demand).abs() <= 1e-9 * a.annual_demand.max(1.0));
        }
    }

    #[test]
    fn header_uses_dataset_column_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demand_annual.csv");
        write_annual_demand(&sample_table(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "Apartment No.,Total annual demand");
        assert!(text.lines().nth(1).unwrap().starts_with("1,"));
    }

    #[test]
    fn overwrites_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demand_annual.csv");
        fs::write(&path, "stale contents\n").unwrap();
        write_annual_demand(&sample_table(), &path).unwrap();
        let back = read_annual_demand(&path, EnergyUnit::KilowattHours).unwrap();
        assert_eq!(back.len(), 3);
        assert!(!staged_output_path(&path).exists());
    }

    #[test]
    fn missing_column_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let err = read_annual_demand(&path, EnergyUnit::KilowattHours).unwrap_err();
        assert!(err.to_string().contains(APARTMENT_COLUMN));
    }

    #[test]
    fn failed_write_leaves_no_staged_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("demand_annual.csv");
        fs::write(&out, "previous").unwrap();
        let err = commit_staged(&out, |_| {
            Err(DestestError::Io(std::io::Error::other("disk full")))
        })
        .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(!staged_output_path(&out).exists());
        assert_eq!(fs::read_to_string(&out).unwrap(), "previous");
    }
}
