use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use destest_core::{AnnualDemandTable, DestestError, DestestResult};
use tabwriter::TabWriter;
use tracing::info;

use crate::figure::{comparison_figures, ComparisonInput};
use crate::svg::render_svg;

const MAX_POINTS_PER_SERIES: usize = 4000;

/// Presentation capability, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// Chart output is available: write SVG (and the figure data as JSON)
    /// into `out_dir`.
    Svg { out_dir: PathBuf },
    /// No chart output: print the annual sums of the synthetic curves.
    Summary,
}

/// What a render call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Charts(Vec<PathBuf>),
    Summary,
}

impl Renderer {
    pub fn from_plot_dir(plot_dir: Option<PathBuf>) -> Self {
        match plot_dir {
            Some(out_dir) => Renderer::Svg { out_dir },
            None => Renderer::Summary,
        }
    }

    pub fn present(
        &self,
        input: &ComparisonInput<'_>,
        out: &mut dyn Write,
    ) -> DestestResult<RenderOutcome> {
        match self {
            Renderer::Svg { out_dir } => write_charts(input, out_dir).map(RenderOutcome::Charts),
            Renderer::Summary => {
                write_synthetic_summary(input, out)?;
                Ok(RenderOutcome::Summary)
            }
        }
    }
}

fn write_charts(input: &ComparisonInput<'_>, out_dir: &Path) -> DestestResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|err| {
        DestestError::Render(format!("creating {}: {err}", out_dir.display()))
    })?;
    let mut written = Vec::new();
    for figure in comparison_figures(input, MAX_POINTS_PER_SERIES) {
        let svg_path = out_dir.join(format!("{}.svg", figure.name));
        fs::write(&svg_path, render_svg(&figure)).map_err(|err| {
            DestestError::Render(format!("writing {}: {err}", svg_path.display()))
        })?;
        let json_path = out_dir.join(format!("{}.json", figure.name));
        let payload = serde_json::to_string_pretty(&figure)
            .map_err(|err| DestestError::Render(format!("serializing {}: {err}", figure.name)))?;
        fs::write(&json_path, payload).map_err(|err| {
            DestestError::Render(format!("writing {}: {err}", json_path.display()))
        })?;
        info!(figure = %figure.name, path = %svg_path.display(), "chart written");
        written.push(svg_path);
    }
    Ok(written)
}

fn write_synthetic_summary(input: &ComparisonInput<'_>, out: &mut dyn Write) -> DestestResult<()> {
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "Annual consumption (synthetic profile):")?;
    writeln!(writer, "APARTMENT\tSUM [kWh]")?;
    for (id, sum) in input.synthetic.sums() {
        writeln!(writer, "Apartment No. {id}\t{sum:.3}")?;
    }
    flush_table(writer, out)
}

/// Print the annual-demand table in aligned columns.
pub fn write_annual_table(table: &AnnualDemandTable, out: &mut dyn Write) -> DestestResult<()> {
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "Annual heat demand in DESTEST project:")?;
    writeln!(writer, "APARTMENT NO.\tTOTAL ANNUAL DEMAND [{}]", table.unit())?;
    for record in table.records() {
        writeln!(writer, "{}\t{:.3}", record.apartment_id, record.annual_demand)?;
    }
    flush_table(writer, out)
}

fn flush_table(writer: TabWriter<Vec<u8>>, out: &mut dyn Write) -> DestestResult<()> {
    let bytes = writer
        .into_inner()
        .map_err(|err| DestestError::Render(format!("formatting table: {err}")))?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use destest_core::{
        default_origin, hourly_index, AnnualDemandRecord, ApartmentId, EnergyUnit, ExtremumPair,
        RawSeriesTable, SyntheticProfile,
    };
    use tempfile::tempdir;

    fn fixture() -> (RawSeriesTable, Vec<NaiveDateTime>, SyntheticProfile) {
        let raw =
            RawSeriesTable::from_columns(3600, vec![vec![1000.0; 48], vec![3000.0; 48]]).unwrap();
        let ts = raw.timestamps(default_origin());
        let synthetic = SyntheticProfile {
            timestamps: hourly_index(2010).unwrap(),
            curves: vec![
                (ApartmentId::new(1), vec![0.1; 8760]),
                (ApartmentId::new(2), vec![0.3; 8760]),
            ],
        };
        (raw, ts, synthetic)
    }

    fn input<'a>(
        raw: &'a RawSeriesTable,
        ts: &'a [NaiveDateTime],
        synthetic: &'a SyntheticProfile,
    ) -> ComparisonInput<'a> {
        ComparisonInput {
            raw,
            raw_timestamps: ts,
            raw_to_kilowatts: 0.001,
            synthetic,
            extremes: ExtremumPair {
                min: ApartmentId::new(1),
                max: ApartmentId::new(2),
            },
        }
    }

    #[test]
    fn summary_lists_every_apartment() {
        let (raw, ts, synthetic) = fixture();
        let mut buf = Vec::new();
        let outcome = Renderer::Summary
            .present(&input(&raw, &ts, &synthetic), &mut buf)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Summary);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Apartment No. 1"));
        assert!(text.contains("Apartment No. 2"));
        assert!(text.contains("876.000"));
        assert!(text.contains("2628.000"));
    }

    #[test]
    fn svg_renderer_writes_three_charts() {
        let (raw, ts, synthetic) = fixture();
        let dir = tempdir().unwrap();
        let renderer = Renderer::from_plot_dir(Some(dir.path().join("plots")));
        let mut buf = Vec::new();
        let outcome = renderer
            .present(&input(&raw, &ts, &synthetic), &mut buf)
            .unwrap();
        let RenderOutcome::Charts(paths) = outcome else {
            panic!("expected charts");
        };
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(dir
            .path()
            .join("plots/heat_demand_apartment_1_and_2.json")
            .exists());
        assert!(buf.is_empty());
    }

    #[test]
    fn no_plot_dir_means_summary() {
        assert_eq!(Renderer::from_plot_dir(None), Renderer::Summary);
    }

    #[test]
    fn annual_table_is_aligned_text() {
        let table = AnnualDemandTable::new(
            EnergyUnit::KilowattHours,
            vec![
                AnnualDemandRecord {
                    apartment_id: ApartmentId::new(1),
                    annual_demand: 1.0,
                },
                AnnualDemandRecord {
                    apartment_id: ApartmentId::new(2),
                    annual_demand: 0.5,
                },
            ],
        )
        .unwrap();
        let mut buf = Vec::new();
        write_annual_table(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[kWh]"));
        assert!(text.contains("1.000"));
        assert!(text.contains("0.500"));
    }
}
