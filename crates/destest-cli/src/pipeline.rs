//! The load → aggregate → select → synthesize → render run.

use std::io::Write;

use anyhow::{Context, Result};
use destest_core::{AnnualDemandTable, ExtremumPair, UnitConvention};
use destest_slp::{synthesize_all, BdewHeatProfile};
use destest_ts::{
    aggregate_annual_demand, compare_annual_tables, load_holidays, load_raw_series,
    load_temperature, select_extremes, write_annual_demand,
};
use destest_viz::{write_annual_table, ComparisonInput, RenderOutcome, Renderer};
use tracing::{info, warn};

use crate::config::DestestConfig;

/// Relative deviation above which the energy export is reported as
/// disagreeing with the power export.
const CROSS_CHECK_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Aggregate,
    Select,
    Synthesize,
    Render,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Aggregate => "aggregate",
            Stage::Select => "select",
            Stage::Synthesize => "synthesize",
            Stage::Render => "render",
        })
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub annual: AnnualDemandTable,
    pub extremes: ExtremumPair,
    /// Apartments whose energy export deviates from the power export, when
    /// an energy export was configured.
    pub disagreeing_apartments: Option<usize>,
    pub outcome: RenderOutcome,
}

/// Pick the presentation capability once, from flags and configuration.
pub fn select_renderer(config: &DestestConfig, no_plot: bool) -> Renderer {
    if no_plot {
        Renderer::Summary
    } else {
        Renderer::from_plot_dir(config.paths.plot_dir.clone())
    }
}

pub fn run(config: &DestestConfig, renderer: &Renderer, out: &mut dyn Write) -> Result<RunReport> {
    let paths = &config.paths;
    let dataset = &config.dataset;

    let convention = dataset
        .unit_convention()
        .with_context(|| format!("{}: resolving unit convention", Stage::Aggregate))?;
    let raw = load_raw_series(&paths.raw_series)
        .with_context(|| format!("{}: raw series {}", Stage::Load, paths.raw_series.display()))?;
    let temperature = load_temperature(&paths.temperature, &dataset.temperature_column, dataset.year)
        .with_context(|| format!("{}: temperature {}", Stage::Load, paths.temperature.display()))?;
    let holidays = load_holidays(&paths.holidays, dataset.year)
        .with_context(|| format!("{}: holidays {}", Stage::Load, paths.holidays.display()))?;
    info!(
        apartments = raw.apartment_count(),
        samples = raw.sample_count(),
        holidays = holidays.len(),
        "inputs loaded"
    );

    let annual = aggregate_annual_demand(&raw, &convention)
        .with_context(|| format!("{}: {}", Stage::Aggregate, paths.raw_series.display()))?;
    write_annual_table(&annual, out).with_context(|| format!("{}: annual table", Stage::Render))?;
    if let Err(err) = write_annual_demand(&annual, &paths.annual_output) {
        warn!(
            path = %paths.annual_output.display(),
            error = %err,
            "could not persist annual demand table; continuing"
        );
    }
    let disagreeing_apartments = match &paths.energy_series {
        Some(energy_path) => Some(cross_check(&annual, &convention, energy_path)?),
        None => None,
    };

    let extremes = select_extremes(&annual).with_context(|| Stage::Select.to_string())?;
    writeln!(
        out,
        "\nApartment with minimum annual demand: {}\nApartment with maximum annual demand: {}",
        extremes.min, extremes.max
    )?;

    let synthesizer = BdewHeatProfile {
        geometric_temperature: config.synthesis.geometric_temperature,
    };
    let synthetic = synthesize_all(
        &synthesizer,
        &annual,
        dataset.year,
        &holidays,
        &temperature,
        config.archetype,
    )
    .with_context(|| Stage::Synthesize.to_string())?;

    let raw_timestamps = raw.timestamps(dataset.origin);
    let input = ComparisonInput {
        raw: &raw,
        raw_timestamps: &raw_timestamps,
        raw_to_kilowatts: convention.sample_to_kilowatts(),
        synthetic: &synthetic,
        extremes,
    };
    let outcome = renderer
        .present(&input, out)
        .with_context(|| Stage::Render.to_string())?;
    if let RenderOutcome::Charts(paths) = &outcome {
        for path in paths {
            writeln!(out, "Chart written to {}", path.display())?;
        }
    }

    Ok(RunReport {
        annual,
        extremes,
        disagreeing_apartments,
        outcome,
    })
}

/// Aggregate the energy export and count apartments off by more than
/// [`CROSS_CHECK_TOLERANCE`].
fn cross_check(
    annual: &AnnualDemandTable,
    convention: &UnitConvention,
    energy_path: &std::path::Path,
) -> Result<usize> {
    let energy = load_raw_series(energy_path)
        .with_context(|| format!("{}: energy series {}", Stage::Load, energy_path.display()))?;
    let energy_annual = aggregate_annual_demand(
        &energy,
        &UnitConvention::EnergyKilowattHours {
            interval_seconds: convention.interval_seconds(),
            target: annual.unit(),
        },
    )
    .with_context(|| format!("{}: {}", Stage::Aggregate, energy_path.display()))?;
    let deviations = compare_annual_tables(annual, &energy_annual)
        .with_context(|| format!("{}: cross-check {}", Stage::Aggregate, energy_path.display()))?;
    let mut disagreeing = 0;
    for (id, deviation) in deviations {
        if deviation.abs() > CROSS_CHECK_TOLERANCE {
            disagreeing += 1;
            warn!(apartment = id.value(), deviation, "energy export disagrees with power export");
        }
    }
    info!(disagreeing, "cross-checked energy export");
    Ok(disagreeing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path, path::PathBuf};
    use tempfile::tempdir;

    /// Two apartments at 4000 W and 2000 W for four quarter hours, a flat
    /// year of temperatures and an empty holiday table.
    fn staged_config(root: &Path) -> DestestConfig {
        let raw = root.join("heat.csv");
        fs::write(
            &raw,
            ",1,2\n0,4000,2000\n900,4000,2000\n1800,4000,2000\n2700,4000,2000\n",
        )
        .unwrap();
        let temperature = root.join("temperature.csv");
        fs::write(&temperature, format!("temperature\n{}", "5.5\n".repeat(8760))).unwrap();
        let holidays = root.join("holidays.toml");
        fs::write(&holidays, "[holidays]\n").unwrap();

        let mut config = DestestConfig::default();
        config.paths.raw_series = raw;
        config.paths.temperature = temperature;
        config.paths.holidays = holidays;
        config.paths.annual_output = root.join("demand_annual.csv");
        config
    }

    fn energy_export(root: &Path, body: &str) -> PathBuf {
        let path = root.join("energy.csv");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn no_plot_wins_over_configured_dir() {
        let mut config = DestestConfig::default();
        config.paths.plot_dir = Some(PathBuf::from("plots"));
        assert_eq!(select_renderer(&config, true), Renderer::Summary);
        assert_eq!(
            select_renderer(&config, false),
            Renderer::Svg {
                out_dir: PathBuf::from("plots")
            }
        );
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Synthesize.to_string(), "synthesize");
        assert_eq!(Stage::Load.to_string(), "load");
    }

    #[test]
    fn missing_inputs_fail_in_load_stage() {
        let dir = tempdir().unwrap();
        let mut config = DestestConfig::default();
        config.paths.raw_series = dir.path().join("absent.csv");
        let err = run(&config, &Renderer::Summary, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").starts_with("load: raw series"));
    }

    #[test]
    fn summary_run_reports_extremes() {
        let dir = tempdir().unwrap();
        let config = staged_config(dir.path());
        let mut out = Vec::new();
        let report = run(&config, &Renderer::Summary, &mut out).unwrap();
        assert_eq!(report.extremes.max.value(), 1);
        assert_eq!(report.extremes.min.value(), 2);
        assert_eq!(report.disagreeing_apartments, None);
        assert_eq!(report.outcome, RenderOutcome::Summary);
        assert!(config.paths.annual_output.exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Apartment with minimum annual demand: 2"));
    }

    #[test]
    fn agreeing_energy_export_passes_cross_check() {
        let dir = tempdir().unwrap();
        let mut config = staged_config(dir.path());
        // 4000 W and 2000 W over 900 s are 1.0 and 0.5 kWh per sample
        config.paths.energy_series = Some(energy_export(
            dir.path(),
            ",1,2\n0,1.0,0.5\n900,1.0,0.5\n1800,1.0,0.5\n2700,1.0,0.5\n",
        ));
        let report = run(&config, &Renderer::Summary, &mut Vec::new()).unwrap();
        assert_eq!(report.disagreeing_apartments, Some(0));
    }

    #[test]
    fn disagreeing_energy_export_is_counted() {
        let dir = tempdir().unwrap();
        let mut config = staged_config(dir.path());
        config.paths.energy_series = Some(energy_export(
            dir.path(),
            ",1,2\n0,1.0,0.6\n900,1.0,0.6\n1800,1.0,0.6\n2700,1.0,0.6\n",
        ));
        let report = run(&config, &Renderer::Summary, &mut Vec::new()).unwrap();
        assert_eq!(report.disagreeing_apartments, Some(1));
    }

    #[test]
    fn energy_export_with_other_apartments_fails_cross_check() {
        let dir = tempdir().unwrap();
        let mut config = staged_config(dir.path());
        config.paths.energy_series = Some(energy_export(dir.path(), ",1\n0,1.0\n900,1.0\n"));
        let err = run(&config, &Renderer::Summary, &mut Vec::new()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("aggregate: cross-check"), "{message}");
    }
}
