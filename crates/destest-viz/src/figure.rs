use chrono::NaiveDateTime;
use destest_core::{ApartmentId, ExtremumPair, RawSeriesTable, SyntheticProfile};
use serde::Serialize;

pub const MIN_COLOR: &str = "mediumaquamarine";
pub const MAX_COLOR: &str = "tomato";
pub const MEASURED_COLOR: &str = "goldenrod";
pub const SYNTHETIC_COLOR: &str = "lightsteelblue";

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub color: Option<String>,
    pub points: Vec<(NaiveDateTime, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// One output chart: stacked panels sharing the time axis.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    /// File stem the renderer writes to.
    pub name: String,
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Everything the comparison views are drawn from.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonInput<'a> {
    pub raw: &'a RawSeriesTable,
    /// Timestamps of `raw`'s rows.
    pub raw_timestamps: &'a [NaiveDateTime],
    /// Multiplier taking one raw sample to kW.
    pub raw_to_kilowatts: f64,
    pub synthetic: &'a SyntheticProfile,
    pub extremes: ExtremumPair,
}

/// The three comparison views, in kW.
///
/// 1. every apartment, measured on top and synthetic below;
/// 2. the min- and max-demand apartments, same layout;
/// 3. measured and synthetic overlaid for the max-demand apartment.
///
/// Series are thinned to at most `max_points` bucket means.
pub fn comparison_figures(input: &ComparisonInput<'_>, max_points: usize) -> Vec<Figure> {
    let ExtremumPair { min, max } = input.extremes;

    let overview = Figure {
        name: "heat_demand".into(),
        title: "Heat demand".into(),
        panels: vec![
            panel(
                "DESTEST",
                input
                    .raw
                    .columns()
                    .iter()
                    .map(|(id, _)| measured(input, *id, id.to_string(), None, max_points))
                    .collect(),
            ),
            panel(
                "Synthetic profile",
                input
                    .synthetic
                    .curves
                    .iter()
                    .map(|(id, _)| synthetic(input, *id, id.to_string(), None, max_points))
                    .collect(),
            ),
        ],
    };

    let extremes = Figure {
        name: format!("heat_demand_apartment_{min}_and_{max}"),
        title: format!("Heat demand apartment {min} and {max}"),
        panels: vec![
            panel(
                "DESTEST",
                vec![
                    measured(input, min, min.to_string(), Some(MIN_COLOR), max_points),
                    measured(input, max, max.to_string(), Some(MAX_COLOR), max_points),
                ],
            ),
            panel(
                "Synthetic profile",
                vec![
                    synthetic(input, min, min.to_string(), Some(MIN_COLOR), max_points),
                    synthetic(input, max, max.to_string(), Some(MAX_COLOR), max_points),
                ],
            ),
        ],
    };

    let overlay = Figure {
        name: "heat_demand_comparison_destest_synthetic".into(),
        title: "Heat demand comparison DESTEST synthetic profile".into(),
        panels: vec![panel(
            &format!("Apartment {max}"),
            vec![
                measured(
                    input,
                    max,
                    format!("{max} - DESTEST"),
                    Some(MEASURED_COLOR),
                    max_points,
                ),
                synthetic(
                    input,
                    max,
                    format!("{max} - synthetic"),
                    Some(SYNTHETIC_COLOR),
                    max_points,
                ),
            ],
        )],
    };

    vec![overview, extremes, overlay]
}

fn panel(title: &str, series: Vec<Series>) -> Panel {
    Panel {
        title: title.to_string(),
        x_label: "Date".into(),
        y_label: "Heat demand in kW".into(),
        series,
    }
}

fn measured(
    input: &ComparisonInput<'_>,
    id: ApartmentId,
    label: String,
    color: Option<&str>,
    max_points: usize,
) -> Series {
    let values = input.raw.column(id).unwrap_or_default();
    let points = input
        .raw_timestamps
        .iter()
        .zip(values)
        .map(|(t, v)| (*t, v * input.raw_to_kilowatts))
        .collect();
    Series {
        label,
        color: color.map(str::to_string),
        points: thin(points, max_points),
    }
}

fn synthetic(
    input: &ComparisonInput<'_>,
    id: ApartmentId,
    label: String,
    color: Option<&str>,
    max_points: usize,
) -> Series {
    let values = input.synthetic.curve(id).unwrap_or_default();
    let points = input
        .synthetic
        .timestamps
        .iter()
        .zip(values)
        .map(|(t, v)| (*t, *v))
        .collect();
    Series {
        label,
        color: color.map(str::to_string),
        points: thin(points, max_points),
    }
}

/// Replace runs of points by their mean so at most `max_points` remain.
fn thin(points: Vec<(NaiveDateTime, f64)>, max_points: usize) -> Vec<(NaiveDateTime, f64)> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }
    let bucket = points.len().div_ceil(max_points);
    points
        .chunks(bucket)
        .map(|chunk| {
            let mean = chunk.iter().map(|(_, v)| v).sum::<f64>() / chunk.len() as f64;
            (chunk[0].0, mean)
        })
        .collect()
}
