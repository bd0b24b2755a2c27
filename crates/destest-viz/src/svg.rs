//! Minimal SVG line-chart writer for [`Figure`]s.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::figure::{Figure, Panel};

const WIDTH: f64 = 1169.0;
const HEIGHT: f64 = 827.0;
const TITLE_BAND: f64 = 48.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 52.0;
const TICKS: usize = 5;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn render_svg(figure: &Figure) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        out,
        r#"<text x="{}" y="30" font-size="20" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(&figure.title)
    );

    let x_range = time_range(figure);
    let panel_height = (HEIGHT - TITLE_BAND) / figure.panels.len().max(1) as f64;
    for (i, panel) in figure.panels.iter().enumerate() {
        let top = TITLE_BAND + i as f64 * panel_height;
        render_panel(&mut out, panel, top, panel_height, x_range);
    }
    out.push_str("</svg>\n");
    out
}

fn render_panel(
    out: &mut String,
    panel: &Panel,
    top: f64,
    height: f64,
    x_range: Option<(i64, i64)>,
) {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let plot_top = top + MARGIN_TOP;
    let plot_bottom = top + height - MARGIN_BOTTOM;

    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" font-size="15" text-anchor="middle">{}</text>"#,
        (left + right) / 2.0,
        top + 22.0,
        escape(&panel.title)
    );
    let _ = writeln!(
        out,
        r#"<rect x="{left}" y="{plot_top}" width="{}" height="{}" fill="none" stroke="black"/>"#,
        right - left,
        plot_bottom - plot_top
    );

    let y_max = panel
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, v)| *v))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let (x_min, x_max) = x_range.unwrap_or((0, 1));
    let x_span = (x_max - x_min).max(1) as f64;

    let sx = |t: &NaiveDateTime| left + (seconds(t) - x_min) as f64 / x_span * (right - left);
    let sy = |v: f64| plot_bottom - v.max(0.0) / y_max * (plot_bottom - plot_top);

    for k in 0..=TICKS {
        let frac = k as f64 / TICKS as f64;
        let y = plot_bottom - frac * (plot_bottom - plot_top);
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="11" text-anchor="end">{:.1}</text>"#,
            left - 6.0,
            y + 4.0,
            frac * y_max
        );
        let x = left + frac * (right - left);
        let stamp = chrono::DateTime::from_timestamp(x_min + (frac * x_span) as i64, 0)
            .map(|d| d.naive_utc().format("%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            r#"<text x="{x}" y="{}" font-size="11" text-anchor="middle">{stamp}</text>"#,
            plot_bottom + 16.0
        );
    }
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" font-size="12" text-anchor="middle">{}</text>"#,
        (left + right) / 2.0,
        plot_bottom + 36.0,
        escape(&panel.x_label)
    );
    let _ = writeln!(
        out,
        r#"<text x="18" y="{0}" font-size="12" text-anchor="middle" transform="rotate(-90 18 {0})">{1}</text>"#,
        (plot_top + plot_bottom) / 2.0,
        escape(&panel.y_label)
    );

    for (i, series) in panel.series.iter().enumerate() {
        let color = series
            .color
            .as_deref()
            .unwrap_or(PALETTE[i % PALETTE.len()]);
        let mut path = String::new();
        for (t, v) in &series.points {
            let _ = write!(path, "{:.1},{:.1} ", sx(t), sy(*v));
        }
        let _ = writeln!(
            out,
            r#"<polyline fill="none" stroke="{color}" stroke-width="1" points="{}"/>"#,
            path.trim_end()
        );
        let ly = plot_top + 12.0 + i as f64 * 14.0;
        let _ = writeln!(
            out,
            r#"<line x1="{0}" y1="{ly}" x2="{1}" y2="{ly}" stroke="{color}" stroke-width="2"/><text x="{2}" y="{3}" font-size="11">{4}</text>"#,
            right + 10.0,
            right + 30.0,
            right + 36.0,
            ly + 4.0,
            escape(&series.label)
        );
    }
}

fn seconds(t: &NaiveDateTime) -> i64 {
    t.and_utc().timestamp()
}

fn time_range(figure: &Figure) -> Option<(i64, i64)> {
    let mut stamps = figure
        .panels
        .iter()
        .flat_map(|p| p.series.iter())
        .flat_map(|s| s.points.iter().map(|(t, _)| seconds(t)));
    let first = stamps.next()?;
    Some(stamps.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s))))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Series;
    use destest_core::default_origin;

    #[test]
    fn renders_one_polyline_per_series() {
        let t0 = default_origin();
        let t1 = t0 + chrono::Duration::hours(1);
        let figure = Figure {
            name: "f".into(),
            title: "Heat & demand".into(),
            panels: vec![Panel {
                title: "DESTEST".into(),
                x_label: "Date".into(),
                y_label: "Heat demand in kW".into(),
                series: vec![
                    Series {
                        label: "1".into(),
                        color: Some("tomato".into()),
                        points: vec![(t0, 1.0), (t1, 2.0)],
                    },
                    Series {
                        label: "2".into(),
                        color: None,
                        points: vec![(t0, 0.5), (t1, 0.25)],
                    },
                ],
            }],
        };
        let svg = render_svg(&figure);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Heat &amp; demand"));
        assert!(svg.contains(r#"stroke="tomato""#));
        assert!(svg.contains("01-01 00:00"));
    }

    #[test]
    fn empty_figure_still_renders() {
        let figure = Figure {
            name: "empty".into(),
            title: "Nothing".into(),
            panels: vec![],
        };
        assert!(render_svg(&figure).contains("Nothing"));
    }
}
