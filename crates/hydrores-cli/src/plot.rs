//! Hydrograph line chart as a standalone SVG document.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hydrores_core::Hydrograph;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 6;
const LINE_COLOR: &str = "blue";

/// Maps data coordinates onto the plot area.
struct Frame {
    x_max: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, t: f64) -> f64 {
        MARGIN_LEFT + t / self.x_max * Self::plot_width()
    }

    fn y(&self, q: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() * (1.0 - q / self.y_max)
    }
}

/// Smallest "nice" value (1, 2, 5 × 10^n) not below `v`.
fn nice_ceil(v: f64) -> f64 {
    if v <= 0.0 || !v.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(v.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&c| c >= v)
        .unwrap_or(10.0 * magnitude)
}

/// Render the discharge series as an SVG line chart with point markers.
pub fn hydrograph_svg(hydrograph: &Hydrograph) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    render(&mut svg, hydrograph)?;
    Ok(svg)
}

fn render(svg: &mut String, hydrograph: &Hydrograph) -> fmt::Result {
    let x_max = hydrograph
        .hour
        .last()
        .copied()
        .filter(|&h| h > 0.0)
        .unwrap_or(1.0);
    let q_max = hydrograph.discharge.iter().copied().fold(0.0_f64, f64::max);
    let frame = Frame {
        x_max,
        y_max: nice_ceil(q_max),
    };

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">Hydrograph</text>"#,
        WIDTH / 2.0,
        MARGIN_TOP / 2.0
    )?;

    // Axes
    let (x0, y0) = (frame.x(0.0), frame.y(0.0));
    let (x1, y1) = (frame.x(frame.x_max), frame.y(frame.y_max));
    writeln!(
        svg,
        r#"<path d="M {x0:.1} {y1:.1} L {x0:.1} {y0:.1} L {x1:.1} {y0:.1}" fill="none" stroke="black"/>"#
    )?;
    for i in 0..=TICKS {
        let frac = i as f64 / TICKS as f64;
        let t = frac * frame.x_max;
        let q = frac * frame.y_max;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            frame.x(t),
            y0 + 18.0,
            format_tick(t)
        )?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            x0 - 8.0,
            frame.y(q) + 4.0,
            format_tick(q)
        )?;
        writeln!(
            svg,
            r##"<line x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
            y = frame.y(q)
        )?;
    }
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">t [hours]</text>"#,
        MARGIN_LEFT + Frame::plot_width() / 2.0,
        HEIGHT - 15.0
    )?;
    writeln!(
        svg,
        r#"<text x="20" y="{y:.1}" text-anchor="middle" transform="rotate(-90 20 {y:.1})">Q [m3/s]</text>"#,
        y = MARGIN_TOP + Frame::plot_height() / 2.0
    )?;

    // Series
    let points: Vec<String> = hydrograph
        .hour
        .iter()
        .zip(&hydrograph.discharge)
        .map(|(&t, &q)| format!("{:.1},{:.1}", frame.x(t), frame.y(q)))
        .collect();
    writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="1.5"/>"#,
        points.join(" ")
    )?;
    for (&t, &q) in hydrograph.hour.iter().zip(&hydrograph.discharge) {
        writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{LINE_COLOR}"/>"#,
            frame.x(t),
            frame.y(q)
        )?;
    }
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" fill="{LINE_COLOR}" text-anchor="end">Q</text>"#,
        x1 - 5.0,
        y1 + 15.0
    )?;
    writeln!(svg, "</svg>")
}

fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round())
    } else {
        format!("{v:.1}")
    }
}

pub fn write_hydrograph_svg(path: &Path, hydrograph: &Hydrograph) -> Result<()> {
    let svg = hydrograph_svg(hydrograph).context("cannot render hydrograph chart")?;
    fs::write(path, svg).with_context(|| format!("cannot write \"{}\"", path.display()))
}
