//! Inline SVG line charts.
//!
//! Points are spaced evenly by index along the x axis. Missing values break
//! the line rather than dropping to zero.

use std::fmt::Write;

use super::html::escape;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const PAD_LEFT: f64 = 56.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 28.0;

const PALETTE: [&str; 6] = ["#4c78a8", "#f58518", "#54a24b", "#e45756", "#72b7b2", "#b279a2"];

#[derive(Debug, Clone)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl LineSeries {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineChart {
    pub x_labels: Vec<String>,
    pub series: Vec<LineSeries>,
}

impl LineChart {
    fn bounds(&self) -> Option<(f64, f64)> {
        let mut values = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .filter(|v| v.is_finite());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if (max - min).abs() < f64::EPSILON {
            Some((min - 1.0, max + 1.0))
        } else {
            Some((min, max))
        }
    }

    fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.values.len()).max().unwrap_or(0)
    }

    /// Render to an `<svg>` element, or `None` when there is nothing to plot.
    pub fn to_svg(&self) -> Option<String> {
        let (min, max) = self.bounds()?;
        let count = self.point_count();

        let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
        let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
        let x_at = |i: usize| {
            if count <= 1 {
                PAD_LEFT + plot_w / 2.0
            } else {
                PAD_LEFT + plot_w * i as f64 / (count - 1) as f64
            }
        };
        let y_at = |v: f64| PAD_TOP + plot_h * (max - v) / (max - min);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg class="chart" viewBox="0 0 {w} {h}" role="img" preserveAspectRatio="none">"#,
            w = WIDTH,
            h = HEIGHT
        );

        // axes and y labels
        let _ = write!(
            svg,
            r#"<line class="axis" x1="{l}" y1="{t}" x2="{l}" y2="{b}"/><line class="axis" x1="{l}" y1="{b}" x2="{r}" y2="{b}"/>"#,
            l = PAD_LEFT,
            t = PAD_TOP,
            b = HEIGHT - PAD_BOTTOM,
            r = WIDTH - PAD_RIGHT
        );
        for (value, y) in [(max, PAD_TOP), (min, HEIGHT - PAD_BOTTOM)] {
            let _ = write!(
                svg,
                r#"<text class="tick" x="{x}" y="{y:.1}" text-anchor="end" dominant-baseline="middle">{v:.2}</text>"#,
                x = PAD_LEFT - 6.0,
                y = y,
                v = value
            );
        }

        if let (Some(first), Some(last)) = (self.x_labels.first(), self.x_labels.last()) {
            let _ = write!(
                svg,
                r#"<text class="tick" x="{l}" y="{y}" text-anchor="start">{a}</text>"#,
                l = PAD_LEFT,
                y = HEIGHT - 8.0,
                a = escape(first)
            );
            if self.x_labels.len() > 1 {
                let _ = write!(
                    svg,
                    r#"<text class="tick" x="{r}" y="{y}" text-anchor="end">{b}</text>"#,
                    r = WIDTH - PAD_RIGHT,
                    y = HEIGHT - 8.0,
                    b = escape(last)
                );
            }
        }

        for (idx, series) in self.series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            for run in runs(&series.values) {
                if let [(i, v)] = run.as_slice() {
                    let _ = write!(
                        svg,
                        r#"<circle cx="{:.1}" cy="{:.1}" r="2.5" fill="{}"/>"#,
                        x_at(*i),
                        y_at(*v),
                        color
                    );
                } else {
                    let points: Vec<String> = run
                        .iter()
                        .map(|(i, v)| format!("{:.1},{:.1}", x_at(*i), y_at(*v)))
                        .collect();
                    let _ = write!(
                        svg,
                        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                        color,
                        points.join(" ")
                    );
                }
            }
        }
        svg.push_str("</svg>");

        let mut legend = String::from(r#"<div class="legend">"#);
        for (idx, series) in self.series.iter().enumerate() {
            let _ = write!(
                legend,
                r#"<span><i style="background:{}"></i>{}</span>"#,
                PALETTE[idx % PALETTE.len()],
                escape(&series.name)
            );
        }
        legend.push_str("</div>");

        Some(format!(r#"<figure class="chart-box">{}{}</figure>"#, svg, legend))
    }
}

/// Split a column into contiguous runs of present, finite values.
fn runs(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i, *v)),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
