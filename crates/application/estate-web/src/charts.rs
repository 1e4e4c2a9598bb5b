//! Inline SVG chart backend
//!
//! Every chart becomes a self-contained `<svg>` element. Point tooltips are
//! native `<title>` children, so no script is needed on the page.

use crate::templates::html_escape;
use estate_dashboard::{ChartBackend, ChartData, ChartId, ChartKind, Result};
use std::f64::consts::PI;
use std::fmt::Write;

const WIDTH: f64 = 560.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_TOP: f64 = 16.0;
const TICKS: usize = 4;

/// Slice colours, cycled
pub const PALETTE: [&str; 8] = [
    "rgba(0, 123, 255, 0.7)",
    "rgba(40, 167, 69, 0.7)",
    "rgba(255, 193, 7, 0.7)",
    "rgba(23, 162, 184, 0.7)",
    "rgba(101, 48, 197, 0.7)",
    "rgba(220, 53, 69, 0.7)",
    "rgba(253, 126, 20, 0.7)",
    "rgba(108, 117, 125, 0.7)",
];

/// A drawn chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgChart {
    pub id: ChartId,
    pub markup: String,
}

/// Renders charts to SVG markup
#[derive(Debug, Default)]
pub struct SvgBackend {
    live: usize,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts created and not yet destroyed
    pub fn live(&self) -> usize {
        self.live
    }
}

impl ChartBackend for SvgBackend {
    type Handle = SvgChart;

    fn create(&mut self, chart: &ChartData) -> Result<SvgChart> {
        let markup = match chart.kind {
            ChartKind::Bar => bar_svg(chart),
            ChartKind::Pie => pie_svg(chart),
        };
        self.live += 1;
        Ok(SvgChart {
            id: chart.id,
            markup,
        })
    }

    fn destroy(&mut self, handle: SvgChart) {
        self.live = self.live.saturating_sub(1);
        tracing::trace!(chart = %handle.id, "svg chart released");
    }
}

fn open_svg(chart: &ChartData) -> String {
    let kind = match chart.kind {
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    };
    format!(
        "<svg class=\"chart chart-{kind}\" id=\"{id}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" role=\"img\" aria-label=\"{title}\">",
        id = chart.id,
        title = html_escape(chart.title),
    )
}

fn no_data(chart: &ChartData) -> String {
    format!(
        "{}<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" class=\"chart-empty\">No data</text></svg>",
        open_svg(chart),
        WIDTH / 2.0,
        HEIGHT / 2.0
    )
}

fn bar_svg(chart: &ChartData) -> String {
    if chart.is_empty() {
        return no_data(chart);
    }

    let max = chart
        .values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let scale_max = if max > 0.0 { max } else { 1.0 };
    let plot_width = WIDTH - MARGIN_LEFT - 10.0;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let slot = plot_width / chart.len() as f64;
    let bar_width = slot * 0.7;

    let mut svg = open_svg(chart);

    // value axis
    for step in 0..=TICKS {
        let value = scale_max * step as f64 / TICKS as f64;
        let y = baseline - plot_height * step as f64 / TICKS as f64;
        let _ = write!(
            svg,
            "<line class=\"grid\" x1=\"{MARGIN_LEFT}\" x2=\"{x2:.1}\" y1=\"{y:.1}\" y2=\"{y:.1}\"/>\
             <text class=\"tick\" x=\"{tx:.1}\" y=\"{y:.1}\" text-anchor=\"end\">{label}</text>",
            x2 = WIDTH - 10.0,
            tx = MARGIN_LEFT - 6.0,
            label = html_escape(&chart.axis_tick(value)),
        );
    }

    for (index, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let height = plot_height * value / scale_max;
        let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_width) / 2.0;
        let tooltip = chart.tooltip(index).unwrap_or_default();
        let _ = write!(
            svg,
            "<rect class=\"bar\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_width:.1}\" height=\"{height:.1}\" fill=\"{fill}\">\
             <title>{label}: {tooltip}</title></rect>\
             <text class=\"axis-label\" x=\"{cx:.1}\" y=\"{ly:.1}\" text-anchor=\"middle\">{label}</text>",
            y = baseline - height,
            fill = PALETTE[0],
            label = html_escape(label),
            tooltip = html_escape(&tooltip),
            cx = x + bar_width / 2.0,
            ly = baseline + 18.0,
        );
    }

    svg.push_str("</svg>");
    svg
}

fn pie_svg(chart: &ChartData) -> String {
    let total = chart.total();
    if chart.is_empty() || !total.is_finite() || total <= 0.0 {
        return no_data(chart);
    }

    let (cx, cy) = (HEIGHT / 2.0, HEIGHT / 2.0);
    let radius = HEIGHT / 2.0 - MARGIN_TOP;
    let mut svg = open_svg(chart);
    let mut angle = -PI / 2.0;

    for (index, (label, value)) in chart.labels.iter().zip(&chart.values).enumerate() {
        let fill = PALETTE[index % PALETTE.len()];
        let tooltip = html_escape(&chart.tooltip(index).unwrap_or_default());
        let label = html_escape(label);
        let fraction = value.max(0.0) / total;

        if fraction >= 1.0 {
            let _ = write!(
                svg,
                "<circle class=\"slice\" cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{radius:.1}\" fill=\"{fill}\">\
                 <title>{label}: {tooltip}</title></circle>"
            );
        } else if fraction > 0.0 {
            let sweep = fraction * 2.0 * PI;
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large = if sweep > PI { 1 } else { 0 };
            let _ = write!(
                svg,
                "<path class=\"slice\" d=\"M{cx:.1},{cy:.1} L{x1:.2},{y1:.2} A{radius:.1},{radius:.1} 0 {large} 1 {x2:.2},{y2:.2} Z\" fill=\"{fill}\">\
                 <title>{label}: {tooltip}</title></path>"
            );
            angle = end;
        }

        // legend
        let ly = MARGIN_TOP + 20.0 * index as f64;
        let _ = write!(
            svg,
            "<rect class=\"legend-swatch\" x=\"{lx:.1}\" y=\"{sy:.1}\" width=\"12\" height=\"12\" fill=\"{fill}\"/>\
             <text class=\"legend\" x=\"{tx:.1}\" y=\"{ty:.1}\">{label}</text>",
            lx = HEIGHT + 20.0,
            sy = ly,
            tx = HEIGHT + 38.0,
            ty = ly + 10.0,
        );
    }

    svg.push_str("</svg>");
    svg
}
