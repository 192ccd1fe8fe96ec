//! SVG line and bar charts over the four OHLC series.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::{ChartError, ChartKind, SeriesExtract, Symbol};

/// File name of the rendered chart inside the static directory.
pub const CHART_FILE_NAME: &str = "stock_price_chart.svg";

/// Series names, in drawing order.
pub const SERIES_NAMES: [&str; 4] = ["Open", "High", "Low", "Close"];

const SERIES_COLORS: [&str; 4] = ["#3b82f6", "#22c55e", "#ef4444", "#f59e0b"];

const INTRADAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 500.0;
const PAD_LEFT: f64 = 70.0;
const PAD_RIGHT: f64 = 20.0;
const PAD_TOP: f64 = 70.0;
const PAD_BOTTOM: f64 = 120.0;
const MAX_X_LABELS: usize = 40;

/// One named value sequence on the shared category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// Chart of the Open/High/Low/Close series for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: ChartKind,
    title: String,
    labels: Vec<String>,
    series: Vec<ChartSeries>,
}

impl Chart {
    pub fn new(kind: ChartKind, symbol: &Symbol, extract: &SeriesExtract) -> Self {
        let columns = [&extract.open, &extract.high, &extract.low, &extract.close];
        let series = SERIES_NAMES
            .into_iter()
            .zip(columns)
            .map(|(name, values)| ChartSeries {
                name,
                values: values.clone(),
            })
            .collect();

        Self {
            kind,
            title: format!("Stock Price for {symbol}"),
            labels: extract.labels.iter().map(|label| display_label(label)).collect(),
            series,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Category axis labels, one per observation.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn render_svg(&self) -> String {
        let mut svg = String::with_capacity(16 * 1024 + self.labels.len() * 400);
        let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
        let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
        let bottom = PAD_TOP + plot_h;

        let (min, max) = self.value_bounds();
        let range = max - min;
        let y_of = |value: f64| PAD_TOP + plot_h * (1.0 - (value - min) / range);

        let count = self.labels.len();
        let band = plot_w / count.max(1) as f64;
        let x_of = |index: usize| PAD_LEFT + band * (index as f64 + 0.5);

        write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="chart {kind}" data-categories="{count}">"##,
            w = WIDTH,
            h = HEIGHT,
            kind = self.kind,
        )
        .ok();
        svg.push_str(r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);
        write!(
            svg,
            r##"<text x="{:.1}" y="28" font-size="18" font-family="sans-serif" text-anchor="middle" fill="#18181b">{}</text>"##,
            WIDTH / 2.0,
            escape_markup(&self.title)
        )
        .ok();

        // Legend
        for (index, series) in self.series.iter().enumerate() {
            let x = PAD_LEFT + index as f64 * 90.0;
            write!(
                svg,
                r##"<rect x="{x:.1}" y="42" width="12" height="12" fill="{color}"/><text x="{tx:.1}" y="52" font-size="12" font-family="sans-serif" fill="#3f3f46">{name}</text>"##,
                color = SERIES_COLORS[index],
                tx = x + 16.0,
                name = series.name,
            )
            .ok();
        }

        // Grid and y axis
        for step in 0..=4 {
            let value = max - range * (step as f64 / 4.0);
            let y = y_of(value);
            write!(
                svg,
                r##"<line x1="{PAD_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#e4e4e7" stroke-dasharray="3,3"/><text x="{tx:.1}" y="{ty:.1}" font-size="10" font-family="sans-serif" text-anchor="end" fill="#71717a">{value:.2}</text>"##,
                x2 = WIDTH - PAD_RIGHT,
                tx = PAD_LEFT - 6.0,
                ty = y + 3.0,
            )
            .ok();
        }
        write!(
            svg,
            r##"<text x="16" y="{:.1}" font-size="12" font-family="sans-serif" text-anchor="middle" fill="#3f3f46" transform="rotate(-90 16 {:.1})">Price</text>"##,
            PAD_TOP + plot_h / 2.0,
            PAD_TOP + plot_h / 2.0
        )
        .ok();
        write!(
            svg,
            r##"<line x1="{PAD_LEFT}" y1="{bottom:.1}" x2="{:.1}" y2="{bottom:.1}" stroke="#a1a1aa"/>"##,
            WIDTH - PAD_RIGHT
        )
        .ok();

        match self.kind {
            ChartKind::Line => self.write_lines(&mut svg, &x_of, &y_of),
            ChartKind::Bar => self.write_bars(&mut svg, band, &x_of, &y_of),
        }

        // X axis labels, thinned so they stay readable
        let stride = count.div_ceil(MAX_X_LABELS).max(1);
        svg.push_str(r#"<g class="x-labels">"#);
        for (index, label) in self.labels.iter().enumerate().step_by(stride) {
            let x = x_of(index);
            let y = bottom + 12.0;
            write!(
                svg,
                r##"<text x="{x:.1}" y="{y:.1}" font-size="10" font-family="sans-serif" fill="#71717a" transform="rotate(45 {x:.1} {y:.1})">{}</text>"##,
                escape_markup(label)
            )
            .ok();
        }
        svg.push_str("</g>");
        write!(
            svg,
            r##"<text x="{:.1}" y="{:.1}" font-size="12" font-family="sans-serif" text-anchor="middle" fill="#3f3f46">Date</text>"##,
            PAD_LEFT + plot_w / 2.0,
            HEIGHT - 8.0
        )
        .ok();

        svg.push_str("</svg>");
        svg
    }

    /// Write the SVG to `path`, replacing any previous chart.
    ///
    /// The document goes to a temporary file in the same directory first and is
    /// renamed into place, so readers see either the old or the new chart.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut staged = tempfile::Builder::new()
            .prefix(".chart-")
            .suffix(".svg")
            .tempfile_in(dir)?;
        staged.write_all(self.render_svg().as_bytes())?;
        staged.flush()?;
        staged.persist(path).map_err(|error| error.error)?;

        tracing::debug!(path = %path.display(), points = self.labels.len(), "chart written");
        Ok(path.to_path_buf())
    }

    fn value_bounds(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|series| series.values.iter().copied());
        let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if self.kind == ChartKind::Bar {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if max - min < f64::EPSILON {
            max = min + 1.0;
        }
        (min, max)
    }

    fn write_lines(&self, svg: &mut String, x_of: &dyn Fn(usize) -> f64, y_of: &dyn Fn(f64) -> f64) {
        for (index, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[index];
            write!(svg, r#"<g class="series" data-series="{}">"#, series.name).ok();

            let mut path = String::with_capacity(series.values.len() * 16);
            for (point, value) in series.values.iter().enumerate() {
                let command = if point == 0 { 'M' } else { 'L' };
                write!(path, "{command}{:.1},{:.1} ", x_of(point), y_of(*value)).ok();
            }
            write!(
                svg,
                r#"<path d="{}" fill="none" stroke="{color}" stroke-width="1.5"/>"#,
                path.trim_end()
            )
            .ok();
            for (point, value) in series.values.iter().enumerate() {
                write!(
                    svg,
                    r#"<circle cx="{:.1}" cy="{:.1}" r="2" fill="{color}"><title>{}: {value:.2}</title></circle>"#,
                    x_of(point),
                    y_of(*value),
                    series.name
                )
                .ok();
            }
            svg.push_str("</g>");
        }
    }

    fn write_bars(
        &self,
        svg: &mut String,
        band: f64,
        x_of: &dyn Fn(usize) -> f64,
        y_of: &dyn Fn(f64) -> f64,
    ) {
        let group_w = band * 0.8;
        let bar_w = group_w / self.series.len().max(1) as f64;
        let baseline = y_of(0.0);

        for (index, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[index];
            write!(svg, r#"<g class="series" data-series="{}">"#, series.name).ok();
            for (point, value) in series.values.iter().enumerate() {
                let x = x_of(point) - group_w / 2.0 + bar_w * index as f64;
                let y = y_of(*value);
                let (top, height) = if y <= baseline {
                    (y, baseline - y)
                } else {
                    (baseline, y - baseline)
                };
                write!(
                    svg,
                    r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_w:.2}" height="{height:.1}" fill="{color}"><title>{}: {value:.2}</title></rect>"#,
                    series.name
                )
                .ok();
            }
            svg.push_str("</g>");
        }
    }
}

/// Axis label for a provider key: intraday timestamps lose their seconds.
pub fn display_label(raw: &str) -> String {
    if !raw.contains(' ') {
        return raw.to_owned();
    }

    PrimitiveDateTime::parse(raw, INTRADAY_FORMAT)
        .ok()
        .and_then(|timestamp| timestamp.format(LABEL_FORMAT).ok())
        .unwrap_or_else(|| raw.to_owned())
}

/// Escape text for inclusion in SVG or HTML markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
