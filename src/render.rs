//! SVG chart rendering with plotters.

use std::f64::consts::TAU;
use std::path::Path;

use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::{InsightsError, Result};
use crate::report::{BarChart, ChartRenderer, Rgb, TimeSeries, WordCloud};

const FONT: &str = "sans-serif";
const MIN_FONT_SIZE: f64 = 10.0;
const SHRINK_FACTOR: f64 = 0.85;
const SPIRAL_STEPS: usize = 4000;

// Word colours cycle through this list in rank order
const CLOUD_PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

fn render_error<E: std::fmt::Display>(err: E) -> InsightsError {
    InsightsError::Render(err.to_string())
}

const fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Writes every chart as an SVG file
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    chart_size: (u32, u32),
    cloud_size: (u32, u32),
    seed: u64,
}

impl SvgRenderer {
    /// Renderer using the configured sizes and word-cloud seed
    #[must_use]
    pub const fn new(report: &ReportConfig) -> Self {
        Self {
            chart_size: (report.chart_width, report.chart_height),
            cloud_size: (report.wordcloud_width, report.wordcloud_height),
            seed: report.wordcloud_seed,
        }
    }
}

/// Y range covering every value and zero, padded by a tenth of its span
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (low, high) = values.fold((0.0_f64, 0.0_f64), |(low, high), v| (low.min(v), high.max(v)));
    let span = high - low;
    if span <= f64::EPSILON {
        return (0.0, 1.0);
    }
    let pad = span * 0.1;
    (
        if low < 0.0 { low - pad } else { low },
        if high > 0.0 { high + pad } else { high },
    )
}

impl ChartRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render_bar(&self, chart: &BarChart, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, self.chart_size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (low, high) = value_range(chart.bars.iter().map(|bar| bar.value));
        let last = chart.bars.len().max(1) - 1;
        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((0..last).into_segmented(), low..high)
            .map_err(render_error)?;

        let labels: Vec<&str> = chart.bars.iter().map(|bar| bar.label.as_str()).collect();
        let label_for = |value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(i) => labels.get(*i).map(ToString::to_string).unwrap_or_default(),
            _ => String::new(),
        };
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&label_for)
            .draw()
            .map_err(render_error)?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), bar.value),
                ],
                rgb(bar.color).filled(),
            );
            rect.set_margin(0, 0, 30, 30);
            rect
        }))
        .map_err(render_error)?;

        root.present().map_err(render_error)?;
        debug!(path = %path.display(), bars = chart.bars.len(), "Bar chart rendered");
        Ok(())
    }

    fn render_wordcloud(&self, cloud: &WordCloud, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, self.cloud_size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let body = root.titled(&cloud.title, (FONT, 24)).map_err(render_error)?;

        let placed = layout_words(&cloud.words, body.dim_in_pixel(), self.seed);
        for (rank, word) in placed.iter().enumerate() {
            let color = CLOUD_PALETTE[rank % CLOUD_PALETTE.len()];
            let style = (FONT, word.font_size).into_font().color(&color);
            body.draw(&Text::new(word.text.as_str(), (word.x, word.y), style))
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
        debug!(
            path = %path.display(),
            requested = cloud.words.len(),
            placed = placed.len(),
            "Word cloud rendered"
        );
        Ok(())
    }

    fn render_timeseries(&self, series: &TimeSeries, path: &Path) -> Result<()> {
        let root = SVGBackend::new(path, self.chart_size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (Some(first), Some(last)) = (series.points.first(), series.points.last()) else {
            root.titled(&series.title, (FONT, 28)).map_err(render_error)?;
            root.present().map_err(render_error)?;
            return Ok(());
        };
        let start = first.0;
        let end = if last.0 > start {
            last.0
        } else {
            start.succ_opt().unwrap_or(start)
        };

        let mut ctx = ChartBuilder::on(&root)
            .caption(&series.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(start..end, -1.05_f64..1.05_f64)
            .map_err(render_error)?;

        let date_label = |date: &chrono::NaiveDate| date.format("%Y-%m-%d").to_string();
        ctx.configure_mesh()
            .x_labels(6)
            .x_desc(series.x_label.as_str())
            .y_desc(series.y_label.as_str())
            .x_label_formatter(&date_label)
            .draw()
            .map_err(render_error)?;

        let color = rgb(series.color);
        ctx.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(2),
        ))
        .map_err(render_error)?;
        ctx.draw_series(
            series
                .points
                .iter()
                .map(|&point| Circle::new(point, 3, color.filled())),
        )
        .map_err(render_error)?;

        root.present().map_err(render_error)?;
        debug!(path = %path.display(), days = series.points.len(), "Timeline rendered");
        Ok(())
    }
}

/// A word positioned on the cloud canvas, top-left anchored
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    /// The word
    pub text: String,
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Font size in pixels
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rect {
    fn intersects(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Rough extent of a word, no font metrics needed
fn estimate_extent(word: &str, font_size: f64) -> (f64, f64) {
    (word.chars().count() as f64 * font_size * 0.6, font_size * 1.2)
}

/// Place words on an Archimedean spiral from the centre, largest first.
///
/// Font size scales with the square root of the relative count. A word that
/// cannot be placed is retried smaller and dropped below the minimum size.
/// The same words, canvas and seed always give the same layout.
#[must_use]
pub fn layout_words(words: &[(String, u64)], canvas: (u32, u32), seed: u64) -> Vec<PlacedWord> {
    let Some(max_count) = words.iter().map(|(_, count)| *count).max() else {
        return Vec::new();
    };
    let (width, height) = (f64::from(canvas.0), f64::from(canvas.1));
    let max_font = (height / 4.0).max(MIN_FONT_SIZE);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut occupied: Vec<Rect> = Vec::new();
    let mut placed = Vec::new();

    for (word, count) in words {
        let relative = *count as f64 / max_count.max(1) as f64;
        let mut font_size = (max_font * relative.sqrt()).max(MIN_FONT_SIZE);
        let phase = rng.gen_range(0.0..TAU);

        while font_size >= MIN_FONT_SIZE {
            let (w, h) = estimate_extent(word, font_size);
            if let Some(rect) = spiral_position(w, h, width, height, phase, &occupied) {
                occupied.push(rect);
                placed.push(PlacedWord {
                    text: word.clone(),
                    x: rect.left.round() as i32,
                    y: rect.top.round() as i32,
                    font_size,
                });
                break;
            }
            font_size *= SHRINK_FACTOR;
        }
    }

    placed
}

fn spiral_position(
    w: f64,
    h: f64,
    width: f64,
    height: f64,
    phase: f64,
    occupied: &[Rect],
) -> Option<Rect> {
    if w > width || h > height {
        return None;
    }
    let (cx, cy) = (width / 2.0, height / 2.0);
    let max_radius = width.hypot(height) / 2.0;

    for step in 0..SPIRAL_STEPS {
        let t = step as f64 * 0.1;
        let radius = 2.0 * t;
        if radius > max_radius {
            break;
        }
        let left = cx - w / 2.0 + radius * (phase + t).cos();
        let top = cy - h / 2.0 + radius * (phase + t).sin();
        let candidate = Rect {
            left,
            top,
            right: left + w,
            bottom: top + h,
        };
        let inside = left >= 0.0 && top >= 0.0 && candidate.right <= width && candidate.bottom <= height;
        if inside && !occupied.iter().any(|rect| rect.intersects(&candidate)) {
            return Some(candidate);
        }
    }
    None
}
