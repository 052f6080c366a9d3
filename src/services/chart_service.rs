//! Histogram rendering for the final results page.
//!
//! The chart is rasterised to PNG with an embedded font and handed to the
//! page as a base64 data URI.

use std::sync::OnceLock;

use base64::{Engine, engine::general_purpose::STANDARD};
use plotters::{
    prelude::*,
    style::{FontStyle, register_font},
};
use thiserror::Error;

use crate::state::round::{Guess, MAX_GUESS};

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 600;
const INTERVAL_WIDTH: u8 = 10;
const INTERVAL_COUNT: usize = (MAX_GUESS / INTERVAL_WIDTH) as usize;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Prefix of the data URI returned by [`render_histograms`].
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Failures while drawing the results chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Called with no guesses; the handler is expected to short-circuit first.
    #[error("cannot chart an empty round")]
    Empty,
    /// The bundled font could not be loaded.
    #[error("failed to load the chart font")]
    Font,
    /// The drawing backend rejected an operation.
    #[error("failed to draw chart: {0}")]
    Draw(String),
    /// The pixel buffer could not be encoded as PNG.
    #[error("failed to encode chart: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Count of guesses per value for 1..=100, indexed by `value - 1`.
pub fn unit_bins(guesses: &[Guess]) -> [u32; MAX_GUESS as usize] {
    let mut bins = [0u32; MAX_GUESS as usize];
    for guess in guesses {
        if let Some(slot) = (guess.value() as usize)
            .checked_sub(1)
            .and_then(|idx| bins.get_mut(idx))
        {
            *slot += 1;
        }
    }
    bins
}

/// Count of guesses per ten-wide interval: [1-10], [11-20], ..., [91-100].
pub fn interval_bins(guesses: &[Guess]) -> [u32; INTERVAL_COUNT] {
    let mut bins = [0u32; INTERVAL_COUNT];
    for guess in guesses {
        if let Some(slot) = (guess.value() as usize)
            .checked_sub(1)
            .map(|idx| idx / INTERVAL_WIDTH as usize)
            .and_then(|idx| bins.get_mut(idx))
        {
            *slot += 1;
        }
    }
    bins
}

/// Label of interval `idx`, e.g. `"11-20"` for index 1.
pub fn interval_label(idx: usize) -> String {
    let start = idx * INTERVAL_WIDTH as usize + 1;
    format!("{start}-{}", start + INTERVAL_WIDTH as usize - 1)
}

/// Render both histograms side by side and return a PNG `data:` URI for an `<img>` tag.
pub fn render_histograms(guesses: &[Guess]) -> Result<String, ChartError> {
    if guesses.is_empty() {
        return Err(ChartError::Empty);
    }
    ensure_font()?;

    let pixels = draw_bitmap(&unit_bins(guesses), &interval_bins(guesses))
        .map_err(|err| ChartError::Draw(err.to_string()))?;
    let encoded = encode_png(&pixels)?;

    Ok(format!("{PNG_DATA_URI_PREFIX}{}", STANDARD.encode(encoded)))
}

fn ensure_font() -> Result<(), ChartError> {
    let ready = *FONT_READY
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ready { Ok(()) } else { Err(ChartError::Font) }
}

fn encode_png(pixels: &[u8]) -> Result<Vec<u8>, ChartError> {
    let mut encoded = Vec::new();
    let mut encoder = png::Encoder::new(&mut encoded, CHART_WIDTH, CHART_HEIGHT);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;
    Ok(encoded)
}

/// Draw into an RGB pixel buffer of `CHART_WIDTH * CHART_HEIGHT * 3` bytes.
fn draw_bitmap(
    units: &[u32; MAX_GUESS as usize],
    intervals: &[u32; INTERVAL_COUNT],
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE)?;
        let (left, right) = root.split_horizontally(CHART_WIDTH / 2);

        let unit_top = units.iter().copied().max().unwrap_or(0) + 1;
        let mut chart = ChartBuilder::on(&left)
            .caption("Distribution of Guesses", (FONT_FAMILY, 22).into_font())
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(48)
            .build_cartesian_2d(0.5f64..f64::from(MAX_GUESS) + 0.5, 0u32..unit_top)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Guess")
            .y_desc("Frequency")
            .draw()?;
        chart.draw_series(units.iter().enumerate().filter(|(_, count)| **count > 0).map(
            |(idx, count)| {
                let value = idx as f64 + 1.0;
                Rectangle::new([(value - 0.5, 0), (value + 0.5, *count)], SKY_BLUE.filled())
            },
        ))?;
        chart.draw_series(units.iter().enumerate().filter(|(_, count)| **count > 0).map(
            |(idx, count)| {
                let value = idx as f64 + 1.0;
                Rectangle::new([(value - 0.5, 0), (value + 0.5, *count)], BLACK.stroke_width(1))
            },
        ))?;

        let interval_top = intervals.iter().copied().max().unwrap_or(0) + 1;
        let mut chart = ChartBuilder::on(&right)
            .caption("Guesses by Intervals", (FONT_FAMILY, 22).into_font())
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(48)
            .build_cartesian_2d(0f64..INTERVAL_COUNT as f64, 0u32..interval_top)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(INTERVAL_COUNT + 1)
            .x_label_formatter(&|x| {
                let idx = x.round();
                if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < INTERVAL_COUNT {
                    interval_label(idx as usize)
                } else {
                    String::new()
                }
            })
            .x_label_style((FONT_FAMILY, 11).into_font())
            .x_desc("Guess Intervals")
            .y_desc("Frequency")
            .draw()?;
        chart.draw_series(intervals.iter().enumerate().map(|(idx, count)| {
            let left_edge = idx as f64;
            Rectangle::new(
                [(left_edge + 0.05, 0), (left_edge + 0.95, *count)],
                LIGHT_GREEN.filled(),
            )
        }))?;
        chart.draw_series(intervals.iter().enumerate().filter(|(_, count)| **count > 0).map(
            |(idx, count)| {
                let left_edge = idx as f64;
                Rectangle::new(
                    [(left_edge + 0.05, 0), (left_edge + 0.95, *count)],
                    BLACK.stroke_width(1),
                )
            },
        ))?;

        root.present()?;
    }
    Ok(pixels)
}
