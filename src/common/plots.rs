//! Plotting infrastructure for the article figures
//!
//! This module renders the two chart shapes the figures need with the
//! [`plotters`] crate: per-article bar charts with an average reference
//! line, and field-matrix heatmaps with a white→blue→green fill. Charts
//! are saved as PNG files using the bitmap backend, which keeps rendering
//! working in headless environments (Docker/CI).

use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Description of a per-article bar chart
pub struct BarChartSpec<'a> {
    /// Chart title displayed at the top of the plot
    pub title: &'a str,
    /// X-axis label
    pub x_desc: &'a str,
    /// Y-axis label
    pub y_desc: &'a str,
    /// One value per bar
    pub values: &'a [f64],
    /// One label per bar, drawn along the X-axis
    pub labels: &'a [String],
    /// Pre-formatted per-bar value labels drawn above each bar, if any
    pub bar_value_labels: Option<Vec<String>>,
    /// Horizontal reference line with its legend text, if any
    pub average_line: Option<(f64, String)>,
}

/// Description of a matrix heatmap
///
/// `cells` holds completion/coverage percentages (0-100) as rows x columns;
/// row 0 is drawn at the top. `annotations` adds a second, smaller text
/// line under the percentage of the matching cell (empty string = none).
pub struct HeatmapSpec<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub row_labels: &'a [String],
    pub col_labels: &'a [String],
    pub cells: &'a [Vec<f64>],
    pub annotations: Option<&'a [Vec<String>]>,
}

/// Renders a bar chart and saves it as a PNG file
///
/// # Chart Properties
/// * Resolution: 1200x800 pixels
/// * One filled bar per entry, values labelled when requested
/// * Optional horizontal average line with a legend entry
/// * Y-axis starts at zero; headroom of 15% above the maximum value
pub fn render_bar_chart(spec: &BarChartSpec, output_path: &Path) -> Result<()> {
    if spec.values.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }
    if spec.values.len() != spec.labels.len() {
        return Err(PlotError::InvalidData(format!(
            "Value/label count mismatch: {} values, {} labels",
            spec.values.len(),
            spec.labels.len()
        )));
    }

    let root = BitMapBackend::new(output_path, (1200, 800));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let bar_count = spec.values.len();
    let y_max = spec.values.iter().cloned().fold(0.0f64, f64::max);
    // Keep a visible axis even when every bar is zero
    let y_max = if y_max > 0.0 { y_max * 1.15 } else { 1.0 };

    let mut chart_context = ChartBuilder::on(&drawing_area)
        .caption(spec.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(0f64..bar_count as f64, 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let labels = spec.labels;
    chart_context
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.x_desc)
        .x_labels(bar_count)
        .x_label_formatter(&|x| {
            labels
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc(spec.y_desc)
        .x_label_style(("sans-serif", 25))
        .y_label_style(("sans-serif", 25))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Bars as filled rectangles, one per article
    chart_context
        .draw_series(spec.values.iter().enumerate().map(|(index, &value)| {
            let x0 = index as f64 + 0.1;
            let x1 = index as f64 + 0.9;
            Rectangle::new([(x0, 0.0), (x1, value)], RGBColor(70, 130, 180).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(value_labels) = &spec.bar_value_labels {
        chart_context
            .draw_series(value_labels.iter().enumerate().map(|(index, text)| {
                let value = spec.values.get(index).copied().unwrap_or(0.0);
                Text::new(
                    text.clone(),
                    (index as f64 + 0.2, value + y_max * 0.01),
                    ("sans-serif", 16).into_font().color(&BLACK),
                )
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    if let Some((average, legend_text)) = &spec.average_line {
        let average = *average;
        chart_context
            .draw_series(LineSeries::new(
                vec![(0.0, average), (bar_count as f64, average)],
                RED.stroke_width(2),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(legend_text.clone())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart_context
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .label_font(("sans-serif", 20))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Renders a matrix heatmap and saves it as a PNG file
///
/// Cells are filled on a white (0%) → blue → green (100%) gradient with
/// the percentage printed inside each cell; text flips to white on dark
/// fills. The canvas grows with the matrix so dense matrices stay legible.
pub fn render_heatmap(spec: &HeatmapSpec, output_path: &Path) -> Result<()> {
    let rows = spec.cells.len();
    if rows == 0 || spec.col_labels.is_empty() {
        return Err(PlotError::InvalidData("Data cannot be empty".to_string()));
    }
    let cols = spec.col_labels.len();
    if rows != spec.row_labels.len() {
        return Err(PlotError::InvalidData(format!(
            "Row/label count mismatch: {} rows, {} labels",
            rows,
            spec.row_labels.len()
        )));
    }
    for row in spec.cells {
        if row.len() != cols {
            return Err(PlotError::InvalidData(format!(
                "Ragged matrix: expected {} columns, found {}",
                cols,
                row.len()
            )));
        }
        for &value in row {
            if !(0.0..=100.0).contains(&value) {
                return Err(PlotError::InvalidData(format!(
                    "Percentage {:.2} is outside valid range 0-100",
                    value
                )));
            }
        }
    }

    // Dynamic sizing: wider for more columns, taller for more rows
    let width = (cols as u32 * 90).clamp(1000, 1800);
    let height = (rows as u32 * 80 + 260).clamp(420, 1200);

    let root = BitMapBackend::new(output_path, (width, height));
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart_context = ChartBuilder::on(&drawing_area)
        .caption(spec.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(110)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let col_labels = spec.col_labels;
    let row_labels = spec.row_labels;
    chart_context
        .configure_mesh()
        .disable_mesh()
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|x| {
            col_labels
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| {
            // Row 0 is drawn in the top band
            let index = rows as f64 - y.floor() - 1.0;
            if index >= 0.0 {
                row_labels
                    .get(index as usize)
                    .cloned()
                    .unwrap_or_default()
            } else {
                String::new()
            }
        })
        .x_label_style(("sans-serif", 20))
        .y_label_style(("sans-serif", 20))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Cell fills, with a white gap between cells
    chart_context
        .draw_series(spec.cells.iter().enumerate().flat_map(|(row_index, row)| {
            row.iter().enumerate().map(move |(col_index, &value)| {
                let y_top = (rows - row_index) as f64;
                Rectangle::new(
                    [
                        (col_index as f64 + 0.02, y_top - 0.98),
                        (col_index as f64 + 0.98, y_top - 0.02),
                    ],
                    heatmap_color(value).filled(),
                )
            })
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Percentage text inside each cell
    chart_context
        .draw_series(spec.cells.iter().enumerate().flat_map(|(row_index, row)| {
            row.iter().enumerate().map(move |(col_index, &value)| {
                let text_color = if value > 50.0 { WHITE } else { BLACK };
                Text::new(
                    format!("{:.1}%", value),
                    (col_index as f64 + 0.28, (rows - row_index) as f64 - 0.55),
                    ("sans-serif", 18).into_font().color(&text_color),
                )
            })
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(annotations) = spec.annotations {
        chart_context
            .draw_series(annotations.iter().enumerate().flat_map(|(row_index, row)| {
                row.iter().enumerate().filter_map(move |(col_index, text)| {
                    if text.is_empty() {
                        return None;
                    }
                    Some(Text::new(
                        text.clone(),
                        (col_index as f64 + 0.24, (rows - row_index) as f64 - 0.18),
                        ("sans-serif", 14)
                            .into_font()
                            .color(&RGBColor(39, 174, 96)),
                    ))
                })
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Maps a 0-100 percentage onto the white→blue→green fill gradient
pub fn heatmap_color(percentage: f64) -> RGBColor {
    // Gradient stops at 0/25/50/75/100%
    const STOPS: [(u8, u8, u8); 5] = [
        (255, 255, 255),
        (0, 102, 204),
        (102, 153, 255),
        (102, 255, 102),
        (0, 204, 0),
    ];

    let clamped = percentage.clamp(0.0, 100.0);
    let position = clamped / 25.0;
    let lower = (position.floor() as usize).min(STOPS.len() - 2);
    let t = position - lower as f64;

    let (r0, g0, b0) = STOPS[lower];
    let (r1, g1, b1) = STOPS[lower + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
