//! Processing cost analysis functionality
//!
//! Aggregates the per-phase `cost_tracking.total_cost` values into the
//! per-article cost chart and its figure legend.

use super::phase_metrics::{PhaseSeries, PhaseSummary};
use crate::common::plots::{render_bar_chart, BarChartSpec};
use crate::common::{ArticleRecord, PlotError};
use std::path::Path;

/// Errors that can occur during cost analysis
#[derive(Debug)]
pub enum CostError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for CostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            CostError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for CostError {}

impl From<std::io::Error> for CostError {
    fn from(err: std::io::Error) -> Self {
        CostError::FileWrite(err)
    }
}

impl From<PlotError> for CostError {
    fn from(err: PlotError) -> Self {
        CostError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, CostError>;

/// Generate the cost chart and legend
///
/// Writes `cost_chart.png` (one bar per article, with a red reference line
/// at the average) and `cost_legend.txt` with the full per-phase cost
/// breakdown.
pub fn generate_cost_analysis(articles: &[ArticleRecord], output_dir: &Path) -> Result<()> {
    let series = collect_cost_series(articles);
    if series.labels.is_empty() {
        return Ok(());
    }

    let totals = series.totals();
    let summary = series.summarize();

    // Per-bar value labels clutter the chart beyond 15 articles
    let bar_value_labels = (totals.len() < 15)
        .then(|| totals.iter().map(|v| format!("${:.4}", v)).collect());

    let spec = BarChartSpec {
        title: "Processing Cost Analysis by Article",
        x_desc: "Articles",
        y_desc: "Cost (USD)",
        values: &totals,
        labels: &series.labels,
        bar_value_labels,
        average_line: Some((summary.average, format!("Average: ${:.4}", summary.average))),
    };
    render_bar_chart(&spec, &output_dir.join("cost_chart.png"))?;

    std::fs::write(output_dir.join("cost_legend.txt"), build_cost_legend(&summary))?;

    Ok(())
}

/// Extracts the four per-phase costs for every article
fn collect_cost_series(articles: &[ArticleRecord]) -> PhaseSeries {
    PhaseSeries::collect(articles, |article| {
        [
            article.vision.cost(),
            article.consensus.cost(),
            article.topics.cost(),
            article.questions.cost(),
        ]
    })
}

/// Technical figure legend with the comprehensive cost metrics
fn build_cost_legend(summary: &PhaseSummary) -> String {
    if summary.article_count == 0 {
        return "Figure 2. No cost data available for this project.".to_string();
    }

    format!(
        "Figure 2. Cost distribution across processing phases for {} articles. \
         Total cost: ${:.6}. Vision: ${:.6} ({:.2}%), \
         Topics: ${:.6} ({:.2}%), \
         Consensus: ${:.6} ({:.2}%), \
         Questions: ${:.6} ({:.2}%). \
         Average cost per article: ${:.6}. \
         Range: ${:.6} - ${:.6}. \
         Articles with cost data: {}/{} ({:.2}%). \
         Cost efficiency: ${:.6} per successful extraction. \
         Zero-cost articles: {} (processing failures).",
        summary.article_count,
        summary.total,
        summary.phase_totals[0],
        summary.phase_pct(0),
        summary.phase_totals[2],
        summary.phase_pct(2),
        summary.phase_totals[1],
        summary.phase_pct(1),
        summary.phase_totals[3],
        summary.phase_pct(3),
        summary.average,
        summary.min,
        summary.max,
        summary.with_data,
        summary.article_count,
        summary.with_data_pct(),
        summary.per_successful(),
        summary.zero_count(),
    )
}
