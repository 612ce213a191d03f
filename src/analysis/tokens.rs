//! Token usage analysis functionality
//!
//! Aggregates per-phase `cost_tracking.total_tokens` into the token
//! consumption chart and its legend.

use super::phase_metrics::{PhaseSeries, PhaseSummary};
use crate::common::plots::{render_bar_chart, BarChartSpec};
use crate::common::{ArticleRecord, PlotError};
use std::path::Path;

/// Errors that can occur during token analysis
#[derive(Debug)]
pub enum TokenError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            TokenError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<std::io::Error> for TokenError {
    fn from(err: std::io::Error) -> Self {
        TokenError::FileWrite(err)
    }
}

impl From<PlotError> for TokenError {
    fn from(err: PlotError) -> Self {
        TokenError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, TokenError>;

/// Generate the token usage chart and legend
///
/// Writes `token_chart.png` and `token_legend.txt`.
pub fn generate_token_analysis(articles: &[ArticleRecord], output_dir: &Path) -> Result<()> {
    let series = collect_token_series(articles);
    if series.labels.is_empty() {
        return Ok(());
    }

    let totals = series.totals();
    let summary = series.summarize();

    let bar_value_labels = (totals.len() < 15)
        .then(|| totals.iter().map(|v| group_thousands(*v as u64)).collect());

    let spec = BarChartSpec {
        title: "Token Usage Analysis by Article",
        x_desc: "Articles",
        y_desc: "Tokens",
        values: &totals,
        labels: &series.labels,
        bar_value_labels,
        average_line: Some((
            summary.average,
            format!("Average: {}", group_thousands(summary.average.round() as u64)),
        )),
    };
    render_bar_chart(&spec, &output_dir.join("token_chart.png"))?;

    std::fs::write(
        output_dir.join("token_legend.txt"),
        build_token_legend(&summary),
    )?;

    Ok(())
}

/// Extracts the four per-phase token counts for every article
fn collect_token_series(articles: &[ArticleRecord]) -> PhaseSeries {
    PhaseSeries::collect(articles, |article| {
        [
            article.vision.tokens() as f64,
            article.consensus.tokens() as f64,
            article.topics.tokens() as f64,
            article.questions.tokens() as f64,
        ]
    })
}

/// Technical figure legend with the comprehensive token metrics
fn build_token_legend(summary: &PhaseSummary) -> String {
    if summary.article_count == 0 {
        return "Figure 3. No token data available for this project.".to_string();
    }

    let grouped = |value: f64| group_thousands(value.round() as u64);

    format!(
        "Figure 3. Token consumption distribution across processing phases for {} articles. \
         Total consumption: {} tokens. Vision: {} ({:.2}%), \
         Topics: {} ({:.2}%), \
         Consensus: {} ({:.2}%), \
         Questions: {} ({:.2}%). \
         Average tokens per article: {}. \
         Range: {} - {}. \
         Articles with token data: {}/{} ({:.2}%). \
         Token efficiency: {} per successful extraction. \
         Zero-token articles: {} (processing failures).",
        summary.article_count,
        grouped(summary.total),
        grouped(summary.phase_totals[0]),
        summary.phase_pct(0),
        grouped(summary.phase_totals[2]),
        summary.phase_pct(2),
        grouped(summary.phase_totals[1]),
        summary.phase_pct(1),
        grouped(summary.phase_totals[3]),
        summary.phase_pct(3),
        grouped(summary.average),
        grouped(summary.min),
        grouped(summary.max),
        summary.with_data,
        summary.article_count,
        summary.with_data_pct(),
        grouped(summary.per_successful()),
        summary.zero_count(),
    )
}

/// Formats an integer with thousands separators (`1234567` → `1,234,567`)
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
