//! Processing time analysis functionality
//!
//! Reads per-stage `processing_time_ms` from the consolidated
//! `final_json.json` records (the same values the platform database
//! query reports) and produces the time chart and its legend. Values
//! are kept in milliseconds for aggregation and shown in seconds.

use super::constants::MS_PER_SEC;
use super::phase_metrics::{PhaseSeries, PhaseSummary};
use crate::common::plots::{render_bar_chart, BarChartSpec};
use crate::common::{ArticleRecord, PlotError};
use std::path::Path;

/// Errors that can occur during time analysis
#[derive(Debug)]
pub enum TimeError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for TimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            TimeError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for TimeError {}

impl From<std::io::Error> for TimeError {
    fn from(err: std::io::Error) -> Self {
        TimeError::FileWrite(err)
    }
}

impl From<PlotError> for TimeError {
    fn from(err: PlotError) -> Self {
        TimeError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, TimeError>;

/// Generate the processing time chart and legend
///
/// Writes `time_chart.png` and `time_legend.txt`.
pub fn generate_time_analysis(articles: &[ArticleRecord], output_dir: &Path) -> Result<()> {
    let series = collect_time_series(articles);
    if series.labels.is_empty() {
        return Ok(());
    }

    // Chart in seconds for readability
    let totals_seconds: Vec<f64> = series
        .totals()
        .iter()
        .map(|ms| ms / MS_PER_SEC)
        .collect();
    let summary = series.summarize();

    let bar_value_labels = (totals_seconds.len() < 15)
        .then(|| totals_seconds.iter().map(|v| format!("{:.1}s", v)).collect());
    let average_seconds = summary.average / MS_PER_SEC;

    let spec = BarChartSpec {
        title: "Processing Time Analysis by Article",
        x_desc: "Articles",
        y_desc: "Time (seconds)",
        values: &totals_seconds,
        labels: &series.labels,
        bar_value_labels,
        average_line: Some((average_seconds, format!("Average: {:.1}s", average_seconds))),
    };
    render_bar_chart(&spec, &output_dir.join("time_chart.png"))?;

    std::fs::write(output_dir.join("time_legend.txt"), build_time_legend(&summary))?;

    Ok(())
}

/// Extracts the four per-stage durations (milliseconds) for every article
fn collect_time_series(articles: &[ArticleRecord]) -> PhaseSeries {
    PhaseSeries::collect(articles, |article| {
        let stages = &article.final_record;
        [
            stages.vision_json.processing_time_ms as f64,
            stages.apis_clean_json.processing_time_ms as f64,
            stages.llm_topics_json.processing_time_ms as f64,
            stages.questions_json.processing_time_ms as f64,
        ]
    })
}

/// Technical figure legend with the comprehensive timing metrics
///
/// The summary carries milliseconds; everything here is shown in seconds.
fn build_time_legend(summary: &PhaseSummary) -> String {
    if summary.article_count == 0 {
        return "Figure 4. No processing time data available for this project.".to_string();
    }

    let secs = |ms: f64| ms / MS_PER_SEC;
    let total = secs(summary.total);
    let throughput = if total > 0.0 {
        summary.article_count as f64 / total * 60.0
    } else {
        0.0
    };

    format!(
        "Figure 4. Processing time performance analysis for {} articles. \
         Total processing time: {:.1} seconds ({:.1} minutes). \
         Vision: {:.1}s ({:.2}%), \
         Topics: {:.1}s ({:.2}%), \
         APIs+Consensus: {:.1}s ({:.2}%), \
         Questions: {:.1}s ({:.2}%). \
         Average time per article: {:.1} seconds. \
         Range: {:.1}s - {:.1}s. \
         Articles with time data: {}/{} ({:.2}%). \
         Time efficiency: {:.1}s per successful extraction. \
         Zero-time articles: {} (processing failures). \
         System achieved {:.1} articles per minute throughput.",
        summary.article_count,
        total,
        total / 60.0,
        secs(summary.phase_totals[0]),
        summary.phase_pct(0),
        secs(summary.phase_totals[2]),
        summary.phase_pct(2),
        secs(summary.phase_totals[1]),
        summary.phase_pct(1),
        secs(summary.phase_totals[3]),
        summary.phase_pct(3),
        secs(summary.average),
        secs(summary.min),
        secs(summary.max),
        summary.with_data,
        summary.article_count,
        summary.with_data_pct(),
        secs(summary.per_successful()),
        summary.zero_count(),
        throughput,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::{FinalRecord, PhaseRecord, StageSummary};

    fn article(number: u32, times_ms: [u64; 4]) -> ArticleRecord {
        let stage = |ms: u64| StageSummary {
            processing_time_ms: ms,
            ..StageSummary::default()
        };
        ArticleRecord {
            number,
            label: format!("Art{}", number),
            vision: PhaseRecord::default(),
            consensus: PhaseRecord::default(),
            topics: PhaseRecord::default(),
            questions: PhaseRecord::default(),
            final_record: FinalRecord {
                vision_json: stage(times_ms[0]),
                apis_clean_json: stage(times_ms[1]),
                llm_topics_json: stage(times_ms[2]),
                questions_json: stage(times_ms[3]),
            },
        }
    }

    #[test]
    fn test_time_series_reads_final_record() {
        let articles = vec![
            article(1, [10_000, 5_000, 3_000, 0]),
            article(2, [20_000, 8_000, 2_000, 1_000]),
        ];
        let series = collect_time_series(&articles);
        let totals = series.totals();
        assert_eq!(totals[0], 18_000.0);
        assert_eq!(totals[1], 31_000.0);
    }

    #[test]
    fn test_time_legend_content() {
        let articles = vec![
            article(1, [10_000, 5_000, 3_000, 0]),
            article(2, [20_000, 8_000, 2_000, 1_000]),
            article(3, [0, 0, 0, 0]),
        ];
        let summary = collect_time_series(&articles).summarize();
        let legend = build_time_legend(&summary);

        assert!(legend.starts_with("Figure 4."));
        assert!(legend.contains("Total processing time: 49.0 seconds (0.8 minutes)"));
        assert!(legend.contains("Vision: 30.0s"));
        assert!(legend.contains("APIs+Consensus: 13.0s"));
        assert!(legend.contains("Articles with time data: 2/3 (66.67%)"));
        assert!(legend.contains("Zero-time articles: 1 (processing failures)"));
        // 3 articles in 49 seconds is roughly 3.7 per minute
        assert!(legend.contains("3.7 articles per minute throughput"));
    }

    #[test]
    fn test_time_legend_empty() {
        let summary = collect_time_series(&[]).summarize();
        assert_eq!(
            build_time_legend(&summary),
            "Figure 4. No processing time data available for this project."
        );
    }
}
