//! Vision baseline vs consensus field completion (figure 5)
//!
//! Compares how many of the 11 core bibliographic fields the vision
//! baseline filled against the API-enhanced consensus result, per field,
//! and renders the 2x11 completion heatmap with improvement markers.

use super::constants::CORE_FIELDS;
use crate::common::plots::{render_heatmap, HeatmapSpec};
use crate::common::tables::percentage;
use crate::common::{ArticleRecord, PlotError};
use std::path::Path;

/// Errors that can occur during field completion analysis
#[derive(Debug)]
pub enum CompletionError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            CompletionError::PlotGeneration(e) => write!(f, "Failed to generate plot: {}", e),
        }
    }
}

impl std::error::Error for CompletionError {}

impl From<std::io::Error> for CompletionError {
    fn from(err: std::io::Error) -> Self {
        CompletionError::FileWrite(err)
    }
}

impl From<PlotError> for CompletionError {
    fn from(err: PlotError) -> Self {
        CompletionError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, CompletionError>;

/// Per-field fill counts for both processing stages
#[derive(Debug, Default)]
pub struct CompletionData {
    /// Articles that carried a consensus result and were counted
    pub article_count: usize,
    /// Filled-field count per entry of [`CORE_FIELDS`], vision baseline
    pub vision_counts: Vec<usize>,
    /// Filled-field count per entry of [`CORE_FIELDS`], consensus
    pub consensus_counts: Vec<usize>,
}

impl CompletionData {
    pub fn vision_pct(&self, field: usize) -> f64 {
        percentage(self.vision_counts[field], self.article_count)
    }

    pub fn consensus_pct(&self, field: usize) -> f64 {
        percentage(self.consensus_counts[field], self.article_count)
    }

    pub fn vision_total(&self) -> usize {
        self.vision_counts.iter().sum()
    }

    pub fn consensus_total(&self) -> usize {
        self.consensus_counts.iter().sum()
    }

    /// Theoretical maximum: articles x core fields
    pub fn total_possible(&self) -> usize {
        self.article_count * CORE_FIELDS.len()
    }

    pub fn vision_completion(&self) -> f64 {
        percentage(self.vision_total(), self.total_possible())
    }

    pub fn consensus_completion(&self) -> f64 {
        percentage(self.consensus_total(), self.total_possible())
    }

    pub fn improvement(&self) -> f64 {
        self.consensus_completion() - self.vision_completion()
    }
}

/// Generate the field completion heatmap and legend
///
/// Writes `figure5_chart.png` and `figure5_legend.txt`.
pub fn generate_field_completion_analysis(
    articles: &[ArticleRecord],
    output_dir: &Path,
) -> Result<()> {
    let data = collect_completion(articles);
    if data.article_count == 0 {
        return Ok(());
    }

    let field_count = CORE_FIELDS.len();
    let vision_row: Vec<f64> = (0..field_count).map(|f| data.vision_pct(f)).collect();
    let consensus_row: Vec<f64> = (0..field_count).map(|f| data.consensus_pct(f)).collect();

    // Improvement markers under the consensus percentages
    let improvement_row: Vec<String> = (0..field_count)
        .map(|f| {
            let delta = data.consensus_pct(f) - data.vision_pct(f);
            if delta > 0.0 {
                format!("(+{:.1}%)", delta)
            } else {
                String::new()
            }
        })
        .collect();

    let row_labels = vec!["Vision".to_string(), "Consensus".to_string()];
    let col_labels: Vec<String> = CORE_FIELDS.iter().map(|f| f.to_string()).collect();
    let cells = vec![vision_row, consensus_row];
    let annotations = vec![vec![String::new(); field_count], improvement_row];

    let spec = HeatmapSpec {
        title: "Vision Baseline vs API-Enhanced Consensus Performance",
        x_desc: "Core Metadata Fields",
        y_desc: "Processing Stage",
        row_labels: &row_labels,
        col_labels: &col_labels,
        cells: &cells,
        annotations: Some(&annotations),
    };
    render_heatmap(&spec, &output_dir.join("figure5_chart.png"))?;

    std::fs::write(output_dir.join("figure5_legend.txt"), build_legend(&data))?;

    Ok(())
}

/// Whether an extracted value counts as filled
///
/// Mirrors the platform's truthiness rules: null, empty/whitespace strings,
/// empty arrays, `false` and the number zero are all unfilled.
fn is_field_filled(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
    }
}

/// Counts filled core fields per stage across all articles
///
/// Articles without a consensus result are skipped entirely, matching how
/// the published completion rates were computed.
fn collect_completion(articles: &[ArticleRecord]) -> CompletionData {
    let mut data = CompletionData {
        article_count: 0,
        vision_counts: vec![0; CORE_FIELDS.len()],
        consensus_counts: vec![0; CORE_FIELDS.len()],
    };

    for article in articles {
        let Some(consensus) = article.consensus.consensus_result.as_ref() else {
            continue;
        };
        data.article_count += 1;

        let vision_fields = &article.final_record.vision_json.extracted_data;
        for (index, field) in CORE_FIELDS.iter().enumerate() {
            if vision_fields.get(*field).is_some_and(is_field_filled) {
                data.vision_counts[index] += 1;
            }
            if consensus.fields.get(*field).is_some_and(is_field_filled) {
                data.consensus_counts[index] += 1;
            }
        }
    }

    data
}

/// Figure legend with completion rates and the top improved fields
fn build_legend(data: &CompletionData) -> String {
    let improvement_count = data.consensus_total() as i64 - data.vision_total() as i64;

    // Fields where the consensus beat the vision baseline, best first
    let mut improvements: Vec<(usize, f64)> = (0..CORE_FIELDS.len())
        .filter_map(|field| {
            let delta = data.consensus_pct(field) - data.vision_pct(field);
            (delta > 0.0).then_some((field, delta))
        })
        .collect();
    improvements.sort_by(|a, b| b.1.total_cmp(&a.1));

    let top_improvements = improvements
        .iter()
        .take(3)
        .map(|(field, delta)| format!("{} (+{:.1}%)", CORE_FIELDS[*field], delta))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Figure 5. Vision Baseline vs API-Enhanced Consensus Performance - \
         Core Bibliographic Fields ({} articles). \
         Vision baseline: {:.1}% ({}/{} fields). \
         Final consensus: {:.1}% ({}/{} fields). \
         Overall improvement: {:+.1}% ({:+} fields). \
         Enhanced fields: {}/{} core fields. \
         API enrichment successfully filled {} additional bibliographic fields across \
         {} articles, demonstrating the complementary value of automated metadata \
         enhancement over Vision-only baseline extraction. \
         Fields with highest improvement: {}.",
        data.article_count,
        data.vision_completion(),
        data.vision_total(),
        data.total_possible(),
        data.consensus_completion(),
        data.consensus_total(),
        data.total_possible(),
        data.improvement(),
        improvement_count,
        improvements.len(),
        CORE_FIELDS.len(),
        improvement_count,
        data.article_count,
        top_improvements,
    )
}
