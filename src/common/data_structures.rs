//! Typed model of the fixed input dataset
//!
//! One article is described by five JSON files under `json/Article_<N>/`;
//! the manual evaluation lives in two more files under `analysis/`. These
//! types mirror those layouts closely so that [`serde_json`] does all the
//! heavy lifting during parsing.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Cost and token accounting block emitted by each pipeline phase
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CostTracking {
    /// Total cost of the phase in USD
    #[serde(default)]
    pub total_cost: f64,
    /// Total token consumption of the phase
    #[serde(default)]
    pub total_tokens: u64,
}

/// One phase output file (`vision_json.json`, `apis_clean_json.json`, ...)
///
/// Older exports put `total_cost` / `total_tokens` at the top level instead
/// of inside a `cost_tracking` block; both layouts appear in the dataset.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PhaseRecord {
    #[serde(default)]
    pub cost_tracking: Option<CostTracking>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
    /// Only present in `apis_clean_json.json`
    #[serde(default)]
    pub consensus_result: Option<ConsensusResult>,
}

impl PhaseRecord {
    /// Phase cost in USD, preferring the `cost_tracking` block
    pub fn cost(&self) -> f64 {
        self.cost_tracking
            .as_ref()
            .map(|c| c.total_cost)
            .or(self.total_cost)
            .unwrap_or(0.0)
    }

    /// Phase token consumption, preferring the `cost_tracking` block
    pub fn tokens(&self) -> u64 {
        self.cost_tracking
            .as_ref()
            .map(|c| c.total_tokens)
            .or(self.total_tokens)
            .unwrap_or(0)
    }
}

/// The cleaned, cross-API-merged extraction result for one article
///
/// Extracted field values sit directly on the object keyed by field name;
/// `confidence_factors` carries the per-field provenance annotations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConsensusResult {
    #[serde(default)]
    pub confidence_factors: ConfidenceFactors,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Confidence metadata attached to a consensus result
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    /// Field name → provenance string (see [`crate::common::field_sources`])
    #[serde(default)]
    pub field_sources: BTreeMap<String, String>,
}

/// The consolidated `final_json.json` record for one article
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FinalRecord {
    #[serde(default)]
    pub vision_json: StageSummary,
    #[serde(default)]
    pub apis_clean_json: StageSummary,
    #[serde(default)]
    pub llm_topics_json: StageSummary,
    #[serde(default)]
    pub questions_json: StageSummary,
}

/// Per-stage summary embedded in the final record
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StageSummary {
    /// Wall-clock duration of the stage; the platform export stores this
    /// as either a JSON number or a numeric string
    #[serde(default, deserialize_with = "millis_from_number_or_string")]
    pub processing_time_ms: u64,
    /// Field name → extracted value (populated for the vision stage)
    #[serde(default)]
    pub extracted_data: BTreeMap<String, serde_json::Value>,
}

/// Everything known about one of the 19 articles
#[derive(Debug)]
pub struct ArticleRecord {
    /// Article number taken from the folder name (`Article_7` → 7)
    pub number: u32,
    /// Short chart label (`Art7`)
    pub label: String,
    pub vision: PhaseRecord,
    pub consensus: PhaseRecord,
    pub topics: PhaseRecord,
    pub questions: PhaseRecord,
    pub final_record: FinalRecord,
}

/// Per-article entry of `analysis_claude.json` / `analysis_deepseek.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    #[serde(default)]
    pub article: Option<String>,
    /// Field name → human judgment for that field
    #[serde(default)]
    pub fields: BTreeMap<String, FieldJudgment>,
}

/// Judgment attached to one field of one article
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FieldJudgment {
    /// Either a single `classification` key, or per-part
    /// `<part>_classification` keys for the combined
    /// "Author, Year, Study Type" field; other keys hold free-form notes.
    #[serde(default)]
    pub analysis: BTreeMap<String, serde_json::Value>,
}

impl FieldJudgment {
    /// All classification codes in this judgment, paired with the sub-field
    /// part they belong to (`None` for a plain single classification).
    ///
    /// Multi-part keys come back in map order, so the result is stable.
    pub fn classifications(&self) -> Vec<(Option<&str>, &str)> {
        let multi: Vec<(Option<&str>, &str)> = self
            .analysis
            .iter()
            .filter_map(|(key, value)| {
                let part = key.strip_suffix("_classification")?;
                Some((Some(part), value.as_str()?))
            })
            .collect();
        if !multi.is_empty() {
            return multi;
        }
        self.analysis
            .get("classification")
            .and_then(|v| v.as_str())
            .map(|code| vec![(None, code)])
            .unwrap_or_default()
    }
}

/// One entry of `conflicts_structured.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConflictEntry {
    /// Which model(s) flagged the disagreement
    /// ("Claude-only", "DeepSeek-only", "Both models agree")
    pub classification_source: String,
    pub category: String,
    pub field: String,
    #[serde(default)]
    pub conflicts: Vec<ConflictResolution>,
}

impl ConflictEntry {
    /// Display key used to group conflicts in the resolution table
    pub fn group_key(&self) -> String {
        if self.field == "Factual" {
            format!("{} ({})", self.category, self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Manual adjudication outcome for a single conflict
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConflictResolution {
    #[serde(default)]
    pub infinity_correct: bool,
    #[serde(default)]
    pub manual_correct: bool,
    #[serde(default)]
    pub both_correct: bool,
    #[serde(default)]
    pub key_insight: String,
}

/// The complete manual evaluation dataset
#[derive(Debug)]
pub struct AnalysisDataset {
    pub claude: Vec<ArticleAnalysis>,
    pub deepseek: Vec<ArticleAnalysis>,
    pub conflicts: Vec<ConflictEntry>,
}

/// Accepts `1234`, `"1234"` or nothing at all for a millisecond field
fn millis_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
