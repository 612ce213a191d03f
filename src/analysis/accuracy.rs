//! Real accuracy performance table (section 4.8)
//!
//! Combines the automatic concordance counts (every field judged A-C by
//! both models) with the manual conflict adjudications to compute the
//! overall accuracy of the automated extraction system.

use super::categories::is_concordant;
use super::conflicts::{counts_by_source, ResolutionCounts};
use crate::common::data_structures::ArticleAnalysis;
use crate::common::AnalysisDataset;
use crate::common::tables::{format_table, ratio_with_pct};
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

/// Source keys used in `conflicts_structured.json`
const CLAUDE_ONLY: &str = "Claude-only";
const DEEPSEEK_ONLY: &str = "DeepSeek-only";
const BOTH_MODELS: &str = "Both models agree";

#[derive(Tabled)]
struct AccuracyRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Cases")]
    cases: String,
    #[tabled(rename = "Infinity Correct")]
    infinity: String,
    #[tabled(rename = "Manual Correct")]
    manual: String,
    #[tabled(rename = "Both Correct")]
    both: String,
    #[tabled(rename = "Infinity Accuracy")]
    accuracy: String,
}

/// Pairwise comparison outcome over the two analysis files
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ComparisonCounts {
    /// Classification pairs present in both models' judgments
    pub total: usize,
    /// Pairs where both models judged the field A, B or C
    pub concordant: usize,
}

/// Generate the real accuracy performance table
///
/// Writes `accuracy_table.txt`.
pub fn generate_accuracy_table(
    dataset: &AnalysisDataset,
    output_dir: &Path,
) -> std::io::Result<()> {
    let comparisons = count_comparisons(&dataset.claude, &dataset.deepseek);
    let by_source: BTreeMap<String, ResolutionCounts> =
        counts_by_source(&dataset.conflicts).into_iter().collect();

    let claude_only = by_source.get(CLAUDE_ONLY).cloned().unwrap_or_default();
    let deepseek_only = by_source.get(DEEPSEEK_ONLY).cloned().unwrap_or_default();
    let both_models = by_source.get(BOTH_MODELS).cloned().unwrap_or_default();

    let mut conflict_totals = claude_only.clone();
    conflict_totals.merge(&deepseek_only);
    conflict_totals.merge(&both_models);

    // Concordant fields count as correct for every party
    let overall_infinity = comparisons.concordant + conflict_totals.infinity;
    let overall_manual = comparisons.concordant + conflict_totals.manual;
    let overall_both = comparisons.concordant + conflict_totals.both;

    let mut rows = vec![AccuracyRow {
        category: "Automatic Concordance".to_string(),
        cases: comparisons.concordant.to_string(),
        infinity: comparisons.concordant.to_string(),
        manual: comparisons.concordant.to_string(),
        both: comparisons.concordant.to_string(),
        accuracy: ratio_with_pct(comparisons.concordant, comparisons.concordant),
    }];

    for (label, counts) in [
        ("Conflicts - Claude Only", &claude_only),
        ("Conflicts - DeepSeek Only", &deepseek_only),
        ("Conflicts - Both Models", &both_models),
        ("Total Conflicts", &conflict_totals),
    ] {
        if counts.total == 0 {
            continue;
        }
        rows.push(conflict_row(label, counts));
    }

    rows.push(AccuracyRow {
        category: "OVERALL PERFORMANCE".to_string(),
        cases: comparisons.total.to_string(),
        infinity: overall_infinity.to_string(),
        manual: overall_manual.to_string(),
        both: overall_both.to_string(),
        accuracy: ratio_with_pct(overall_infinity, comparisons.total),
    });

    let table = format_table(
        &rows,
        Some("4.8 Infinity Research Real Accuracy Performance"),
    );
    std::fs::write(output_dir.join("accuracy_table.txt"), format!("{}\n", table))
}

fn conflict_row(label: &str, counts: &ResolutionCounts) -> AccuracyRow {
    AccuracyRow {
        category: label.to_string(),
        cases: counts.total.to_string(),
        infinity: ratio_with_pct(counts.infinity, counts.total),
        manual: ratio_with_pct(counts.manual, counts.total),
        both: ratio_with_pct(counts.both, counts.total),
        accuracy: ratio_with_pct(counts.infinity, counts.total),
    }
}

/// Counts classification pairs shared by the two analysis files
///
/// Articles pair up by position; fields pair up by name; multi-part
/// judgments pair up by sub-field. A pair is concordant when both codes
/// fall in the A-C band.
pub fn count_comparisons(
    claude: &[ArticleAnalysis],
    deepseek: &[ArticleAnalysis],
) -> ComparisonCounts {
    let mut counts = ComparisonCounts::default();

    for (claude_article, deepseek_article) in claude.iter().zip(deepseek.iter()) {
        for (field_name, claude_judgment) in &claude_article.fields {
            let Some(deepseek_judgment) = deepseek_article.fields.get(field_name) else {
                continue;
            };

            let deepseek_codes: BTreeMap<Option<&str>, &str> =
                deepseek_judgment.classifications().into_iter().collect();

            for (part, claude_code) in claude_judgment.classifications() {
                let Some(deepseek_code) = deepseek_codes.get(&part) else {
                    continue;
                };
                counts.total += 1;
                if is_concordant(claude_code) && is_concordant(deepseek_code) {
                    counts.concordant += 1;
                }
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::ConflictEntry;
    use serde_json::json;

    fn analyses(values: serde_json::Value) -> Vec<ArticleAnalysis> {
        serde_json::from_value(values).unwrap()
    }

    fn claude() -> Vec<ArticleAnalysis> {
        analyses(json!([
            {
                "fields": {
                    "Author, Year, Study Type": {
                        "analysis": {
                            "author_classification": "A",
                            "year_classification": "D",
                            "study_type_classification": "A"
                        }
                    },
                    "Methodology": { "analysis": { "classification": "B" } },
                    "Claude Extra": { "analysis": { "classification": "A" } }
                }
            }
        ]))
    }

    fn deepseek() -> Vec<ArticleAnalysis> {
        analyses(json!([
            {
                "fields": {
                    "Author, Year, Study Type": {
                        "analysis": {
                            "author_classification": "A",
                            "year_classification": "A",
                            "study_type_classification": "E"
                        }
                    },
                    "Methodology": { "analysis": { "classification": "C" } }
                }
            }
        ]))
    }

    #[test]
    fn test_count_comparisons() {
        let counts = count_comparisons(&claude(), &deepseek());
        // Three sub-fields plus Methodology; "Claude Extra" has no pair
        assert_eq!(counts.total, 4);
        // author (A/A) and Methodology (B/C) are concordant;
        // year fails on Claude's D, study_type on DeepSeek's E
        assert_eq!(counts.concordant, 2);
    }

    #[test]
    fn test_count_comparisons_unequal_article_lists() {
        let longer = analyses(json!([
            { "fields": { "Methodology": { "analysis": { "classification": "A" } } } },
            { "fields": { "Methodology": { "analysis": { "classification": "A" } } } }
        ]));
        let shorter = analyses(json!([
            { "fields": { "Methodology": { "analysis": { "classification": "B" } } } }
        ]));
        let counts = count_comparisons(&longer, &shorter);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.concordant, 1);
    }

    #[test]
    fn test_generated_table() {
        let conflicts: Vec<ConflictEntry> = serde_json::from_value(json!([
            {
                "classification_source": "Claude-only",
                "category": "D",
                "field": "Factual",
                "conflicts": [
                    { "infinity_correct": true, "manual_correct": false,
                      "both_correct": false, "key_insight": "" },
                    { "infinity_correct": false, "manual_correct": true,
                      "both_correct": false, "key_insight": "" }
                ]
            },
            {
                "classification_source": "Both models agree",
                "category": "D",
                "field": "Factual",
                "conflicts": [
                    { "infinity_correct": true, "manual_correct": false,
                      "both_correct": false, "key_insight": "" }
                ]
            }
        ]))
        .unwrap();
        let dataset = AnalysisDataset {
            claude: claude(),
            deepseek: deepseek(),
            conflicts,
        };

        let temp = tempfile::TempDir::new().unwrap();
        generate_accuracy_table(&dataset, temp.path()).unwrap();
        let report = std::fs::read_to_string(temp.path().join("accuracy_table.txt")).unwrap();

        assert!(report.starts_with("4.8 Infinity Research Real Accuracy Performance"));
        assert!(report.contains("Automatic Concordance"));
        assert!(report.contains("Conflicts - Claude Only"));
        // No DeepSeek-only conflicts in the fixture, so no row for them
        assert!(!report.contains("Conflicts - DeepSeek Only"));
        assert!(report.contains("Total Conflicts"));
        assert!(report.contains("OVERALL PERFORMANCE"));
        // 2 concordant + 2 infinity-correct conflicts over 4 comparisons
        assert!(report.contains("4/4 (100.0%)"));
    }
}
