//! Manual conflict resolution table (section 4.7)
//!
//! Groups the manually adjudicated disagreements by the model(s) that
//! flagged them and by category/field, reporting how often the automated
//! system, the manual gold standard, or both turned out to be correct.

use crate::common::data_structures::{ConflictEntry, ConflictResolution};
use crate::common::tables::{format_table, percentage};
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConflictRow {
    #[tabled(rename = "Classification Source")]
    source: String,
    #[tabled(rename = "Category / Field")]
    field: String,
    #[tabled(rename = "N")]
    n: String,
    #[tabled(rename = "Infinity")]
    infinity: String,
    #[tabled(rename = "Manual")]
    manual: String,
    #[tabled(rename = "Both")]
    both: String,
    #[tabled(rename = "Key Insights")]
    insight: String,
}

/// Adjudication outcome counts over a group of conflicts
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionCounts {
    pub total: usize,
    pub infinity: usize,
    pub manual: usize,
    pub both: usize,
}

impl ResolutionCounts {
    pub fn from_conflicts<'a>(conflicts: impl IntoIterator<Item = &'a ConflictResolution>) -> Self {
        let mut counts = Self::default();
        for conflict in conflicts {
            counts.total += 1;
            if conflict.infinity_correct {
                counts.infinity += 1;
            }
            if conflict.manual_correct {
                counts.manual += 1;
            }
            if conflict.both_correct {
                counts.both += 1;
            }
        }
        counts
    }

    pub fn merge(&mut self, other: &ResolutionCounts) {
        self.total += other.total;
        self.infinity += other.infinity;
        self.manual += other.manual;
        self.both += other.both;
    }
}

/// Per-source resolution counts, in the order sources appear in the file
pub fn counts_by_source(entries: &[ConflictEntry]) -> Vec<(String, ResolutionCounts)> {
    let mut sources: Vec<(String, ResolutionCounts)> = Vec::new();
    for entry in entries {
        let counts = ResolutionCounts::from_conflicts(&entry.conflicts);
        match sources
            .iter_mut()
            .find(|(source, _)| *source == entry.classification_source)
        {
            Some((_, existing)) => existing.merge(&counts),
            None => sources.push((entry.classification_source.clone(), counts)),
        }
    }
    sources
}

/// Generate the conflict resolution table
///
/// Writes `conflicts_table.txt`.
pub fn generate_conflicts_table(
    entries: &[ConflictEntry],
    output_dir: &Path,
) -> std::io::Result<()> {
    let mut rows: Vec<ConflictRow> = Vec::new();
    let mut grand = ResolutionCounts::default();

    // Sections follow the curated order of the conflicts file
    for (source, source_counts) in counts_by_source(entries) {
        let mut first_in_section = true;
        for entry in entries
            .iter()
            .filter(|e| e.classification_source == source)
        {
            let counts = ResolutionCounts::from_conflicts(&entry.conflicts);
            let insight = entry
                .conflicts
                .first()
                .map(|c| c.key_insight.clone())
                .unwrap_or_default();

            rows.push(ConflictRow {
                source: if first_in_section {
                    source.clone()
                } else {
                    String::new()
                },
                field: entry.group_key(),
                n: counts.total.to_string(),
                infinity: outcome_cell(counts.infinity, counts.total),
                manual: outcome_cell(counts.manual, counts.total),
                both: outcome_cell(counts.both, counts.total),
                insight,
            });
            first_in_section = false;
        }

        rows.push(ConflictRow {
            source: format!("{} Subtotal", subtotal_label(&source)),
            field: String::new(),
            n: source_counts.total.to_string(),
            infinity: outcome_cell(source_counts.infinity, source_counts.total),
            manual: outcome_cell(source_counts.manual, source_counts.total),
            both: outcome_cell(source_counts.both, source_counts.total),
            insight: String::new(),
        });
        grand.merge(&source_counts);
    }

    rows.push(ConflictRow {
        source: "TOTAL".to_string(),
        field: String::new(),
        n: grand.total.to_string(),
        infinity: outcome_cell(grand.infinity, grand.total),
        manual: outcome_cell(grand.manual, grand.total),
        both: outcome_cell(grand.both, grand.total),
        insight: "Infinity: temporal/technical. Manual: numerical/protocol awareness"
            .to_string(),
    });

    let table = format_table(&rows, Some("4.7 Manual Resolution of Conflicts"));
    std::fs::write(output_dir.join("conflicts_table.txt"), format!("{}\n", table))
}

/// "3 (43%)" outcome cells, rounded to whole percentages like the article
fn outcome_cell(count: usize, total: usize) -> String {
    format!("{} ({:.0}%)", count, percentage(count, total))
}

/// "Claude-only" → "Claude", "Both models agree" → "Both"
fn subtotal_label(source: &str) -> &str {
    source
        .split(|c: char| c == '-' || c.is_whitespace())
        .next()
        .unwrap_or(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries() -> Vec<ConflictEntry> {
        serde_json::from_value(json!([
            {
                "classification_source": "Claude-only",
                "category": "D",
                "field": "Factual",
                "conflicts": [
                    { "infinity_correct": true, "manual_correct": false,
                      "both_correct": false, "key_insight": "correct year 2024" },
                    { "infinity_correct": false, "manual_correct": true,
                      "both_correct": false, "key_insight": "subgroup sizes" }
                ]
            },
            {
                "classification_source": "Claude-only",
                "category": "E",
                "field": "Conceptual",
                "conflicts": [
                    { "infinity_correct": false, "manual_correct": false,
                      "both_correct": true, "key_insight": "both defensible" }
                ]
            },
            {
                "classification_source": "Both models agree",
                "category": "D",
                "field": "Factual",
                "conflicts": [
                    { "infinity_correct": true, "manual_correct": false,
                      "both_correct": false, "key_insight": "temporal precision" }
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolution_counts() {
        let entries = entries();
        let counts = ResolutionCounts::from_conflicts(&entries[0].conflicts);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.infinity, 1);
        assert_eq!(counts.manual, 1);
        assert_eq!(counts.both, 0);
    }

    #[test]
    fn test_counts_by_source_preserves_order() {
        let by_source = counts_by_source(&entries());
        assert_eq!(by_source.len(), 2);
        assert_eq!(by_source[0].0, "Claude-only");
        assert_eq!(by_source[0].1.total, 3);
        assert_eq!(by_source[0].1.both, 1);
        assert_eq!(by_source[1].0, "Both models agree");
        assert_eq!(by_source[1].1.total, 1);
    }

    #[test]
    fn test_subtotal_label() {
        assert_eq!(subtotal_label("Claude-only"), "Claude");
        assert_eq!(subtotal_label("DeepSeek-only"), "DeepSeek");
        assert_eq!(subtotal_label("Both models agree"), "Both");
    }

    #[test]
    fn test_generated_table() {
        let temp = tempfile::TempDir::new().unwrap();
        generate_conflicts_table(&entries(), temp.path()).unwrap();

        let report = std::fs::read_to_string(temp.path().join("conflicts_table.txt")).unwrap();
        assert!(report.starts_with("4.7 Manual Resolution of Conflicts"));
        assert!(report.contains("D (Factual)"));
        assert!(report.contains("Conceptual"));
        assert!(report.contains("correct year 2024"));
        assert!(report.contains("Claude Subtotal"));
        assert!(report.contains("Both Subtotal"));
        assert!(report.contains("TOTAL"));
        // Grand total covers all four adjudications
        assert!(report.contains("2 (50%)"));
    }
}
