//! Field-by-field concordance analysis table (section 4.6)
//!
//! Breaks the General Concordance rate down by scientific field. The
//! combined "Author, Year, Study Type" judgment splits into its three
//! sub-fields so each can be reported on its own row.

use super::categories::CategoryTally;
use super::constants::{COMBINED_FIELD, SCIENTIFIC_FIELDS};
use crate::common::data_structures::ArticleAnalysis;
use crate::common::tables::format_table;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Scientific Field")]
    field: String,
    #[tabled(rename = "Claude 3.5 Sonnet")]
    claude: String,
    #[tabled(rename = "DeepSeek V3")]
    deepseek: String,
    #[tabled(rename = "Distribution (Claude)")]
    claude_distribution: String,
    #[tabled(rename = "Distribution (DeepSeek)")]
    deepseek_distribution: String,
}

/// Interpretation of the published dataset's per-field results, kept with
/// the table it annotates
const FIELD_NOTES: &str = "\
The table reports the General concordance (A+B+C), indicating overall alignment where all
core information was retained, with extra details added in non-critical areas. Both models
Claude 3.5 Sonnet and DeepSeek V3 achieved 100% concordance in the Author and
Outcome Measure fields, demonstrating high reliability in validating these data types. A
notable point in the Author field is that, although all 19 cases were successfully validated,
DeepSeek had a single Category C occurrence, where the automated output returned
\"Borresen\" while the manual reference read \"Borreson.\" This highlights how subtle spelling
variations can appear even in high-performing fields and reinforces that, while Claude tends
to be more critical in overall validation, DeepSeek maintained consistent precision in
extracting and validating author names across diverse publication formats.

The most challenging fields for validation were Year, Key Findings, and Sample
Size/Population Characteristics, where discrepancies or gaps were more frequent. The Year
field achieved only 63.2% (12/19) for Claude and 68.4% (13/19) for DeepSeek, reflecting
source-level date conflicts. Key Findings (84.2% for Claude vs. 73.6% for DeepSeek) and
Limitations (63.2% vs. 94.7%) showed the greatest variation between models, illustrating
the difficulty of validating complex narrative information. Sample Size and Population
Characteristics reached 78.9% (15/19) for Claude versus 100% (19/19) for DeepSeek,
indicating the latter's stronger capability in validating structured quantitative data. These
results indicate that while both models maintain high concordance in objective fields, the
validation of temporal and narrative information remains more prone to subtle
inconsistencies, which subsequently guided the detailed discrepancy analysis in the
following evaluation stage.";

/// Generate the field-by-field concordance table
///
/// Writes `field_analysis_table.txt`.
pub fn generate_field_concordance_table(
    claude: &[ArticleAnalysis],
    deepseek: &[ArticleAnalysis],
    output_dir: &Path,
) -> std::io::Result<()> {
    let claude_fields = tally_by_field(claude);
    let deepseek_fields = tally_by_field(deepseek);

    let rows: Vec<FieldRow> = SCIENTIFIC_FIELDS
        .iter()
        .map(|&field| {
            let claude_tally = claude_fields.get(field).cloned().unwrap_or_default();
            let deepseek_tally = deepseek_fields.get(field).cloned().unwrap_or_default();
            FieldRow {
                field: field.to_string(),
                claude: rate_cell(&claude_tally),
                deepseek: rate_cell(&deepseek_tally),
                claude_distribution: claude_tally.distribution(),
                deepseek_distribution: deepseek_tally.distribution(),
            }
        })
        .collect();

    let table = format_table(
        &rows,
        Some("4.6 Field-by-Field Analysis of General Concordance"),
    );
    std::fs::write(
        output_dir.join("field_analysis_table.txt"),
        format!("{}\n\n{}\n", table, FIELD_NOTES),
    )
}

/// Tallies classifications per scientific field
///
/// The combined field's `author` / `year` / `study_type` parts land on the
/// "Author", "Year" and "Study Type" rows; everything else tallies under
/// its own field name.
pub fn tally_by_field(analyses: &[ArticleAnalysis]) -> BTreeMap<String, CategoryTally> {
    let mut tallies: BTreeMap<String, CategoryTally> = BTreeMap::new();

    for article in analyses {
        for (field_name, judgment) in &article.fields {
            for (part, code) in judgment.classifications() {
                let target = match part {
                    Some(part) if field_name == COMBINED_FIELD => display_part(part),
                    _ => field_name.clone(),
                };
                tallies.entry(target).or_default().add(code);
            }
        }
    }

    tallies
}

/// "63.2% (12/19)" rate cells
fn rate_cell(tally: &CategoryTally) -> String {
    let total = tally.total();
    let general = tally.general();
    format!(
        "{:.1}% ({}/{})",
        crate::common::tables::percentage(general, total),
        general,
        total
    )
}

fn display_part(part: &str) -> String {
    match part {
        "author" => "Author".to_string(),
        "year" => "Year".to_string(),
        "study_type" => "Study Type".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<ArticleAnalysis> {
        serde_json::from_value(json!([
            {
                "fields": {
                    "Author, Year, Study Type": {
                        "analysis": {
                            "author_classification": "A",
                            "year_classification": "D",
                            "study_type_classification": "B"
                        }
                    },
                    "Methodology": { "analysis": { "classification": "A" } }
                }
            },
            {
                "fields": {
                    "Author, Year, Study Type": {
                        "analysis": {
                            "author_classification": "A",
                            "year_classification": "A",
                            "study_type_classification": "A"
                        }
                    },
                    "Key Findings": { "analysis": { "classification": "E" } }
                }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_tally_by_field_splits_combined_field() {
        let tallies = tally_by_field(&sample());

        assert_eq!(tallies["Author"].count("A"), 2);
        assert_eq!(tallies["Year"].count("D"), 1);
        assert_eq!(tallies["Year"].count("A"), 1);
        assert_eq!(tallies["Study Type"].total(), 2);
        assert_eq!(tallies["Methodology"].count("A"), 1);
        assert_eq!(tallies["Key Findings"].count("E"), 1);
        assert!(!tallies.contains_key(COMBINED_FIELD));
    }

    #[test]
    fn test_rate_cell_format() {
        let tallies = tally_by_field(&sample());
        assert_eq!(rate_cell(&tallies["Author"]), "100.0% (2/2)");
        assert_eq!(rate_cell(&tallies["Year"]), "50.0% (1/2)");
        assert_eq!(rate_cell(&tallies["Key Findings"]), "0.0% (0/1)");
        // Fields absent from the dataset render an empty rate
        assert_eq!(rate_cell(&CategoryTally::default()), "0.0% (0/0)");
    }

    #[test]
    fn test_generated_table_rows() {
        let temp = tempfile::TempDir::new().unwrap();
        generate_field_concordance_table(&sample(), &sample(), temp.path()).unwrap();

        let report =
            std::fs::read_to_string(temp.path().join("field_analysis_table.txt")).unwrap();
        assert!(report.starts_with("4.6 Field-by-Field Analysis of General Concordance"));
        assert!(report.contains("Author"));
        assert!(report.contains("A:2 B:0 C:0 D:0 E:0 F:0"));
        assert!(report.contains("50.0% (1/2)"));
        // Every scientific field gets a row even with no data
        assert!(report.contains("Outcome Measure"));
    }
}
