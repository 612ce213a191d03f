//! Concordance performance table (section 4.5)
//!
//! Pools every A-F classification from the two model analysis files and
//! writes the per-category comparison table with the Strong (A+B) and
//! General (A+B+C) concordance bands.

use super::categories::{CategoryTally, CATEGORY_CODES, CATEGORY_NAMES};
use crate::common::data_structures::ArticleAnalysis;
use crate::common::tables::{count_with_pct, format_table};
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConcordanceRow {
    #[tabled(rename = "Concordance Category")]
    category: String,
    #[tabled(rename = "Claude 3.5 Sonnet")]
    claude: String,
    #[tabled(rename = "DeepSeek V3")]
    deepseek: String,
}

/// Generate the concordance performance table
///
/// Writes `concordance_table.txt`.
pub fn generate_concordance_table(
    claude: &[ArticleAnalysis],
    deepseek: &[ArticleAnalysis],
    output_dir: &Path,
) -> std::io::Result<()> {
    let claude_tally = tally_classifications(claude);
    let deepseek_tally = tally_classifications(deepseek);

    let report = build_report(&claude_tally, &deepseek_tally);
    std::fs::write(output_dir.join("concordance_table.txt"), report)
}

/// Pools every classification code in one model's analysis file
pub fn tally_classifications(analyses: &[ArticleAnalysis]) -> CategoryTally {
    let mut tally = CategoryTally::default();
    for article in analyses {
        for judgment in article.fields.values() {
            for (_, code) in judgment.classifications() {
                tally.add(code);
            }
        }
    }
    tally
}

fn build_report(claude: &CategoryTally, deepseek: &CategoryTally) -> String {
    let claude_total = claude.total();
    let deepseek_total = deepseek.total();

    let mut rows: Vec<ConcordanceRow> = CATEGORY_CODES
        .iter()
        .zip(CATEGORY_NAMES.iter())
        .map(|(&code, &name)| ConcordanceRow {
            category: format!("Category {} ({})", code, name),
            claude: count_with_pct(claude.count(code), claude_total),
            deepseek: count_with_pct(deepseek.count(code), deepseek_total),
        })
        .collect();

    rows.push(ConcordanceRow {
        category: "Strong Concordance (A+B)".to_string(),
        claude: count_with_pct(claude.strong(), claude_total),
        deepseek: count_with_pct(deepseek.strong(), deepseek_total),
    });
    rows.push(ConcordanceRow {
        category: "General Concordance (A+B+C)".to_string(),
        claude: count_with_pct(claude.general(), claude_total),
        deepseek: count_with_pct(deepseek.general(), deepseek_total),
    });

    let table = format_table(&rows, Some("4.5 Concordance Performance"));

    let narrative = format!(
        "Automated extraction accuracy was evaluated through a structured comparison \
         between machine-generated outputs and manually curated gold-standard data \
         ({} field comparisons per model across 8 scientific fields). Each extraction \
         was assessed using a six-level concordance classification, revealing nuanced \
         patterns of agreement and conflict. Strong Concordance (Categories A + B) was \
         observed in {} cases ({:.1}%) for Claude and {} cases ({:.1}%) for DeepSeek, \
         where automated outputs either matched the reference or preserved all core \
         content while adding beneficial details. General Concordance (A + B + C), \
         which also includes cases where the core manual information is present with \
         gaps in non-critical details, reached {} cases ({:.1}%) for Claude and {} \
         cases ({:.1}%) for DeepSeek.",
        claude_total,
        claude.strong(),
        pct(claude.strong(), claude_total),
        deepseek.strong(),
        pct(deepseek.strong(), deepseek_total),
        claude.general(),
        pct(claude.general(), claude_total),
        deepseek.general(),
        pct(deepseek.general(), deepseek_total),
    );

    format!("{}\n\n{}\n", table, narrative)
}

fn pct(count: usize, total: usize) -> f64 {
    crate::common::tables::percentage(count, total)
}
