//! API specialization matrix (figure 6)
//!
//! Walks the `field_sources` annotations of every consensus result to
//! measure which API contributed which metadata field, how often values
//! were cross-validated versus merged, and renders the top-APIs x fields
//! coverage heatmap.

use super::constants::METADATA_FIELDS;
use crate::common::field_sources::{parse_field_sources, ParsedSources, SourceKind};
use crate::common::plots::{render_heatmap, HeatmapSpec};
use crate::common::tables::percentage;
use crate::common::{ArticleRecord, PlotError};
use std::collections::BTreeMap;
use std::path::Path;

/// Number of top-contributing APIs shown in the heatmap
const TOP_API_ROWS: usize = 10;

/// Errors that can occur during specialization analysis
#[derive(Debug)]
pub enum SpecializationError {
    FileWrite(std::io::Error),
    PlotGeneration(PlotError),
}

impl std::fmt::Display for SpecializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecializationError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            SpecializationError::PlotGeneration(e) => {
                write!(f, "Failed to generate plot: {}", e)
            }
        }
    }
}

impl std::error::Error for SpecializationError {}

impl From<std::io::Error> for SpecializationError {
    fn from(err: std::io::Error) -> Self {
        SpecializationError::FileWrite(err)
    }
}

impl From<PlotError> for SpecializationError {
    fn from(err: PlotError) -> Self {
        SpecializationError::PlotGeneration(err)
    }
}

type Result<T> = core::result::Result<T, SpecializationError>;

/// Aggregated `field_sources` statistics across the dataset
#[derive(Debug, Default)]
pub struct SpecializationData {
    /// Articles whose consensus carried field_sources annotations
    pub articles_with_sources: usize,
    /// API name → field name → contribution count
    pub api_field_counts: BTreeMap<String, BTreeMap<String, usize>>,
    /// Collaboration kind → populated field instances
    pub patterns: BTreeMap<SourceKind, usize>,
    /// Field name → every parsed annotation seen for that field
    pub field_details: BTreeMap<String, Vec<ParsedSources>>,
}

impl SpecializationData {
    /// Populated field instances across every collaboration kind
    pub fn total_instances(&self) -> usize {
        self.patterns.values().sum()
    }

    /// Theoretical maximum: metadata fields x annotated articles
    pub fn total_possible(&self) -> usize {
        METADATA_FIELDS.len() * self.articles_with_sources
    }

    pub fn pattern_count(&self, kind: SourceKind) -> usize {
        self.patterns.get(&kind).copied().unwrap_or(0)
    }

    /// Instances confirmed by more than one independent source
    pub fn multi_source_count(&self) -> usize {
        self.patterns
            .iter()
            .filter(|(kind, _)| kind.is_multi_source())
            .map(|(_, count)| count)
            .sum()
    }

    /// APIs ranked by total contributions, ties broken by name
    pub fn ranked_apis(&self) -> Vec<(String, usize)> {
        let mut totals: Vec<(String, usize)> = self
            .api_field_counts
            .iter()
            .map(|(api, fields)| (api.clone(), fields.values().sum()))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        totals
    }

    /// How often `api` contributed to `field`, over that field's instances
    pub fn field_coverage(&self, field: &str, api: &str) -> f64 {
        let Some(details) = self.field_details.get(field) else {
            return 0.0;
        };
        let with_api = details
            .iter()
            .filter(|parsed| parsed.apis.iter().any(|a| a == api))
            .count();
        percentage(with_api, details.len())
    }

    /// Share of a field's instances that came from more than one API
    pub fn field_multi_source_pct(&self, field: &str) -> f64 {
        let Some(details) = self.field_details.get(field) else {
            return 0.0;
        };
        let multi = details.iter().filter(|parsed| parsed.apis.len() > 1).count();
        percentage(multi, details.len())
    }
}

/// Generate the API specialization heatmap and legend
///
/// Writes `figure6_chart.png` and `figure6_legend.txt`.
pub fn generate_api_specialization_analysis(
    articles: &[ArticleRecord],
    output_dir: &Path,
) -> Result<()> {
    let data = collect_specialization(articles);
    if data.articles_with_sources == 0 {
        return Ok(());
    }

    let top_apis: Vec<String> = data
        .ranked_apis()
        .into_iter()
        .take(TOP_API_ROWS)
        .map(|(api, _)| api)
        .collect();

    // Coverage percentage per (api, field) over the annotated articles
    let cells: Vec<Vec<f64>> = top_apis
        .iter()
        .map(|api| {
            METADATA_FIELDS
                .iter()
                .map(|field| {
                    let count = data
                        .api_field_counts
                        .get(api)
                        .and_then(|fields| fields.get(*field))
                        .copied()
                        .unwrap_or(0);
                    percentage(count, data.articles_with_sources)
                })
                .collect()
        })
        .collect();

    let row_labels: Vec<String> = top_apis.iter().map(|api| display_name(api)).collect();
    let col_labels: Vec<String> = METADATA_FIELDS.iter().map(|f| display_name(f)).collect();

    let spec = HeatmapSpec {
        title: "Complete API Specialization Matrix",
        x_desc: "Metadata Fields",
        y_desc: "Data Sources (APIs)",
        row_labels: &row_labels,
        col_labels: &col_labels,
        cells: &cells,
        annotations: None,
    };
    render_heatmap(&spec, &output_dir.join("figure6_chart.png"))?;

    std::fs::write(output_dir.join("figure6_legend.txt"), build_legend(&data))?;

    Ok(())
}

/// Walks every consensus result's field_sources annotations
fn collect_specialization(articles: &[ArticleRecord]) -> SpecializationData {
    let mut data = SpecializationData::default();

    for article in articles {
        let Some(consensus) = article.consensus.consensus_result.as_ref() else {
            continue;
        };
        let field_sources = &consensus.confidence_factors.field_sources;
        if field_sources.is_empty() {
            continue;
        }
        data.articles_with_sources += 1;

        for (field, sources) in field_sources {
            let field_lower = field.to_lowercase();
            if !METADATA_FIELDS.contains(&field_lower.as_str()) {
                continue;
            }

            let parsed = parse_field_sources(sources);
            *data.patterns.entry(parsed.kind).or_insert(0) += 1;
            for api in &parsed.apis {
                *data
                    .api_field_counts
                    .entry(api.clone())
                    .or_default()
                    .entry(field_lower.clone())
                    .or_insert(0) += 1;
            }
            data.field_details.entry(field_lower).or_default().push(parsed);
        }
    }

    data
}

/// Figure legend with contributor ranking and validation patterns
fn build_legend(data: &SpecializationData) -> String {
    let total = data.total_instances();
    let ranked = data.ranked_apis();

    let mut legend = format!(
        "Figure 6. Complete API Specialization Matrix\n\n\
         Comprehensive analysis of API contribution patterns across {} metadata fields \
         for {} articles. Of {} theoretically possible field combinations, {} were \
         successfully populated by the 11-API ecosystem. ",
        METADATA_FIELDS.len(),
        data.articles_with_sources,
        data.total_possible(),
        total,
    );

    if ranked.len() >= 3 {
        legend.push_str(&format!(
            "{} emerged as the primary contributor ({} instances, {:.1}% of total \
             contributions), followed by {} ({} instances) and {} ({} instances). ",
            display_name(&ranked[0].0),
            ranked[0].1,
            percentage(ranked[0].1, total),
            display_name(&ranked[1].0),
            ranked[1].1,
            display_name(&ranked[2].0),
            ranked[2].1,
        ));
    }

    legend.push_str(&format!(
        "Data validation patterns: {:.1}% of populated fields achieved multi-source \
         validation, {:.1}% relied on single-source extraction, and {:.1}% utilized \
         complementary data merging. ",
        percentage(data.multi_source_count(), total),
        percentage(data.pattern_count(SourceKind::Single), total),
        percentage(data.pattern_count(SourceKind::Merged), total),
    ));

    // Vision's sweep of the core narrative fields, when it happened
    let vision_sweep = ["title", "authors"].iter().all(|field| {
        data.field_coverage(field, "vision") == 100.0
            && data
                .field_details
                .get(*field)
                .is_some_and(|d| d.len() == data.articles_with_sources)
    });
    if vision_sweep {
        if data.field_coverage("abstract", "vision") == 100.0 {
            legend.push_str(
                "API specializations: Vision excelled in core bibliographic fields \
                 (100% success for title, authors, abstract), ",
            );
        } else {
            legend.push_str(
                "API specializations: Vision excelled in core bibliographic fields \
                 (100% success for title, authors), ",
            );
        }
    }

    legend.push_str(&format!(
        "while specialized APIs demonstrated domain expertise: Europe PMC for PubMed \
         identifiers ({:.1}% PMID coverage), CrossRef for DOI validation ({:.1}% \
         coverage), and Semantic Scholar for citation metrics ({:.1}% coverage). ",
        data.field_coverage("pmid", "europe_pmc"),
        data.field_coverage("doi", "crossref"),
        data.field_coverage("citations", "semantic_scholar"),
    ));

    legend.push_str(&format!(
        "Cross-validation robustness: Critical fields showed extensive collaboration, \
         with Authors ({:.1}% multi-source), DOI ({:.1}%), and Publisher ({:.1}%) \
         achieving the highest validation rates across the API ecosystem.",
        data.field_multi_source_pct("authors"),
        data.field_multi_source_pct("doi"),
        data.field_multi_source_pct("publisher"),
    ));

    legend
}

/// `europe_pmc` → `Europe Pmc`, `pdfurl` → `Pdfurl`
fn display_name(raw: &str) -> String {
    raw.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::{
        ConfidenceFactors, ConsensusResult, FinalRecord, PhaseRecord,
    };

    fn article(number: u32, sources: &[(&str, &str)]) -> ArticleRecord {
        let field_sources = sources
            .iter()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect();
        ArticleRecord {
            number,
            label: format!("Art{}", number),
            vision: PhaseRecord::default(),
            consensus: PhaseRecord {
                consensus_result: Some(ConsensusResult {
                    confidence_factors: ConfidenceFactors { field_sources },
                    ..ConsensusResult::default()
                }),
                ..PhaseRecord::default()
            },
            topics: PhaseRecord::default(),
            questions: PhaseRecord::default(),
            final_record: FinalRecord::default(),
        }
    }

    #[test]
    fn test_collect_specialization_counts() {
        let articles = vec![
            article(
                1,
                &[
                    ("Title", "vision"),
                    ("DOI", "crossref|openalex"),
                    ("PMID", "europe_pmc"),
                    ("Abstract", "vision+europe_pmc"),
                ],
            ),
            article(
                2,
                &[
                    ("Title", "vision"),
                    ("DOI", "crossref"),
                    ("Citations", "semantic_scholar"),
                ],
            ),
            // Unknown fields are ignored
            article(3, &[("Score", "vision")]),
        ];
        let data = collect_specialization(&articles);

        assert_eq!(data.articles_with_sources, 3);
        assert_eq!(data.total_instances(), 7);
        assert_eq!(data.total_possible(), 48);
        assert_eq!(data.pattern_count(SourceKind::Single), 5);
        assert_eq!(data.pattern_count(SourceKind::Validated), 1);
        assert_eq!(data.pattern_count(SourceKind::Merged), 1);
        assert_eq!(data.multi_source_count(), 1);

        assert_eq!(data.api_field_counts["vision"]["title"], 2);
        assert_eq!(data.api_field_counts["crossref"]["doi"], 2);
        assert_eq!(data.api_field_counts["europe_pmc"].len(), 2);

        // Populated instances never exceed the theoretical maximum
        assert!(data.total_instances() <= data.total_possible());
    }

    #[test]
    fn test_ranked_apis_order() {
        let articles = vec![article(
            1,
            &[
                ("Title", "vision"),
                ("Authors", "vision"),
                ("DOI", "crossref"),
            ],
        )];
        let data = collect_specialization(&articles);
        let ranked = data.ranked_apis();
        assert_eq!(ranked[0].0, "vision");
        assert_eq!(ranked[0].1, 2);
        assert_eq!(ranked[1].0, "crossref");
    }

    #[test]
    fn test_field_coverage_and_multi_source() {
        let articles = vec![
            article(1, &[("DOI", "crossref|vision")]),
            article(2, &[("DOI", "unpaywall")]),
        ];
        let data = collect_specialization(&articles);

        assert_eq!(data.field_coverage("doi", "crossref"), 50.0);
        assert_eq!(data.field_coverage("doi", "unpaywall"), 50.0);
        assert_eq!(data.field_coverage("doi", "openalex"), 0.0);
        assert_eq!(data.field_multi_source_pct("doi"), 50.0);
        assert_eq!(data.field_multi_source_pct("pmid"), 0.0);
    }

    #[test]
    fn test_legend_content() {
        let articles = vec![article(
            1,
            &[
                ("Title", "vision"),
                ("Authors", "vision"),
                ("Abstract", "vision"),
                ("DOI", "crossref"),
                ("PMID", "europe_pmc"),
            ],
        )];
        let data = collect_specialization(&articles);
        let legend = build_legend(&data);

        assert!(legend.starts_with("Figure 6. Complete API Specialization Matrix"));
        assert!(legend.contains("across 16 metadata fields for 1 articles"));
        assert!(legend.contains("Of 16 theoretically possible field combinations, 5 were"));
        assert!(legend.contains("Vision emerged as the primary contributor (3 instances"));
        assert!(legend.contains("100% success for title, authors, abstract"));
        assert!(legend.contains("100.0% PMID coverage"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("europe_pmc"), "Europe Pmc");
        assert_eq!(display_name("vision"), "Vision");
        assert_eq!(display_name("semantic_scholar"), "Semantic Scholar");
    }
}
