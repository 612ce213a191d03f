//! Fixed field lists and display names for the figures and tables
//!
//! The article analyzes a fixed dataset; every generator hard-codes the
//! field set it reports on, so the lists live here rather than in any
//! configuration surface.

/// The 11 core bibliographic fields compared in the completion heatmap
pub const CORE_FIELDS: [&str; 11] = [
    "Title",
    "Authors",
    "Journal",
    "Year",
    "Volume",
    "Issue",
    "Pages",
    "DOI",
    "Publisher",
    "Keywords",
    "Abstract",
];

/// All 16 metadata fields covered by the API specialization matrix
pub const METADATA_FIELDS: [&str; 16] = [
    "title",
    "authors",
    "journal",
    "year",
    "doi",
    "abstract",
    "keywords",
    "publisher",
    "volume",
    "issue",
    "pages",
    "pmid",
    "pmcid",
    "citations",
    "openaccess",
    "pdfurl",
];

/// Scientific fields of the per-field concordance table, in report order
pub const SCIENTIFIC_FIELDS: [&str; 8] = [
    "Author",
    "Year",
    "Study Type",
    "Methodology",
    "Sample Size (n), Population Characteristics",
    "Outcome Measure",
    "Key Findings",
    "Limitations",
];

/// The combined judgment field that splits into three sub-fields
pub const COMBINED_FIELD: &str = "Author, Year, Study Type";

/// Display names of the four processing phases, in pipeline order
#[allow(dead_code)]
pub const PHASE_NAMES: [&str; 4] = ["Vision", "Consensus", "Topics", "Questions"];

/// Milliseconds per second, for time-chart display conversion
pub const MS_PER_SEC: f64 = 1000.0;
