//! Parsing of `field_sources` provenance annotations
//!
//! Every extracted field in a consensus result carries a provenance string:
//! `|` separates sources that independently returned the same value
//! (cross-validation), `+` separates sources whose partial values were
//! merged into one (complementary data). A bare name means a single source.

/// Collaboration kind encoded by one `field_sources` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    /// No provenance recorded
    Empty,
    /// Exactly one contributing source
    Single,
    /// Complementary values merged from several sources (`+`)
    Merged,
    /// Same value independently returned by several sources (`|`)
    Validated,
    /// Both separators in one annotation, e.g. `crossref|unpaywall+vision`
    Mixed,
}

impl SourceKind {
    /// Whether the value was confirmed by more than one independent source
    pub fn is_multi_source(self) -> bool {
        matches!(self, SourceKind::Validated | SourceKind::Mixed)
    }
}

/// A decoded provenance annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSources {
    pub kind: SourceKind,
    /// Contributing API names, trimmed and lowercased
    pub apis: Vec<String>,
}

/// Decodes a single `field_sources` value
///
/// Mixed annotations split on `+` first, then each part on `|`, matching
/// how the extraction pipeline composes them.
pub fn parse_field_sources(value: &str) -> ParsedSources {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "None" {
        return ParsedSources {
            kind: SourceKind::Empty,
            apis: Vec::new(),
        };
    }

    let has_plus = trimmed.contains('+');
    let has_pipe = trimmed.contains('|');

    let (kind, parts): (SourceKind, Vec<&str>) = match (has_plus, has_pipe) {
        (true, true) => (
            SourceKind::Mixed,
            trimmed.split('+').flat_map(|p| p.split('|')).collect(),
        ),
        (true, false) => (SourceKind::Merged, trimmed.split('+').collect()),
        (false, true) => (SourceKind::Validated, trimmed.split('|').collect()),
        (false, false) => (SourceKind::Single, vec![trimmed]),
    };

    let apis = parts
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    ParsedSources { kind, apis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("vision", SourceKind::Single, &["vision"])]
    #[case("crossref", SourceKind::Single, &["crossref"])]
    #[case("vision+europe_pmc", SourceKind::Merged, &["vision", "europe_pmc"])]
    #[case("semantic_scholar|openalex", SourceKind::Validated, &["semantic_scholar", "openalex"])]
    #[case("crossref|unpaywall+vision", SourceKind::Mixed, &["crossref", "unpaywall", "vision"])]
    #[case("", SourceKind::Empty, &[])]
    #[case("None", SourceKind::Empty, &[])]
    fn test_parse_field_sources(
        #[case] input: &str,
        #[case] expected_kind: SourceKind,
        #[case] expected_apis: &[&str],
    ) {
        let parsed = parse_field_sources(input);
        assert_eq!(parsed.kind, expected_kind);
        assert_eq!(parsed.apis, expected_apis);
    }

    #[test]
    fn test_api_names_are_normalized() {
        let parsed = parse_field_sources(" CrossRef | OpenAlex ");
        assert_eq!(parsed.kind, SourceKind::Validated);
        assert_eq!(parsed.apis, vec!["crossref", "openalex"]);
    }

    #[test]
    fn test_dangling_separator_drops_empty_part() {
        let parsed = parse_field_sources("vision+");
        assert_eq!(parsed.kind, SourceKind::Merged);
        assert_eq!(parsed.apis, vec!["vision"]);
    }

    #[test]
    fn test_multi_source_grouping() {
        assert!(SourceKind::Validated.is_multi_source());
        assert!(SourceKind::Mixed.is_multi_source());
        assert!(!SourceKind::Single.is_multi_source());
        assert!(!SourceKind::Merged.is_multi_source());
        assert!(!SourceKind::Empty.is_multi_source());
    }
}
