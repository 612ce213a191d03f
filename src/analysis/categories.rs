//! The six-level concordance classification scale
//!
//! Every automated/manual field comparison was judged into one of six
//! categories: A (equivalent) through F (incomparable). Categories A, B
//! and C all preserve the core information, so they group into the
//! "General Concordance" band used throughout the evaluation tables.

/// Codes of the six categories, in scale order
pub const CATEGORY_CODES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Human-readable names shown in the concordance table
pub const CATEGORY_NAMES: [&str; 6] = [
    "Equivalent",
    "Concordant with Detail",
    "Concordant with gaps in non-critical",
    "Factually Divergent",
    "Conceptually Different",
    "Incomparable",
];

/// Whether a classification code counts toward General Concordance (A+B+C)
pub fn is_concordant(code: &str) -> bool {
    matches!(code, "A" | "B" | "C")
}

/// Counts of classification codes across one model's judgments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    counts: [usize; 6],
    /// Codes outside A-F (should never occur in the dataset)
    pub unrecognized: usize,
}

impl CategoryTally {
    /// Tallies an iterator of classification codes
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tally = Self::default();
        for code in codes {
            tally.add(code);
        }
        tally
    }

    pub fn add(&mut self, code: &str) {
        match CATEGORY_CODES.iter().position(|&c| c == code) {
            Some(index) => self.counts[index] += 1,
            None => self.unrecognized += 1,
        }
    }

    /// Count for one category code ("A".."F")
    pub fn count(&self, code: &str) -> usize {
        CATEGORY_CODES
            .iter()
            .position(|&c| c == code)
            .map(|index| self.counts[index])
            .unwrap_or(0)
    }

    /// Total judgments tallied (including unrecognized codes)
    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.unrecognized
    }

    /// Strong Concordance: A+B
    pub fn strong(&self) -> usize {
        self.count("A") + self.count("B")
    }

    /// General Concordance: A+B+C
    pub fn general(&self) -> usize {
        self.strong() + self.count("C")
    }

    /// Compact distribution string, e.g. "A:19 B:0 C:0 D:0 E:0 F:0"
    pub fn distribution(&self) -> String {
        CATEGORY_CODES
            .iter()
            .map(|&code| format!("{}:{}", code, self.count(code)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_and_groups() {
        let tally = CategoryTally::from_codes(["A", "A", "B", "C", "D", "F"]);
        assert_eq!(tally.count("A"), 2);
        assert_eq!(tally.count("B"), 1);
        assert_eq!(tally.count("E"), 0);
        assert_eq!(tally.total(), 6);
        assert_eq!(tally.strong(), 3);
        assert_eq!(tally.general(), 4);
    }

    #[test]
    fn test_unrecognized_codes_counted_separately() {
        let tally = CategoryTally::from_codes(["A", "X"]);
        assert_eq!(tally.count("A"), 1);
        assert_eq!(tally.unrecognized, 1);
        assert_eq!(tally.total(), 2);
        assert_eq!(tally.general(), 1);
    }

    #[test]
    fn test_distribution_string() {
        let tally = CategoryTally::from_codes(["A", "A", "C"]);
        assert_eq!(tally.distribution(), "A:2 B:0 C:1 D:0 E:0 F:0");
    }

    #[test]
    fn test_is_concordant() {
        assert!(is_concordant("A"));
        assert!(is_concordant("B"));
        assert!(is_concordant("C"));
        assert!(!is_concordant("D"));
        assert!(!is_concordant("E"));
        assert!(!is_concordant("F"));
    }
}
