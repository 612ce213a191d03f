//! Per-article, per-phase metric series
//!
//! The cost, time and token charts all aggregate the same way: one value
//! per processing phase per article, summed into a per-article total, with
//! the same battery of summary statistics feeding the figure legend. The
//! shared series/summary types live here; the metric modules only decide
//! where their numbers come from and how they are formatted.

use crate::common::data_structures::ArticleRecord;

/// Number of processing phases (vision, consensus, topics, questions)
pub const PHASE_COUNT: usize = 4;

/// One metric across every article, broken down by phase
#[derive(Debug, Clone)]
pub struct PhaseSeries {
    /// Chart labels, one per article (`Art<N>`)
    pub labels: Vec<String>,
    /// `phases[p][a]` = value of phase `p` for article `a`
    pub phases: [Vec<f64>; PHASE_COUNT],
}

impl PhaseSeries {
    /// Builds a series by extracting the four phase values per article
    pub fn collect(
        articles: &[ArticleRecord],
        extract: impl Fn(&ArticleRecord) -> [f64; PHASE_COUNT],
    ) -> Self {
        let mut labels = Vec::with_capacity(articles.len());
        let mut phases: [Vec<f64>; PHASE_COUNT] = Default::default();

        for article in articles {
            labels.push(article.label.clone());
            let values = extract(article);
            for (phase, &value) in phases.iter_mut().zip(values.iter()) {
                phase.push(value);
            }
        }

        PhaseSeries { labels, phases }
    }

    /// Per-article totals across all phases
    pub fn totals(&self) -> Vec<f64> {
        (0..self.labels.len())
            .map(|article| self.phases.iter().map(|phase| phase[article]).sum())
            .collect()
    }

    /// Summary statistics over the per-article totals
    pub fn summarize(&self) -> PhaseSummary {
        let totals = self.totals();
        let article_count = totals.len();
        let total: f64 = totals.iter().sum();
        let with_data = totals.iter().filter(|&&t| t > 0.0).count();

        let mut phase_totals = [0.0; PHASE_COUNT];
        for (slot, phase) in phase_totals.iter_mut().zip(self.phases.iter()) {
            *slot = phase.iter().sum();
        }

        PhaseSummary {
            article_count,
            total,
            average: if article_count > 0 {
                total / article_count as f64
            } else {
                0.0
            },
            min: totals.iter().cloned().fold(f64::INFINITY, f64::min).min(total),
            max: totals.iter().cloned().fold(0.0, f64::max),
            phase_totals,
            with_data,
        }
    }
}

/// Summary statistics shared by the cost/time/token legends
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSummary {
    pub article_count: usize,
    /// Sum of per-article totals
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Totals per phase, pipeline order
    pub phase_totals: [f64; PHASE_COUNT],
    /// Articles with a non-zero total
    pub with_data: usize,
}

impl PhaseSummary {
    /// Share of one phase in the overall total, as a percentage
    pub fn phase_pct(&self, phase: usize) -> f64 {
        if self.total > 0.0 {
            self.phase_totals[phase] / self.total * 100.0
        } else {
            0.0
        }
    }

    /// Articles whose total was zero (processing failures)
    pub fn zero_count(&self) -> usize {
        self.article_count - self.with_data
    }

    /// Share of articles with data, as a percentage
    pub fn with_data_pct(&self) -> f64 {
        if self.article_count > 0 {
            self.with_data as f64 / self.article_count as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Average total over successful extractions only
    pub fn per_successful(&self) -> f64 {
        if self.with_data > 0 {
            self.total / self.with_data as f64
        } else {
            0.0
        }
    }
}
