use std::cmp::Ordering;
use std::collections::BTreeMap;

use tabled::Tabled;

use crate::lookup::AnnotationLookups;
use crate::table::{NormalizedTable, COVERAGE_SCALE};

/// Grouping key of collapsed coverage tables
///
/// Genes without a key are summed under `Missing`, which sorts after
/// every identifier. Numeric identifiers (taxids) sort by value and
/// before all other identifiers, which sort as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoverageKey {
    Key(String),
    Missing,
}
impl Ord for CoverageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CoverageKey::Key(a), CoverageKey::Key(b)) => {
                match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => a.cmp(b),
                }
            }
            (CoverageKey::Key(_), CoverageKey::Missing) => Ordering::Less,
            (CoverageKey::Missing, CoverageKey::Key(_)) => Ordering::Greater,
            (CoverageKey::Missing, CoverageKey::Missing) => Ordering::Equal,
        }
    }
}
impl PartialOrd for CoverageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl From<Option<&String>> for CoverageKey {
    fn from(key: Option<&String>) -> Self {
        match key {
            Some(key) => CoverageKey::Key(key.clone()),
            None => CoverageKey::Missing,
        }
    }
}

pub type CollapsedCoverage = BTreeMap<CoverageKey, f64>;

/// Coverage-per-million of a sample summed by KO and by taxid
#[derive(Debug, Clone)]
pub struct CollapsedSample {
    pub name: String,
    pub genes: usize,
    pub total_coverage: f64,
    pub functions: CollapsedCoverage,
    pub taxonomy: CollapsedCoverage,
}
impl CollapsedSample {
    /// Collapses a normalized table, the lookups must already
    /// hold the annotations of all samples
    pub fn from_table(table: &NormalizedTable, lookups: &AnnotationLookups) -> Self {
        let mut functions = CollapsedCoverage::new();
        let mut taxonomy = CollapsedCoverage::new();

        for normalized in &table.records {
            let record = &normalized.record;

            *functions
                .entry(CoverageKey::from(record.ko.as_ref()))
                .or_insert(0.0) += normalized.coverage_per_million;

            let taxid = record
                .taxid
                .as_ref()
                .filter(|taxid| !lookups.is_unresolved(taxid));

            *taxonomy
                .entry(CoverageKey::from(taxid))
                .or_insert(0.0) += normalized.coverage_per_million;
        }

        Self {
            name: table.name.clone(),
            genes: table.records.len(),
            total_coverage: table.total_coverage,
            functions,
            taxonomy,
        }
    }
    pub fn summary(&self) -> SampleSummary {
        let annotated_percent = |collapsed: &CollapsedCoverage| {
            let missing = collapsed.get(&CoverageKey::Missing).copied().unwrap_or(0.0);
            (COVERAGE_SCALE - missing) / COVERAGE_SCALE * 100.0
        };
        SampleSummary {
            sample: self.name.clone(),
            genes: self.genes,
            total_coverage: self.total_coverage,
            ko_annotated: annotated_percent(&self.functions),
            classified: annotated_percent(&self.taxonomy),
        }
    }
}

/*
=====================
Table display helpers
=====================
*/

fn display_coverage(cov: &f64) -> String {
    format!("{:.2}", cov)
}

fn display_percent(percent: &f64) -> String {
    format!("{:.2}", percent)
}

/// Console summary of a collapsed sample
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SampleSummary {
    #[tabled(rename = "Sample")]
    pub sample: String,
    #[tabled(rename = "Genes")]
    pub genes: usize,
    #[tabled(rename = "Total coverage", display_with = "display_coverage")]
    pub total_coverage: f64,
    #[tabled(rename = "KO annotated (%)", display_with = "display_percent")]
    pub ko_annotated: f64,
    #[tabled(rename = "Classified (%)", display_with = "display_percent")]
    pub classified: f64,
}
