use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::table::{GeneRecord, NormalizedTable};

/// Rank names of a taxonomic identifier from domain to species
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    pub ranks: [Option<String>; 7],
}
impl Lineage {
    pub fn new(ranks: [Option<String>; 7]) -> Self {
        Self { ranks }
    }
    /// Identifiers with the same value at every rank (usually all missing)
    /// denote a placeholder rather than a classifiable taxon
    pub fn is_unresolved(&self) -> bool {
        self.ranks.iter().all_equal()
    }
}

/// Annotation lookups accumulated across all samples
///
/// Keys are only ever inserted, the first description or lineage seen
/// for a key is kept regardless of what later tables report.
#[derive(Debug, Clone, Default)]
pub struct AnnotationLookups {
    /// KO identifier to KO function description
    pub functions: IndexMap<String, Option<String>>,
    /// Taxonomic identifier to lineage
    pub taxonomy: IndexMap<String, Lineage>,
    /// Taxonomic identifiers without a resolved lineage
    pub unresolved: IndexSet<String>,
}
impl AnnotationLookups {
    /// Folds the annotations of a sample into the lookups
    pub fn absorb(self, table: &NormalizedTable) -> Self {
        table
            .records
            .iter()
            .fold(self, |lookups, normalized| lookups.absorb_record(&normalized.record))
    }
    fn absorb_record(mut self, record: &GeneRecord) -> Self {
        if let Some(ko) = &record.ko {
            if !self.functions.contains_key(ko) {
                self.functions.insert(ko.clone(), record.ko_function.clone());
            }
        }
        if let Some(taxid) = &record.taxid {
            if !self.taxonomy.contains_key(taxid) {
                let lineage = record.lineage();
                if lineage.is_unresolved() {
                    self.unresolved.insert(taxid.clone());
                }
                self.taxonomy.insert(taxid.clone(), lineage);
            }
        }
        self
    }
    pub fn function(&self, ko: &str) -> Option<&Option<String>> {
        self.functions.get(ko)
    }
    pub fn lineage(&self, taxid: &str) -> Option<&Lineage> {
        self.taxonomy.get(taxid)
    }
    pub fn is_unresolved(&self, taxid: &str) -> bool {
        self.unresolved.contains(taxid)
    }
}
