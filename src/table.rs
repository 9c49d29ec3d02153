use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::KotabError;
use crate::lookup::Lineage;
use crate::utils::{null_if_placeholder, sample_name_from_path};

/// Coverage of every sample is scaled to sum to this value
pub const COVERAGE_SCALE: f64 = 1_000_000.0;

/// Taxonomic rank columns from domain to species
pub const RANK_COLUMNS: [&str; 7] = ["domain", "phylum", "class", "order", "family", "genus", "species"];

/// Columns every input table must provide
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "KO_ID",
    "KO_function",
    "taxid",
    "domain",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "species",
    "coverage",
];

/// A gene row of a per-sample coverage annotation table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneRecord {
    #[serde(rename = "KO_ID")]
    pub ko: Option<String>,
    #[serde(rename = "KO_function")]
    pub ko_function: Option<String>,
    pub taxid: Option<String>,
    pub domain: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub coverage: f64,
}
impl GeneRecord {
    /// Replaces placeholder cells (`NA`, empty, ...) with `None`
    fn without_placeholders(self) -> Self {
        Self {
            ko: null_if_placeholder(self.ko),
            ko_function: null_if_placeholder(self.ko_function),
            taxid: null_if_placeholder(self.taxid),
            domain: null_if_placeholder(self.domain),
            phylum: null_if_placeholder(self.phylum),
            class: null_if_placeholder(self.class),
            order: null_if_placeholder(self.order),
            family: null_if_placeholder(self.family),
            genus: null_if_placeholder(self.genus),
            species: null_if_placeholder(self.species),
            coverage: self.coverage,
        }
    }
    pub fn lineage(&self) -> Lineage {
        Lineage::new([
            self.domain.clone(),
            self.phylum.clone(),
            self.class.clone(),
            self.order.clone(),
            self.family.clone(),
            self.genus.clone(),
            self.species.clone(),
        ])
    }
}

/// Gene coverage table of a single sample
#[derive(Debug, Clone)]
pub struct SampleTable {
    pub path: PathBuf,
    pub name: String,
    pub records: Vec<GeneRecord>,
}
impl SampleTable {
    /// Reads a tab-delimited table with header, compressed or not
    pub fn from_path(path: &Path) -> Result<Self, KotabError> {
        let name = sample_name_from_path(path)?;

        let (reader, _format) = match niffler::from_path(path) {
            Ok(reader_format) => reader_format,
            Err(niffler::Error::FileTooShort) => return Err(KotabError::EmptyTable(path.to_path_buf())),
            Err(e) => return Err(KotabError::NifflerError(e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let record_error = |source: csv::Error| KotabError::TableRecord {
            table: path.to_path_buf(),
            source,
        };

        let headers = reader.headers().map_err(record_error)?.clone();
        if headers.is_empty() {
            return Err(KotabError::EmptyTable(path.to_path_buf()));
        }
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header.trim() == column) {
                return Err(KotabError::MissingColumn {
                    table: path.to_path_buf(),
                    column: column.to_string(),
                });
            }
        }
        let headers = csv::StringRecord::from(headers.iter().map(str::trim).collect::<Vec<_>>());

        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        while reader.read_record(&mut row).map_err(record_error)? {
            let record: GeneRecord = row.deserialize(Some(&headers)).map_err(record_error)?;

            if !record.coverage.is_finite() || record.coverage < 0.0 {
                return Err(KotabError::InvalidCoverage {
                    table: path.to_path_buf(),
                    line: row.position().map(|p| p.line()).unwrap_or_default(),
                    value: record.coverage,
                });
            }
            records.push(record.without_placeholders());
        }

        log::info!("Read {} gene records for sample: {}", records.len(), name);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            records,
        })
    }
    pub fn total_coverage(&self) -> f64 {
        self.records.iter().map(|r| r.coverage).sum()
    }
    /// Scales raw coverage so that the sample sums to one million
    ///
    /// A sample without any coverage, or with a coverage sum that
    /// overflows, cannot be scaled and is rejected.
    pub fn normalize(self) -> Result<NormalizedTable, KotabError> {
        let total_coverage = self.total_coverage();
        if !total_coverage.is_finite() {
            return Err(KotabError::NonFiniteTotalCoverage(self.name));
        }
        if total_coverage <= 0.0 {
            return Err(KotabError::ZeroTotalCoverage(self.name));
        }
        let factor = COVERAGE_SCALE / total_coverage;

        let records = self
            .records
            .into_iter()
            .map(|record| NormalizedRecord {
                coverage_per_million: record.coverage * factor,
                record,
            })
            .collect();

        Ok(NormalizedTable {
            name: self.name,
            total_coverage,
            records,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub record: GeneRecord,
    pub coverage_per_million: f64,
}

/// Sample table with coverage-per-million of each gene
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub name: String,
    /// Raw coverage total before scaling
    pub total_coverage: f64,
    pub records: Vec<NormalizedRecord>,
}

/// Checks that all input tables exist before any of them is read
pub fn validate_inputs(paths: &[PathBuf]) -> Result<(), KotabError> {
    for path in paths {
        if !path.is_file() {
            log::error!("Input table does not exist: {}", path.display());
            return Err(KotabError::InputFileNotFound(path.clone()));
        }
    }
    Ok(())
}

/// Reads all input tables in input order
pub fn read_tables(paths: &[PathBuf]) -> Result<Vec<SampleTable>, KotabError> {
    validate_inputs(paths)?;

    let tables = paths
        .iter()
        .map(|path| SampleTable::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    for (earlier, later) in shared_sample_names(&tables) {
        log::warn!(
            "Sample identifier '{}' of {} is shared with {} - output columns will share names",
            later.name,
            later.path.display(),
            earlier.path.display()
        );
    }

    Ok(tables)
}

/// Pairs each table with the first earlier table of the same sample name
pub fn shared_sample_names(tables: &[SampleTable]) -> Vec<(&SampleTable, &SampleTable)> {
    tables
        .iter()
        .enumerate()
        .filter_map(|(i, later)| {
            tables[..i]
                .iter()
                .find(|earlier| earlier.name == later.name)
                .map(|earlier| (earlier, later))
        })
        .collect()
}
