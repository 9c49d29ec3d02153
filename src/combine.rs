use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};

use crate::collapse::{CollapsedCoverage, CollapsedSample, CoverageKey};
use crate::error::KotabError;
use crate::lookup::AnnotationLookups;
use crate::table::RANK_COLUMNS;

pub const FUNCTION_TABLE_SUFFIX: &str = "-KO-function-coverages.tsv";
pub const TAXONOMY_TABLE_SUFFIX: &str = "-taxonomy-coverages.tsv";

pub const NOT_ANNOTATED: &str = "Not annotated";
pub const NOT_CLASSIFIED: &str = "Not classified";
pub const MISSING_VALUE: &str = "NA";

/// A key of the combined table with its annotation and per-sample coverage
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub key: CoverageKey,
    /// Rendered key, the missing bucket gets a placeholder label
    pub label: String,
    /// Description or lineage columns
    pub annotations: Vec<String>,
    /// Coverage-per-million in input sample order
    pub coverage: Vec<f64>,
}

/// Multi-sample coverage table, one row per key and one column per sample
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub header: Vec<String>,
    pub rows: Vec<CombinedRow>,
}
impl CombinedTable {
    /// Combines the per-sample KO coverage
    pub fn functions(samples: &[CollapsedSample], lookups: &AnnotationLookups) -> Self {
        let header = ["KO_ID", "KO_function"]
            .iter()
            .map(|h| h.to_string())
            .chain(samples.iter().map(|s| s.name.clone()))
            .collect();

        let rows = outer_join(samples, |sample| &sample.functions)
            .into_iter()
            .map(|(key, coverage)| {
                let (label, description) = match &key {
                    CoverageKey::Key(ko) => {
                        let description = lookups
                            .function(ko)
                            .cloned()
                            .flatten()
                            .unwrap_or_else(|| MISSING_VALUE.to_string());
                        (ko.clone(), description)
                    }
                    CoverageKey::Missing => (NOT_ANNOTATED.to_string(), MISSING_VALUE.to_string()),
                };
                CombinedRow {
                    key,
                    label,
                    annotations: vec![description],
                    coverage,
                }
            })
            .collect();

        Self { header, rows }
    }
    /// Combines the per-sample taxonomic coverage
    pub fn taxonomy(samples: &[CollapsedSample], lookups: &AnnotationLookups) -> Self {
        let header = std::iter::once("taxid")
            .chain(RANK_COLUMNS)
            .map(|h| h.to_string())
            .chain(samples.iter().map(|s| s.name.clone()))
            .collect();

        let rows = outer_join(samples, |sample| &sample.taxonomy)
            .into_iter()
            .map(|(key, coverage)| {
                let (label, lineage) = match &key {
                    CoverageKey::Key(taxid) => (taxid.clone(), lookups.lineage(taxid)),
                    CoverageKey::Missing => (NOT_CLASSIFIED.to_string(), None),
                };
                let annotations = match lineage {
                    Some(lineage) => lineage
                        .ranks
                        .iter()
                        .map(|rank| rank.clone().unwrap_or_else(|| MISSING_VALUE.to_string()))
                        .collect(),
                    None => vec![MISSING_VALUE.to_string(); RANK_COLUMNS.len()],
                };
                CombinedRow {
                    key,
                    label,
                    annotations,
                    coverage,
                }
            })
            .collect();

        Self { header, rows }
    }
    pub fn row(&self, label: &str) -> Option<&CombinedRow> {
        self.rows.iter().find(|row| row.label == label)
    }
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<(), KotabError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);

        writer.write_record(&self.header)?;
        for row in &self.rows {
            let fields = std::iter::once(row.label.clone())
                .chain(row.annotations.iter().cloned())
                .chain(row.coverage.iter().map(|c| c.to_string()));
            writer.write_record(fields)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Outer join of the collapsed tables in sample order, absent keys have zero coverage
fn outer_join<F>(samples: &[CollapsedSample], select: F) -> BTreeMap<CoverageKey, Vec<f64>>
where
    F: Fn(&CollapsedSample) -> &CollapsedCoverage,
{
    let mut joined: BTreeMap<CoverageKey, Vec<f64>> = BTreeMap::new();
    for (i, sample) in samples.iter().enumerate() {
        for (key, coverage) in select(sample) {
            joined
                .entry(key.clone())
                .or_insert_with(|| vec![0.0; samples.len()])[i] += coverage;
        }
    }
    joined
}

pub fn output_path(prefix: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{suffix}"))
}

/// Writes both combined tables, or neither of them
///
/// Tables are written to temporary files next to their destinations,
/// which are only moved into place once both were written. If the
/// taxonomy table cannot be moved into place, the function table of
/// this run is removed and a previous function table is restored.
pub fn write_combined_tables(
    functions: &CombinedTable,
    taxonomy: &CombinedTable,
    prefix: &str,
) -> Result<(PathBuf, PathBuf), KotabError> {
    let function_path = output_path(prefix, FUNCTION_TABLE_SUFFIX);
    let taxonomy_path = output_path(prefix, TAXONOMY_TABLE_SUFFIX);

    let function_tmp = write_temporary(functions, &function_path)?;
    let taxonomy_tmp = write_temporary(taxonomy, &taxonomy_path)?;

    // An existing function table is moved aside so it can be restored
    // if the taxonomy table cannot be moved into place
    let previous = move_aside(&function_path)?;

    // Temporary files are dropped with the persist errors
    if let Err(e) = function_tmp.persist(&function_path) {
        restore(&function_path, previous)?;
        return Err(KotabError::PersistError { path: function_path, source: e.error });
    }
    if let Err(e) = taxonomy_tmp.persist(&taxonomy_path) {
        log::error!(
            "Failed to write taxonomy table, removing function table: {}",
            function_path.display()
        );
        restore(&function_path, previous)?;
        return Err(KotabError::PersistError { path: taxonomy_path, source: e.error });
    }

    Ok((function_path, taxonomy_path))
}

fn output_dir(destination: &Path) -> &Path {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Renames an existing output to a temporary path, deleted when dropped
fn move_aside(destination: &Path) -> Result<Option<TempPath>, KotabError> {
    if !destination.is_file() {
        return Ok(None);
    }
    let backup = NamedTempFile::new_in(output_dir(destination))?.into_temp_path();
    std::fs::rename(destination, &backup)?;
    Ok(Some(backup))
}

/// Puts the previous output back in place, or removes the new one
fn restore(destination: &Path, previous: Option<TempPath>) -> Result<(), KotabError> {
    match previous {
        Some(backup) => {
            if let Err(e) = backup.persist(destination) {
                let backup = e.path.keep().map_err(|k| KotabError::IOError(k.error))?;
                return Err(KotabError::RestoreError {
                    path: destination.to_path_buf(),
                    backup,
                    source: e.error,
                });
            }
        }
        None => {
            if destination.is_file() {
                std::fs::remove_file(destination)?;
            }
        }
    }
    Ok(())
}

fn write_temporary(table: &CombinedTable, destination: &Path) -> Result<NamedTempFile, KotabError> {
    let mut tmp = NamedTempFile::new_in(output_dir(destination))?;
    table.write_tsv(&mut tmp)?;
    set_readable(tmp.as_file())?;
    Ok(tmp)
}

#[cfg(unix)]
fn set_readable(file: &File) -> Result<(), KotabError> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_readable(_file: &File) -> Result<(), KotabError> {
    Ok(())
}
