use std::path::PathBuf;

use tabled::settings::Style;
use tabled::Table;

use crate::collapse::{CollapsedSample, SampleSummary};
use crate::combine::{write_combined_tables, CombinedTable};
use crate::error::KotabError;
use crate::lookup::AnnotationLookups;
use crate::table::{read_tables, validate_inputs, NormalizedTable};
use crate::terminal::CombineArgs;

pub const DEFAULT_OUTPUT_PREFIX: &str = "Combined";

#[derive(Debug, Clone)]
pub struct KotabConfig {
    /// Per-sample gene coverage annotation tables
    pub inputs: Vec<PathBuf>,
    /// Prefix of the two combined output tables
    pub output_prefix: String,
    /// Print the per-sample summary table to console
    pub table: bool,
}
impl KotabConfig {
    pub fn from_args(args: &CombineArgs) -> Self {
        Self {
            inputs: args.input.clone(),
            output_prefix: args.output_prefix.clone(),
            table: args.table,
        }
    }
}

/// Combined tables of a run, ready to be written
#[derive(Debug, Clone)]
pub struct CombinedOutput {
    pub functions: CombinedTable,
    pub taxonomy: CombinedTable,
    pub summaries: Vec<SampleSummary>,
}

/// Kotab application structure.
pub struct Kotab {
    config: KotabConfig,
}
impl Kotab {
    pub fn from(config: KotabConfig) -> Result<Self, KotabError> {
        validate_inputs(&config.inputs)?;
        Ok(Self { config })
    }
    pub fn run(&self) -> Result<(PathBuf, PathBuf), KotabError> {
        let output = self.combine()?;

        if self.config.table {
            Self::print_summary(&output.summaries);
        }

        log::info!("Writing combined tables with prefix: {}", self.config.output_prefix);
        let (function_path, taxonomy_path) = write_combined_tables(
            &output.functions,
            &output.taxonomy,
            &self.config.output_prefix,
        )?;
        log::info!("KO function coverage table written to: {}", function_path.display());
        log::info!("Taxonomy coverage table written to: {}", taxonomy_path.display());

        Ok((function_path, taxonomy_path))
    }
    /// Reads, normalizes, collapses and combines all input tables
    pub fn combine(&self) -> Result<CombinedOutput, KotabError> {
        log::info!("Reading {} input tables", self.config.inputs.len());
        let tables = read_tables(&self.config.inputs)?
            .into_iter()
            .map(|table| table.normalize())
            .collect::<Result<Vec<NormalizedTable>, _>>()?;

        // Lookups must hold every sample before any sample is collapsed
        log::info!("Building KO and taxonomy annotation lookups");
        let lookups = tables
            .iter()
            .fold(AnnotationLookups::default(), AnnotationLookups::absorb);

        log::info!(
            "Found {} KO identifiers and {} taxonomic identifiers ({} unresolved)",
            lookups.functions.len(),
            lookups.taxonomy.len(),
            lookups.unresolved.len()
        );

        let samples = tables
            .iter()
            .map(|table| CollapsedSample::from_table(table, &lookups))
            .collect::<Vec<_>>();

        log::info!("Combining coverage of {} samples", samples.len());
        let functions = CombinedTable::functions(&samples, &lookups);
        let taxonomy = CombinedTable::taxonomy(&samples, &lookups);

        Ok(CombinedOutput {
            functions,
            taxonomy,
            summaries: samples.iter().map(CollapsedSample::summary).collect(),
        })
    }
    pub fn print_summary(summaries: &[SampleSummary]) {
        let mut table = Table::new(summaries);
        table.with(Style::modern());
        eprintln!("{}", table);
    }
}
