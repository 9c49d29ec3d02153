use clap::{Args, Parser};
use std::path::PathBuf;

use crate::kotab::DEFAULT_OUTPUT_PREFIX;

/// Kotab: combine per-sample KO and taxonomy coverage tables
#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(styles=get_styles())]
#[command(arg_required_else_help(true))]
#[clap(name = "kotab", version)]
pub struct App {
    #[clap(flatten)]
    pub args: CombineArgs,
}

#[derive(Debug, Args)]
pub struct CombineArgs {
    /// Gene coverage annotation tables, one per sample (.tsv, can be compressed)
    ///
    /// Tab-delimited tables with header and at least the columns: KO_ID, KO_function,
    /// taxid, domain, phylum, class, order, family, genus, species and coverage. Sample
    /// names for the output columns are taken from the file names without extension.
    #[arg(num_args(1..), required=true, value_parser = validate_file)]
    pub input: Vec<PathBuf>,
    /// Prefix of the output tables
    ///
    /// Outputs are written to '<prefix>-KO-function-coverages.tsv' and
    /// '<prefix>-taxonomy-coverages.tsv', the prefix may include a directory
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,
    /// Print per-sample summary table to console
    #[clap(long, short = 'T')]
    pub table: bool,
}

/// Validator function to check if each file exists and is valid
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);

    if !path.exists() {
        return Err(format!("File not found: {}", file));
    }

    if !path.is_file() {
        return Err(format!("Not a valid file: {}", file));
    }

    Ok(path)
}

pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
}
