use anyhow::Result;
use clap::Parser;

use kotab::terminal::App;
use kotab::utils::init_logger;
use kotab::{Kotab, KotabConfig};

/// Kotab application
///
/// Run the application from arguments provided
/// by the command line interface
#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    init_logger();

    let cli = App::parse();

    let kotab = Kotab::from(KotabConfig::from_args(&cli.args))?;
    kotab.run()?;

    Ok(())
}
