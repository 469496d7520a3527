mod cli;
mod error;
mod logging;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use polydist::analysis::neighbors::CutoffNeighborFinder;
use polydist::core::io::{basis::BasisTable, poscar};
use polydist::workflows::distortion;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_ref())?;
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let center = cli
        .centre
        .checked_sub(1)
        .ok_or_else(|| CliError::Argument("atom index is 1-based; 0 is not a valid atom".into()))?;
    if !(cli.cutoff > 0.0) {
        return Err(CliError::Argument(format!(
            "cutoff must be a positive distance, got {}",
            cli.cutoff
        )));
    }

    let basis = match &cli.basis {
        Some(path) => BasisTable::from_path(path).map_err(|source| CliError::Basis {
            path: path.clone(),
            source,
        })?,
        None => BasisTable::octahedron(),
    };

    let structure =
        poscar::read_from_path(&cli.structure).map_err(|source| CliError::Structure {
            path: cli.structure.clone(),
            source,
        })?;
    info!(
        sites = structure.sites().len(),
        centre = cli.centre,
        "structure loaded"
    );

    let finder = CutoffNeighborFinder::new(cli.cutoff);
    let result = distortion::analyze_octahedron(&structure, center, &basis, &finder)?;

    println!("#{}", result.labels().join(", "));
    let row: Vec<String> = result
        .values()
        .iter()
        .map(|value| format!("{value:.8}"))
        .collect();
    println!("{}", row.join("  "));

    Ok(())
}
