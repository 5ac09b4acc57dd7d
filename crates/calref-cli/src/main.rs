//! calref CLI - inspect reference tables and run calibration lookups.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { table, json } => commands::inspect::run(table, json, cli.verbose),

        Commands::Trace {
            table,
            opt_elem,
            cenwave,
            expstart,
            json,
        } => commands::trace::run(table, opt_elem, cenwave, expstart, json, cli.verbose),

        Commands::Pcorr {
            table,
            aperture,
            cenwave,
            grid_start,
            grid_step,
            grid_count,
            omit,
            json,
        } => commands::pcorr::run(
            table, aperture, cenwave, grid_start, grid_step, grid_count, omit, json, cli.verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
