//! Trace command - look up spectral traces for a configuration.

use std::path::PathBuf;

use colored::Colorize;

use calref::{TraceKey, TraceLookup};

use super::print_diagnostics;

pub fn run(
    table: PathBuf,
    opt_elem: String,
    cenwave: i64,
    expstart: Option<f64>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lookup = TraceLookup::new(TraceKey::new(&opt_elem, cenwave));
    if let Some(mjd) = expstart {
        lookup = lookup.with_expstart(mjd);
    }

    let set = lookup.fetch(&table)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    println!(
        "{} {} (OPT_ELEM {}, CENWAVE {})",
        "Traces from".cyan().bold(),
        table.display().to_string().white(),
        opt_elem,
        cenwave
    );

    print_diagnostics(&set.diagnostics);

    println!(
        "Found {} spectral order(s)",
        set.records.len().to_string().white().bold()
    );
    if let Some(angle) = set.rotation {
        println!("Applied trace rotation of {:.6} degrees", angle);
    }

    for record in &set.records {
        println!(
            "  order {:4}  center ({:9.3}, {:9.3})  {} points",
            record.order.to_string().white().bold(),
            record.a1_center,
            record.a2_center,
            record.displacements.len()
        );
        if verbose {
            let (min, max) = record
                .displacements
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &d| {
                    (lo.min(d), hi.max(d))
                });
            println!("             displacement range [{:.4}, {:.4}]", min, max);
        }
    }

    Ok(())
}
