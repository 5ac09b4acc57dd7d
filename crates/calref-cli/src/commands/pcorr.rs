//! Pcorr command - resample the aperture-size photometric correction.

use std::path::PathBuf;

use colored::Colorize;

use calref::{CalSwitch, CorrectionStatus, PhotCorrKey, PhotCorrLookup};

use super::print_diagnostics;

#[allow(clippy::too_many_arguments)]
pub fn run(
    table: PathBuf,
    aperture: String,
    cenwave: i64,
    grid_start: f64,
    grid_step: f64,
    grid_count: usize,
    omit: bool,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid: Vec<f64> = (0..grid_count)
        .map(|i| grid_start + i as f64 * grid_step)
        .collect();

    let switch = if omit { CalSwitch::Omit } else { CalSwitch::Perform };
    let lookup = PhotCorrLookup::new(PhotCorrKey::new(&aperture, cenwave)).with_switch(switch);

    let curve = lookup.fetch(&table, &grid)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&curve)?);
        return Ok(());
    }

    println!(
        "{} {} (APERTURE {}, CENWAVE {})",
        "Correction from".cyan().bold(),
        table.display().to_string().white(),
        aperture,
        cenwave
    );

    print_diagnostics(&curve.diagnostics);

    match curve.status {
        CorrectionStatus::Interpolated { row } => {
            println!(
                "Interpolated {} factors from row {}",
                curve.factors.len().to_string().white().bold(),
                row.to_string().white().bold()
            );
        }
        CorrectionStatus::UnityFallback { .. } => {
            println!(
                "{} neutral correction (1.0) over {} grid elements",
                "Fallback:".yellow().bold(),
                curve.factors.len()
            );
        }
    }

    if verbose && !curve.factors.is_empty() {
        let (min, max) = curve
            .factors
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| {
                (lo.min(f), hi.max(f))
            });
        let mean: f64 = curve.factors.iter().sum::<f64>() / curve.factors.len() as f64;
        println!("  factor range [{:.6}, {:.6}], mean {:.6}", min, max, mean);
    }

    Ok(())
}
