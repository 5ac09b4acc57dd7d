//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// calref: reference-table lookup and curve-resampling engine
#[derive(Parser)]
#[command(name = "calref")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a reference table's columns, keywords, and provenance
    Inspect {
        /// Path to the reference table (TSV)
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Emit JSON instead of human-readable output
        #[arg(long)]
        json: bool,
    },

    /// Look up spectral traces for an observation configuration
    Trace {
        /// Path to the spectrum trace table
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Optical element (grating or mirror) name
        #[arg(long)]
        opt_elem: String,

        /// Central wavelength
        #[arg(long)]
        cenwave: i64,

        /// Exposure start (MJD), enables time-dependent trace rotation
        #[arg(long)]
        expstart: Option<f64>,

        /// Emit JSON instead of human-readable output
        #[arg(long)]
        json: bool,
    },

    /// Look up and resample the aperture-size photometric correction
    Pcorr {
        /// Path to the correction table
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Aperture name
        #[arg(long)]
        aperture: String,

        /// Central wavelength
        #[arg(long)]
        cenwave: i64,

        /// First wavelength of the target grid
        #[arg(long, default_value = "1150.0")]
        grid_start: f64,

        /// Wavelength step of the target grid
        #[arg(long, default_value = "0.5")]
        grid_step: f64,

        /// Number of target grid elements
        #[arg(long, default_value = "1024")]
        grid_count: usize,

        /// Disable the correction step (exercises the unity fallback)
        #[arg(long)]
        omit: bool,

        /// Emit JSON instead of human-readable output
        #[arg(long)]
        json: bool,
    },
}
