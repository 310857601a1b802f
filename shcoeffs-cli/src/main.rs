use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use shcoeffs::{CsPhase, DegreeScaling, EvalOptions, Normalization};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Spherical-harmonic model CLI tool
#[derive(Parser)]
#[command(name = "shcoeffs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where to read the model from.
#[derive(Args)]
pub struct ModelArgs {
    /// Coefficient file (SHTOOLS text format)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Maximum degree to read (default: every degree in the file)
    #[arg(short, long)]
    pub lmax: Option<usize>,

    /// Number of lines to skip at the start of the file
    #[arg(long, default_value = "0")]
    pub skip: usize,

    /// The first line after the skipped ones is a header line
    #[arg(long)]
    pub header: bool,
}

/// How to evaluate the model.
#[derive(Args)]
pub struct EvalArgs {
    /// Normalization: 4pi, schmidt, unnorm, ortho (or SHTOOLS code 1-4)
    #[arg(long, default_value = "4pi")]
    pub norm: Normalization,

    /// Condon-Shortley phase: exclude or include (or SHTOOLS code 1 / -1)
    #[arg(long, default_value = "exclude", allow_hyphen_values = true)]
    pub csphase: CsPhase,

    /// Coefficients were pre-multiplied by 1/(2l+1)
    #[arg(long)]
    pub scaled: bool,
}

impl EvalArgs {
    pub fn options(&self) -> EvalOptions {
        let scaling = if self.scaled {
            DegreeScaling::InverseDegree
        } else {
            DegreeScaling::None
        };
        EvalOptions::new()
            .with_normalization(self.norm)
            .with_csphase(self.csphase)
            .with_scaling(scaling)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Read a model, convert it to vector form and compare one point with a reference value
    Check {
        /// Model file, or directory containing MarsTopo719.shape
        path: Option<PathBuf>,

        /// Maximum degree to read
        #[arg(long, default_value = "15")]
        lmax: usize,

        /// Latitude in decimal degrees
        #[arg(long, default_value = "10.0", allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, default_value = "30.0", allow_negative_numbers = true)]
        lon: f64,

        /// Expected value at (lat, lon)
        #[arg(long, default_value = "3395259.548270001", allow_negative_numbers = true)]
        reference: f64,

        /// Largest accepted absolute difference
        #[arg(long, default_value = "1e-9")]
        tolerance: f64,

        /// Also print the vector form of the coefficients
        #[arg(long)]
        show_vector: bool,
    },

    /// Evaluate a model at a single coordinate
    Eval {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        eval: EvalArgs,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Evaluate a model for every coordinate of a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        eval: EvalArgs,

        /// Output file (default: <input>_values.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },

    /// Display information about a model file
    Info {
        #[command(flatten)]
        model: ModelArgs,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the coefficients in vector form
    Vector {
        #[command(flatten)]
        model: ModelArgs,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Evaluate a model on an equally spaced latitude/longitude grid
    Grid {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        eval: EvalArgs,

        /// Number of latitude rows (default: 2 × (lmax + 1))
        #[arg(long)]
        nlat: Option<usize>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(format!("warn,shcoeffs={}", level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check {
            path,
            lmax,
            lat,
            lon,
            reference,
            tolerance,
            show_vector,
        } => commands::check::run(path, lmax, lat, lon, reference, tolerance, show_vector),
        Commands::Eval {
            model,
            eval,
            lat,
            lon,
            json,
        } => commands::eval::run(&model, &eval, lat, lon, json).map(|()| ExitCode::SUCCESS),
        Commands::Batch {
            input,
            model,
            eval,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(&model, &eval, input, output, &lat_col, &lon_col)
            .map(|()| ExitCode::SUCCESS),
        Commands::Info { model, json } => {
            commands::info::run(&model, json).map(|()| ExitCode::SUCCESS)
        }
        Commands::Vector { model, json } => {
            commands::vector::run(&model, json).map(|()| ExitCode::SUCCESS)
        }
        Commands::Grid {
            model,
            eval,
            nlat,
            output,
        } => commands::grid::run(&model, &eval, nlat, output).map(|()| ExitCode::SUCCESS),
    }
}
