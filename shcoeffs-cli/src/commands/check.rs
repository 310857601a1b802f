use anyhow::Result;
use shcoeffs::{cilm_to_vector, make_grid_point, status_of, EvalOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

/// Model used when no path is given, or when the path is a directory.
const SAMPLE_FILE: &str = "MarsTopo719.shape";

/// Directory searched when no path is given.
const DEFAULT_DATA_DIR: &str = "../ExampleDataFiles";

pub fn run(
    path: Option<PathBuf>,
    lmax: usize,
    lat: f64,
    lon: f64,
    reference: f64,
    tolerance: f64,
    show_vector: bool,
) -> Result<ExitCode> {
    let path = resolve_path(path);
    info!(path = %path.display(), lmax, "checking model");

    if verify(&path, lmax, (lat, lon), reference, tolerance, show_vector) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Read, convert and evaluate the model at `path`, printing the status lines.
/// Returns whether the value lies within `tolerance` of `reference`.
fn verify(
    path: &Path,
    lmax: usize,
    (lat, lon): (f64, f64),
    reference: f64,
    tolerance: f64,
    show_vector: bool,
) -> bool {
    let read = shcoeffs::read(path, lmax);
    let status = status_of(&read);
    eprintln!("read exit status: {}", status);
    let file = match read {
        Ok(file) => file,
        Err(e) => {
            // Conversion never ran; report the read failure for it too.
            eprintln!("vector conversion exit status: {}", status);
            error!(path = %path.display(), "{}", e);
            return false;
        }
    };

    let vector = cilm_to_vector(&file.coeffs, file.lmax);
    eprintln!("vector conversion exit status: {}", status_of(&vector));
    let vector = match vector {
        Ok(vector) => vector,
        Err(e) => {
            error!("{}", e);
            return false;
        }
    };

    if show_vector {
        let line: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
        eprintln!("{}", line.join(" "));
    }

    let value = match make_grid_point(&file.coeffs, file.lmax, lat, lon, &EvalOptions::default())
    {
        Ok(value) => value,
        Err(e) => {
            error!(lat, lon, "{}", e);
            return false;
        }
    };

    let diff = value - reference;
    println!("diff to reference {}", diff);

    // NaN never passes.
    diff.abs() <= tolerance
}

/// Resolve the model path: a file is used as-is, a directory gets
/// [`SAMPLE_FILE`] appended.
fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(path) if path.is_dir() => path.join(SAMPLE_FILE),
        Some(path) => path,
        None => PathBuf::from(DEFAULT_DATA_DIR).join(SAMPLE_FILE),
    }
}
