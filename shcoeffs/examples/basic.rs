//! Basic example demonstrating shcoeffs library usage.
//!
//! Run with: cargo run --example basic -- /path/to/MarsTopo719.shape

use shcoeffs::{cilm_to_vector, make_grid_point, EvalOptions, ShError};
use std::env;

fn main() -> Result<(), ShError> {
    // Get model file from command line
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/model.shape");
        std::process::exit(1);
    });

    // Read up to degree 15
    let file = shcoeffs::read(&path, 15)?;
    println!("Read degree {} (allocated {})", file.lmax, file.coeffs.lmax());

    let vector = cilm_to_vector(&file.coeffs, file.lmax)?;
    println!("Vector form holds {} coefficients", vector.len());

    // Some landmarks on Mars
    let locations = [
        ("Olympus Mons", 18.65, 226.2),
        ("Hellas Planitia", -42.4, 70.5),
        ("Valles Marineris", -14.0, 300.8),
    ];

    println!("Radius at degree {}:", file.lmax);
    println!("{:-<50}", "");

    for (name, lat, lon) in &locations {
        match make_grid_point(&file.coeffs, file.lmax, *lat, *lon, &EvalOptions::default()) {
            Ok(radius) => println!("{}: {:.1} m", name, radius),
            Err(e) => println!("{}: error - {}", name, e),
        }
    }

    Ok(())
}
