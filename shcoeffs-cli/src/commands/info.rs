use anyhow::{Context, Result};
use serde::Serialize;
use shcoeffs::ShFile;

use crate::ModelArgs;

#[derive(Serialize)]
struct InfoResponse {
    file: String,
    file_size: u64,
    lmax: usize,
    coefficients: usize,
    has_errors: bool,
    header: Option<Vec<f64>>,
    total_power: f64,
    power_per_degree: Vec<f64>,
}

pub fn run(model: &ModelArgs, json: bool) -> Result<()> {
    let file = super::load_model(model)?;
    let file_size = std::fs::metadata(&model.file)?.len();
    let power = power_spectrum(&file)?;
    let total_power: f64 = power.iter().sum();

    if json {
        let response = InfoResponse {
            file: model.file.display().to_string(),
            file_size,
            lmax: file.lmax,
            coefficients: shcoeffs::index::vector_len(file.lmax),
            has_errors: file.errors.is_some(),
            header: file.header.clone(),
            total_power,
            power_per_degree: power,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("File: {}", model.file.display());
    println!("File size: {}", format_size(file_size));
    println!("Degree: {}", file.lmax);
    println!(
        "Coefficients: {}",
        shcoeffs::index::vector_len(file.lmax)
    );
    if let Some(header) = &file.header {
        let fields: Vec<String> = header.iter().map(|v| v.to_string()).collect();
        println!("Header: {}", fields.join(" "));
    }
    if file.errors.is_some() {
        println!("Uncertainties: present");
    }
    println!("Total power: {:.6e}", total_power);
    println!();
    println!("{:>6}  {:>14}", "degree", "power");
    for (l, p) in power.iter().enumerate() {
        println!("{:>6}  {:>14.6e}", l, p);
    }

    Ok(())
}

/// Power per degree over the degrees present in the file, not the
/// allocation requested with `--lmax`.
fn power_spectrum(file: &ShFile) -> Result<Vec<f64>> {
    let coeffs = file
        .coeffs
        .truncated(file.lmax)
        .context("Failed to truncate model")?;
    Ok(coeffs.power_per_degree())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
