use anyhow::{Context, Result};
use shcoeffs::GridEvaluator;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::{EvalArgs, ModelArgs};

pub fn run(
    model: &ModelArgs,
    eval: &EvalArgs,
    nlat: Option<usize>,
    output: PathBuf,
) -> Result<()> {
    let file = super::load_model(model)?;
    let evaluator = GridEvaluator::new(&file.coeffs, file.lmax, eval.options())
        .context("Failed to set up evaluation")?;

    let nlat = nlat.unwrap_or_else(|| evaluator.default_nlat());
    let grid = evaluator
        .make_grid(nlat)
        .context("Failed to evaluate grid")?;

    let output_file = File::create(&output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));
    writer.write_record(["lat", "lon", "value"])?;

    for (i, lat) in grid.lats().iter().enumerate() {
        for (j, lon) in grid.lons().iter().enumerate() {
            writer.write_record(&[
                lat.to_string(),
                lon.to_string(),
                grid.get(i, j).to_string(),
            ])?;
        }
    }
    writer.flush()?;

    println!(
        "Grid: {}x{} samples, degree {}",
        grid.nlat(),
        grid.nlon(),
        evaluator.lmax()
    );
    if let (Some(min), Some(max)) = (grid.min(), grid.max()) {
        println!("Min value: {}", min);
        println!("Max value: {}", max);
    }
    println!("Output written to: {}", output.display());
    Ok(())
}
