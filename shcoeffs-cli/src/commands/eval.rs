use anyhow::{Context, Result};
use serde::Serialize;
use shcoeffs::GridEvaluator;

use crate::{EvalArgs, ModelArgs};

#[derive(Serialize)]
struct EvalResponse {
    lat: f64,
    lon: f64,
    lmax: usize,
    normalization: &'static str,
    csphase: i32,
    value: f64,
}

pub fn run(model: &ModelArgs, eval: &EvalArgs, lat: f64, lon: f64, json: bool) -> Result<()> {
    let file = super::load_model(model)?;
    let options = eval.options();

    let evaluator = GridEvaluator::new(&file.coeffs, file.lmax, options)
        .context("Failed to set up evaluation")?;
    let value = evaluator
        .evaluate(lat, lon)
        .context("Failed to evaluate model")?;

    if json {
        let response = EvalResponse {
            lat,
            lon,
            lmax: file.lmax,
            normalization: options.normalization.name(),
            csphase: options.csphase.code(),
            value,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", value);
    }

    Ok(())
}
