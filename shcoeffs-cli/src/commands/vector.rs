use anyhow::{Context, Result};
use serde::Serialize;
use shcoeffs::cilm_to_vector;
use shcoeffs::index::vector_position;

use crate::ModelArgs;

#[derive(Serialize)]
struct VectorEntry {
    index: usize,
    component: &'static str,
    l: usize,
    m: usize,
    value: f64,
}

pub fn run(model: &ModelArgs, json: bool) -> Result<()> {
    let file = super::load_model(model)?;
    let vector = cilm_to_vector(&file.coeffs, file.lmax).context("Failed to convert model")?;

    let entries: Vec<VectorEntry> = vector
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let (component, l, m) = vector_position(index);
            VectorEntry {
                index,
                component: component.label(),
                l,
                m,
                value,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string(&entries)?);
    } else {
        for e in &entries {
            println!("{:>8} {} {:>5} {:>5} {}", e.index, e.component, e.l, e.m, e.value);
        }
    }

    Ok(())
}
