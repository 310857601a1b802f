pub mod batch;
pub mod check;
pub mod eval;
pub mod grid;
pub mod info;
pub mod vector;

use anyhow::{Context, Result};
use shcoeffs::{ShFile, ShReader};

use crate::ModelArgs;

/// Read the model described by `args`.
pub fn load_model(args: &ModelArgs) -> Result<ShFile> {
    let mut reader = ShReader::new(&args.file)
        .skip_lines(args.skip)
        .header(args.header);
    if let Some(lmax) = args.lmax {
        reader = reader.lmax(lmax);
    }

    reader
        .read()
        .with_context(|| format!("Failed to read model {}", args.file.display()))
}
