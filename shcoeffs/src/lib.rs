//! # shcoeffs - Spherical-Harmonic Coefficient Library
//!
//! Read spherical-harmonic models (planetary topography, gravity and
//! magnetic potentials) from SHTOOLS-style text files, convert their
//! coefficients between storage layouts, and evaluate them at arbitrary
//! points or on latitude/longitude grids.
//!
//! ## Features
//!
//! - **Explicit errors**: every operation returns a [`Result`] with a typed
//!   [`ShError`]; [`ShError::status_code`] gives the classic integer status
//! - **Explicit options**: normalization, Condon-Shortley phase and degree
//!   scaling are passed per evaluator through [`EvalOptions`], never stored
//!   globally
//! - **Stable recursion**: 4π-normalized Legendre functions with sectoral
//!   rescaling, usable to degrees in the thousands
//!
//! ## Quick Start
//!
//! ```ignore
//! use shcoeffs::{cilm_to_vector, make_grid_point, EvalOptions};
//!
//! // Read the model, truncated at degree 15
//! let file = shcoeffs::read("MarsTopo719.shape", 15)?;
//!
//! // Flat, degree-major copy of the coefficients
//! let vector = cilm_to_vector(&file.coeffs, file.lmax)?;
//!
//! // Radius at 10°N, 30°E
//! let radius = make_grid_point(&file.coeffs, file.lmax, 10.0, 30.0, &EvalOptions::default())?;
//! println!("Radius: {:.3} m", radius);
//! ```
//!
//! ## Coefficient Layouts
//!
//! - **Cilm**: `2 × (L+1) × (L+1)` values, `[component][l][m]`
//! - **Vector**: `(L+1)²` values, degree-major, cosine before sine per order
//!
//! See [`index`] for the exact offsets.

pub mod coeffs;
pub mod convert;
pub mod error;
pub mod eval;
pub mod index;
pub mod legendre;
pub mod reader;

// Re-export main types at crate root for convenience
pub use coeffs::ShCoeffs;
pub use convert::{cilm_to_vector, vector_to_cilm};
pub use error::{status_of, Result, ShError};
pub use eval::{make_grid_point, DegreeScaling, EvalOptions, Grid, GridEvaluator};
pub use index::Component;
pub use legendre::{CsPhase, LegendreTable, Normalization};
pub use reader::{read, ShFile, ShReader};
