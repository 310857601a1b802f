//! Conversion between the Cilm and flat vector coefficient layouts.
//!
//! See [`crate::index`] for both layouts. Conversion in either direction
//! preserves every coefficient with `m ≤ l ≤ lmax`:
//!
//! ```
//! use shcoeffs::{cilm_to_vector, vector_to_cilm, Component, ShCoeffs};
//!
//! let mut coeffs = ShCoeffs::zeros(3);
//! coeffs.set(Component::Sine, 3, 2, 0.5);
//!
//! let vector = cilm_to_vector(&coeffs, 3).unwrap();
//! assert_eq!(vector.len(), 16);
//! assert_eq!(vector_to_cilm(&vector, 3).unwrap(), coeffs);
//! ```

use crate::coeffs::ShCoeffs;
use crate::error::{Result, ShError};
use crate::index::{degree_for_vector_len, vector_index, vector_len, Component};

/// Flatten coefficients of degree `0..=lmax` into the vector layout.
///
/// # Errors
///
/// Returns [`ShError::DegreeExceedsAllocation`] if `lmax` is larger than the
/// degree of `coeffs`.
pub fn cilm_to_vector(coeffs: &ShCoeffs, lmax: usize) -> Result<Vec<f64>> {
    if lmax > coeffs.lmax() {
        return Err(ShError::DegreeExceedsAllocation {
            requested: lmax,
            allocated: coeffs.lmax(),
        });
    }

    let mut vector = vec![0.0; vector_len(lmax)];
    for_each_term(lmax, |component, l, m, i| {
        vector[i] = coeffs.get(component, l, m);
    });
    Ok(vector)
}

/// Rebuild a Cilm store of degree `lmax` from the vector layout.
///
/// Only the first `(lmax+1)²` values of `vector` are used.
///
/// # Errors
///
/// Returns [`ShError::DegreeExceedsAllocation`] if `vector` is shorter than
/// `(lmax+1)²`.
pub fn vector_to_cilm(vector: &[f64], lmax: usize) -> Result<ShCoeffs> {
    if vector.len() < vector_len(lmax) {
        return Err(ShError::DegreeExceedsAllocation {
            requested: lmax,
            allocated: degree_for_vector_len(vector.len()).unwrap_or(0),
        });
    }

    let mut coeffs = ShCoeffs::zeros(lmax);
    for_each_term(lmax, |component, l, m, i| {
        coeffs.set(component, l, m, vector[i]);
    });
    Ok(coeffs)
}

/// Visit every stored `(component, l, m)` with its vector index.
fn for_each_term(lmax: usize, mut f: impl FnMut(Component, usize, usize, usize)) {
    for l in 0..=lmax {
        for m in 0..=l {
            for component in Component::ALL {
                if let Some(i) = vector_index(component, l, m) {
                    f(component, l, m, i);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store with a distinct, non-zero value in every valid slot.
    fn distinct_coeffs(lmax: usize) -> ShCoeffs {
        let mut coeffs = ShCoeffs::zeros(lmax);
        for l in 0..=lmax {
            for m in 0..=l {
                coeffs.set(Component::Cosine, l, m, (l * 100 + m) as f64 + 0.25);
                if m > 0 {
                    coeffs.set(Component::Sine, l, m, -((l * 100 + m) as f64) - 0.5);
                }
            }
        }
        coeffs
    }

    #[test]
    fn test_vector_ordering() {
        let coeffs = distinct_coeffs(2);
        let vector = cilm_to_vector(&coeffs, 2).unwrap();

        assert_eq!(
            vector,
            vec![
                0.25,   // C00
                100.25, // C10
                101.25, // C11
                -101.5, // S11
                200.25, // C20
                201.25, // C21
                -201.5, // S21
                202.25, // C22
                -202.5, // S22
            ]
        );
    }

    #[test]
    fn test_round_trip_every_degree() {
        let coeffs = distinct_coeffs(12);
        for lmax in 0..=12 {
            let vector = cilm_to_vector(&coeffs, lmax).unwrap();
            assert_eq!(vector.len(), (lmax + 1) * (lmax + 1));

            let back = vector_to_cilm(&vector, lmax).unwrap();
            assert_eq!(back, coeffs.truncated(lmax).unwrap());
        }
    }

    #[test]
    fn test_round_trip_full_degree_is_identity() {
        let coeffs = distinct_coeffs(15);
        let vector = cilm_to_vector(&coeffs, 15).unwrap();
        assert_eq!(vector_to_cilm(&vector, 15).unwrap(), coeffs);
    }

    #[test]
    fn test_degree_exceeds_store() {
        let coeffs = ShCoeffs::zeros(4);
        match cilm_to_vector(&coeffs, 5) {
            Err(ShError::DegreeExceedsAllocation {
                requested,
                allocated,
            }) => {
                assert_eq!(requested, 5);
                assert_eq!(allocated, 4);
            }
            other => panic!("Expected DegreeExceedsAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_vector_too_short() {
        match vector_to_cilm(&[0.0; 10], 3) {
            Err(ShError::DegreeExceedsAllocation {
                requested,
                allocated,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(allocated, 2);
            }
            other => panic!("Expected DegreeExceedsAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_longer_vector_uses_prefix() {
        let coeffs = distinct_coeffs(3);
        let vector = cilm_to_vector(&coeffs, 3).unwrap();
        let back = vector_to_cilm(&vector, 2).unwrap();
        assert_eq!(back, coeffs.truncated(2).unwrap());
    }
}
