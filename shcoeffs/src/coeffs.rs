//! Owned storage for spherical-harmonic coefficients.
//!
//! This module provides [`ShCoeffs`], a flat `2 × (L+1) × (L+1)` array of
//! cosine and sine coefficients addressed through [`crate::index`].

use crate::error::{Result, ShError};
use crate::index::{checked_cilm_len, cilm_len, cilm_offset, Component};

/// Real spherical-harmonic coefficients up to degree `lmax`.
///
/// Values are stored in the packed Cilm layout `[component][l][m]`. Entries
/// with `m > l` exist in the array but are always zero and are never read by
/// conversion or evaluation.
///
/// # Example
///
/// ```
/// use shcoeffs::{Component, ShCoeffs};
///
/// let mut coeffs = ShCoeffs::zeros(2);
/// coeffs.set(Component::Cosine, 0, 0, 3396000.0);
/// coeffs.set(Component::Sine, 2, 1, -12.5);
///
/// assert_eq!(coeffs.dim(), 3);
/// assert_eq!(coeffs.get(Component::Sine, 2, 1), -12.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShCoeffs {
    lmax: usize,
    data: Vec<f64>,
}

impl ShCoeffs {
    /// Create a store of maximum degree `lmax` with every coefficient zero.
    pub fn zeros(lmax: usize) -> Self {
        Self {
            lmax,
            data: vec![0.0; cilm_len(lmax)],
        }
    }

    /// Fallible version of [`Self::zeros`] for degrees that come from input.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::DegreeExceedsAllocation`] (with `allocated: 0`) if
    /// the store for `lmax` does not fit in memory.
    pub fn try_zeros(lmax: usize) -> Result<Self> {
        let too_large = || ShError::DegreeExceedsAllocation {
            requested: lmax,
            allocated: 0,
        };
        let len = checked_cilm_len(lmax).ok_or_else(too_large)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0.0);
        Ok(Self { lmax, data })
    }

    /// Wrap an existing Cilm array.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::DegreeExceedsAllocation`] if `data` does not hold
    /// exactly `2 × (lmax+1)²` values.
    pub fn from_cilm(data: Vec<f64>, lmax: usize) -> Result<Self> {
        if checked_cilm_len(lmax) != Some(data.len()) {
            let dim = ((data.len() / 2) as f64).sqrt() as usize;
            return Err(ShError::DegreeExceedsAllocation {
                requested: lmax,
                allocated: dim.saturating_sub(1),
            });
        }
        Ok(Self { lmax, data })
    }

    /// Maximum spherical-harmonic degree of this store.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Dimension `lmax + 1` of each degree/order axis.
    pub fn dim(&self) -> usize {
        self.lmax + 1
    }

    /// Coefficient `(component, l, m)`.
    ///
    /// # Panics
    ///
    /// Panics if `l` or `m` exceeds [`Self::lmax`].
    pub fn get(&self, component: Component, l: usize, m: usize) -> f64 {
        assert!(l <= self.lmax && m <= self.lmax, "({}, {}) out of range", l, m);
        self.data[cilm_offset(component, l, m, self.lmax)]
    }

    /// Set coefficient `(component, l, m)`.
    ///
    /// # Panics
    ///
    /// Panics if `l` or `m` exceeds [`Self::lmax`].
    pub fn set(&mut self, component: Component, l: usize, m: usize, value: f64) {
        assert!(l <= self.lmax && m <= self.lmax, "({}, {}) out of range", l, m);
        self.data[cilm_offset(component, l, m, self.lmax)] = value;
    }

    /// Cosine coefficient `C_lm`.
    pub fn cos(&self, l: usize, m: usize) -> f64 {
        self.get(Component::Cosine, l, m)
    }

    /// Sine coefficient `S_lm`.
    pub fn sin(&self, l: usize, m: usize) -> f64 {
        self.get(Component::Sine, l, m)
    }

    /// The raw Cilm array.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the store and return the raw Cilm array.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copy of this store restricted to degrees `0..=lmax`.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::DegreeExceedsAllocation`] if `lmax` is larger than
    /// the degree of this store.
    pub fn truncated(&self, lmax: usize) -> Result<Self> {
        if lmax > self.lmax {
            return Err(ShError::DegreeExceedsAllocation {
                requested: lmax,
                allocated: self.lmax,
            });
        }
        let mut out = Self::zeros(lmax);
        for component in Component::ALL {
            for l in 0..=lmax {
                for m in 0..=l {
                    out.set(component, l, m, self.get(component, l, m));
                }
            }
        }
        Ok(out)
    }

    /// Power per degree, `Σ_m (C_lm² + S_lm²)` for `l = 0..=lmax`.
    ///
    /// For 4π-normalized coefficients this is the power spectrum of the
    /// function: its mean square over the sphere is [`Self::total_power`].
    pub fn power_per_degree(&self) -> Vec<f64> {
        (0..=self.lmax)
            .map(|l| {
                (0..=l)
                    .map(|m| {
                        let c = self.cos(l, m);
                        let s = self.sin(l, m);
                        c * c + s * s
                    })
                    .sum()
            })
            .collect()
    }

    /// Sum of [`Self::power_per_degree`] over all degrees.
    pub fn total_power(&self) -> f64 {
        self.power_per_degree().iter().sum()
    }
}
