//! Associated Legendre functions.
//!
//! [`LegendreTable`] evaluates `P_lm(z)` for all `0 ≤ m ≤ l ≤ lmax` with the
//! standard three-term recursion of 4π-normalized functions, then rescales
//! to the requested [`Normalization`]. Sectoral terms are carried with a
//! scale factor of 1e-280 so that `(1-z²)^(m/2)` does not underflow at high
//! degree near the poles.
//!
//! Results are packed in triangular order, see [`plm_index`].

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ShError};

/// Scale factor carried by the sectoral recursion.
const SCALEF: f64 = 1.0e-280;

/// Normalization convention of the harmonic basis functions.
///
/// Codes follow SHTOOLS: 1 = 4π, 2 = Schmidt, 3 = unnormalized,
/// 4 = orthonormalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Geodesy 4π normalization (mean square of each function is 1).
    #[default]
    FourPi,
    /// Schmidt semi-normalization.
    Schmidt,
    /// Unnormalized functions, usable up to degree
    /// [`Normalization::UNNORMALIZED_MAX_DEGREE`].
    Unnormalized,
    /// Orthonormalization (integral of the square over the sphere is 1).
    Orthonormal,
}

impl Normalization {
    /// Highest degree at which unnormalized functions stay within `f64`
    /// range: `(l+m)!` overflows beyond `170!`.
    pub const UNNORMALIZED_MAX_DEGREE: usize = 85;

    /// Look up a normalization by its SHTOOLS code.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::UnsupportedNormalization`] for codes other than 1-4.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Normalization::FourPi),
            2 => Ok(Normalization::Schmidt),
            3 => Ok(Normalization::Unnormalized),
            4 => Ok(Normalization::Orthonormal),
            _ => Err(ShError::UnsupportedNormalization {
                reason: format!("unknown normalization code {} (expected 1-4)", code),
            }),
        }
    }

    /// SHTOOLS code of this normalization.
    pub fn code(self) -> i32 {
        match self {
            Normalization::FourPi => 1,
            Normalization::Schmidt => 2,
            Normalization::Unnormalized => 3,
            Normalization::Orthonormal => 4,
        }
    }

    /// Short name, accepted back by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Normalization::FourPi => "4pi",
            Normalization::Schmidt => "schmidt",
            Normalization::Unnormalized => "unnorm",
            Normalization::Orthonormal => "ortho",
        }
    }

    /// Value of `P_00` under this normalization.
    pub fn p00(self) -> f64 {
        match self {
            Normalization::Orthonormal => 1.0 / (4.0 * PI).sqrt(),
            _ => 1.0,
        }
    }

    /// Check that this normalization can be evaluated up to degree `lmax`.
    pub fn check_degree(self, lmax: usize) -> Result<()> {
        if self == Normalization::Unnormalized && lmax > Self::UNNORMALIZED_MAX_DEGREE {
            return Err(ShError::UnsupportedNormalization {
                reason: format!(
                    "unnormalized functions are limited to degree {} (requested {})",
                    Self::UNNORMALIZED_MAX_DEGREE,
                    lmax
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Normalization {
    type Err = ShError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "4pi" | "fourpi" | "geodesy" => Ok(Normalization::FourPi),
            "2" | "schmidt" => Ok(Normalization::Schmidt),
            "3" | "unnorm" | "unnormalized" => Ok(Normalization::Unnormalized),
            "4" | "ortho" | "orthonormal" | "orthonormalized" => Ok(Normalization::Orthonormal),
            other => Err(ShError::UnsupportedNormalization {
                reason: format!("unknown normalization '{}'", other),
            }),
        }
    }
}

/// Condon-Shortley phase convention.
///
/// Codes follow SHTOOLS: 1 excludes the phase, -1 includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsPhase {
    /// Do not apply the `(-1)^m` factor.
    #[default]
    Exclude,
    /// Apply the `(-1)^m` factor.
    Include,
}

impl CsPhase {
    /// Look up a phase convention by its SHTOOLS code (1 or -1).
    ///
    /// # Errors
    ///
    /// Returns [`ShError::UnsupportedNormalization`] for any other code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(CsPhase::Exclude),
            -1 => Ok(CsPhase::Include),
            _ => Err(ShError::UnsupportedNormalization {
                reason: format!("unknown Condon-Shortley phase code {} (expected 1 or -1)", code),
            }),
        }
    }

    /// SHTOOLS code of this convention.
    pub fn code(self) -> i32 {
        match self {
            CsPhase::Exclude => 1,
            CsPhase::Include => -1,
        }
    }

    /// Factor applied per order step: `1.0` or `-1.0`.
    fn sign(self) -> f64 {
        match self {
            CsPhase::Exclude => 1.0,
            CsPhase::Include => -1.0,
        }
    }
}

impl FromStr for CsPhase {
    type Err = ShError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "exclude" | "off" => Ok(CsPhase::Exclude),
            "-1" | "include" | "on" => Ok(CsPhase::Include),
            other => Err(ShError::UnsupportedNormalization {
                reason: format!("unknown Condon-Shortley phase '{}'", other),
            }),
        }
    }
}

/// Position of `P_lm` in a packed Legendre array: `l(l+1)/2 + m`.
///
/// ```
/// use shcoeffs::legendre::plm_index;
///
/// assert_eq!(plm_index(0, 0), 0);
/// assert_eq!(plm_index(1, 1), 2);
/// assert_eq!(plm_index(3, 0), 6);
/// ```
pub fn plm_index(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

/// Number of values in a packed Legendre array of maximum degree `lmax`.
pub fn plm_len(lmax: usize) -> usize {
    (lmax + 1) * (lmax + 2) / 2
}

/// Precomputed recursion factors for one maximum degree and normalization.
///
/// A table is an ordinary value owned by its caller; reusing it across
/// evaluations avoids recomputing the square roots.
#[derive(Debug, Clone)]
pub struct LegendreTable {
    lmax: usize,
    normalization: Normalization,
    /// `sqrt(i)` for `i = 0..=2*lmax+3`.
    sqr: Vec<f64>,
    /// First recursion coefficient, indexed by [`plm_index`].
    f1: Vec<f64>,
    /// Second recursion coefficient, indexed by [`plm_index`].
    f2: Vec<f64>,
    /// Conversion from 4π normalization, indexed by [`plm_index`].
    renorm: Vec<f64>,
}

impl LegendreTable {
    /// Build the table for degrees `0..=lmax`.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::UnsupportedNormalization`] if `normalization`
    /// cannot be evaluated at `lmax`.
    pub fn new(lmax: usize, normalization: Normalization) -> Result<Self> {
        normalization.check_degree(lmax)?;

        let sqr: Vec<f64> = (0..=2 * lmax + 3).map(|i| (i as f64).sqrt()).collect();
        let len = plm_len(lmax);
        let mut f1 = vec![0.0; len];
        let mut f2 = vec![0.0; len];

        for l in 2..=lmax {
            for m in 0..=l - 2 {
                let k = plm_index(l, m);
                f1[k] = sqr[2 * l - 1] * sqr[2 * l + 1] / (sqr[l - m] * sqr[l + m]);
                f2[k] = sqr[2 * l + 1] * sqr[l + m - 1] * sqr[l - m - 1]
                    / (sqr[l - m] * sqr[l + m] * sqr[2 * l - 3]);
            }
        }

        let mut renorm = vec![1.0; len];
        match normalization {
            Normalization::FourPi => {}
            Normalization::Schmidt => {
                for l in 0..=lmax {
                    for m in 0..=l {
                        renorm[plm_index(l, m)] = 1.0 / sqr[2 * l + 1];
                    }
                }
            }
            Normalization::Orthonormal => {
                let factor = 1.0 / (4.0 * PI).sqrt();
                renorm.iter_mut().for_each(|r| *r = factor);
            }
            Normalization::Unnormalized => {
                for l in 0..=lmax {
                    // (l+m)! / (l-m)!, built up one order at a time
                    let mut ratio = 1.0;
                    for m in 0..=l {
                        if m > 0 {
                            ratio *= ((l + m) * (l - m + 1)) as f64;
                        }
                        let delta = if m == 0 { 1.0 } else { 2.0 };
                        renorm[plm_index(l, m)] =
                            (ratio / (delta * (2 * l + 1) as f64)).sqrt();
                    }
                }
            }
        }

        Ok(Self {
            lmax,
            normalization,
            sqr,
            f1,
            f2,
            renorm,
        })
    }

    /// Maximum degree of this table.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Normalization produced by this table.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Evaluate all `P_lm(z)` into `out`, which is resized to
    /// [`plm_len`]`(lmax)`.
    ///
    /// `z` is the cosine of colatitude, i.e. the sine of latitude.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::InvalidLatLon`] (with `z` reported as `lat`) if `z`
    /// is not finite or outside `[-1, 1]`.
    pub fn compute_into(&self, z: f64, csphase: CsPhase, out: &mut Vec<f64>) -> Result<()> {
        if !z.is_finite() || z.abs() > 1.0 {
            return Err(ShError::InvalidLatLon { lat: z, lon: 0.0 });
        }

        out.clear();
        out.resize(plm_len(self.lmax), 0.0);
        let p = out.as_mut_slice();
        let lmax = self.lmax;
        let sqr = &self.sqr;
        let phase = csphase.sign();
        let u = (1.0 - z * z).max(0.0).sqrt();

        p[0] = 1.0;
        if lmax > 0 {
            // Zonal column
            p[1] = sqr[3] * z;
            let mut pm2 = p[0];
            let mut pm1 = p[1];
            for l in 2..=lmax {
                let k = plm_index(l, 0);
                let pl = self.f1[k] * z * pm1 - self.f2[k] * pm2;
                p[k] = pl;
                pm2 = pm1;
                pm1 = pl;
            }

            // Sectoral terms carry SCALEF; rescalem holds u^m / SCALEF
            let mut pmm = sqr[2] * SCALEF;
            let mut rescalem = 1.0 / SCALEF;

            for m in 1..=lmax {
                rescalem *= u;
                pmm = phase * pmm * sqr[2 * m + 1] / sqr[2 * m];
                p[plm_index(m, m)] = pmm * rescalem;

                if m < lmax {
                    let mut pm2 = pmm;
                    let mut pm1 = z * sqr[2 * m + 3] * pmm;
                    p[plm_index(m + 1, m)] = pm1 * rescalem;

                    for l in m + 2..=lmax {
                        let k = plm_index(l, m);
                        let pl = self.f1[k] * z * pm1 - self.f2[k] * pm2;
                        p[k] = pl * rescalem;
                        pm2 = pm1;
                        pm1 = pl;
                    }
                }
            }
        }

        if self.normalization != Normalization::FourPi {
            for (value, factor) in p.iter_mut().zip(&self.renorm) {
                *value *= factor;
            }
        }

        Ok(())
    }

    /// Evaluate all `P_lm(z)` into a new vector.
    pub fn compute(&self, z: f64, csphase: CsPhase) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(plm_len(self.lmax));
        self.compute_into(z, csphase, &mut out)?;
        Ok(out)
    }
}

/// Evaluate all associated Legendre functions of degree up to `lmax` at `z`.
///
/// One-shot form of [`LegendreTable::compute`].
pub fn legendre(
    lmax: usize,
    z: f64,
    normalization: Normalization,
    csphase: CsPhase,
) -> Result<Vec<f64>> {
    LegendreTable::new(lmax, normalization)?.compute(z, csphase)
}
