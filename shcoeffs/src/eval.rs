//! Evaluation of spherical-harmonic expansions at points and on grids.
//!
//! The value of an expansion truncated at degree `L` at latitude `φ` and
//! longitude `λ` is
//!
//! ```text
//! f(φ, λ) = Σ_{l=0}^{L} Σ_{m=0}^{l} [C_lm cos(mλ) + S_lm sin(mλ)] · P_lm(sin φ)
//! ```
//!
//! where `P_lm` follows the [`Normalization`] and [`CsPhase`] chosen in
//! [`EvalOptions`]. Options are passed explicitly with every evaluator; there
//! is no shared normalization state between calls.

use tracing::debug;

use crate::coeffs::ShCoeffs;
use crate::error::{Result, ShError};
use crate::legendre::{plm_index, CsPhase, LegendreTable, Normalization};

/// How stored coefficients relate to the expansion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeScaling {
    /// Coefficients are used as stored.
    #[default]
    None,
    /// Coefficients were pre-multiplied by `1/(2l+1)`; each degree is
    /// multiplied by `2l+1` during evaluation.
    InverseDegree,
}

impl DegreeScaling {
    fn factor(self, l: usize) -> f64 {
        match self {
            DegreeScaling::None => 1.0,
            DegreeScaling::InverseDegree => (2 * l + 1) as f64,
        }
    }
}

/// Evaluation settings. Every field has a documented default.
///
/// | Field | Default |
/// |-------|---------|
/// | `normalization` | [`Normalization::FourPi`] |
/// | `csphase` | [`CsPhase::Exclude`] |
/// | `scaling` | [`DegreeScaling::None`] |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalOptions {
    /// Normalization of the basis functions.
    pub normalization: Normalization,
    /// Condon-Shortley phase convention.
    pub csphase: CsPhase,
    /// Degree scaling of the stored coefficients.
    pub scaling: DegreeScaling,
}

impl EvalOptions {
    /// Options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the Condon-Shortley phase convention.
    pub fn with_csphase(mut self, csphase: CsPhase) -> Self {
        self.csphase = csphase;
        self
    }

    /// Set the degree scaling.
    pub fn with_scaling(mut self, scaling: DegreeScaling) -> Self {
        self.scaling = scaling;
        self
    }
}

/// Values of an expansion on an equally spaced latitude/longitude grid.
///
/// Row `i` is latitude `90 - i·Δ` and column `j` is longitude `j·Δ`, with
/// `Δ = 180/nlat` and `nlon = 2·nlat`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Vec<f64>,
}

impl Grid {
    /// Number of latitude rows.
    pub fn nlat(&self) -> usize {
        self.lats.len()
    }

    /// Number of longitude columns.
    pub fn nlon(&self) -> usize {
        self.lons.len()
    }

    /// Latitude of each row in degrees.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude of each column in degrees.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Row-major values, `nlat × nlon`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.nlat() && j < self.nlon(), "({}, {}) out of range", i, j);
        self.values[i * self.nlon() + j]
    }

    /// Smallest value, or `None` for an empty grid.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Largest value, or `None` for an empty grid.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Evaluator for one coefficient store, truncation degree and set of options.
///
/// The evaluator borrows the coefficients immutably, so several evaluators
/// may share one store across threads.
///
/// # Example
///
/// ```
/// use shcoeffs::{Component, EvalOptions, GridEvaluator, ShCoeffs};
///
/// let mut coeffs = ShCoeffs::zeros(1);
/// coeffs.set(Component::Cosine, 0, 0, 3396000.0);
///
/// let evaluator = GridEvaluator::new(&coeffs, 1, EvalOptions::default()).unwrap();
/// assert_eq!(evaluator.evaluate(10.0, 30.0).unwrap(), 3396000.0);
/// ```
#[derive(Debug, Clone)]
pub struct GridEvaluator<'a> {
    coeffs: &'a ShCoeffs,
    lmax: usize,
    options: EvalOptions,
    table: LegendreTable,
}

impl<'a> GridEvaluator<'a> {
    /// Create an evaluator truncating `coeffs` at degree `lmax`.
    ///
    /// # Errors
    ///
    /// - [`ShError::DegreeExceedsAllocation`] if `lmax` is larger than the
    ///   degree of `coeffs`
    /// - [`ShError::UnsupportedNormalization`] if the normalization cannot
    ///   be evaluated at `lmax`
    pub fn new(coeffs: &'a ShCoeffs, lmax: usize, options: EvalOptions) -> Result<Self> {
        if lmax > coeffs.lmax() {
            return Err(ShError::DegreeExceedsAllocation {
                requested: lmax,
                allocated: coeffs.lmax(),
            });
        }
        let table = LegendreTable::new(lmax, options.normalization)?;

        Ok(Self {
            coeffs,
            lmax,
            options,
            table,
        })
    }

    /// Truncation degree.
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Options in use.
    pub fn options(&self) -> EvalOptions {
        self.options
    }

    /// Evaluate the expansion at one point.
    ///
    /// Longitudes are wrapped into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`ShError::InvalidLatLon`] if the latitude is outside
    /// `[-90, 90]` or either coordinate is not finite.
    pub fn evaluate(&self, lat: f64, lon: f64) -> Result<f64> {
        let lon = validate_coords(lat, lon)?;
        let p = self
            .table
            .compute(lat.to_radians().sin(), self.options.csphase)?;
        let sums = self.order_sums(&p);
        Ok(synthesize(&sums, lon))
    }

    /// Evaluate a batch of `(lat, lon)` points.
    ///
    /// Returns one value per input point, `default` where a point is rejected.
    pub fn evaluate_batch(&self, coords: &[(f64, f64)], default: f64) -> Vec<f64> {
        coords
            .iter()
            .map(|&(lat, lon)| self.evaluate(lat, lon).unwrap_or(default))
            .collect()
    }

    /// Number of latitude rows that samples this degree without aliasing:
    /// `2·(lmax+1)`.
    pub fn default_nlat(&self) -> usize {
        2 * (self.lmax + 1)
    }

    /// Evaluate the expansion on an equally spaced grid with `nlat` rows and
    /// `2·nlat` columns (see [`Grid`]).
    ///
    /// Legendre functions are computed once per row. An `nlat` of zero
    /// yields an empty grid.
    pub fn make_grid(&self, nlat: usize) -> Result<Grid> {
        if nlat == 0 {
            return Ok(Grid {
                lats: Vec::new(),
                lons: Vec::new(),
                values: Vec::new(),
            });
        }

        let step = 180.0 / nlat as f64;
        let nlon = 2 * nlat;
        let lats: Vec<f64> = (0..nlat).map(|i| 90.0 - i as f64 * step).collect();
        let lons: Vec<f64> = (0..nlon).map(|j| j as f64 * step).collect();

        let mut values = Vec::with_capacity(nlat * nlon);
        let mut p = Vec::new();
        for &lat in &lats {
            self.table
                .compute_into(lat.to_radians().sin(), self.options.csphase, &mut p)?;
            let sums = self.order_sums(&p);
            values.extend(lons.iter().map(|&lon| synthesize(&sums, lon)));
        }

        debug!(nlat, nlon, lmax = self.lmax, "evaluated grid");
        Ok(Grid { lats, lons, values })
    }

    /// `(Σ_l C_lm P_lm, Σ_l S_lm P_lm)` for each order `m`.
    fn order_sums(&self, p: &[f64]) -> Vec<(f64, f64)> {
        (0..=self.lmax)
            .map(|m| {
                (m..=self.lmax).fold((0.0, 0.0), |(a, b), l| {
                    let w = p[plm_index(l, m)] * self.options.scaling.factor(l);
                    (a + self.coeffs.cos(l, m) * w, b + self.coeffs.sin(l, m) * w)
                })
            })
            .collect()
    }
}

/// Evaluate the expansion of `coeffs`, truncated at degree `lmax`, at one
/// point.
///
/// One-shot form of [`GridEvaluator::evaluate`]; errors are reported in the
/// order degree, normalization, coordinates.
pub fn make_grid_point(
    coeffs: &ShCoeffs,
    lmax: usize,
    lat: f64,
    lon: f64,
    options: &EvalOptions,
) -> Result<f64> {
    GridEvaluator::new(coeffs, lmax, *options)?.evaluate(lat, lon)
}

/// Check coordinates and return the longitude wrapped into `[0, 360)`.
fn validate_coords(lat: f64, lon: f64) -> Result<f64> {
    if !lon.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ShError::InvalidLatLon { lat, lon });
    }
    Ok(lon.rem_euclid(360.0))
}

/// Sum the per-order terms at longitude `lon` (degrees).
fn synthesize(sums: &[(f64, f64)], lon: f64) -> f64 {
    let lambda = lon.to_radians();
    sums.iter()
        .enumerate()
        .map(|(m, &(a, b))| {
            let (sin_m, cos_m) = (m as f64 * lambda).sin_cos();
            a * cos_m + b * sin_m
        })
        .sum()
}
