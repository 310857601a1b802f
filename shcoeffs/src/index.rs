//! Linear indexing of spherical-harmonic coefficients.
//!
//! Every flattened coefficient array in this crate is addressed through the
//! functions in this module, so the layout arithmetic lives in one place.
//!
//! # Cilm Layout
//!
//! A [`ShCoeffs`](crate::ShCoeffs) store of maximum degree `L` holds
//! `2 × (L+1) × (L+1)` values in row-major `[component][l][m]` order:
//!
//! ```text
//! offset = (component × (L+1) + l) × (L+1) + m
//! ```
//!
//! # Vector Layout
//!
//! The flat vector holds `(L+1)²` values, degree-major. Within degree `l`,
//! orders run `m = 0..=l`, each cosine term followed by its sine companion
//! (there is no sine term for `m = 0`):
//!
//! ```text
//! C(l,0) -> l²
//! C(l,m) -> l² + 2m - 1     (m ≥ 1)
//! S(l,m) -> l² + 2m         (m ≥ 1)
//! ```

/// Which of the two coefficient sets a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Cosine coefficients `C_lm` (index 0).
    Cosine,
    /// Sine coefficients `S_lm` (index 1).
    Sine,
}

impl Component {
    /// Both components, in storage order.
    pub const ALL: [Component; 2] = [Component::Cosine, Component::Sine];

    /// Storage index of this component (0 for cosine, 1 for sine).
    pub fn index(self) -> usize {
        match self {
            Component::Cosine => 0,
            Component::Sine => 1,
        }
    }

    /// Short label used in exports: `"C"` or `"S"`.
    pub fn label(self) -> &'static str {
        match self {
            Component::Cosine => "C",
            Component::Sine => "S",
        }
    }
}

/// Number of values in a Cilm array of maximum degree `lmax`.
///
/// ```
/// use shcoeffs::index::cilm_len;
///
/// assert_eq!(cilm_len(0), 2);
/// assert_eq!(cilm_len(15), 2 * 16 * 16);
/// ```
pub fn cilm_len(lmax: usize) -> usize {
    let dim = lmax + 1;
    2 * dim * dim
}

/// Like [`cilm_len`], but `None` when the length does not fit in `usize`.
///
/// ```
/// use shcoeffs::index::checked_cilm_len;
///
/// assert_eq!(checked_cilm_len(15), Some(512));
/// assert_eq!(checked_cilm_len(usize::MAX), None);
/// ```
pub fn checked_cilm_len(lmax: usize) -> Option<usize> {
    let dim = lmax.checked_add(1)?;
    dim.checked_mul(dim)?.checked_mul(2)
}

/// Offset of `(component, l, m)` in a Cilm array of maximum degree `lmax`.
///
/// The caller guarantees `l <= lmax` and `m <= lmax`.
pub fn cilm_offset(component: Component, l: usize, m: usize, lmax: usize) -> usize {
    debug_assert!(l <= lmax && m <= lmax);
    let dim = lmax + 1;
    (component.index() * dim + l) * dim + m
}

/// Number of values in a flat vector of maximum degree `lmax`.
///
/// ```
/// use shcoeffs::index::vector_len;
///
/// assert_eq!(vector_len(0), 1);
/// assert_eq!(vector_len(15), 256);
/// ```
pub fn vector_len(lmax: usize) -> usize {
    (lmax + 1) * (lmax + 1)
}

/// Position of `(component, l, m)` in the flat vector layout.
///
/// Returns `None` for `m > l` and for the sine term of order 0, neither of
/// which is stored.
///
/// ```
/// use shcoeffs::index::{vector_index, Component};
///
/// assert_eq!(vector_index(Component::Cosine, 0, 0), Some(0));
/// assert_eq!(vector_index(Component::Cosine, 1, 0), Some(1));
/// assert_eq!(vector_index(Component::Cosine, 1, 1), Some(2));
/// assert_eq!(vector_index(Component::Sine, 1, 1), Some(3));
/// assert_eq!(vector_index(Component::Sine, 2, 0), None);
/// ```
pub fn vector_index(component: Component, l: usize, m: usize) -> Option<usize> {
    if m > l {
        return None;
    }
    let base = l * l;
    match (component, m) {
        (Component::Cosine, 0) => Some(base),
        (Component::Sine, 0) => None,
        (Component::Cosine, m) => Some(base + 2 * m - 1),
        (Component::Sine, m) => Some(base + 2 * m),
    }
}

/// Inverse of [`vector_index`]: the `(component, l, m)` stored at `index`.
///
/// ```
/// use shcoeffs::index::{vector_position, Component};
///
/// assert_eq!(vector_position(0), (Component::Cosine, 0, 0));
/// assert_eq!(vector_position(3), (Component::Sine, 1, 1));
/// assert_eq!(vector_position(8), (Component::Sine, 2, 2));
/// ```
pub fn vector_position(index: usize) -> (Component, usize, usize) {
    let l = isqrt(index);
    let r = index - l * l;
    if r == 0 {
        (Component::Cosine, l, 0)
    } else if r % 2 == 1 {
        (Component::Cosine, l, r.div_ceil(2))
    } else {
        (Component::Sine, l, r / 2)
    }
}

/// Largest degree whose flat vector fits in `len` values.
///
/// Returns `None` when `len` is zero.
///
/// ```
/// use shcoeffs::index::degree_for_vector_len;
///
/// assert_eq!(degree_for_vector_len(0), None);
/// assert_eq!(degree_for_vector_len(1), Some(0));
/// assert_eq!(degree_for_vector_len(15), Some(2));
/// assert_eq!(degree_for_vector_len(16), Some(3));
/// ```
pub fn degree_for_vector_len(len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(isqrt(len) - 1)
    }
}

/// Integer square root (floor).
fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cilm_offsets_are_dense() {
        let lmax = 4;
        let mut seen = vec![false; cilm_len(lmax)];
        for component in Component::ALL {
            for l in 0..=lmax {
                for m in 0..=lmax {
                    let offset = cilm_offset(component, l, m, lmax);
                    assert!(!seen[offset], "offset {} assigned twice", offset);
                    seen[offset] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_cilm_offset_row_major() {
        // [component][l][m] with dim = 16
        assert_eq!(cilm_offset(Component::Cosine, 0, 0, 15), 0);
        assert_eq!(cilm_offset(Component::Cosine, 0, 1, 15), 1);
        assert_eq!(cilm_offset(Component::Cosine, 1, 0, 15), 16);
        assert_eq!(cilm_offset(Component::Sine, 0, 0, 15), 256);
        assert_eq!(cilm_offset(Component::Sine, 15, 15, 15), 511);
    }

    #[test]
    fn test_vector_index_covers_every_slot_once() {
        let lmax = 12;
        let mut seen = vec![false; vector_len(lmax)];
        for l in 0..=lmax {
            for m in 0..=l {
                for component in Component::ALL {
                    if let Some(i) = vector_index(component, l, m) {
                        assert!(!seen[i]);
                        seen[i] = true;
                    }
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_vector_position_inverts_index() {
        for i in 0..vector_len(30) {
            let (component, l, m) = vector_position(i);
            assert!(m <= l);
            assert_eq!(vector_index(component, l, m), Some(i));
        }
    }

    #[test]
    fn test_degree_ordering() {
        // The last slot of degree l is S(l,l), immediately before C(l+1,0)
        for l in 0..10 {
            let last = if l == 0 {
                vector_index(Component::Cosine, 0, 0)
            } else {
                vector_index(Component::Sine, l, l)
            };
            let next = vector_index(Component::Cosine, l + 1, 0).unwrap();
            assert_eq!(last.unwrap() + 1, next);
        }
    }

    #[test]
    fn test_invalid_orders() {
        assert_eq!(vector_index(Component::Cosine, 2, 3), None);
        assert_eq!(vector_index(Component::Sine, 0, 0), None);
    }

    #[test]
    fn test_isqrt() {
        for n in 0..2000usize {
            let r = isqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n);
        }
    }
}
