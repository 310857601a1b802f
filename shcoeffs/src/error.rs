//! Error types for the shcoeffs library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading, converting or evaluating coefficients.
#[derive(Error, Debug)]
pub enum ShError {
    /// IO error other than a missing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The coefficient file does not exist.
    #[error("coefficient file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The coefficient file could not be parsed.
    #[error("malformed coefficient file at line {line}: {reason}")]
    MalformedFile { line: usize, reason: String },

    /// A requested degree is larger than the storage allocated for it.
    #[error("degree {requested} exceeds allocated degree {allocated}")]
    DegreeExceedsAllocation { requested: usize, allocated: usize },

    /// Latitude outside [-90, 90] or a non-finite coordinate.
    #[error("invalid coordinates: lat={lat}, lon={lon} (valid: lat ±90°, finite lon)")]
    InvalidLatLon { lat: f64, lon: f64 },

    /// Normalization code unknown, or not usable at the requested degree.
    #[error("unsupported normalization: {reason}")]
    UnsupportedNormalization { reason: String },
}

impl ShError {
    /// Stable integer status for this error. Success is `0`.
    ///
    /// | Error | Code |
    /// |-------|------|
    /// | `FileNotFound` | 1 |
    /// | `MalformedFile` | 2 |
    /// | `DegreeExceedsAllocation` | 3 |
    /// | `InvalidLatLon` | 4 |
    /// | `UnsupportedNormalization` | 5 |
    /// | `Io` | 6 |
    pub fn status_code(&self) -> i32 {
        match self {
            ShError::FileNotFound { .. } => 1,
            ShError::MalformedFile { .. } => 2,
            ShError::DegreeExceedsAllocation { .. } => 3,
            ShError::InvalidLatLon { .. } => 4,
            ShError::UnsupportedNormalization { .. } => 5,
            ShError::Io(_) => 6,
        }
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ShError::MalformedFile {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`ShError`].
pub type Result<T> = std::result::Result<T, ShError>;

/// Status code of a result: `0` on success, [`ShError::status_code`] otherwise.
pub fn status_of<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.status_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShError::DegreeExceedsAllocation {
            requested: 20,
            allocated: 15,
        };
        assert!(err.to_string().contains("20"));
        assert!(err.to_string().contains("15"));

        let err = ShError::InvalidLatLon {
            lat: 91.0,
            lon: 0.0,
        };
        assert!(err.to_string().contains("91"));

        let err = ShError::FileNotFound {
            path: PathBuf::from("MarsTopo719.shape"),
        };
        assert!(err.to_string().contains("MarsTopo719.shape"));

        let err = ShError::malformed(7, "m > l");
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_status_codes() {
        let ok: Result<f64> = Ok(1.0);
        assert_eq!(status_of(&ok), 0);

        let err: Result<f64> = Err(ShError::FileNotFound {
            path: PathBuf::from("missing"),
        });
        assert_eq!(status_of(&err), 1);

        assert_eq!(ShError::malformed(1, "x").status_code(), 2);
        assert_eq!(
            ShError::UnsupportedNormalization {
                reason: "code 9".into()
            }
            .status_code(),
            5
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ShError::from(io).status_code(), 6);
    }
}
