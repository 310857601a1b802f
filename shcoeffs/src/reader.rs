//! Reading spherical-harmonic coefficient files.
//!
//! This module provides [`ShReader`] for the plain-text coefficient format
//! used by SHTOOLS (`.shape`, `.sh` and similar files):
//!
//! ```text
//! [skipped lines]
//! [header line: any number of real values]
//! l  m  C_lm  S_lm  [σC_lm  σS_lm]
//! ...
//! ```
//!
//! Columns may be separated by whitespace or commas, and Fortran `D`
//! exponents (`1.0D+03`) are accepted. Records are expected in increasing
//! degree; reading stops at the first record above the maximum degree
//! requested by the caller.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::coeffs::ShCoeffs;
use crate::error::{Result, ShError};
use crate::index::Component;

/// Contents of a coefficient file.
#[derive(Debug, Clone, PartialEq)]
pub struct ShFile {
    /// Coefficients, allocated at the requested maximum degree (or at
    /// [`Self::lmax`] when no maximum was requested).
    pub coeffs: ShCoeffs,
    /// Highest degree actually read from the file.
    pub lmax: usize,
    /// Uncertainties of the coefficients, when read with
    /// [`ShReader::errors`].
    pub errors: Option<ShCoeffs>,
    /// Values of the header line, when read with [`ShReader::header`].
    pub header: Option<Vec<f64>>,
}

/// Builder-style reader for coefficient files.
///
/// # Example
///
/// ```ignore
/// use shcoeffs::ShReader;
///
/// let file = ShReader::new("MarsTopo719.shape").lmax(15).read()?;
/// assert!(file.lmax <= 15);
/// println!("C00 = {}", file.coeffs.cos(0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct ShReader {
    path: PathBuf,
    lmax: Option<usize>,
    skip: usize,
    header: bool,
    errors: bool,
    strict: bool,
}

/// One parsed coefficient line.
struct Record {
    l: usize,
    m: usize,
    values: [f64; 4],
}

impl ShReader {
    /// Create a reader for `path` with default settings: no degree limit,
    /// no skipped lines, no header, no error columns.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lmax: None,
            skip: 0,
            header: false,
            errors: false,
            strict: false,
        }
    }

    /// Maximum degree to allocate for. Records of higher degree end the read.
    pub fn lmax(mut self, lmax: usize) -> Self {
        self.lmax = Some(lmax);
        self
    }

    /// Number of lines to skip at the start of the file.
    pub fn skip_lines(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Whether the first line after the skipped ones is a header line.
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Whether each record carries two extra uncertainty columns.
    pub fn errors(mut self, errors: bool) -> Self {
        self.errors = errors;
        self
    }

    /// Fail with [`ShError::DegreeExceedsAllocation`] instead of stopping
    /// when a record exceeds the maximum degree.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// - [`ShError::FileNotFound`] if the path does not exist
    /// - [`ShError::Io`] if the file cannot be opened or mapped
    /// - [`ShError::MalformedFile`] if the content cannot be parsed
    /// - [`ShError::DegreeExceedsAllocation`] in strict mode, if the file
    ///   holds degrees above [`Self::lmax`]
    pub fn read(&self) -> Result<ShFile> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ShError::FileNotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if file.metadata()?.len() == 0 {
            return Err(ShError::malformed(0, "empty file"));
        }

        // SAFETY: The mapping is read-only, dropped before this function
        // returns, and never handed out to callers.
        let mmap = unsafe { Mmap::map(&file)? };

        let text = std::str::from_utf8(&mmap).map_err(|e| {
            let line = mmap[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            ShError::malformed(line, "invalid UTF-8")
        })?;

        let parsed = self.parse_str(text)?;
        debug!(
            path = %self.path.display(),
            lmax = parsed.lmax,
            allocated = parsed.coeffs.lmax(),
            "read coefficient file"
        );
        Ok(parsed)
    }

    /// Parse coefficient records from in-memory text with this reader's
    /// settings.
    pub fn parse_str(&self, text: &str) -> Result<ShFile> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
        let mut last_line = 0;

        for _ in 0..self.skip {
            match lines.next() {
                Some((n, _)) => last_line = n,
                None => return Err(ShError::malformed(last_line, "fewer lines than skip count")),
            }
        }

        let mut header = None;
        if self.header {
            let (n, line) = lines
                .by_ref()
                .find(|(_, line)| !line.trim().is_empty())
                .ok_or_else(|| ShError::malformed(last_line, "missing header line"))?;
            let values = split_fields(line)
                .map(|field| parse_real(n, field))
                .collect::<Result<Vec<_>>>()?;
            header = Some(values);
            last_line = n;
        }

        let columns = if self.errors { 6 } else { 4 };
        let mut records = Vec::new();
        let mut achieved = 0;
        let mut achieved_line = 0;

        for (n, line) in lines {
            last_line = n;
            let fields: Vec<&str> = split_fields(line).collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < columns {
                return Err(ShError::malformed(
                    n,
                    format!("expected {} columns, found {}", columns, fields.len()),
                ));
            }

            let l = parse_index(n, fields[0], "degree")?;
            let m = parse_index(n, fields[1], "order")?;
            if m > l {
                return Err(ShError::malformed(
                    n,
                    format!("order {} exceeds degree {}", m, l),
                ));
            }

            if let Some(limit) = self.lmax {
                if l > limit {
                    if self.strict {
                        return Err(ShError::DegreeExceedsAllocation {
                            requested: l,
                            allocated: limit,
                        });
                    }
                    debug!(limit, line = n, "coefficient read stopped at maximum degree");
                    break;
                }
            }

            let mut values = [0.0; 4];
            for (value, field) in values.iter_mut().zip(&fields[2..columns]) {
                *value = parse_real(n, field)?;
            }

            if l > achieved || records.is_empty() {
                achieved = l;
                achieved_line = n;
            }
            records.push(Record { l, m, values });
        }

        if records.is_empty() {
            return Err(ShError::malformed(last_line, "no coefficient records"));
        }

        let allocated = self.lmax.unwrap_or(achieved);
        let alloc = || match self.lmax {
            Some(_) => ShCoeffs::try_zeros(allocated),
            None => ShCoeffs::try_zeros(allocated).map_err(|_| {
                ShError::malformed(achieved_line, format!("degree {} is too large", achieved))
            }),
        };
        let mut coeffs = alloc()?;
        let mut errors = if self.errors { Some(alloc()?) } else { None };

        for record in &records {
            let [c, s, sigma_c, sigma_s] = record.values;
            coeffs.set(Component::Cosine, record.l, record.m, c);
            coeffs.set(Component::Sine, record.l, record.m, s);
            if let Some(errors) = errors.as_mut() {
                errors.set(Component::Cosine, record.l, record.m, sigma_c);
                errors.set(Component::Sine, record.l, record.m, sigma_s);
            }
        }

        Ok(ShFile {
            coeffs,
            lmax: achieved,
            errors,
            header,
        })
    }
}

/// Read a coefficient file, allocating for degrees up to `lmax`.
///
/// Shorthand for `ShReader::new(path).lmax(lmax).read()`.
pub fn read<P: AsRef<Path>>(path: P, lmax: usize) -> Result<ShFile> {
    ShReader::new(path).lmax(lmax).read()
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
}

fn parse_index(line: usize, field: &str, what: &str) -> Result<usize> {
    field
        .parse::<usize>()
        .map_err(|_| ShError::malformed(line, format!("invalid {} '{}'", what, field)))
}

fn parse_real(line: usize, field: &str) -> Result<f64> {
    let value = match field.parse::<f64>() {
        Ok(v) => v,
        Err(_) => field
            .replace(['D', 'd'], "E")
            .parse::<f64>()
            .map_err(|_| ShError::malformed(line, format!("invalid number '{}'", field)))?,
    };
    if !value.is_finite() {
        return Err(ShError::malformed(
            line,
            format!("non-finite value '{}'", field),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
0 0 3396000.0 0.0
1 0 -1.5 0.0
1 1 2.5 -3.5
2 0 0.25 0.0
2 1 0.5 0.75
2 2 -0.125 1.0
3 0 9.0 0.0
";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_whole_file() {
        let file = write_temp(SAMPLE);
        let parsed = ShReader::new(file.path()).read().unwrap();

        assert_eq!(parsed.lmax, 3);
        assert_eq!(parsed.coeffs.lmax(), 3);
        assert_eq!(parsed.coeffs.cos(0, 0), 3396000.0);
        assert_eq!(parsed.coeffs.sin(1, 1), -3.5);
        assert_eq!(parsed.coeffs.cos(3, 0), 9.0);
        assert!(parsed.errors.is_none());
        assert!(parsed.header.is_none());
    }

    #[test]
    fn test_read_truncates_at_hint() {
        let file = write_temp(SAMPLE);
        let parsed = read(file.path(), 2).unwrap();

        assert_eq!(parsed.lmax, 2);
        assert_eq!(parsed.coeffs.lmax(), 2);
        assert_eq!(parsed.coeffs.cos(2, 2), -0.125);
    }

    #[test]
    fn test_allocation_larger_than_file() {
        let file = write_temp(SAMPLE);
        let parsed = read(file.path(), 15).unwrap();

        assert_eq!(parsed.lmax, 3);
        assert_eq!(parsed.coeffs.lmax(), 15);
        assert_eq!(parsed.coeffs.cos(15, 15), 0.0);
    }

    #[test]
    fn test_strict_rejects_higher_degrees() {
        let file = write_temp(SAMPLE);
        let result = ShReader::new(file.path()).lmax(2).strict(true).read();

        match result {
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
    fn test_huge_degree_is_malformed() {
        let reader = ShReader::new("unused");
        for text in [
            "0 0 1.0 0.0\n50000000 0 1.0 0.0\n",
            "0 0 1.0 0.0\n5000000000 0 1.0 0.0\n1 0 2.0 0.0\n",
        ] {
            match reader.parse_str(text) {
                Err(ShError::MalformedFile { line, .. }) => assert_eq!(line, 2),
                other => panic!("Expected MalformedFile, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_huge_hint_exceeds_allocation() {
        let result = ShReader::new("unused")
            .lmax(50_000_000)
            .parse_str("0 0 1.0 0.0\n");

        match result {
            Err(ShError::DegreeExceedsAllocation { requested, .. }) => {
                assert_eq!(requested, 50_000_000)
            }
            other => panic!("Expected DegreeExceedsAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = read("/nonexistent/dir/MarsTopo719.shape", 15);
        match result {
            Err(ShError::FileNotFound { path }) => {
                assert!(path.ends_with("MarsTopo719.shape"));
            }
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let file = write_temp("");
        let result = read(file.path(), 15);
        assert!(matches!(result, Err(ShError::MalformedFile { .. })));
    }

    #[test]
    fn test_header_and_skip() {
        let content = "# produced by a test\n3396000.0, 1.0, 3, 3\n0, 0, 1.0, 0.0\n1, 1, 2.0, 3.0\n";
        let file = write_temp(content);
        let parsed = ShReader::new(file.path())
            .skip_lines(1)
            .header(true)
            .read()
            .unwrap();

        assert_eq!(parsed.header, Some(vec![3396000.0, 1.0, 3.0, 3.0]));
        assert_eq!(parsed.lmax, 1);
        assert_eq!(parsed.coeffs.sin(1, 1), 3.0);
    }

    #[test]
    fn test_error_columns() {
        let content = "0 0 1.0 0.0 0.01 0.0\n1 1 2.0 3.0 0.02 0.03\n";
        let parsed = ShReader::new("unused")
            .errors(true)
            .parse_str(content)
            .unwrap();

        let errors = parsed.errors.unwrap();
        assert_eq!(errors.cos(0, 0), 0.01);
        assert_eq!(errors.sin(1, 1), 0.03);
    }

    #[test]
    fn test_error_columns_missing() {
        let result = ShReader::new("unused")
            .errors(true)
            .parse_str("0 0 1.0 0.0\n");
        match result {
            Err(ShError::MalformedFile { line, .. }) => assert_eq!(line, 1),
            other => panic!("Expected MalformedFile, got {:?}", other),
        }
    }

    #[test]
    fn test_fortran_exponents() {
        let parsed = ShReader::new("unused")
            .parse_str("0 0 3.3960D+06 0.0d0\n")
            .unwrap();
        assert_eq!(parsed.coeffs.cos(0, 0), 3.396e6);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let parsed = ShReader::new("unused")
            .parse_str("\n0 0 1.0 0.0\n\n   \n1 0 2.0 0.0\n")
            .unwrap();
        assert_eq!(parsed.lmax, 1);
        assert_eq!(parsed.coeffs.cos(1, 0), 2.0);
    }

    #[test]
    fn test_malformed_records() {
        let reader = ShReader::new("unused");

        let cases = [
            ("0 0 1.0\n", 1),               // too few columns
            ("0 0 1.0 0.0\n1 2 1.0 0.0\n", 2), // m > l
            ("0 0 1.0 0.0\n-1 0 1.0 0.0\n", 2), // negative degree
            ("0 0 abc 0.0\n", 1),           // non-numeric
            ("0 0 NaN 0.0\n", 1),           // non-finite
        ];

        for (content, expected_line) in cases {
            match reader.parse_str(content) {
                Err(ShError::MalformedFile { line, .. }) => {
                    assert_eq!(line, expected_line, "content: {:?}", content)
                }
                other => panic!("Expected MalformedFile for {:?}, got {:?}", content, other),
            }
        }
    }

    #[test]
    fn test_no_records() {
        let result = ShReader::new("unused").parse_str("\n\n");
        assert!(matches!(result, Err(ShError::MalformedFile { .. })));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"0 0 1.0 0.0\n1 0 \xff\xfe 0.0\n").unwrap();

        match read(file.path(), 5) {
            Err(ShError::MalformedFile { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected MalformedFile, got {:?}", other),
        }
    }
}
