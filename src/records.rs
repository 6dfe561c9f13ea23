//! Measurement records.
//!
//! A [`Records`] table is loaded once before a run and never changes
//! afterwards. Each row carries an input feature vector and the expected
//! scalar output the model should reproduce.
//!
//! # Text format
//!
//! One row per line. Fields are separated by whitespace, `,` or `;`; the
//! last field is the expected output. Blank lines and lines starting with
//! `#` are skipped.
//!
//! ```text
//! # x    y     f(x, y)
//! -4.0  -4.0   0.1387
//! -4.0  -3.0   0.2455
//! ```

use crate::error::{GaError, Result};
use std::path::Path;
use tracing::debug;

/// A single measurement: inputs and the expected output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub inputs: Vec<f64>,
    pub output: f64,
}

impl Record {
    pub fn new(inputs: Vec<f64>, output: f64) -> Self {
        Self { inputs, output }
    }
}

/// Immutable, ordered table of measurement rows.
///
/// All rows share the same input dimensionality, which is at least 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Records {
    rows: Vec<Record>,
    input_dim: usize,
}

impl Records {
    /// Loads a dataset from a text file.
    ///
    /// Fails with [`GaError::Io`] when the file cannot be read and with
    /// [`GaError::Parse`] when its contents are malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            rows = records.len(),
            input_dim = records.input_dim(),
            "loaded records"
        );
        Ok(records)
    }

    /// Parses a dataset from in-memory text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut arity = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields = line
                .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
                .filter(|f| !f.is_empty())
                .map(|f| {
                    f.parse::<f64>()
                        .map_err(|_| GaError::parse(line_no, format!("invalid number {f:?}")))
                })
                .collect::<Result<Vec<f64>>>()?;

            if fields.len() < 2 {
                return Err(GaError::parse(
                    line_no,
                    "a row needs at least one input and one output",
                ));
            }
            match arity {
                None => arity = Some(fields.len()),
                Some(n) if n != fields.len() => {
                    return Err(GaError::parse(
                        line_no,
                        format!("expected {n} fields, found {}", fields.len()),
                    ));
                }
                Some(_) => {}
            }

            let mut inputs = fields;
            let output = inputs.pop().unwrap_or_default();
            rows.push(Record::new(inputs, output));
        }

        if rows.is_empty() {
            return Err(GaError::parse(0, "dataset contains no rows"));
        }
        Self::from_rows(rows)
    }

    /// Builds a table from rows assembled in code.
    ///
    /// Rows must be non-empty and agree on input dimensionality.
    pub fn from_rows(rows: Vec<Record>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(GaError::config("records must contain at least one row"));
        };
        let input_dim = first.inputs.len();
        if input_dim == 0 {
            return Err(GaError::config("records must have at least one input"));
        }
        if let Some(bad) = rows.iter().find(|r| r.inputs.len() != input_dim) {
            return Err(GaError::dimension_mismatch(input_dim, bad.inputs.len()));
        }
        Ok(Self { rows, input_dim })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false` for a constructed table; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of every row's input vector.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
