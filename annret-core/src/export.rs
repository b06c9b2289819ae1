//! Annual return CSV export.
//!
//! Format: no header, one `year,return_pct` row per year, ascending.

use std::path::Path;
use thiserror::Error;

use crate::returns::AnnualReturn;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Render annual returns as header-less CSV.
///
/// `return_pct` uses `f64`'s `Display`: the shortest text that parses back to
/// the same value, with no fixed precision and no trailing `.0`
/// (`50.0` → `50`, `-38.4` → `-38.4`).
pub fn returns_to_csv(returns: &[AnnualReturn]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    for r in returns {
        wtr.write_record([r.year.to_string(), r.return_pct.to_string()])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // csv only emits the UTF-8 strings we gave it
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Write annual returns to `path` in a single write.
///
/// The body is rendered in full before the file is touched, so a failure
/// never leaves a partial file behind.
pub fn write_returns_csv(path: &Path, returns: &[AnnualReturn]) -> Result<(), ExportError> {
    let body = returns_to_csv(returns)?;
    std::fs::write(path, body).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_and_default_float_text() {
        let csv = returns_to_csv(&[
            AnnualReturn { year: 1999, return_pct: 78.94 },
            AnnualReturn { year: 2000, return_pct: -38.4 },
            AnnualReturn { year: 2001, return_pct: 50.0 },
            AnnualReturn { year: 2002, return_pct: 0.0 },
        ])
        .unwrap();
        assert_eq!(csv, "1999,78.94\n2000,-38.4\n2001,50\n2002,0\n");
    }

    #[test]
    fn empty_input_is_empty_file() {
        assert_eq!(returns_to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_returns_csv(&path, &[AnnualReturn { year: 2020, return_pct: 12.5 }]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2020,12.5\n");
    }

    #[test]
    fn write_into_missing_dir_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.csv");
        let err = write_returns_csv(&path, &[]).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(err.to_string().contains("out.csv"));
    }
}
