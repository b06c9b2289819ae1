//! Fetch → aggregate → write.
//!
//! The output file is only created once a provider has returned data and
//! every year's return has been computed.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::fallback::{fetch_with_fallback, AllProvidersFailed};
use crate::data::provider::{DataProvider, DataSource, FetchProgress, FetchRequest};
use crate::export::{write_returns_csv, ExportError};
use crate::returns::{annual_returns, AnnualReturn, ReturnError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] AllProvidersFailed),

    #[error("return computation failed: {0}")]
    Computation(#[from] ReturnError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub out_path: PathBuf,
    /// Provider that supplied the data.
    pub source: DataSource,
    pub rows: usize,
    pub returns: Vec<AnnualReturn>,
}

/// Run the whole batch: try providers in order, aggregate by year, write CSV.
pub fn run_pipeline(
    request: &FetchRequest,
    providers: &[&dyn DataProvider],
    out_path: &Path,
    progress: &dyn FetchProgress,
) -> Result<PipelineReport, PipelineError> {
    let fetched = fetch_with_fallback(providers, request, progress)?;
    log::debug!(
        "{} rows for {} from {} ({} to {})",
        fetched.series.len(),
        fetched.symbol,
        fetched.source,
        fetched.series.first_date(),
        fetched.series.last_date()
    );

    let returns = annual_returns(&fetched.series)?;
    write_returns_csv(out_path, &returns)?;

    Ok(PipelineReport {
        out_path: out_path.to_path_buf(),
        source: fetched.source,
        rows: fetched.series.len(),
        returns,
    })
}
