//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, Stooq CSV)
//! so the fallback chain can try them in order and tests can substitute mocks.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use super::series::PriceSeries;

/// Structured error types for fetch operations.
///
/// Every variant is a fetch failure: the fallback chain treats them all the
/// same way and moves on to the next provider.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("HTTP {status} from {provider}")]
    Http { provider: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned no price rows")]
    EmptySeries,

    #[error("failed to initialise HTTP client: {0}")]
    ClientInit(String),
}

/// Where a price series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    YahooFinance,
    Stooq,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::Stooq => "stooq",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to fetch: a symbol and an optional half-open `[start, end)` date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub start: Option<NaiveDate>,
    /// Exclusive upper bound. `None` means "through the latest available bar".
    pub end: Option<NaiveDate>,
}

impl FetchRequest {
    pub fn new(symbol: impl Into<String>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }

    /// True if `date` falls inside the requested window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date < e)
    }
}

/// Result of a successful fetch from a single provider.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Trait for price providers.
///
/// One call to `fetch` is one attempt: implementations must not retry.
pub trait DataProvider {
    /// Human-readable name of this provider, used in status lines.
    fn name(&self) -> &str;

    /// Fetch a daily close series. An empty series must be reported as
    /// [`DataError::EmptySeries`], never as `Ok`.
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, DataError>;
}

/// Progress callback for the fallback chain.
pub trait FetchProgress {
    /// Called before a provider is tried.
    fn on_attempt(&self, provider: &str, index: usize, total: usize);

    /// Called when a provider fails. `has_next` is true if another provider follows.
    fn on_failure(&self, provider: &str, error: &DataError, has_next: bool);

    /// Called when a provider returns a usable series.
    fn on_success(&self, provider: &str, rows: usize);
}

/// Progress reporter that prints status lines to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_attempt(&self, provider: &str, index: usize, total: usize) {
        if index == 0 {
            println!("Trying {provider}...");
        } else {
            println!("[{}/{}] Falling back to {provider}...", index + 1, total);
        }
    }

    fn on_failure(&self, provider: &str, error: &DataError, has_next: bool) {
        if has_next {
            println!("  FAIL: {provider}: {error}");
        } else {
            println!("  FAIL: {provider} also failed: {error}");
        }
    }

    fn on_success(&self, provider: &str, rows: usize) {
        println!("  OK: {provider} returned {rows} rows");
    }
}

/// Progress reporter that discards all events.
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn on_attempt(&self, _provider: &str, _index: usize, _total: usize) {}
    fn on_failure(&self, _provider: &str, _error: &DataError, _has_next: bool) {}
    fn on_success(&self, _provider: &str, _rows: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn request_window_is_half_open() {
        let req = FetchRequest::new("QQQ", Some(d(2020, 1, 1)), Some(d(2021, 1, 1)));
        assert!(req.contains(d(2020, 1, 1)));
        assert!(req.contains(d(2020, 12, 31)));
        assert!(!req.contains(d(2021, 1, 1)));
        assert!(!req.contains(d(2019, 12, 31)));
    }

    #[test]
    fn unbounded_request_contains_everything() {
        let req = FetchRequest::new("QQQ", None, None);
        assert!(req.contains(d(1900, 1, 1)));
        assert!(req.contains(d(2100, 1, 1)));
    }

    #[test]
    fn source_names_are_stable() {
        assert_eq!(DataSource::YahooFinance.to_string(), "yahoo_finance");
        assert_eq!(DataSource::Stooq.to_string(), "stooq");
    }
}
