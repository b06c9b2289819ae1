//! Fixed run configuration: instrument, provider endpoints, CLI defaults.

use std::time::Duration;

/// Instrument whose history is fetched.
pub const DEFAULT_SYMBOL: &str = "QQQ";

/// Default `--start` date.
pub const DEFAULT_START: &str = "1999-03-10";

/// Default `--out` path.
pub const DEFAULT_OUT: &str = "qqq_annual_returns.csv";

/// Yahoo Finance v8 chart endpoint; the symbol is appended as a path segment.
pub const YAHOO_CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Full daily QQQ history from Stooq. Not parameterized by symbol or date.
pub const STOOQ_FALLBACK_URL: &str = "https://stooq.com/q/d/l/?s=qqq.us&i=d";

/// Connection settings shared by both providers.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Ticker requested from the primary provider.
    pub symbol: String,

    /// Base URL of the primary (Yahoo chart) API.
    pub yahoo_base_url: String,

    /// Fixed CSV URL of the fallback provider.
    pub fallback_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            yahoo_base_url: YAHOO_CHART_BASE.to_string(),
            fallback_url: STOOQ_FALLBACK_URL.to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Build the blocking HTTP client both providers use.
pub(crate) fn http_client(
    config: &FetchConfig,
) -> Result<reqwest::blocking::Client, crate::data::DataError> {
    reqwest::blocking::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| crate::data::DataError::ClientInit(e.to_string()))
}
