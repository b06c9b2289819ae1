//! Stooq CSV provider (fallback).
//!
//! Downloads a fixed CSV URL holding the full daily history of one instrument.
//! The URL is not parameterized: symbol and date window from the request are
//! ignored and every row in the file is returned.

use super::provider::{DataError, DataProvider, DataSource, FetchRequest, FetchResult};
use super::series::{PricePoint, PriceSeries};
use crate::config::{http_client, FetchConfig};
use chrono::NaiveDate;
use serde::Deserialize;

/// One Stooq CSV row. Open/High/Low/Volume are present but unused.
#[derive(Debug, Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: Option<f64>,
}

/// Stooq fixed-URL CSV provider.
pub struct StooqProvider {
    client: reqwest::blocking::Client,
    url: String,
}

impl StooqProvider {
    pub fn new(config: &FetchConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client(config)?,
            url: config.fallback_url.clone(),
        })
    }

    /// Parse a Stooq daily CSV body (`Date,Open,High,Low,Close,Volume`).
    fn parse_csv(body: &str) -> Result<Vec<PricePoint>, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        // Stooq answers unknown symbols and exhausted quotas with plain text.
        let headers = rdr
            .headers()
            .map_err(|e| DataError::ResponseFormatChanged(format!("unreadable CSV header: {e}")))?
            .clone();
        for required in ["Date", "Close"] {
            if !headers.iter().any(|h| h == required) {
                let first_line = body.lines().next().unwrap_or("").trim();
                return Err(DataError::ResponseFormatChanged(format!(
                    "missing '{required}' column (got: {first_line:?})"
                )));
            }
        }

        let mut points = Vec::new();
        for (line, record) in rdr.deserialize::<StooqRow>().enumerate() {
            let row = record.map_err(|e| {
                DataError::ResponseFormatChanged(format!("bad CSV row {}: {e}", line + 2))
            })?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                DataError::ResponseFormatChanged(format!("bad date {:?}: {e}", row.date))
            })?;
            match row.close {
                Some(close) if close.is_finite() => points.push(PricePoint::new(date, close)),
                _ => continue,
            }
        }

        if points.is_empty() {
            return Err(DataError::EmptySeries);
        }
        Ok(points)
    }

    /// Map a non-success HTTP status to its fetch error.
    fn check_status(status: reqwest::StatusCode) -> Result<(), DataError> {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::Http {
                provider: DataSource::Stooq.as_str().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn fetch_points(&self) -> Result<Vec<PricePoint>, DataError> {
        log::debug!("GET {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        Self::check_status(resp.status())?;

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let points = Self::parse_csv(&body)?;
        log::debug!("{} rows from {}", points.len(), self.name());
        Ok(points)
    }
}

impl DataProvider for StooqProvider {
    fn name(&self) -> &str {
        DataSource::Stooq.as_str()
    }

    fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, DataError> {
        if request.start.is_some() || request.end.is_some() {
            log::debug!("stooq ignores the requested date window; returning full history");
        }
        let points = self.fetch_points()?;
        Ok(FetchResult {
            symbol: request.symbol.clone(),
            series: PriceSeries::new(points)?,
            source: DataSource::Stooq,
        })
    }
}
