//! Yahoo Finance data provider (primary).
//!
//! Fetches daily bars from Yahoo's v8 chart API and keeps the split/dividend
//! adjusted close. One HTTP request per fetch; failures go straight back to
//! the fallback chain.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{DataError, DataProvider, DataSource, FetchRequest, FetchResult};
use super::series::{PricePoint, PriceSeries};
use crate::config::{http_client, FetchConfig};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(config: &FetchConfig) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart API URL for a request.
    ///
    /// `period2` is the end date at midnight UTC, which makes `end` exclusive.
    /// Without an end date the window runs up to `now`.
    fn chart_url(base: &str, request: &FetchRequest, now: i64) -> String {
        let start_ts = request.start.map_or(0, midnight_utc);
        let end_ts = request.end.map_or(now, midnight_utc);
        format!(
            "{base}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true",
            symbol = request.symbol
        )
    }

    /// Parse the chart API response into adjusted close points inside the request window.
    fn parse_response(
        request: &FetchRequest,
        resp: ChartResponse,
    ) -> Result<Vec<PricePoint>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: request.symbol.clone(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // Yahoo omits `timestamp` entirely when the window has no bars.
        let Some(timestamps) = data.timestamp else {
            return Err(DataError::EmptySeries);
        };

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let adjusted = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let closes = match adjusted {
            Some(adj) => adj,
            None => {
                log::warn!(
                    "no adjclose block for {}; using unadjusted close",
                    request.symbol
                );
                data.indicators
                    .quote
                    .into_iter()
                    .next()
                    .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?
                    .close
            }
        };

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = ts
                .checked_add(offset)
                .and_then(|local| chrono::DateTime::from_timestamp(local, 0))
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // Null close: holiday or partial bar
            let Some(close) = closes.get(i).copied().flatten() else {
                continue;
            };
            if !close.is_finite() || !request.contains(date) {
                continue;
            }
            points.push(PricePoint::new(date, close));
        }

        if points.is_empty() {
            return Err(DataError::EmptySeries);
        }

        Ok(points)
    }

    /// Map a non-success HTTP status to its fetch error.
    fn check_status(request: &FetchRequest, status: reqwest::StatusCode) -> Result<(), DataError> {
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: request.symbol.clone(),
            });
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::Http {
                provider: DataSource::YahooFinance.as_str().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Decode a chart API body and extract its price points.
    fn parse_body(request: &FetchRequest, body: &str) -> Result<Vec<PricePoint>, DataError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!(
                "failed to parse response for {}: {e}",
                request.symbol
            ))
        })?;
        Self::parse_response(request, chart)
    }

    /// Execute the single HTTP request for this attempt.
    fn fetch_points(&self, request: &FetchRequest) -> Result<Vec<PricePoint>, DataError> {
        let url = Self::chart_url(&self.base_url, request, chrono::Utc::now().timestamp());
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        Self::check_status(request, resp.status())?;

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let points = Self::parse_body(request, &body)?;
        log::debug!("{} rows from {}", points.len(), self.name());
        Ok(points)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        DataSource::YahooFinance.as_str()
    }

    fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, DataError> {
        let points = self.fetch_points(request)?;
        Ok(FetchResult {
            symbol: request.symbol.clone(),
            series: PriceSeries::new(points)?,
            source: DataSource::YahooFinance,
        })
    }
}
