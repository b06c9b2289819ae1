//! Ordered provider fallback.
//!
//! Providers are tried one at a time, in order, until one returns a usable
//! series. Each provider gets exactly one attempt. A later provider's series
//! replaces, never supplements, an earlier attempt.

use super::provider::{DataError, DataProvider, FetchProgress, FetchRequest, FetchResult};
use thiserror::Error;

/// Every provider in the chain failed.
#[derive(Debug, Error)]
#[error("all {} data providers failed ({})", .attempts.len(), summarize(.attempts))]
pub struct AllProvidersFailed {
    /// `(provider name, error)` in the order the providers were tried.
    pub attempts: Vec<(String, DataError)>,
}

fn summarize(attempts: &[(String, DataError)]) -> String {
    attempts
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fetch from the first provider that succeeds.
pub fn fetch_with_fallback(
    providers: &[&dyn DataProvider],
    request: &FetchRequest,
    progress: &dyn FetchProgress,
) -> Result<FetchResult, AllProvidersFailed> {
    let total = providers.len();
    let mut attempts = Vec::with_capacity(total);

    for (i, provider) in providers.iter().enumerate() {
        progress.on_attempt(provider.name(), i, total);

        match provider.fetch(request) {
            Ok(result) => {
                progress.on_success(provider.name(), result.series.len());
                return Ok(result);
            }
            Err(e) => {
                log::debug!("{} failed for {}: {e:?}", provider.name(), request.symbol);
                progress.on_failure(provider.name(), &e, i + 1 < total);
                attempts.push((provider.name().to_string(), e));
            }
        }
    }

    Err(AllProvidersFailed { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{DataSource, NoProgress};
    use crate::data::series::{PricePoint, PriceSeries};
    use chrono::NaiveDate;
    use std::cell::Cell;

    struct Fixed {
        name: &'static str,
        outcome: Option<f64>,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn ok(name: &'static str, close: f64) -> Self {
            Self { name, outcome: Some(close), calls: Cell::new(0) }
        }

        fn failing(name: &'static str) -> Self {
            Self { name, outcome: None, calls: Cell::new(0) }
        }
    }

    impl DataProvider for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, DataError> {
            self.calls.set(self.calls.get() + 1);
            let close = self.outcome.ok_or(DataError::EmptySeries)?;
            let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
            Ok(FetchResult {
                symbol: request.symbol.clone(),
                series: PriceSeries::new(vec![PricePoint::new(date, close)])?,
                source: DataSource::Stooq,
            })
        }
    }

    fn request() -> FetchRequest {
        FetchRequest::new("QQQ", None, None)
    }

    #[test]
    fn stops_at_first_success() {
        let a = Fixed::ok("a", 1.0);
        let b = Fixed::ok("b", 2.0);
        let result = fetch_with_fallback(&[&a, &b], &request(), &NoProgress).unwrap();
        assert_eq!(result.series.points()[0].close, 1.0);
        assert_eq!(a.calls.get(), 1);
        assert_eq!(b.calls.get(), 0);
    }

    #[test]
    fn falls_through_on_failure() {
        let a = Fixed::failing("a");
        let b = Fixed::ok("b", 2.0);
        let result = fetch_with_fallback(&[&a, &b], &request(), &NoProgress).unwrap();
        assert_eq!(result.series.points()[0].close, 2.0);
        assert_eq!(a.calls.get(), 1);
        assert_eq!(b.calls.get(), 1);
    }

    #[test]
    fn each_provider_is_tried_once_when_all_fail() {
        let a = Fixed::failing("a");
        let b = Fixed::failing("b");
        let err = fetch_with_fallback(&[&a, &b], &request(), &NoProgress).unwrap_err();
        assert_eq!(a.calls.get(), 1);
        assert_eq!(b.calls.get(), 1);
        let names: Vec<&str> = err.attempts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(err.to_string().contains("all 2 data providers failed"));
    }

    #[test]
    fn empty_chain_fails() {
        let err = fetch_with_fallback(&[], &request(), &NoProgress).unwrap_err();
        assert!(err.attempts.is_empty());
    }
}
