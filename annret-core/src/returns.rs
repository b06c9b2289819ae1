//! Calendar-year return aggregation.
//!
//! Each year's return is measured from the first to the last trading day the
//! series holds for that year, not from Jan 1 to Dec 31:
//!
//! `return_pct = (last_close / first_close - 1) * 100`

use chrono::Datelike;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::data::series::PriceSeries;

/// Percentage return for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualReturn {
    pub year: i32,
    pub return_pct: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReturnError {
    /// The year's first close is zero, so the ratio is undefined.
    #[error("first close of {year} is zero; return is undefined")]
    ZeroFirstClose { year: i32 },
}

/// First and last close seen for a year.
#[derive(Debug, Clone, Copy)]
struct YearBucket {
    first: f64,
    last: f64,
}

/// Compute one `AnnualReturn` per distinct year present in the series,
/// in ascending year order. Years with no rows are not emitted.
pub fn annual_returns(series: &PriceSeries) -> Result<Vec<AnnualReturn>, ReturnError> {
    let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();

    // Points are date-ascending, so the first write per year is the earliest
    // row and every later write moves `last` forward.
    for p in series.points() {
        buckets
            .entry(p.date.year())
            .and_modify(|b| b.last = p.close)
            .or_insert(YearBucket {
                first: p.close,
                last: p.close,
            });
    }

    buckets
        .into_iter()
        .map(|(year, b)| {
            if b.first == 0.0 {
                return Err(ReturnError::ZeroFirstClose { year });
            }
            Ok(AnnualReturn {
                year,
                return_pct: (b.last / b.first - 1.0) * 100.0,
            })
        })
        .collect()
}
