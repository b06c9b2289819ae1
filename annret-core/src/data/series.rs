//! PriceSeries — a date-ordered daily close series from a single provider.

use chrono::NaiveDate;

use super::provider::DataError;

/// One trading day's closing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Non-empty, strictly ascending (by date) close series.
///
/// The only constructor is [`PriceSeries::new`], so holding a `PriceSeries`
/// means the invariants already hold.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sort by date and collapse duplicate dates.
    ///
    /// Providers are trusted to send one row per trading day; if a date does
    /// repeat, the row that came last in the response wins. An empty input is
    /// a fetch failure.
    pub fn new(mut points: Vec<PricePoint>) -> Result<Self, DataError> {
        if points.is_empty() {
            return Err(DataError::EmptySeries);
        }

        // Stable sort keeps response order among equal dates.
        points.sort_by_key(|p| p.date);

        let before = points.len();
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(before);
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }
        if deduped.len() != before {
            log::warn!(
                "collapsed {} duplicate date rows in price series",
                before - deduped.len()
            );
        }

        Ok(Self { points: deduped })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), close)
    }

    #[test]
    fn empty_input_is_a_fetch_failure() {
        assert!(matches!(PriceSeries::new(vec![]), Err(DataError::EmptySeries)));
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let series =
            PriceSeries::new(vec![p(2021, 3, 1, 3.0), p(2020, 1, 2, 1.0), p(2020, 6, 1, 2.0)])
                .unwrap();
        let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
    }

    #[test]
    fn duplicate_dates_keep_last_row() {
        let series =
            PriceSeries::new(vec![p(2020, 1, 2, 1.0), p(2020, 1, 3, 5.0), p(2020, 1, 2, 9.0)])
                .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, 9.0);
    }

    #[test]
    fn dates_are_strictly_ascending() {
        let series = PriceSeries::new(vec![
            p(2020, 1, 3, 1.0),
            p(2020, 1, 2, 1.0),
            p(2020, 1, 3, 2.0),
            p(2020, 1, 1, 1.0),
        ])
        .unwrap();
        for w in series.points().windows(2) {
            assert!(w[0].date < w[1].date);
        }
    }
}
