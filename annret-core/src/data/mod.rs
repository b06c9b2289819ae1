//! Price data: series model, providers, and the fallback chain.

pub mod fallback;
pub mod provider;
pub mod series;
pub mod stooq;
pub mod yahoo;

pub use fallback::{fetch_with_fallback, AllProvidersFailed};
pub use provider::{
    DataError, DataProvider, DataSource, FetchProgress, FetchRequest, FetchResult, NoProgress,
    StdoutProgress,
};
pub use series::{PricePoint, PriceSeries};
pub use stooq::StooqProvider;
pub use yahoo::YahooProvider;
