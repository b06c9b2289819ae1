//! Annual return calculator — fetch one instrument's daily closes, with a
//! fallback provider, and reduce them to per-calendar-year percentage returns.
//!
//! - Price model (`PriceSeries`) and the `DataProvider` trait
//! - Yahoo Finance (primary) and Stooq CSV (fallback) providers
//! - Ordered single-attempt fallback chain
//! - Year bucketing and first/last-close returns
//! - Header-less CSV export

pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod returns;

pub use config::FetchConfig;
pub use pipeline::{run_pipeline, PipelineError, PipelineReport};
pub use returns::{annual_returns, AnnualReturn, ReturnError};
