//! annret — download daily history for QQQ and write per-calendar-year returns.
//!
//! Yahoo Finance is tried first; Stooq's full-history CSV is the fallback.
//! Output is a header-less `year,return_pct` CSV. If neither provider yields
//! data, no file is written and the process exits with status 1.
//!
//! Set `RUST_LOG=debug` for request URLs and row counts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use annret_core::config::{DEFAULT_OUT, DEFAULT_START};
use annret_core::data::{
    DataProvider, FetchRequest, StdoutProgress, StooqProvider, YahooProvider,
};
use annret_core::{run_pipeline, FetchConfig, PipelineError};

#[derive(Parser)]
#[command(
    name = "annret",
    about = "Fetch daily closes and write per-calendar-year percentage returns as CSV"
)]
struct Cli {
    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long, default_value = DEFAULT_START)]
    start: String,

    /// End date (YYYY-MM-DD), exclusive. Defaults to the latest available bar.
    #[arg(long)]
    end: Option<String>,

    /// Output CSV path.
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn parse_date(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{value}' (expected YYYY-MM-DD)"))
}

fn run(cli: Cli) -> Result<()> {
    let start = parse_date("--start", &cli.start)?;
    let end = cli
        .end
        .as_deref()
        .map(|s| parse_date("--end", s))
        .transpose()?;

    let config = FetchConfig::default();
    log::debug!("fetch config: {config:?}");
    let yahoo = YahooProvider::new(&config).context("cannot set up Yahoo Finance client")?;
    let stooq = StooqProvider::new(&config).context("cannot set up Stooq client")?;
    let providers: [&dyn DataProvider; 2] = [&yahoo, &stooq];

    let request = FetchRequest::new(config.symbol.as_str(), Some(start), end);
    println!(
        "Downloading {} from {start} to {}",
        request.symbol,
        end.map_or_else(|| "latest".to_string(), |d| d.to_string())
    );

    match run_pipeline(&request, &providers, &cli.out, &StdoutProgress) {
        Ok(report) => {
            println!(
                "Wrote {} years to {} (from {}, {} rows)",
                report.returns.len(),
                report.out_path.display(),
                report.source,
                report.rows
            );
            Ok(())
        }
        Err(PipelineError::Fetch(e)) => {
            println!(
                "Could not download data automatically; prepare the annual returns CSV manually."
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("--start", "1999-03-10").unwrap(),
            NaiveDate::from_ymd_opt(1999, 3, 10).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for bad in ["1999/03/10", "10-03-1999", "2023-02-30", ""] {
            let err = parse_date("--start", bad).unwrap_err();
            assert!(err.to_string().contains("invalid --start date"), "{err}");
        }
    }

    #[test]
    fn defaults_match_constants() {
        let cli = Cli::try_parse_from(["annret"]).unwrap();
        assert_eq!(cli.start, DEFAULT_START);
        assert_eq!(cli.end, None);
        assert_eq!(cli.out, PathBuf::from(DEFAULT_OUT));
    }

    #[test]
    fn bad_start_fails_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("annual.csv");
        let cli = Cli {
            start: "1999/03/10".into(),
            end: None,
            out: out.clone(),
        };
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("invalid --start date '1999/03/10'"));
        assert!(!out.exists());
    }

    #[test]
    fn bad_end_fails_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("annual.csv");
        let cli = Cli {
            start: DEFAULT_START.into(),
            end: Some("tomorrow".into()),
            out: out.clone(),
        };
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("invalid --end date 'tomorrow'"));
        assert!(!out.exists());
    }
}
