use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::fetch::{CadQuery, DEFAULT_ENDPOINT, DEFAULT_HORIZON_DAYS};
use crate::data::filter::{FilterBounds, DEFAULT_AU_RANGE};
use crate::lunar::{DEFAULT_APP_ID_VAR, DEFAULT_APP_SECRET_VAR};

/// Near Earth Object close-approach dashboard.
///
/// Runs the desktop dashboard by default; `export` runs the same pipeline
/// headless and writes CSV.
#[derive(Parser, Debug)]
#[command(name = "neo-dashboard", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Environment variable holding the lunar page's application id
    #[arg(long, env = "NEO_APP_ID_VAR", default_value = DEFAULT_APP_ID_VAR)]
    pub app_id_var: String,

    /// Environment variable holding the lunar page's application secret
    #[arg(long, env = "NEO_APP_SECRET_VAR", default_value = DEFAULT_APP_SECRET_VAR)]
    pub app_secret_var: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Where close-approach data comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Close-approach API endpoint
    #[arg(long, env = "NEO_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub api_url: String,

    /// Look-ahead window in days (sent as date-max=+N)
    #[arg(long, env = "NEO_HORIZON_DAYS", default_value_t = DEFAULT_HORIZON_DAYS)]
    pub horizon_days: u32,

    /// HTTP timeout in seconds
    #[arg(long, env = "NEO_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Keep fetched data for this many seconds (default: until reload)
    #[arg(long, env = "NEO_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Read a saved cad.api response instead of calling the API
    #[arg(long, value_name = "FILE")]
    pub from_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch, filter and write the kept (or excluded) records as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// First approach date (YYYY-MM-DD), default: earliest observed
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last approach date (YYYY-MM-DD), default: latest observed
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Lower bound on minimum distance (AU)
    #[arg(long, default_value_t = DEFAULT_AU_RANGE.0)]
    pub min_au: f64,

    /// Upper bound on minimum distance (AU)
    #[arg(long, default_value_t = DEFAULT_AU_RANGE.1)]
    pub max_au: f64,

    /// Write the filtered-out records instead of the kept ones
    #[arg(long)]
    pub excluded: bool,

    /// Output CSV path
    #[arg(short, long, value_name = "FILE")]
    pub out: PathBuf,
}

impl ExportArgs {
    /// Fill unset dates from the observed range. With nothing observed the
    /// open ends span all dates, so an empty fetch exports just the header.
    pub fn bounds(&self, observed: Option<(NaiveDate, NaiveDate)>) -> FilterBounds {
        let (lo, hi) = observed.unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        FilterBounds::new(
            self.start.unwrap_or(lo),
            self.end.unwrap_or(hi),
            self.min_au,
            self.max_au,
        )
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Runtime settings shared by the GUI and the headless export.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub query: CadQuery,
    pub timeout: Duration,
    pub cache_ttl: Option<Duration>,
    pub from_file: Option<PathBuf>,
    pub app_id_var: String,
    pub app_secret_var: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let src = &cli.source;
        if src.horizon_days == 0 {
            bail!("--horizon-days must be at least 1");
        }
        if let Some(path) = &src.from_file {
            if !path.exists() {
                bail!("--from-file: {} does not exist", path.display());
            }
        }
        Ok(Config {
            api_url: src.api_url.clone(),
            query: CadQuery {
                date_max_days: src.horizon_days,
            },
            timeout: Duration::from_secs(src.timeout_secs),
            cache_ttl: src.cache_ttl_secs.map(Duration::from_secs),
            from_file: src.from_file.clone(),
            app_id_var: cli.app_id_var.clone(),
            app_secret_var: cli.app_secret_var.clone(),
        })
    }

    /// Cache key source: the offline file when set, the endpoint otherwise.
    pub fn source_label(&self) -> String {
        match &self.from_file {
            Some(path) => path.display().to_string(),
            None => self.api_url.clone(),
        }
    }
}
