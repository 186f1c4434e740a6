use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fsn_dashboard::data::Truncation;

/// Field safety notice KPI dashboard.
#[derive(Debug, Parser)]
#[command(name = "fsn-dashboard")]
#[command(about = "Interactive dashboard over a field safety notice dataset")]
#[command(version)]
pub struct Cli {
    /// Notice dataset to open at startup (.json, .csv or .parquet)
    #[arg(long, env = "FSN_DATA", default_value = "attached_assets/bfarm_entries.json")]
    pub data: PathBuf,

    /// Seconds a loaded dataset is reused before it is read again (at least 1)
    #[arg(
        long,
        env = "FSN_CACHE_TTL",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cache_ttl: u64,

    /// Limit the company chart to the N most frequent companies (at least 1)
    #[arg(
        long,
        env = "FSN_TOP_COMPANIES",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub top_companies: Option<usize>,
}

impl Cli {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn company_truncation(&self) -> Truncation {
        match self.top_companies {
            Some(n) => Truncation::Top(n),
            None => Truncation::All,
        }
    }
}
