//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback, and a `.env` file in the working
//! directory is loaded first, so a checked-out deployment can be configured
//! without touching the command line.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the jobs API; `/jobs` is appended to it
    #[arg(long, env = "JOBSCROLL_API_URL", default_value = "http://localhost:3000/api")]
    pub api_url: String,

    /// Page size to request (backend default when omitted)
    #[arg(long, env = "JOBSCROLL_PAGE_LIMIT", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Per-request transport timeout in seconds
    #[arg(long, env = "JOBSCROLL_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// How many rows from the end of the list count as "near the bottom"
    #[arg(long, env = "JOBSCROLL_PREFETCH", default_value_t = 3)]
    pub prefetch: usize,

    /// File that log output is written to
    #[arg(long, env = "JOBSCROLL_LOG_FILE", default_value = "jobscroll.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Load `.env` (if any), then parse arguments and environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_are_parsed() {
        let config = Config::try_parse_from([
            "jobscroll",
            "--api-url",
            "https://jobs.example/api/",
            "--limit",
            "20",
            "--timeout-secs",
            "5",
            "--prefetch",
            "1",
            "--log-file",
            "/tmp/js.log",
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://jobs.example/api/");
        assert_eq!(config.limit, Some(20));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.prefetch, 1);
        assert_eq!(config.log_file, PathBuf::from("/tmp/js.log"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(Config::try_parse_from(["jobscroll", "--limit", "0"]).is_err());
    }
}
