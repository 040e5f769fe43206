use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_UPSTREAM_TIMEOUT: &str = "upstream-timeout-seconds";

#[derive(Debug)]
pub struct Options {
    pub api_base_url: String,
    pub upstream_timeout_seconds: Option<u64>,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            api_base_url: matches
                .get_one::<String>(ARG_API_BASE_URL)
                .cloned()
                .context("missing required argument: --api-base-url")?,
            upstream_timeout_seconds: matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT).copied(),
        })
    }
}

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Backend API base URL, example: http://localhost:8080")
                .env("API_BASE_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_UPSTREAM_TIMEOUT)
                .long(ARG_UPSTREAM_TIMEOUT)
                .help("Timeout for Auth0 and backend requests in seconds (default: none)")
                .env("STELLAR_UPSTREAM_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
