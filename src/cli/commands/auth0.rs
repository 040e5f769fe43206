use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_AUTH0_DOMAIN: &str = "auth0-domain";
pub const ARG_AUTH0_CLIENT_ID: &str = "auth0-client-id";
pub const ARG_SIGNUP_SETTLE_MS: &str = "signup-settle-ms";

#[derive(Debug)]
pub struct Options {
    pub domain: String,
    pub client_id: String,
    pub signup_settle_ms: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            domain: matches
                .get_one::<String>(ARG_AUTH0_DOMAIN)
                .cloned()
                .context("missing required argument: --auth0-domain")?,
            client_id: matches
                .get_one::<String>(ARG_AUTH0_CLIENT_ID)
                .cloned()
                .context("missing required argument: --auth0-client-id")?,
            signup_settle_ms: matches
                .get_one::<u64>(ARG_SIGNUP_SETTLE_MS)
                .copied()
                .unwrap_or(2000),
        })
    }
}

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH0_DOMAIN)
                .long(ARG_AUTH0_DOMAIN)
                .help("Auth0 tenant domain, example: stellarcompass.eu.auth0.com")
                .env("AUTH0_DOMAIN")
                .required(true),
        )
        .arg(
            Arg::new(ARG_AUTH0_CLIENT_ID)
                .long(ARG_AUTH0_CLIENT_ID)
                .help("Auth0 application client id")
                .env("AUTH0_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SIGNUP_SETTLE_MS)
                .long(ARG_SIGNUP_SETTLE_MS)
                .help("Delay between account creation and first login, in milliseconds")
                .long_help(
                    "Delay between account creation and first login, in milliseconds. Auth0 assigns roles asynchronously after signup; logging in too early returns a profile without them.",
                )
                .env("STELLAR_SIGNUP_SETTLE_MS")
                .default_value("2000")
                .value_parser(clap::value_parser!(u64)),
        )
}
