//! Map validated command-line arguments to the action to run.

use crate::{
    cli::{
        actions::{Action, server::Args},
        commands::{ARG_ENVIRONMENT, ARG_PORT, auth0, backend},
    },
    config::Environment,
};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let environment = matches
        .get_one::<String>(ARG_ENVIRONMENT)
        .map_or(Ok(Environment::default()), |s| s.parse::<Environment>())?;

    let auth0_opts = auth0::Options::parse(matches)?;
    let backend_opts = backend::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        environment,
        auth0_domain: auth0_opts.domain,
        auth0_client_id: auth0_opts.client_id,
        signup_settle_ms: auth0_opts.signup_settle_ms,
        api_base_url: backend_opts.api_base_url,
        upstream_timeout_seconds: backend_opts.upstream_timeout_seconds,
    }))
}
