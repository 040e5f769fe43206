use crate::{
    config::{Config, Environment},
    web,
};
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub environment: Environment,
    pub auth0_domain: String,
    pub auth0_client_id: String,
    pub signup_settle_ms: u64,
    pub api_base_url: String,
    pub upstream_timeout_seconds: Option<u64>,
}

impl Args {
    /// # Errors
    /// Returns an error if the Auth0 domain or the API base URL is invalid.
    pub fn config(&self) -> Result<Config> {
        Ok(Config::new(
            &self.auth0_domain,
            self.auth0_client_id.clone(),
            &self.api_base_url,
        )?
        .with_environment(self.environment)
        .with_signup_settle(Duration::from_millis(self.signup_settle_ms))
        .with_upstream_timeout(self.upstream_timeout_seconds.map(Duration::from_secs)))
    }
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = Arc::new(args.config()?);

    debug!("config: {:?}", config);

    web::new(args.port, config).await
}
