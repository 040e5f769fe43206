//! Runtime configuration, built once at startup and shared read-only.

use anyhow::{Context, Result, anyhow};
use std::{fmt, str::FromStr, time::Duration};
use url::Url;

const DEFAULT_SIGNUP_SETTLE_MILLIS: u64 = 2000;

/// Deployment environment; only `Production` marks cookies `Secure`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    provider_base_url: String,
    client_id: String,
    api_base_url: String,
    environment: Environment,
    signup_settle: Duration,
    upstream_timeout: Option<Duration>,
}

impl Config {
    /// Build a configuration from the Auth0 domain, client id and backend base URL.
    ///
    /// A bare domain (`tenant.eu.auth0.com`) is reached over HTTPS; a value that
    /// already carries a scheme is kept as-is.
    ///
    /// # Errors
    /// Returns an error if either base URL cannot be parsed.
    pub fn new(auth0_domain: &str, client_id: String, api_base_url: &str) -> Result<Self> {
        let provider_base_url = normalize_base_url(auth0_domain);
        Url::parse(&provider_base_url)
            .with_context(|| format!("Invalid Auth0 domain: {auth0_domain}"))?;

        let parsed = Url::parse(api_base_url)
            .with_context(|| format!("Invalid API base URL: {api_base_url}"))?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("API base URL must include a host: {api_base_url}"));
        }

        Ok(Self {
            provider_base_url,
            client_id,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            environment: Environment::default(),
            signup_settle: Duration::from_millis(DEFAULT_SIGNUP_SETTLE_MILLIS),
            upstream_timeout: None,
        })
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_signup_settle(mut self, settle: Duration) -> Self {
        self.signup_settle = settle;
        self
    }

    #[must_use]
    pub fn with_upstream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Absolute URL of an identity provider endpoint, `path` starts with `/`.
    #[must_use]
    pub fn provider_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.provider_base_url)
    }

    /// Absolute URL of a backend API endpoint, `path` starts with `/`.
    #[must_use]
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }

    /// Audience requested with the password grant so the access token is accepted
    /// by the provider's profile endpoint.
    #[must_use]
    pub fn audience(&self) -> String {
        self.provider_endpoint("/api/v2/")
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }

    #[must_use]
    pub fn signup_settle(&self) -> Duration {
        self.signup_settle
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout
    }
}

fn normalize_base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}
