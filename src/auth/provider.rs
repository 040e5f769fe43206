//! Auth0 endpoints: database signup, password grant and userinfo.

use anyhow::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    Credentials,
    profile::{TokenPair, UserProfile},
};
use crate::{config::Config, upstream};

/// Auth0 database connection holding email/password accounts.
pub const CONNECTION: &str = "Username-Password-Authentication";
pub const SCOPE: &str = "openid profile email";

#[derive(Serialize)]
pub(super) struct SignupRequest<'a> {
    client_id: &'a str,
    email: &'a str,
    password: &'a str,
    connection: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    given_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    family_name: Option<&'a str>,
}

impl<'a> SignupRequest<'a> {
    pub(super) fn new(client_id: &'a str, credentials: &'a Credentials) -> Self {
        Self {
            client_id,
            email: &credentials.email,
            password: credentials.password.expose_secret(),
            connection: CONNECTION,
            given_name: non_empty(credentials.first_name.as_deref()),
            family_name: non_empty(credentials.last_name.as_deref()),
        }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    username: &'a str,
    password: &'a str,
    audience: &'a str,
    scope: &'a str,
    client_id: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: String,
    access_token: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone, Debug)]
pub struct Provider {
    client: Client,
    config: Arc<Config>,
}

impl Provider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self {
            client: upstream::client(&config)?,
            config,
        })
    }

    /// Create a database account.
    ///
    /// # Errors
    /// Returns an error on transport failure or when Auth0 rejects the signup
    /// (existing account, weak password, ...).
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signup(&self, credentials: &Credentials) -> Result<()> {
        let url = self.config.provider_endpoint("/dbconnections/signup");

        let response = self
            .client
            .post(&url)
            .json(&SignupRequest::new(self.config.client_id(), credentials))
            .send()
            .await
            .with_context(|| format!("{url} - request failed"))?;

        if !response.status().is_success() {
            return Err(upstream::error(&url, response).await);
        }

        debug!("account created");

        Ok(())
    }

    /// Exchange username and password for tokens (resource owner password grant).
    ///
    /// # Errors
    /// Returns an error on transport failure, rejected credentials or a response
    /// without both tokens.
    #[instrument(skip(self, password))]
    pub async fn token(&self, username: &str, password: &SecretString) -> Result<TokenPair> {
        let url = self.config.provider_endpoint("/oauth/token");
        let audience = self.config.audience();

        let response = self
            .client
            .post(&url)
            .json(&TokenRequest {
                grant_type: "password",
                username,
                password: password.expose_secret(),
                audience: &audience,
                scope: SCOPE,
                client_id: self.config.client_id(),
            })
            .send()
            .await
            .with_context(|| format!("{url} - request failed"))?;

        if !response.status().is_success() {
            return Err(upstream::error(&url, response).await);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .with_context(|| format!("{url} - token response without id_token/access_token"))?;

        Ok(TokenPair {
            id_token: tokens.id_token,
            access_token: SecretString::from(tokens.access_token),
        })
    }

    /// Fetch the profile of the access token's subject.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    #[instrument(skip(self, access_token))]
    pub async fn user_info(&self, access_token: &SecretString) -> Result<UserProfile> {
        let url = self.config.provider_endpoint("/oauth/userinfo");

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .with_context(|| format!("{url} - request failed"))?;

        if !response.status().is_success() {
            return Err(upstream::error(&url, response).await);
        }

        response
            .json()
            .await
            .with_context(|| format!("{url} - unexpected profile document"))
    }
}
