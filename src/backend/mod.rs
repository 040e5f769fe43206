//! Client for the Stellar Compass backend REST API.

pub mod models;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

use self::models::{Lesson, Subject, UserCreate};
use crate::{auth::profile::UserProfile, config::Config, upstream};

/// Result of upserting a user into the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    /// The backend answered `409 Conflict`.
    AlreadyExists,
}

impl From<&UserProfile> for UserCreate {
    fn from(profile: &UserProfile) -> Self {
        Self {
            email: profile.email.clone(),
            name: profile.display_name().to_string(),
            auth0_id: profile.sub.clone(),
            role: profile.role(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    config: Arc<Config>,
}

impl BackendClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Ok(Self {
            client: upstream::client(&config)?,
            config,
        })
    }

    /// Create the backend user for `profile`, authenticated with the identity token.
    ///
    /// # Errors
    /// Returns an error on transport failure or any status other than 2xx and 409.
    #[instrument(skip(self, id_token, profile), fields(sub = %profile.sub))]
    pub async fn sync_user(&self, id_token: &str, profile: &UserProfile) -> Result<SyncOutcome> {
        let url = self.config.api_endpoint("/api/user");
        let user = UserCreate::from(profile);

        let response = self
            .client
            .post(&url)
            .bearer_auth(id_token)
            .json(&user)
            .send()
            .await
            .with_context(|| format!("{url} - request failed"))?;

        match response.status() {
            status if status.is_success() => Ok(SyncOutcome::Created),
            StatusCode::CONFLICT => Ok(SyncOutcome::AlreadyExists),
            _ => Err(upstream::error(&url, response).await),
        }
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    pub async fn subjects(&self, token: Option<&str>) -> Result<Vec<Subject>> {
        self.get_json(&self.config.api_endpoint("/api/subject"), token)
            .await
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    pub async fn lessons(&self, token: Option<&str>) -> Result<Vec<Lesson>> {
        self.get_json(&self.config.api_endpoint("/api/lesson"), token)
            .await
    }

    /// # Errors
    /// Returns an error on transport failure, non-2xx status (including 404) or an
    /// unexpected body.
    pub async fn lesson(&self, token: Option<&str>, id: &str) -> Result<Lesson> {
        let mut url = Url::parse(&self.config.api_endpoint("/api/lesson"))?;
        url.path_segments_mut()
            .map_err(|()| anyhow!("API base URL cannot be a base"))?
            .push(id);

        self.get_json(url.as_str(), token).await
    }

    #[instrument(skip(self, token), fields(authenticated = token.is_some()))]
    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: Option<&str>) -> Result<T> {
        let response = with_bearer(self.client.get(url), token)
            .send()
            .await
            .with_context(|| format!("{url} - request failed"))?;

        if !response.status().is_success() {
            return Err(upstream::error(url, response).await);
        }

        debug!("{url} - {}", response.status());

        response
            .json()
            .await
            .with_context(|| format!("{url} - unexpected response body"))
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}
