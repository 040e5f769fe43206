//! Credential exchange against Auth0 and the login/signup flow.
//!
//! Login walks `ProviderAuth → ProfileFetch → BackendSync → CookiesWritten`.
//! A failure in the first two steps aborts the flow with the step in the error
//! context; the backend sync is best-effort and never aborts it.

pub mod profile;
pub mod provider;

use anyhow::{Context, Result};
use axum::http::HeaderMap;
use secrecy::SecretString;
use std::{fmt, sync::Arc};
use tracing::{debug, error, info, instrument};

use self::{profile::IdTokenClaims, provider::Provider};
use crate::{
    backend::{BackendClient, SyncOutcome},
    config::Config,
    session::SessionCookies,
};

/// Caller-supplied signup data. Never persisted or logged.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    ProviderAuth,
    ProfileFetch,
    BackendSync,
    CookiesWritten,
    Done,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ProviderAuth => "provider_auth",
            Self::ProfileFetch => "profile_fetch",
            Self::BackendSync => "backend_sync",
            Self::CookiesWritten => "cookies_written",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

impl LoginState {
    /// The step that follows `self`; `Done` is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Idle => Self::ProviderAuth,
            Self::ProviderAuth => Self::ProfileFetch,
            Self::ProfileFetch => Self::BackendSync,
            Self::BackendSync => Self::CookiesWritten,
            Self::CookiesWritten | Self::Done => Self::Done,
        }
    }
}

/// Successful login. `synced` is `None` when the backend sync failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub synced: Option<SyncOutcome>,
}

#[derive(Clone, Debug)]
pub struct Authenticator {
    config: Arc<Config>,
    provider: Provider,
    backend: BackendClient,
}

impl Authenticator {
    /// # Errors
    /// Returns an error if the provider HTTP client cannot be built.
    pub fn new(config: Arc<Config>, backend: BackendClient) -> Result<Self> {
        Ok(Self {
            provider: Provider::new(config.clone())?,
            config,
            backend,
        })
    }

    /// Create the account, wait for the provider to settle, then log in.
    ///
    /// Auth0 assigns roles asynchronously after signup; logging in immediately can
    /// return a profile without them.
    ///
    /// # Errors
    /// Returns an error if the signup or the following login fails.
    #[instrument(skip(self, credentials, sink), fields(email = %credentials.email))]
    pub async fn signup(
        &self,
        credentials: &Credentials,
        sink: &mut HeaderMap,
    ) -> Result<LoginOutcome> {
        self.provider
            .signup(credentials)
            .await
            .context("signup failed")?;

        let settle = self.config.signup_settle();
        if !settle.is_zero() {
            debug!("waiting {}ms for provider role assignment", settle.as_millis());
            tokio::time::sleep(settle).await;
        }

        self.login(&credentials.email, &credentials.password, sink)
            .await
    }

    /// Authenticate, sync the user to the backend and write the session cookies.
    ///
    /// # Errors
    /// Returns an error if the provider rejects the credentials or the profile
    /// cannot be fetched. Backend sync failures are logged, not returned.
    #[instrument(skip(self, password, sink))]
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        sink: &mut HeaderMap,
    ) -> Result<LoginOutcome> {
        let mut state = LoginState::Idle;

        transition(&mut state);
        let tokens = self
            .provider
            .token(username, password)
            .await
            .with_context(|| format!("login failed in {state}"))?;

        match IdTokenClaims::decode(&tokens.id_token) {
            Ok(claims) => debug!(
                sub = %claims.sub,
                email = claims.email.as_deref().unwrap_or_default(),
                name = claims.name.as_deref().unwrap_or_default(),
                "identity token claims"
            ),
            Err(e) => debug!("identity token claims unavailable: {e}"),
        }

        transition(&mut state);
        let profile = self
            .provider
            .user_info(&tokens.access_token)
            .await
            .with_context(|| format!("login failed in {state}"))?;

        transition(&mut state);
        let synced = match self.backend.sync_user(&tokens.id_token, &profile).await {
            Ok(SyncOutcome::Created) => {
                info!("User successfully synced with backend");
                Some(SyncOutcome::Created)
            }
            Ok(SyncOutcome::AlreadyExists) => {
                info!("User already exists in backend, sync skipped");
                Some(SyncOutcome::AlreadyExists)
            }
            Err(e) => {
                error!("Backend sync failed: {e:#}");
                None
            }
        };

        transition(&mut state);
        let cookies = SessionCookies::new(&self.config, &tokens.id_token, &profile)
            .with_context(|| format!("login failed in {state}"))?;
        cookies.write(sink);

        transition(&mut state);

        Ok(LoginOutcome { synced })
    }
}

fn transition(state: &mut LoginState) {
    let next = state.next();
    debug!("login: {state} -> {next}");
    *state = next;
}
