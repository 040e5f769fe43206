use axum::{Extension, extract::Form, http::HeaderMap, response::Response};
use secrecy::SecretString;
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{error, info};
use utoipa::ToSchema;

use super::{FormError, field, form_error, redirect};
use crate::auth::Authenticator;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(ToSchema, Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[utoipa::path(
    post,
    path= "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Session cookies set, redirect to /dashboard"),
        (status = 400, description = "Login failed", body = FormError),
    ),
    tag= "auth"
)]
// axum handler for login
pub async fn login(auth: Extension<Arc<Authenticator>>, Form(form): Form<LoginForm>) -> Response {
    let email = field(form.email).unwrap_or_default();

    let Some(password) = form.password.filter(|p| !p.is_empty() && !email.is_empty()) else {
        return form_error(&email, LOGIN_FAILED);
    };

    let password = SecretString::from(password);
    let mut headers = HeaderMap::new();

    match auth.0.login(&email, &password, &mut headers).await {
        Ok(outcome) => {
            info!(synced = ?outcome.synced, "login complete");

            redirect(headers, "/dashboard")
        }
        Err(e) => {
            error!("Login error: {e:#}");

            form_error(&email, LOGIN_FAILED)
        }
    }
}
