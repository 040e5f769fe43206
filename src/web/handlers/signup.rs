use axum::{
    Extension,
    extract::Form,
    http::HeaderMap,
    response::Response,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{error, info};
use utoipa::ToSchema;

use super::{FormError, field, form_error, redirect, valid_email};
use crate::auth::{Authenticator, Credentials};

pub const MISSING_CREDENTIALS: &str = "Email and password are required.";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const SIGNUP_FAILED: &str = "Signup failed. Please try again.";

#[derive(ToSchema, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

#[utoipa::path(
    post,
    path= "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 303, description = "Account created, session cookies set, redirect to /dashboard"),
        (status = 400, description = "Missing fields, invalid email or rejected signup", body = FormError),
    ),
    tag= "auth"
)]
// axum handler for signup
pub async fn signup(
    auth: Extension<Arc<Authenticator>>,
    Form(form): Form<SignupForm>,
) -> Response {
    let email = field(form.email).unwrap_or_default();
    let password = form.password.filter(|p| !p.is_empty());

    let Some(password) = password.filter(|_| !email.is_empty()) else {
        return form_error(&email, MISSING_CREDENTIALS);
    };

    if !valid_email(&email) {
        return form_error(&email, INVALID_EMAIL);
    }

    let credentials = Credentials {
        email,
        password: SecretString::from(password),
        first_name: form.first_name,
        last_name: form.last_name,
    };

    let mut headers = HeaderMap::new();

    match auth.0.signup(&credentials, &mut headers).await {
        Ok(outcome) => {
            info!(synced = ?outcome.synced, "signup complete");

            redirect(headers, "/dashboard")
        }
        Err(e) => {
            error!("Signup error: {e:#}");

            form_error(&credentials.email, SIGNUP_FAILED)
        }
    }
}
