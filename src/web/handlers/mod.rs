pub mod health;
pub mod login;
pub mod logout;
pub mod pages;
pub mod signup;

// common functions for the handlers
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned when a form action fails; echoes the submitted email.
#[derive(ToSchema, Serialize, Debug, PartialEq, Eq)]
pub struct FormError {
    pub email: String,
    pub error: String,
}

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

pub(crate) fn form_error(email: &str, error: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FormError {
            email: email.to_string(),
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// `303 See Other` carrying the headers collected by the action.
pub(crate) fn redirect(headers: HeaderMap, to: &str) -> Response {
    (headers, Redirect::to(to)).into_response()
}

/// Trimmed value, `None` when absent or blank.
pub(crate) fn field(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
