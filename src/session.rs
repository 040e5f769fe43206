//! Session cookies: `jwt_token` holds the identity token, `user_info` the JSON profile.

use anyhow::{Context, Result};
use axum::http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, COOKIE, InvalidHeaderValue, SET_COOKIE},
};
use url::form_urlencoded;

use crate::{auth::profile::UserProfile, config::Config};

pub const JWT_COOKIE_NAME: &str = "jwt_token";
pub const USER_INFO_COOKIE_NAME: &str = "user_info";
pub const SESSION_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Both session cookies, fully built before anything touches the response.
#[derive(Debug)]
pub struct SessionCookies {
    jwt_token: HeaderValue,
    user_info: HeaderValue,
}

impl SessionCookies {
    /// # Errors
    /// Returns an error if the profile cannot be serialized or a cookie is not a
    /// valid header value.
    pub fn new(config: &Config, id_token: &str, profile: &UserProfile) -> Result<Self> {
        let profile_json =
            serde_json::to_string(profile).context("Failed to serialize user profile")?;

        let secure = config.cookie_secure();

        Ok(Self {
            jwt_token: cookie(JWT_COOKIE_NAME, id_token, SESSION_MAX_AGE_SECONDS, secure)
                .context("Invalid identity token cookie")?,
            user_info: cookie(
                USER_INFO_COOKIE_NAME,
                &profile_json,
                SESSION_MAX_AGE_SECONDS,
                secure,
            )
            .context("Invalid user info cookie")?,
        })
    }

    /// Append both `Set-Cookie` headers.
    pub fn write(self, sink: &mut HeaderMap) {
        sink.append(SET_COOKIE, self.jwt_token);
        sink.append(SET_COOKIE, self.user_info);
    }
}

/// Append expired versions of both session cookies.
///
/// # Errors
/// Returns an error if a cookie header cannot be built.
pub fn clear(config: &Config, sink: &mut HeaderMap) -> Result<()> {
    let secure = config.cookie_secure();
    let jwt_token = cookie(JWT_COOKIE_NAME, "", 0, secure)?;
    let user_info = cookie(USER_INFO_COOKIE_NAME, "", 0, secure)?;

    sink.append(SET_COOKIE, jwt_token);
    sink.append(SET_COOKIE, user_info);

    Ok(())
}

/// Token presented by the client: an `Authorization: Bearer` header wins over the
/// `jwt_token` cookie.
#[must_use]
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, JWT_COOKIE_NAME))
}

/// Profile stored in the `user_info` cookie, if present and well formed.
#[must_use]
pub fn read_user_info(headers: &HeaderMap) -> Option<UserProfile> {
    let json = cookie_value(headers, USER_INFO_COOKIE_NAME)?;
    serde_json::from_str(&json).ok()
}

fn cookie(
    name: &str,
    value: &str,
    max_age: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| decode_value(value.trim()))
        .filter(|value| !value.is_empty())
}

/// Reverse of the `form_urlencoded` cookie encoding. A raw `&` is part of the value.
fn decode_value(raw: &str) -> String {
    let escaped = raw.replace('&', "%26");
    form_urlencoded::parse(format!("v={escaped}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
