//! Shared plumbing for calls to Auth0 and the backend API.

use anyhow::{Result, anyhow};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::{APP_USER_AGENT, config::Config};

/// Build the HTTP client used for one upstream.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn client(config: &Config) -> Result<Client> {
    let mut builder = Client::builder().user_agent(APP_USER_AGENT);
    if let Some(timeout) = config.upstream_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Turn a non-2xx response into an error naming the URL, status and upstream message.
pub async fn error(url: &str, response: Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    anyhow!("{url} - {status}, {}", error_message(&body))
}

// Auth0 uses `error_description` (oauth) or `description` (dbconnections); the
// backend uses `message`.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    ["error_description", "description", "message", "error"]
        .iter()
        .find_map(|key| json[*key].as_str())
        .map_or_else(|| json.to_string(), ToString::to_string)
}
