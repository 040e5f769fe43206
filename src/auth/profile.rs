//! Tokens and profile documents returned by the identity provider.

use anyhow::{Context, Result, anyhow};
use base64ct::{Base64UrlUnpadded, Encoding};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::models::UserRole;

/// Tokens issued by the password grant.
#[derive(Debug)]
pub struct TokenPair {
    /// Signed JWT asserting the subject; forwarded to the backend and kept in a cookie.
    pub id_token: String,
    /// Opaque bearer, only used against the provider's profile endpoint.
    pub access_token: SecretString,
}

/// Profile as returned by `/oauth/userinfo`.
///
/// Unknown fields are kept in `extra` so the `user_info` cookie carries the
/// provider document unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Given name, then nickname, then email; empty values are skipped.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [self.given_name.as_deref(), self.nickname.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or(self.email.as_str())
    }

    /// Role assigned to every account created through this gateway.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        UserRole::Student
    }
}

/// Unverified claims of an identity token, used for diagnostics only.
#[derive(Clone, Debug, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdTokenClaims {
    /// Decode the payload segment of a compact JWT without checking the signature.
    ///
    /// # Errors
    /// Returns an error if the token is not a three-part JWT or the payload is not JSON.
    pub fn decode(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(anyhow!("identity token is not a compact JWT")),
        };

        let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('='))
            .map_err(|e| anyhow!("identity token payload is not base64url: {e}"))?;

        serde_json::from_slice(&bytes).context("identity token payload is not a JSON object")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(claims: &Value) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn display_name_prefers_given_name() {
        let profile: UserProfile = serde_json::from_value(json!({
            "sub": "auth0|1",
            "email": "ada@example.com",
            "given_name": "Ada",
            "nickname": "ada",
        }))
        .unwrap();
        assert_eq!(profile.display_name(), "Ada");
    }

    #[test]
    fn display_name_falls_back_to_nickname_then_email() {
        let mut profile = UserProfile {
            sub: "auth0|1".to_string(),
            email: "ada@example.com".to_string(),
            given_name: Some(String::new()),
            nickname: Some("ada".to_string()),
            ..UserProfile::default()
        };
        assert_eq!(profile.display_name(), "ada");

        profile.nickname = None;
        assert_eq!(profile.display_name(), "ada@example.com");
    }

    #[test]
    fn unknown_profile_fields_survive_round_trip() {
        let raw = json!({
            "sub": "auth0|1",
            "email": "ada@example.com",
            "updated_at": "2024-05-01T10:00:00.000Z",
            "https://stellarcompass/roles": ["student"],
        });
        let profile: UserProfile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&profile).unwrap(), raw);
    }

    #[test]
    fn decode_claims() {
        let token = jwt(&json!({
            "sub": "auth0|42",
            "email": "grace@example.com",
            "name": "Grace",
            "aud": "client",
        }));
        let claims = IdTokenClaims::decode(&token).unwrap();
        assert_eq!(claims.sub, "auth0|42");
        assert_eq!(claims.email.as_deref(), Some("grace@example.com"));
        assert_eq!(claims.name.as_deref(), Some("Grace"));
        assert_eq!(claims.extra.get("aud"), Some(&json!("client")));
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        assert!(IdTokenClaims::decode("not-a-jwt").is_err());
        assert!(IdTokenClaims::decode("a.%%%.c").is_err());
        assert!(IdTokenClaims::decode("a.b.c.d").is_err());
    }
}
