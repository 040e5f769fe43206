//! # Stellar Compass gateway
//!
//! `stellarcompass` sits between the browser and two upstreams: Auth0, which owns
//! credentials, and the Stellar Compass backend API, which owns users, subjects and
//! lessons.
//!
//! ## Login flow
//!
//! `Idle → ProviderAuth → ProfileFetch → BackendSync → CookiesWritten → Done`
//!
//! Provider authentication and profile failures abort the flow. The backend sync is
//! best-effort: a conflict means the user already exists, any other failure is
//! logged and the login still succeeds.
//!
//! ## Session
//!
//! There is no server-side session store. The identity token and the profile are
//! written as two `HttpOnly` cookies (`jwt_token`, `user_info`) valid for 7 days.
//!
//! ## Page data
//!
//! The dashboard loader degrades to empty lists when the backend is unavailable, the
//! lesson loader maps any failure to `404 Not Found`.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod loaders;
pub mod session;
pub mod upstream;
pub mod web;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
