use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "fr-FR";
const DEFAULT_BIND: &str = "0.0.0.0:3146";

pub const API_KEY_VAR: &str = "TMDB_API_KEY";
pub const ACCESS_TOKEN_VAR: &str = "TMDB_ACCESS_TOKEN";

/// Upstream credentials and endpoints, built once at startup and handed to the client.
///
/// Credentials are optional here so a missing one fails on the first call with
/// [`crate::error::TmdbError::MissingCredential`] instead of at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub base_url: String,
    pub language: String,
    pub bind: SocketAddr,
}

impl Config {
    pub fn new(api_key: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            access_token: Some(access_token.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 3146)),
        }
    }

    pub fn from_env() -> Result<Self> {
        let bind_raw = non_empty_var("CINESCOPE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .with_context(|| format!("CINESCOPE_BIND is not a socket address: {bind_raw}"))?;

        Ok(Self {
            api_key: non_empty_var(API_KEY_VAR),
            access_token: non_empty_var(ACCESS_TOKEN_VAR),
            base_url: non_empty_var("TMDB_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            language: non_empty_var("TMDB_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            bind,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
