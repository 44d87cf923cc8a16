use crate::errors::ConfigError;
use crate::models::UserId;
use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_SESSION_PATH: &str = "data/session.json";
pub const DEFAULT_DEMO_USER: UserId = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_path: PathBuf,
    /// User id that anonymous requests act as. `None` requires a login.
    pub demo_user: Option<UserId>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            demo_user: Some(DEFAULT_DEMO_USER),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("WELLMIND_API_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = lookup("WELLMIND_SESSION_PATH") {
            config.session_path = PathBuf::from(path);
        }
        if let Some(value) = lookup("WELLMIND_DEMO_USER") {
            config.demo_user = parse_demo_user(&value)?;
        }

        Ok(config)
    }
}

fn parse_demo_user(value: &str) -> Result<Option<UserId>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed
        .parse::<UserId>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidUserId {
            name: "WELLMIND_DEMO_USER",
            value: value.to_string(),
        })
}
