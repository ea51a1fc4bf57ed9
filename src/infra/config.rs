use std::time::Duration;

use env_helpers::get_env_default;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::infra::error::InfraError;

const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";

pub struct AppConfig {
    /// Identity-provider publishable key (`pk_...`).
    pub identity_publishable_key: SecretString,
    /// Payments-provider publishable key (`pk_...`).
    pub payments_publishable_key: SecretString,
    /// Origin of the client pages; checkout and portal return URLs derive from it.
    pub app_origin: Url,
    /// Backend base URL. Same-origin with the pages unless overridden.
    pub api_base_url: Url,
    pub http_timeout: Option<Duration>,
    /// Bearer token of the signed-in identity, if any.
    pub session_token: Option<SecretString>,
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, InfraError> {
        let require = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(InfraError::ConfigMissing { var })
        };
        let optional = |var: &'static str| lookup(var).filter(|value| !value.trim().is_empty());

        let identity_publishable_key =
            publishable_key("IDENTITY_PUBLISHABLE_KEY", require("IDENTITY_PUBLISHABLE_KEY")?)?;
        let payments_publishable_key =
            publishable_key("PAYMENTS_PUBLISHABLE_KEY", require("PAYMENTS_PUBLISHABLE_KEY")?)?;

        let app_origin = parse_url(
            "APP_ORIGIN",
            &optional("APP_ORIGIN").unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string()),
        )?;
        let api_base_url = with_trailing_slash(match optional("API_BASE_URL") {
            Some(raw) => parse_url("API_BASE_URL", &raw)?,
            None => app_origin.clone(),
        });

        let http_timeout = optional("HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        InfraError::InvalidConfig(format!(
                            "HTTP_TIMEOUT_SECS must be a positive number of seconds, got {raw}"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self {
            identity_publishable_key,
            payments_publishable_key,
            app_origin,
            api_base_url,
            http_timeout,
            session_token: optional("SESSION_TOKEN").map(SecretString::from),
            log_file: optional("LOG_FILE"),
        })
    }
}

// Unset and empty are treated the same.
fn env_var(var: &'static str) -> Option<String> {
    Some(get_env_default(var, String::new())).filter(|value| !value.trim().is_empty())
}

/// Endpoint paths are joined relative to the base, so its path must end in `/`
/// or the last segment would be replaced.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn publishable_key(var: &str, value: String) -> Result<SecretString, InfraError> {
    let key = SecretString::from(value);
    if !key.expose_secret().starts_with("pk_") {
        return Err(InfraError::InvalidConfig(format!(
            "{var} must be a publishable key (pk_...)"
        )));
    }
    Ok(key)
}

fn parse_url(var: &str, raw: &str) -> Result<Url, InfraError> {
    Url::parse(raw).map_err(|e| InfraError::InvalidConfig(format!("{var} is not a valid URL: {e}")))
}
