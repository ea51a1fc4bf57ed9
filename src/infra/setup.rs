use std::fs::File;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        http::{HttpSubscriptionClient, HttpWeatherClient},
        identity::SessionManager,
        terminal::AppState,
    },
    application::ports::{Navigator, TokenProvider},
    infra::{config::AppConfig, error::InfraError, http_client::build_client},
};

const DEFAULT_LOG_FILTER: &str = "subscription_sync=info";

/// Session for the configured token, or a signed-out one.
pub fn init_session(config: &AppConfig) -> Arc<SessionManager> {
    let session = SessionManager::signed_out();
    if let Some(token) = config.session_token.clone() {
        if let Err(err) = session.sign_in(token) {
            warn!(error = %err, "ignoring SESSION_TOKEN, continuing signed out");
        }
    }
    Arc::new(session)
}

pub fn init_app_state(
    config: &AppConfig,
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
) -> anyhow::Result<AppState> {
    let client = build_client(config.http_timeout).map_err(InfraError::from)?;

    let subscription_api = Arc::new(HttpSubscriptionClient::new(
        client.clone(),
        config.api_base_url.clone(),
        config.app_origin.clone(),
    ));
    let weather_api = Arc::new(HttpWeatherClient::new(client, config.api_base_url.clone()));
    let identity = session.subscribe();

    info!(
        app_origin = %config.app_origin,
        api_base_url = %config.api_base_url,
        signed_in = session.current().is_some(),
        "client configured"
    );

    Ok(AppState::new(
        subscription_api,
        weather_api,
        session as Arc<dyn TokenProvider>,
        identity,
        navigator,
    ))
}

/// Console logs go to stderr so rendered pages on stdout stay clean.
pub fn init_tracing(log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("cannot create log file {path}"))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
