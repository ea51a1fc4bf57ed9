use std::sync::Arc;

use tracing::warn;

use crate::{application::ports::WeatherApi, domain::entities::forecast::Forecast};

pub const FORECAST_UNAVAILABLE_MESSAGE: &str =
    "Forecast unavailable. Please refresh once the backend has started.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherViewState {
    Loading,
    Loaded(Vec<Forecast>),
    Unavailable { message: String },
}

/// Forecast table page. Fetches once per view.
pub struct WeatherView {
    api: Arc<dyn WeatherApi>,
    state: WeatherViewState,
}

impl WeatherView {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self {
            api,
            state: WeatherViewState::Loading,
        }
    }

    pub fn state(&self) -> &WeatherViewState {
        &self.state
    }

    pub async fn load(&mut self) -> &WeatherViewState {
        self.state = match self.api.fetch_forecasts().await {
            Ok(rows) => WeatherViewState::Loaded(rows),
            Err(err) => {
                warn!(code = err.code().as_str(), error = %err, "weather forecast unavailable");
                WeatherViewState::Unavailable {
                    message: FORECAST_UNAVAILABLE_MESSAGE.into(),
                }
            }
        };
        &self.state
    }
}
