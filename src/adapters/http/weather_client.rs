use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::{
    adapters::http::response::handle_response,
    app_error::{ApiOperation, AppError, AppResult},
    application::ports::WeatherApi,
    domain::entities::forecast::Forecast,
};

const FORECAST_PATH: &str = "weatherforecast";

/// Unauthenticated client for the forecast endpoint.
#[derive(Clone)]
pub struct HttpWeatherClient {
    client: Client,
    base_url: Url,
}

impl HttpWeatherClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_forecasts(&self) -> AppResult<Vec<Forecast>> {
        let url = self
            .base_url
            .join(FORECAST_PATH)
            .map_err(|e| AppError::Config(format!("Invalid API base URL: {e}")))?;

        let response = self.client.get(url).send().await?;
        handle_response(ApiOperation::WeatherForecast, response).await
    }
}
