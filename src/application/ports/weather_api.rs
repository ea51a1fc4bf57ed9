use async_trait::async_trait;

use crate::{app_error::AppResult, domain::entities::forecast::Forecast};

#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch_forecasts(&self) -> AppResult<Vec<Forecast>>;
}
