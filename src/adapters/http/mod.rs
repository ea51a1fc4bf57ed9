mod response;
pub mod subscription_client;
pub mod weather_client;

pub use subscription_client::HttpSubscriptionClient;
pub use weather_client::HttpWeatherClient;
