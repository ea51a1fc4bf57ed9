pub mod navigator;
pub mod subscription_api;
pub mod token_provider;
pub mod weather_api;

pub use navigator::Navigator;
pub use subscription_api::SubscriptionApi;
pub use token_provider::TokenProvider;
pub use weather_api::WeatherApi;
