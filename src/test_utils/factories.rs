//! Test data factories.

use tokio::sync::watch;
use url::Url;

use crate::{
    app_error::{ApiOperation, AppError},
    domain::entities::{
        forecast::Forecast,
        identity::Identity,
        subscription::{SubscriptionDetails, SubscriptionStatus},
    },
};

pub fn test_identity() -> Identity {
    Identity::new("user_123", Some("user@example.com".to_string()))
}

pub fn other_identity() -> Identity {
    Identity::new("user_456", None)
}

pub fn identity_channel(
    identity: Option<Identity>,
) -> (watch::Sender<Option<Identity>>, watch::Receiver<Option<Identity>>) {
    watch::channel(identity)
}

pub fn annual_status() -> SubscriptionStatus {
    SubscriptionStatus::active("price_annual", "Annual Plan")
}

pub fn monthly_status() -> SubscriptionStatus {
    SubscriptionStatus::active("price_monthly", "Monthly Plan")
}

pub fn test_details() -> SubscriptionDetails {
    SubscriptionDetails {
        plan_name: "Annual Plan".to_string(),
        next_billing_date: "October 19, 2027".to_string(),
        subscription_id: "sub_123".to_string(),
    }
}

pub fn test_forecasts() -> Vec<Forecast> {
    vec![
        Forecast {
            date: "2026-10-20".to_string(),
            temperature_c: 12,
            temperature_f: 53,
            summary: Some("Chilly".to_string()),
        },
        Forecast {
            date: "2026-10-21".to_string(),
            temperature_c: 25,
            temperature_f: 76,
            summary: None,
        },
    ]
}

pub fn api_error(operation: ApiOperation, status: u16, message: &str) -> AppError {
    AppError::Api {
        operation,
        status,
        message: message.to_string(),
    }
}

pub fn redirect(url: &str) -> Url {
    Url::parse(url).unwrap()
}
