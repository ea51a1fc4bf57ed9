use strum::Display;
use thiserror::Error;

/// Message used when a failed response body is not JSON at all.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Backend call that produced an `AppError::Api`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ApiOperation {
    CheckoutSession,
    PortalSession,
    SubscriptionDetails,
    SubscriptionStatus,
    WeatherForecast,
}

impl ApiOperation {
    /// Message used when the error body is JSON but carries no usable `message`.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ApiOperation::CheckoutSession => "Failed to create checkout session",
            ApiOperation::PortalSession => "Failed to create portal session",
            ApiOperation::SubscriptionDetails => "Failed to fetch subscription details",
            ApiOperation::SubscriptionStatus => "Failed to check subscription status",
            ApiOperation::WeatherForecast => "Failed to fetch weather forecast",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Api {
        operation: ApiOperation,
        status: u16,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to get authentication token")]
    AuthMissing,

    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Network(_) => ErrorCode::NetworkError,
            AppError::Api { .. } => ErrorCode::ApiError,
            AppError::InvalidResponse(_) => ErrorCode::InvalidResponse,
            AppError::AuthMissing => ErrorCode::AuthMissing,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// The operation that failed, for API errors.
    pub fn operation(&self) -> Option<ApiOperation> {
        match self {
            AppError::Api { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    NetworkError,
    ApiError,
    InvalidResponse,
    AuthMissing,
    ValidationError,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::AuthMissing => "AUTH_MISSING",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = AppError::Api {
            operation: ApiOperation::CheckoutSession,
            status: 400,
            message: "Price not found".into(),
        };
        assert_eq!(err.to_string(), "Price not found");
        assert_eq!(err.code().as_str(), "API_ERROR");
        assert_eq!(err.operation(), Some(ApiOperation::CheckoutSession));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(ApiOperation::SubscriptionStatus.to_string(), "subscription_status");
        assert_eq!(ApiOperation::CheckoutSession.to_string(), "checkout_session");
    }

    #[test]
    fn test_validation_error_displays_message() {
        let err = AppError::Validation("You must be logged in to subscribe".into());
        assert_eq!(err.to_string(), "You must be logged in to subscribe");
        assert_eq!(err.operation(), None);
    }
}
