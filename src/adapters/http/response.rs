use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::app_error::{ApiOperation, AppError, AppResult, UNKNOWN_ERROR_MESSAGE};

/// Error body convention of the backend.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turn a response into `T`, or into `AppError::Api` for any non-2xx status.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    operation: ApiOperation,
    response: reqwest::Response,
) -> AppResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read response: {e}")))?;

    if !status.is_success() {
        let message = error_message(operation, &body);
        tracing::warn!(%operation, status = %status, message = %message, "API request failed");
        return Err(AppError::Api {
            operation,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(%operation, error = %e, "Failed to parse API response");
        AppError::InvalidResponse(format!("{operation}: {e}"))
    })
}

/// Message for a failed response body.
///
/// A usable `message` field wins; JSON without one gets the operation's
/// fallback; anything that is not JSON gets the generic unknown-error text.
pub(crate) fn error_message(operation: ApiOperation, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => operation.fallback_message().to_string(),
        Err(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}
