use async_trait::async_trait;
use secrecy::SecretString;

use crate::app_error::AppResult;

/// Source of short-lived bearer tokens for the signed-in identity.
///
/// Callers ask for a token right before each request and never cache it.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// `Ok(None)` when no usable token exists (signed out or expired).
    async fn get_token(&self) -> AppResult<Option<SecretString>>;
}
