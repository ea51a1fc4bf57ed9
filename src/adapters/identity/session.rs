//! Signed-in session held by the client.
//!
//! The identity provider issues a bearer JWT. The client never verifies the
//! signature (the backend does); it only reads `sub`, `email` and `exp` to
//! know who is signed in and when the token stops being usable.

use std::sync::RwLock;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::TokenProvider,
    domain::entities::identity::Identity,
};

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
    email: Option<String>,
    exp: Option<i64>,
}

struct Session {
    token: SecretString,
    expires_at: Option<i64>,
}

pub struct SessionManager {
    identity: watch::Sender<Option<Identity>>,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn signed_out() -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            identity,
            session: RwLock::new(None),
        }
    }

    /// Adopt `token` as the current session and publish its identity.
    ///
    /// Re-signing in as the same user replaces the token without
    /// notifying identity subscribers.
    pub fn sign_in(&self, token: SecretString) -> AppResult<Identity> {
        let claims = peek_claims(token.expose_secret())?;
        if claims.exp.is_some_and(|exp| exp <= now()) {
            return Err(AppError::Validation("Session token has expired".into()));
        }

        let identity = Identity::new(claims.sub, claims.email);
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(Session {
            token,
            expires_at: claims.exp,
        });

        let changed = self.identity.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                return false;
            }
            *current = Some(identity.clone());
            true
        });
        if changed {
            info!(user_id = %identity.user_id, "signed in");
        }

        Ok(identity)
    }

    pub fn sign_out(&self) {
        self.session
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let changed = self.identity.send_if_modified(|current| current.take().is_some());
        if changed {
            info!("signed out");
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Identity changes, for the subscription store and the flows.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    fn token_at(&self, now: i64) -> Option<SecretString> {
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        let session = session.as_ref()?;
        if session.expires_at.is_some_and(|exp| exp <= now) {
            debug!("session token expired");
            return None;
        }
        Some(session.token.clone())
    }
}

#[async_trait]
impl TokenProvider for SessionManager {
    async fn get_token(&self) -> AppResult<Option<SecretString>> {
        Ok(self.token_at(now()))
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Read the claims without verifying the signature.
fn peek_claims(token: &str) -> AppResult<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["sub"]);

    decode::<SessionClaims>(token, &DecodingKey::from_secret(b"ignored"), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Validation(format!("Invalid session token: {e}")))
}
