//! In-memory implementations of the application ports.

use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;
use url::Url;

use crate::{
    app_error::{ApiOperation, AppError, AppResult},
    application::ports::{Navigator, SubscriptionApi, TokenProvider, WeatherApi},
    domain::entities::{
        forecast::Forecast,
        identity::{CheckoutSessionId, UserId},
        subscription::{SubscriptionDetails, SubscriptionStatus},
    },
};

// ============================================================================
// ScriptedSubscriptionApi
// ============================================================================

/// A queued response, optionally held back until the test releases it.
pub struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: AppResult<T>,
}

impl<T> Scripted<T> {
    pub fn ready(result: AppResult<T>) -> Self {
        Self { gate: None, result }
    }

    /// Returns the scripted response plus the sender that releases it.
    pub fn gated(result: AppResult<T>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Some(rx),
                result,
            },
            tx,
        )
    }

    async fn resolve(self) -> AppResult<T> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.result
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCheckout {
    pub price_id: String,
    pub customer_id: UserId,
    pub customer_email: Option<String>,
    pub token: String,
}

/// Responses are served in FIFO order per endpoint. An empty status queue
/// answers "inactive"; the other endpoints fail when nothing is queued.
#[derive(Default)]
pub struct ScriptedSubscriptionApi {
    statuses: Mutex<VecDeque<Scripted<SubscriptionStatus>>>,
    checkouts: Mutex<VecDeque<Scripted<Url>>>,
    portals: Mutex<VecDeque<AppResult<Url>>>,
    details: Mutex<VecDeque<AppResult<SubscriptionDetails>>>,
    status_calls: AtomicUsize,
    checkout_calls: AtomicUsize,
    portal_calls: AtomicUsize,
    details_calls: AtomicUsize,
    pub status_users: Mutex<Vec<UserId>>,
    pub checkout_requests: Mutex<Vec<RecordedCheckout>>,
    pub portal_customers: Mutex<Vec<UserId>>,
    pub details_sessions: Mutex<Vec<CheckoutSessionId>>,
}

impl ScriptedSubscriptionApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, scripted: Scripted<SubscriptionStatus>) {
        self.statuses.lock().unwrap().push_back(scripted);
    }

    pub fn push_checkout(&self, result: AppResult<Url>) {
        self.push_checkout_scripted(Scripted::ready(result));
    }

    pub fn push_checkout_scripted(&self, scripted: Scripted<Url>) {
        self.checkouts.lock().unwrap().push_back(scripted);
    }

    pub fn push_portal(&self, result: AppResult<Url>) {
        self.portals.lock().unwrap().push_back(result);
    }

    pub fn push_details(&self, result: AppResult<SubscriptionDetails>) {
        self.details.lock().unwrap().push_back(result);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    pub fn portal_calls(&self) -> usize {
        self.portal_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    /// Total number of backend requests issued.
    pub fn total_calls(&self) -> usize {
        self.status_calls() + self.checkout_calls() + self.portal_calls() + self.details_calls()
    }
}

fn nothing_scripted(operation: ApiOperation) -> AppError {
    AppError::Network(format!("no scripted response for {operation}"))
}

#[async_trait]
impl SubscriptionApi for ScriptedSubscriptionApi {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &UserId,
        customer_email: Option<&str>,
        token: &SecretString,
    ) -> AppResult<Url> {
        use secrecy::ExposeSecret;

        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        self.checkout_requests.lock().unwrap().push(RecordedCheckout {
            price_id: price_id.to_string(),
            customer_id: customer_id.clone(),
            customer_email: customer_email.map(str::to_string),
            token: token.expose_secret().to_string(),
        });
        let scripted = self.checkouts.lock().unwrap().pop_front();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Err(nothing_scripted(ApiOperation::CheckoutSession)),
        }
    }

    async fn create_portal_session(
        &self,
        customer_id: &UserId,
        _token: &SecretString,
    ) -> AppResult<Url> {
        self.portal_calls.fetch_add(1, Ordering::SeqCst);
        self.portal_customers
            .lock()
            .unwrap()
            .push(customer_id.clone());
        self.portals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_scripted(ApiOperation::PortalSession)))
    }

    async fn get_subscription_details(
        &self,
        session_id: &CheckoutSessionId,
        _token: &SecretString,
    ) -> AppResult<SubscriptionDetails> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        self.details_sessions
            .lock()
            .unwrap()
            .push(session_id.clone());
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(nothing_scripted(ApiOperation::SubscriptionDetails)))
    }

    async fn check_subscription_status(
        &self,
        user_id: &UserId,
        _token: &SecretString,
    ) -> AppResult<SubscriptionStatus> {
        self.status_users.lock().unwrap().push(user_id.clone());
        let scripted = self.statuses.lock().unwrap().pop_front();
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(SubscriptionStatus::inactive()),
        }
    }
}

// ============================================================================
// StaticTokenProvider
// ============================================================================

pub struct StaticTokenProvider {
    token: Option<String>,
    calls: AtomicUsize,
}

impl StaticTokenProvider {
    pub fn signed_in() -> Self {
        Self::with_token("test-token")
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn without_token() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> AppResult<Option<SecretString>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone().map(SecretString::from))
    }
}

// ============================================================================
// RecordingNavigator
// ============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Url> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &Url) {
        self.visited.lock().unwrap().push(url.clone());
    }
}

// ============================================================================
// StaticWeatherApi
// ============================================================================

pub struct StaticWeatherApi {
    rows: Result<Vec<Forecast>, u16>,
}

impl StaticWeatherApi {
    pub fn rows(rows: Vec<Forecast>) -> Self {
        Self { rows: Ok(rows) }
    }

    pub fn failing(status: u16) -> Self {
        Self { rows: Err(status) }
    }
}

#[async_trait]
impl WeatherApi for StaticWeatherApi {
    async fn fetch_forecasts(&self) -> AppResult<Vec<Forecast>> {
        match &self.rows {
            Ok(rows) => Ok(rows.clone()),
            Err(status) => Err(AppError::Api {
                operation: ApiOperation::WeatherForecast,
                status: *status,
                message: ApiOperation::WeatherForecast.fallback_message().to_string(),
            }),
        }
    }
}
