//! Client-side subscription status for the current identity.
//!
//! The store is an explicitly constructed service: build it with
//! [`SubscriptionStore::new`] (manual refetch only) or
//! [`SubscriptionStore::spawn`] (also follows identity changes), hand clones to
//! whoever needs the status, and call [`SubscriptionStore::shutdown`] when the
//! owning scope ends.
//!
//! Every fetch is tagged with a generation number taken when it starts. A
//! result is applied only if no newer fetch has started since, so a response
//! belonging to a superseded identity or an older refetch is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{SubscriptionApi, TokenProvider},
    domain::entities::{identity::Identity, subscription::SubscriptionStatus},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubscriptionState {
    /// No fetch has started yet.
    #[default]
    Unknown,
    Loading,
    Resolved(SubscriptionStatus),
    /// The last fetch failed. Displayed as "no subscription".
    Failed { message: String },
}

impl SubscriptionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionState::Resolved(status) if status.is_active)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SubscriptionState::Loading)
    }

    /// Neither unknown nor loading.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            SubscriptionState::Resolved(_) | SubscriptionState::Failed { .. }
        )
    }

    pub fn status(&self) -> Option<&SubscriptionStatus> {
        match self {
            SubscriptionState::Resolved(status) => Some(status),
            _ => None,
        }
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.status()
            .filter(|status| status.is_active)
            .and_then(|status| status.plan_id.as_deref())
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.status()
            .filter(|status| status.is_active)
            .and_then(|status| status.plan_name.as_deref())
    }
}

/// A fetch that has been started but not completed.
#[derive(Debug)]
struct FetchTicket {
    generation: u64,
    identity: Option<Identity>,
}

struct StoreInner {
    api: Arc<dyn SubscriptionApi>,
    tokens: Arc<dyn TokenProvider>,
    identity: watch::Receiver<Option<Identity>>,
    state: watch::Sender<SubscriptionState>,
    generation: AtomicU64,
    sync_task: OnceLock<AbortHandle>,
}

#[derive(Clone)]
pub struct SubscriptionStore {
    inner: Arc<StoreInner>,
}

impl SubscriptionStore {
    /// Store without identity tracking. State stays `Unknown` until `refetch`.
    pub fn new(
        api: Arc<dyn SubscriptionApi>,
        tokens: Arc<dyn TokenProvider>,
        identity: watch::Receiver<Option<Identity>>,
    ) -> Self {
        let (state, _) = watch::channel(SubscriptionState::Unknown);
        Self {
            inner: Arc::new(StoreInner {
                api,
                tokens,
                identity,
                state,
                generation: AtomicU64::new(0),
                sync_task: OnceLock::new(),
            }),
        }
    }

    /// Store that fetches immediately and again on every identity change
    /// (sign-in, sign-out, switch). Must be called within a Tokio runtime.
    pub fn spawn(
        api: Arc<dyn SubscriptionApi>,
        tokens: Arc<dyn TokenProvider>,
        identity: watch::Receiver<Option<Identity>>,
    ) -> Self {
        let store = Self::new(api, tokens, identity.clone());
        let task = tokio::spawn(follow_identity(Arc::downgrade(&store.inner), identity));
        let _ = store.inner.sync_task.set(task.abort_handle());
        store
    }

    /// Re-check the status for whoever is signed in now.
    ///
    /// Safe to call concurrently; the state ends up reflecting the most
    /// recently started fetch. Returns the state after this fetch completed.
    pub async fn refetch(&self) -> SubscriptionState {
        let ticket = self.inner.begin();
        self.inner.complete(ticket).await
    }

    pub fn snapshot(&self) -> SubscriptionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubscriptionState> {
        self.inner.state.subscribe()
    }

    /// Wait until the current fetch (if any) has resolved or failed.
    ///
    /// Only returns once some fetch has started: on a `new` store call
    /// `refetch` first.
    pub async fn settled(&self) -> SubscriptionState {
        let mut rx = self.inner.state.subscribe();
        match rx.wait_for(SubscriptionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Stop following identity changes and drop any in-flight result.
    pub fn shutdown(&self) {
        if let Some(task) = self.inner.sync_task.get() {
            task.abort();
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.state.send_replace(SubscriptionState::Unknown);
        debug!("subscription store shut down");
    }
}

impl StoreInner {
    fn begin(&self) -> FetchTicket {
        let identity = self.identity.borrow().clone();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Signed out: no request, the answer is known.
        let next = match identity {
            Some(_) => SubscriptionState::Loading,
            None => SubscriptionState::Resolved(SubscriptionStatus::inactive()),
        };
        self.apply(generation, next);

        FetchTicket {
            generation,
            identity,
        }
    }

    #[instrument(skip(self, ticket), fields(generation = ticket.generation))]
    async fn complete(&self, ticket: FetchTicket) -> SubscriptionState {
        let Some(identity) = ticket.identity else {
            return self.state.borrow().clone();
        };

        let next = match self.fetch_status(&identity).await {
            Ok(status) => {
                debug!(user_id = %identity.user_id, is_active = status.is_active, "subscription status fetched");
                SubscriptionState::Resolved(status)
            }
            Err(err) => {
                error!(
                    user_id = %identity.user_id,
                    code = err.code().as_str(),
                    error = %err,
                    "Error fetching subscription status"
                );
                SubscriptionState::Failed {
                    message: err.to_string(),
                }
            }
        };

        if !self.apply(ticket.generation, next) {
            debug!(user_id = %identity.user_id, "discarding superseded subscription status");
        }

        self.state.borrow().clone()
    }

    async fn fetch_status(&self, identity: &Identity) -> AppResult<SubscriptionStatus> {
        let token = self
            .tokens
            .get_token()
            .await?
            .ok_or(AppError::AuthMissing)?;
        self.api
            .check_subscription_status(&identity.user_id, &token)
            .await
    }

    /// Write `next` only if `generation` is still the latest one issued.
    fn apply(&self, generation: u64, next: SubscriptionState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        if let Some(task) = self.sync_task.get() {
            task.abort();
        }
    }
}

async fn follow_identity(
    store: Weak<StoreInner>,
    mut identity: watch::Receiver<Option<Identity>>,
) {
    loop {
        {
            let Some(inner) = store.upgrade() else {
                break;
            };
            // Start synchronously so the previous identity's status is
            // replaced before anything else can read it.
            let ticket = inner.begin();
            tokio::spawn(async move {
                inner.complete(ticket).await;
            });
        }

        if identity.changed().await.is_err() {
            debug!("identity source closed, subscription store stops following");
            break;
        }
    }
}
