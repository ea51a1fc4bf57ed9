use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    application::{
        ports::{Navigator, SubscriptionApi, TokenProvider, WeatherApi},
        use_cases::{
            billing_portal::BillingPortalFlow, checkout::CheckoutFlow,
            checkout_success::CheckoutSuccessView, plans::PlansView,
            subscription_store::SubscriptionStore,
        },
    },
    domain::entities::identity::Identity,
};

/// Services shared by every page of one client session.
#[derive(Clone)]
pub struct AppState {
    pub subscription_api: Arc<dyn SubscriptionApi>,
    pub weather_api: Arc<dyn WeatherApi>,
    pub tokens: Arc<dyn TokenProvider>,
    pub identity: watch::Receiver<Option<Identity>>,
    pub store: SubscriptionStore,
    pub checkout: CheckoutFlow,
    pub portal: BillingPortalFlow,
}

impl AppState {
    /// Wires the flows and starts the subscription store. Requires a Tokio runtime.
    pub fn new(
        subscription_api: Arc<dyn SubscriptionApi>,
        weather_api: Arc<dyn WeatherApi>,
        tokens: Arc<dyn TokenProvider>,
        identity: watch::Receiver<Option<Identity>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = SubscriptionStore::spawn(
            subscription_api.clone(),
            tokens.clone(),
            identity.clone(),
        );
        let checkout = CheckoutFlow::new(
            subscription_api.clone(),
            tokens.clone(),
            identity.clone(),
            navigator.clone(),
        );
        let portal = BillingPortalFlow::new(
            subscription_api.clone(),
            tokens.clone(),
            identity.clone(),
            navigator,
        );

        Self {
            subscription_api,
            weather_api,
            tokens,
            identity,
            store,
            checkout,
            portal,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.borrow().is_some()
    }

    pub fn plans_view(&self, canceled: bool) -> PlansView {
        PlansView::new(
            self.checkout.clone(),
            self.store.snapshot(),
            self.is_signed_in(),
            canceled,
        )
    }

    pub fn success_view(&self) -> CheckoutSuccessView {
        CheckoutSuccessView::new(
            self.subscription_api.clone(),
            self.tokens.clone(),
            self.identity.clone(),
            self.portal.clone(),
        )
    }

    pub fn shutdown(&self) {
        self.store.shutdown();
    }
}
