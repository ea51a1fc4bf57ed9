//! Plain-text rendering of the client pages.

use tracing::{debug, instrument};
use url::Url;

use crate::{
    adapters::terminal::{
        app_state::AppState,
        router::{Action, Route},
    },
    application::use_cases::{
        checkout_success::SuccessViewState,
        plans::{AlertSeverity, PlanCard},
        subscription_store::SubscriptionState,
        weather::{WeatherView, WeatherViewState},
    },
    domain::entities::identity::Identity,
};

const APP_TITLE: &str = "Weather App";

/// Load `route`, perform `action` on it if given, and render the result
/// inside the layout.
#[instrument(skip(state))]
pub async fn visit(state: &AppState, route: &Route, action: Option<&Action>) -> String {
    let body = match route {
        Route::Home => home(),
        Route::Weather => weather(state).await,
        Route::About => about(),
        Route::Plans { canceled } => plans(state, *canceled, action).await,
        Route::CheckoutSuccess { session_id } => {
            checkout_success(state, session_id.as_deref(), action).await
        }
        Route::NotFound(path) => not_found(path),
    };

    let subscription = state.store.settled().await;
    let identity = state.identity.borrow().clone();
    layout(route, identity.as_ref(), &subscription, &body)
}

fn layout(
    route: &Route,
    identity: Option<&Identity>,
    subscription: &SubscriptionState,
    body: &str,
) -> String {
    let nav = [
        ("Home", matches!(route, Route::Home)),
        ("Weather", matches!(route, Route::Weather)),
        ("About", matches!(route, Route::About)),
        (
            "Plans",
            matches!(route, Route::Plans { .. } | Route::CheckoutSuccess { .. }),
        ),
    ]
    .iter()
    .map(|(label, active)| {
        if *active {
            format!("[{label}]")
        } else {
            label.to_string()
        }
    })
    .collect::<Vec<_>>()
    .join(" | ");

    let rule = "=".repeat(60);
    [
        rule.clone(),
        format!("{APP_TITLE}    {nav}"),
        account_line(identity, subscription),
        rule,
        String::new(),
        body.trim_end().to_string(),
        String::new(),
        format!("(c) {APP_TITLE}"),
    ]
    .join("\n")
}

fn account_line(identity: Option<&Identity>, subscription: &SubscriptionState) -> String {
    let Some(identity) = identity else {
        return "Signed out".to_string();
    };
    let who = identity
        .email
        .clone()
        .unwrap_or_else(|| identity.user_id.to_string());
    let plan = match subscription {
        SubscriptionState::Unknown | SubscriptionState::Loading => "checking subscription...",
        _ => subscription.plan_name().unwrap_or("no active subscription"),
    };
    format!("Signed in as {who} ({plan})")
}

fn home() -> String {
    [
        "Welcome to the Weather App",
        "",
        "A small weather application with subscription billing. Open the",
        "Weather page for the current forecasts, or Plans to subscribe.",
        "",
        "* Real-time Data: forecasts fetched from the backend API.",
        "* Subscriptions: checkout and billing handled by the payments provider.",
        "* Routing: every page is reachable by path.",
    ]
    .join("\n")
}

fn about() -> String {
    [
        "About This Application",
        "",
        "Project Overview",
        "  A weather forecast client that fetches data from a backend API and",
        "  keeps the signed-in user's subscription status in sync.",
        "",
        "Data Source",
        "  Forecasts come from the backend's sample weather endpoint.",
    ]
    .join("\n")
}

fn not_found(path: &str) -> String {
    format!("Page not found: {path}\n\nReturn to Home: /")
}

async fn weather(state: &AppState) -> String {
    let mut view = WeatherView::new(state.weather_api.clone());
    let mut lines = vec![
        "Weather Forecast".to_string(),
        "This page demonstrates fetching data from the server.".to_string(),
        String::new(),
    ];

    match view.load().await {
        WeatherViewState::Loading => lines.push("Loading...".to_string()),
        WeatherViewState::Unavailable { message } => lines.push(message.clone()),
        WeatherViewState::Loaded(rows) => {
            lines.push(format!(
                "{:<12} {:>10} {:>10}  {}",
                "Date", "Temp. (C)", "Temp. (F)", "Summary"
            ));
            for row in rows {
                lines.push(format!(
                    "{:<12} {:>10} {:>10}  {}",
                    row.date,
                    row.temperature_c,
                    row.temperature_f,
                    row.summary.as_deref().unwrap_or_default()
                ));
            }
        }
    }

    lines.join("\n")
}

async fn plans(state: &AppState, canceled: bool, action: Option<&Action>) -> String {
    state.store.settled().await;
    let view = state.plans_view(canceled);

    let handoff = match action {
        Some(Action::Subscribe(code)) => view.subscribe(code).await,
        Some(Action::ManageBilling) => view.manage_billing(&state.portal).await,
        None => None,
    };
    if let Some(url) = handoff {
        return redirecting(&url);
    }

    let mut lines = vec![
        "Choose Your Plan".to_string(),
        "Select the subscription that best fits your needs".to_string(),
        String::new(),
    ];
    for alert in view.alerts() {
        let tag = match alert.severity {
            AlertSeverity::Info => "info",
            AlertSeverity::Success => "success",
            AlertSeverity::Error => "error",
        };
        lines.push(format!("[{tag}] {}", alert.message));
    }
    for card in view.cards() {
        lines.push(String::new());
        lines.extend(plan_card(&card));
    }

    lines.join("\n")
}

fn plan_card(card: &PlanCard) -> Vec<String> {
    let plan = card.plan;
    let mut lines = vec![format!(
        "{}{}",
        plan.name,
        if plan.best_value { "  (Best Value)" } else { "" }
    )];
    lines.push(format!("  {}", plan.description));
    lines.push(format!("  {} / {}", plan.price, plan.interval));
    lines.extend(plan.features.iter().map(|feature| format!("  + {feature}")));

    let action = if card.subscribe_enabled {
        format!("  <{}>  subscribe:{}", card.action_label, plan.code)
    } else {
        format!("  <{}>  (unavailable)", card.action_label)
    };
    lines.push(action);
    lines
}

async fn checkout_success(
    state: &AppState,
    session_id: Option<&str>,
    action: Option<&Action>,
) -> String {
    let mut view = state.success_view();
    view.load(session_id).await;

    if matches!(view.state(), SuccessViewState::Confirmed(_)) {
        // The completed checkout changed the subscription; re-check it.
        let refreshed = state.store.refetch().await;
        debug!(is_active = refreshed.is_active(), "subscription refreshed after checkout");

        if let Some(Action::ManageBilling) = action {
            if let Some(url) = view.manage_billing().await {
                return redirecting(&url);
            }
        }
    }

    match view.state() {
        SuccessViewState::Loading => "Loading subscription details...".to_string(),
        SuccessViewState::Error { message } => {
            format!("[error] {message}\n\nReturn to Home: /")
        }
        SuccessViewState::Confirmed(details) => [
            "Subscription Successful!".to_string(),
            String::new(),
            format!("Thank you for subscribing to our {} plan!", details.plan_name),
            "Your subscription is now active. You have access to all the premium".to_string(),
            "features included in your plan.".to_string(),
            String::new(),
            format!("Next billing date: {}", details.next_billing_date),
            format!("Subscription ID: {}", details.subscription_id),
            String::new(),
            "Return to Home: /    Manage Billing: manage-billing".to_string(),
        ]
        .join("\n"),
    }
}

fn redirecting(url: &Url) -> String {
    format!(
        "Redirecting to {}...",
        url.host_str().unwrap_or_else(|| url.as_str())
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tokio::sync::watch;

    use crate::application::ports::TokenProvider;
    use crate::domain::entities::subscription::SubscriptionStatus;
    use crate::application::use_cases::{
        checkout_success::MISSING_SESSION_MESSAGE, plans::SIGN_IN_PROMPT,
        weather::FORECAST_UNAVAILABLE_MESSAGE,
    };
    use crate::test_utils::*;

    struct Harness {
        api: Arc<ScriptedSubscriptionApi>,
        navigator: Arc<RecordingNavigator>,
        state: AppState,
        _identity: watch::Sender<Option<Identity>>,
    }

    fn harness(
        identity: Option<Identity>,
        weather: StaticWeatherApi,
        setup: impl FnOnce(&ScriptedSubscriptionApi),
    ) -> Harness {
        let api = Arc::new(ScriptedSubscriptionApi::new());
        setup(&*api);
        let navigator = Arc::new(RecordingNavigator::new());
        let tokens: Arc<dyn TokenProvider> = if identity.is_some() {
            Arc::new(StaticTokenProvider::signed_in())
        } else {
            Arc::new(StaticTokenProvider::without_token())
        };
        let (tx, rx) = identity_channel(identity);
        let state = AppState::new(
            api.clone(),
            Arc::new(weather),
            tokens,
            rx,
            navigator.clone(),
        );
        Harness {
            api,
            navigator,
            state,
            _identity: tx,
        }
    }

    #[tokio::test]
    async fn test_home_signed_out_header() {
        let h = harness(None, StaticWeatherApi::rows(vec![]), |_| {});

        let page = visit(&h.state, &Route::Home, None).await;

        assert!(page.contains("[Home] | Weather | About | Plans"));
        assert!(page.contains("Signed out"));
        assert!(page.contains("Welcome to the Weather App"));
        assert_eq!(h.api.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_header_shows_active_plan() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |api| {
            api.push_status(Scripted::ready(Ok(annual_status())));
        });

        let page = visit(&h.state, &Route::About, None).await;

        assert!(page.contains("Signed in as user@example.com (Annual Plan)"));
    }

    #[tokio::test]
    async fn test_weather_table() {
        let h = harness(None, StaticWeatherApi::rows(test_forecasts()), |_| {});

        let page = visit(&h.state, &Route::Weather, None).await;

        assert!(page.contains("Temp. (C)"));
        assert!(page.contains("2026-10-20"));
        assert!(page.contains("Chilly"));
        assert!(page.contains("2026-10-21"));
    }

    #[tokio::test]
    async fn test_weather_failure_shows_fallback() {
        let h = harness(None, StaticWeatherApi::failing(500), |_| {});

        let page = visit(&h.state, &Route::Weather, None).await;

        assert!(page.contains(FORECAST_UNAVAILABLE_MESSAGE));
        assert!(!page.contains("Temp. (C)"));
    }

    #[tokio::test]
    async fn test_plans_marks_current_plan() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |api| {
            api.push_status(Scripted::ready(Ok(annual_status())));
        });

        let page = visit(&h.state, &Route::Plans { canceled: false }, None).await;

        assert!(page.contains("<Current Plan>  (unavailable)"));
        assert!(page.contains("<Subscribe>  subscribe:monthly"));
        assert!(page.contains("[success] You already have an active subscription to the Annual Plan plan."));
    }

    #[tokio::test]
    async fn test_plans_signed_out_prompts() {
        let h = harness(None, StaticWeatherApi::rows(vec![]), |_| {});

        let page = visit(&h.state, &Route::Plans { canceled: true }, None).await;

        assert!(page.contains(&format!("[info] {SIGN_IN_PROMPT}")));
        assert!(page.contains("[info] Your checkout was canceled."));
        assert!(!page.contains("subscribe:annual"));
    }

    #[tokio::test]
    async fn test_plans_subscribe_redirects() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |api| {
            api.push_checkout(Ok(redirect("https://pay.example/session/abc")));
        });

        let page = visit(
            &h.state,
            &Route::Plans { canceled: false },
            Some(&Action::Subscribe("annual".into())),
        )
        .await;

        assert!(page.contains("Redirecting to pay.example..."));
        assert_eq!(h.navigator.visited(), vec![redirect("https://pay.example/session/abc")]);
    }

    #[tokio::test]
    async fn test_success_confirms_and_refreshes_status() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |api| {
            api.push_status(Scripted::ready(Ok(SubscriptionStatus::inactive())));
            api.push_details(Ok(test_details()));
            api.push_status(Scripted::ready(Ok(annual_status())));
        });
        h.state.store.settled().await;

        let page = visit(
            &h.state,
            &Route::CheckoutSuccess {
                session_id: Some("cs_test_123".into()),
            },
            None,
        )
        .await;

        assert!(page.contains("Thank you for subscribing to our Annual Plan plan!"));
        assert!(page.contains("Next billing date: October 19, 2027"));
        assert!(page.contains("Subscription ID: sub_123"));
        assert!(page.contains("(Annual Plan)"));
        assert_eq!(h.api.status_calls(), 2);
    }

    #[tokio::test]
    async fn test_success_without_session_id() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |_| {});

        let page = visit(&h.state, &Route::CheckoutSuccess { session_id: None }, None).await;

        assert!(page.contains(&format!("[error] {MISSING_SESSION_MESSAGE}")));
        assert!(page.contains("Return to Home: /"));
        assert_eq!(h.api.details_calls(), 0);
    }

    #[tokio::test]
    async fn test_success_manage_billing_redirects() {
        let h = harness(Some(test_identity()), StaticWeatherApi::rows(vec![]), |api| {
            api.push_details(Ok(test_details()));
            api.push_portal(Ok(redirect("https://billing.example/p/1")));
        });

        let page = visit(
            &h.state,
            &Route::CheckoutSuccess {
                session_id: Some("cs_test_123".into()),
            },
            Some(&Action::ManageBilling),
        )
        .await;

        assert!(page.contains("Redirecting to billing.example..."));
        assert_eq!(h.navigator.visited(), vec![redirect("https://billing.example/p/1")]);
    }

    #[tokio::test]
    async fn test_not_found() {
        let h = harness(None, StaticWeatherApi::rows(vec![]), |_| {});

        let page = visit(&h.state, &Route::NotFound("/pricing".into()), None).await;

        assert!(page.contains("Page not found: /pricing"));
    }
}
