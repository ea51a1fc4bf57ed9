use std::str::FromStr;

use url::Url;

use crate::app_error::AppError;

/// Client-side routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Weather,
    About,
    Plans { canceled: bool },
    /// Return target of a completed checkout.
    CheckoutSuccess { session_id: Option<String> },
    NotFound(String),
}

impl Route {
    /// Resolve `target` (a path with optional query, or a full URL on
    /// `origin`) to a route.
    pub fn parse(origin: &Url, target: &str) -> Self {
        let Ok(url) = origin.join(target) else {
            return Route::NotFound(target.to_string());
        };
        if url.origin() != origin.origin() {
            return Route::NotFound(target.to_string());
        }

        let query = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        match url.path().trim_end_matches('/') {
            "" => Route::Home,
            "/weather" => Route::Weather,
            "/about" => Route::About,
            "/subscription" => Route::Plans {
                canceled: query("canceled").as_deref() == Some("true"),
            },
            "/subscription/success" => Route::CheckoutSuccess {
                session_id: query("session_id"),
            },
            other => Route::NotFound(other.to_string()),
        }
    }
}

/// What the user does on the page once it has loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `subscribe:<plan code>`
    Subscribe(String),
    /// `manage-billing`
    ManageBilling,
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("subscribe", plan)) if !plan.is_empty() => Ok(Action::Subscribe(plan.to_string())),
            None if s == "manage-billing" => Ok(Action::ManageBilling),
            _ => Err(AppError::Validation(format!(
                "Unknown action: {s} (expected subscribe:<plan> or manage-billing)"
            ))),
        }
    }
}
