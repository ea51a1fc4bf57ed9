use std::sync::Mutex;

use tracing::info;
use url::Url;

use crate::application::ports::Navigator;

/// Navigation for a terminal host: there is no browser to hand over to, so
/// the external URL is printed for the user to open.
#[derive(Default)]
pub struct TerminalNavigator {
    visited: Mutex<Vec<Url>>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last URL navigated to, if any.
    pub fn last(&self) -> Option<Url> {
        self.visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &Url) {
        info!(url = %url, "leaving application");
        println!("Continue at: {url}");
        self.visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_last_navigation() {
        let navigator = TerminalNavigator::new();
        assert!(navigator.last().is_none());

        navigator.navigate(&Url::parse("https://pay.example/session/abc").unwrap());
        navigator.navigate(&Url::parse("https://billing.example/p/1").unwrap());

        assert_eq!(
            navigator.last().map(|u| u.to_string()),
            Some("https://billing.example/p/1".to_string())
        );
    }
}
