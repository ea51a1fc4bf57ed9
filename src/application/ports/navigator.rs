use url::Url;

/// Full-page navigation to an external origin.
///
/// Once called, control is considered to have left the application; callers
/// must not touch view state afterwards expecting the user to see it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url);
}
