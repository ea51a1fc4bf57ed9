pub mod app_state;
pub mod pages;
pub mod router;

pub use app_state::AppState;
pub use router::{Action, Route};
