pub mod http;
pub mod identity;
pub mod navigation;
pub mod terminal;
