pub mod billing_portal;
pub mod checkout;
pub mod checkout_success;
pub mod plans;
pub mod subscription_store;
pub mod weather;
