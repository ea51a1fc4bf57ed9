pub mod checkout;
pub mod forecast;
pub mod identity;
pub mod plan;
pub mod subscription;
