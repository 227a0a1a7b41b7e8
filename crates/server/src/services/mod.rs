//! Business logic services.

pub mod auth;
pub mod checkout;

pub use auth::{AuthService, TokenService};
pub use checkout::CheckoutService;
