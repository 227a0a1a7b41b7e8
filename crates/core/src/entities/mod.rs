//! Persisted entity records and their patch variants.
//!
//! Each entity serializes to exactly the camelCase JSON shape stored in its
//! collection document on disk. Partial updates are modeled as explicit
//! patch structs with optional fields rather than an untyped merge, so
//! unknown fields can never leak into storage.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, Order, OrderLine, OrderPatch, ShippingAddress};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{CartLine, NewUser, PublicUser, User, UserPatch};
