//! User entity: identity record plus the embedded shopping cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Email, ProductId, UserId, UserRole};

/// A line in a user's cart.
///
/// Carries a copy of the product's name/price/image at the time the line was
/// added, so the cart can render without re-resolving the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

/// A stored user record.
///
/// The password field holds only the argon2 hash, never plaintext. Email
/// uniqueness is enforced at creation time only, and comparison is
/// case-sensitive as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Argon2 password hash.
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

impl User {
    /// Apply a partial update. Fields absent from the patch are retained;
    /// an empty patch is a no-op.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        let UserPatch {
            name,
            email,
            password,
            role,
            cart,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(password) = password {
            self.password = password;
        }
        if let Some(role) = role {
            self.role = role;
        }
        if let Some(cart) = cart {
            self.cart = cart;
        }
    }
}

/// Input for creating a user. The repository assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Already-hashed password.
    pub password: String,
    pub role: UserRole,
}

/// Partial update for a [`User`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<CartLine>>,
}

impl UserPatch {
    /// Patch that replaces only the cart.
    #[must_use]
    pub fn cart(cart: Vec<CartLine>) -> Self {
        Self {
            cart: Some(cart),
            ..Self::default()
        }
    }
}

/// A user as exposed over the API: everything except the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            cart: user.cart,
        }
    }
}
