//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are strings of
//! the form `<prefix>_<unix millis>_<random suffix>`, so generated IDs sort
//! roughly by creation time but are not strictly monotonic under clock skew.

use chrono::Utc;
use uuid::Uuid;

/// Number of random characters appended to a generated ID.
const SUFFIX_LEN: usize = 9;

/// Build a raw ID string for the given entity prefix.
///
/// Not intended for direct use; called by the `define_id!` macro.
#[must_use]
pub fn generate_raw(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    let suffix = uuid.get(..SUFFIX_LEN).unwrap_or(&uuid);
    format!("{prefix}_{millis}_{suffix}")
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `generate()` producing `<prefix>_<millis>_<suffix>` IDs
/// - `new()`, `as_str()`, `Display`, and `From<String>`/`From<&str>`
///
/// # Example
///
/// ```rust
/// # use gadget_grove_core::define_id;
/// define_id!(UserId, "user");
/// define_id!(OrderId, "order");
///
/// let user_id = UserId::generate();
/// assert!(user_id.as_str().starts_with("user_"));
///
/// // These are different types, so this won't compile:
/// // let _: UserId = OrderId::generate();
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix carried by every generated ID of this type.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh time-based ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::generate_raw($prefix))
            }

            /// Wrap an existing ID value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

// Standard entity IDs
define_id!(UserId, "user");
define_id!(ProductId, "product");
define_id!(OrderId, "order");
