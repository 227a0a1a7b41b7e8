//! Entity repositories over the flat-file store.
//!
//! Each repository borrows one [`Document`](crate::store::Document) from the
//! [`JsonStore`](crate::store::JsonStore) and exposes typed CRUD. All writes
//! go through `Document::mutate`, so each operation's read-modify-write is
//! atomic for its document.

use thiserror::Error;

use crate::store::StoreError;

pub mod orders;
pub mod products;
pub mod users;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying document could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// No record with the requested id exists.
    #[error("not found")]
    NotFound,

    /// The operation would violate a uniqueness rule.
    #[error("conflict: {0}")]
    Conflict(String),
}
