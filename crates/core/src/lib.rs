//! Gadget Grove Core - Shared domain types.
//!
//! This crate provides common types used across all Gadget Grove components:
//! - `server` - HTTP API backed by the flat-file JSON store
//! - `cli` - Command-line tools for store management and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no HTTP.
//! Everything here serializes to the exact JSON shape persisted on disk and
//! exchanged over the API.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`entities`] - Persisted records (User, Product, Order) and their
//!   patch variants for partial updates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entities;
pub mod types;

pub use entities::*;
pub use types::*;
