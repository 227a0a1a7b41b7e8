//! CLI command implementations.

pub mod admin;
pub mod store;

use std::path::PathBuf;

use gadget_grove_server::store::JsonStore;

/// Open the store at the configured data directory.
pub fn open_store() -> JsonStore {
    dotenvy::dotenv().ok();
    let data_dir =
        PathBuf::from(std::env::var("GROVE_DATA_DIR").unwrap_or_else(|_| "./data".to_owned()));
    JsonStore::open(data_dir)
}
