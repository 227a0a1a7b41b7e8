//! Flat-file JSON store.
//!
//! All persisted state lives as JSON array documents in a single data
//! directory: `users.json`, `products.json`, and `orders.json`. Every write
//! rewrites the whole collection; no record is ever partially updated on
//! disk. Each document carries its own async mutex, so a read-modify-write
//! cycle is atomic per document within this process. Nothing guards against
//! a second process writing the same files.
//!
//! I/O and parse failures are propagated as [`StoreError`] rather than
//! masked as an empty collection, so callers can distinguish "no records"
//! from "storage unreadable".

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use gadget_grove_core::{Order, Product, User};

/// Errors from the flat-file store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a document file failed.
    #[error("i/o error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A document file exists but does not parse as the expected JSON array.
    #[error("corrupt document {name}: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(name: &str, source: std::io::Error) -> Self {
        Self::Io {
            name: name.to_owned(),
            source,
        }
    }

    fn corrupt(name: &str, source: serde_json::Error) -> Self {
        Self::Corrupt {
            name: name.to_owned(),
            source,
        }
    }
}

/// One JSON array document holding an entire entity collection.
pub struct Document<T> {
    name: &'static str,
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(data_dir: &Path, name: &'static str) -> Self {
        Self {
            name,
            path: data_dir.join(name),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Document file name (e.g. `users.json`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Full path of the document file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. An absent file is an empty collection, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Corrupt`] if it does not parse as a JSON array of
    /// records.
    pub async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    /// Run a read-modify-write cycle under the document lock.
    ///
    /// The closure receives the full collection and may mutate it freely.
    /// The collection is rewritten only when the closure returns `Ok`; on
    /// `Err` the file is left untouched, byte for byte.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a [`StoreError`] (converted via
    /// `From`) if loading or persisting fails.
    pub async fn mutate<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load()?;
        let out = f(&mut records)?;
        self.persist(&records)?;
        Ok(out)
    }

    fn load(&self) -> Result<Vec<T>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|e| StoreError::io(self.name, e))?;
        serde_json::from_str(&contents).map_err(|e| StoreError::corrupt(self.name, e))
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::corrupt(self.name, e))?;
        self.write_atomic(&contents)
    }

    /// Write via a temp file plus rename, so readers never observe a
    /// half-written document.
    fn write_atomic(&self, contents: &str) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| StoreError::io(self.name, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(self.name, e))
    }

    /// Create an empty document if absent; back up and reset a file that is
    /// not a JSON array.
    fn ensure_initialized(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return self.write_atomic("[]");
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| StoreError::io(self.name, e))?;
        let is_array = serde_json::from_str::<serde_json::Value>(&contents)
            .map(|v| v.is_array())
            .unwrap_or(false);
        if is_array {
            return Ok(());
        }

        let backup = self
            .path
            .with_file_name(format!("{}.backup.{}", self.name, Utc::now().timestamp_millis()));
        tracing::warn!(
            document = self.name,
            backup = %backup.display(),
            "document is not a JSON array, backing up and resetting"
        );
        fs::copy(&self.path, &backup).map_err(|e| StoreError::io(self.name, e))?;
        self.write_atomic("[]")
    }
}

/// The data directory and its three entity documents.
pub struct JsonStore {
    data_dir: PathBuf,
    users: Document<User>,
    products: Document<Product>,
    orders: Document<Order>,
}

impl JsonStore {
    /// File name of the users document.
    pub const USERS_FILE: &'static str = "users.json";
    /// File name of the products document.
    pub const PRODUCTS_FILE: &'static str = "products.json";
    /// File name of the orders document.
    pub const ORDERS_FILE: &'static str = "orders.json";

    /// Open a store rooted at the given data directory. No I/O happens
    /// until a document is read or [`initialize`](Self::initialize) runs.
    #[must_use]
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            users: Document::new(&data_dir, Self::USERS_FILE),
            products: Document::new(&data_dir, Self::PRODUCTS_FILE),
            orders: Document::new(&data_dir, Self::ORDERS_FILE),
            data_dir,
        }
    }

    /// Ensure the data directory exists and every document is a readable
    /// JSON array.
    ///
    /// Absent documents are created empty. A document that exists but is
    /// not a JSON array is copied aside to `<name>.backup.<millis>` and
    /// reset to `[]`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or a file cannot be
    /// created, read, or backed up.
    pub fn initialize(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::io("data directory", e))?;
        self.users.ensure_initialized()?;
        self.products.ensure_initialized()?;
        self.orders.ensure_initialized()?;
        tracing::info!(data_dir = %self.data_dir.display(), "store initialized");
        Ok(())
    }

    /// Path of the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The users document.
    #[must_use]
    pub const fn users(&self) -> &Document<User> {
        &self.users
    }

    /// The products document.
    #[must_use]
    pub const fn products(&self) -> &Document<Product> {
        &self.products
    }

    /// The orders document.
    #[must_use]
    pub const fn orders(&self) -> &Document<Order> {
        &self.orders
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Rec {
        id: String,
        n: u32,
    }

    fn doc_in(dir: &TempDir) -> Document<Rec> {
        Document::new(dir.path(), "recs.json")
    }

    #[tokio::test]
    async fn test_absent_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let doc = doc_in(&dir);
        assert_eq!(doc.read_all().await.unwrap(), Vec::<Rec>::new());
    }

    #[tokio::test]
    async fn test_round_trip_is_deep_equal() {
        let dir = TempDir::new().unwrap();
        let doc = doc_in(&dir);
        let records = vec![
            Rec {
                id: "a".into(),
                n: 1,
            },
            Rec {
                id: "b".into(),
                n: 2,
            },
        ];
        let written = records.clone();
        doc.mutate(|all| {
            *all = records;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

        assert_eq!(doc.read_all().await.unwrap(), written);
    }

    #[tokio::test]
    async fn test_mutate_err_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let doc = doc_in(&dir);
        doc.mutate(|all| {
            all.push(Rec {
                id: "a".into(),
                n: 1,
            });
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();
        let before = fs::read(doc.path()).unwrap();

        #[derive(Debug, Error)]
        enum TestError {
            #[error("nope")]
            Nope,
            #[error(transparent)]
            Store(#[from] StoreError),
        }

        let result: Result<(), TestError> = doc
            .mutate(|all| {
                all.clear();
                Err(TestError::Nope)
            })
            .await;
        assert!(matches!(result, Err(TestError::Nope)));

        let after = fs::read(doc.path()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_invalid_json_is_corrupt_not_empty() {
        let dir = TempDir::new().unwrap();
        let doc = doc_in(&dir);
        fs::write(doc.path(), "{ not json").unwrap();
        assert!(matches!(
            doc.read_all().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_array_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let doc = doc_in(&dir);
        fs::write(doc.path(), "{\"id\": \"a\"}").unwrap();
        assert!(matches!(
            doc.read_all().await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_initialize_creates_empty_documents() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("data"));
        store.initialize().unwrap();

        for name in [
            JsonStore::USERS_FILE,
            JsonStore::PRODUCTS_FILE,
            JsonStore::ORDERS_FILE,
        ] {
            let contents = fs::read_to_string(dir.path().join("data").join(name)).unwrap();
            assert_eq!(contents, "[]");
        }
    }

    #[test]
    fn test_initialize_backs_up_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path());
        fs::write(dir.path().join(JsonStore::USERS_FILE), "{\"oops\": true}").unwrap();

        store.initialize().unwrap();

        let contents = fs::read_to_string(dir.path().join(JsonStore::USERS_FILE)).unwrap();
        assert_eq!(contents, "[]");

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("users.json.backup.")
            })
            .collect();
        assert_eq!(backups.len(), 1);
        let backed_up = fs::read_to_string(backups[0].path()).unwrap();
        assert_eq!(backed_up, "{\"oops\": true}");
    }

    #[test]
    fn test_initialize_preserves_existing_data() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path());
        fs::write(dir.path().join(JsonStore::USERS_FILE), "[{\"id\": 1}]").unwrap();

        store.initialize().unwrap();

        let contents = fs::read_to_string(dir.path().join(JsonStore::USERS_FILE)).unwrap();
        assert_eq!(contents, "[{\"id\": 1}]");
    }
}
