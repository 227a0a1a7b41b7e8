//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! grove-cli admin create -e admin@example.com -n "Admin Name" -p "password"
//! ```

use thiserror::Error;

use gadget_grove_core::{Email, NewUser, UserRole};
use gadget_grove_server::repos::{RepositoryError, UserRepository};
use gadget_grove_server::services::auth::hash_password;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] gadget_grove_core::EmailError),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// A user with this email already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Repository(RepositoryError),
}

/// Create a new admin user in the configured store.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let password_hash = hash_password(password).map_err(|_| AdminError::PasswordHash)?;

    let store = super::open_store();
    store
        .initialize()
        .map_err(|e| AdminError::Repository(RepositoryError::Storage(e)))?;

    tracing::info!("Creating admin user: {}", email);

    let users = UserRepository::new(&store);
    let user = users
        .create(NewUser {
            name: name.to_owned(),
            email: email.clone(),
            password: password_hash,
            role: UserRole::Admin,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(user_id = %user.id, "Admin user created");
    Ok(())
}
