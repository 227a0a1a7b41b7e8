//! User repository.

use chrono::Utc;
use gadget_grove_core::{NewUser, User, UserId, UserPatch};

use crate::store::{Document, JsonStore};

use super::RepositoryError;

/// Typed access to the users document.
pub struct UserRepository<'a> {
    doc: &'a Document<User>,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore) -> Self {
        Self { doc: store.users() }
    }

    /// All users, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn get_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.doc.read_all().await?)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.doc.read_all().await?;
        Ok(users.into_iter().find(|u| u.id == *id))
    }

    /// Look up a user by exact, case-sensitive email match.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.doc.read_all().await?;
        Ok(users.into_iter().find(|u| u.email.as_str() == email))
    }

    /// Create a user. The email must not already be taken.
    ///
    /// The repository assigns the id and creation timestamp and starts the
    /// user with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if a user with the same email
    /// exists, or [`RepositoryError::Storage`] on a document failure.
    pub async fn create(&self, input: NewUser) -> Result<User, RepositoryError> {
        self.doc
            .mutate(|users| {
                if users.iter().any(|u| u.email == input.email) {
                    return Err(RepositoryError::Conflict(
                        "a user with this email already exists".to_owned(),
                    ));
                }
                let user = User {
                    id: UserId::generate(),
                    name: input.name,
                    email: input.email,
                    password: input.password,
                    role: input.role,
                    created_at: Utc::now(),
                    cart: Vec::new(),
                };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Apply a partial update to a user and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no user has the id, in which
    /// case the document is not rewritten.
    pub async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, RepositoryError> {
        self.doc
            .mutate(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == *id)
                    .ok_or(RepositoryError::NotFound)?;
                user.apply_patch(patch);
                Ok(user.clone())
            })
            .await
    }

    /// Remove a user if present. Deleting an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on a document failure.
    pub async fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        self.doc
            .mutate(|users| {
                users.retain(|u| u.id != *id);
                Ok::<_, RepositoryError>(())
            })
            .await
    }
}
