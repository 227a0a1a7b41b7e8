//! Authentication service.
//!
//! Handles signup, login, and bearer-token issuance. Passwords are hashed
//! with Argon2id; sessions are stateless HS256 JWTs carrying the user id.

mod credential;
mod error;
mod token;

pub use credential::{hash_password, verify_password};
pub use error::AuthError;
pub use token::{Claims, TokenService};

use gadget_grove_core::{Email, NewUser, PublicUser, UserId, UserRole};

use crate::repos::{RepositoryError, UserRepository};
use crate::store::JsonStore;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display-name length after trimming.
const MIN_NAME_LENGTH: usize = 2;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a JsonStore, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(store),
            tokens,
        }
    }

    /// Register a new user and issue their first token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName` if the name is missing or too short.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(PublicUser, String), AuthError> {
        let name = name.trim();
        if name.len() < MIN_NAME_LENGTH {
            return Err(AuthError::InvalidName);
        }

        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                name: name.to_owned(),
                email,
                password: password_hash,
                role: UserRole::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.tokens.issue(&user.id)?;
        Ok((PublicUser::from(user), token))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or
    /// the password does not match. The two cases are indistinguishable.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(PublicUser, String), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password)?;

        let token = self.tokens.issue(&user.id)?;
        Ok((PublicUser::from(user), token))
    }

    /// Resolve the user behind a verified token subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user no longer exists.
    pub async fn current_user(&self, user_id: &UserId) -> Result<PublicUser, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(PublicUser::from(user))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tempfile::TempDir;

    fn token_service() -> TokenService {
        TokenService::new(&SecretString::from(
            "a-test-only-secret-that-is-long-enough".to_owned(),
        ))
    }

    fn store_in(dir: &TempDir) -> JsonStore {
        let store = JsonStore::open(dir.path());
        store.initialize().unwrap();
        store
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tokens = token_service();
        let auth = AuthService::new(&store, &tokens);

        let (user, token) = auth
            .signup("Ada", "ada@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert_eq!(tokens.verify(&token).unwrap(), user.id);

        let (again, _) = auth.login("ada@example.com", "hunter22").await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tokens = token_service();
        let auth = AuthService::new(&store, &tokens);

        let result = auth.signup("Ada", "ada@example.com", "12345").await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tokens = token_service();
        let auth = AuthService::new(&store, &tokens);

        auth.signup("Ada", "ada@example.com", "hunter22")
            .await
            .unwrap();
        let result = auth.signup("Ada Again", "ada@example.com", "hunter22").await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tokens = token_service();
        let auth = AuthService::new(&store, &tokens);

        auth.signup("Ada", "ada@example.com", "hunter22")
            .await
            .unwrap();
        let result = auth.login("ada@example.com", "wrong-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tokens = token_service();
        let auth = AuthService::new(&store, &tokens);

        let result = auth.login("nobody@example.com", "hunter22").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
