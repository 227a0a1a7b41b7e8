//! Authentication extractors.
//!
//! Provides extractors for requiring a valid bearer token (and optionally
//! the admin role) in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use gadget_grove_core::PublicUser;

use crate::error::AppError;
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Verifies the `Authorization: Bearer <token>` header and loads the user
/// it was issued for.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct CurrentUser(pub PublicUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("No token provided, authorization denied".to_string())
        })?;

        let user_id = state
            .tokens()
            .verify(token)
            .map_err(|_| AppError::Unauthorized("Token is not valid".to_string()))?;

        let auth = AuthService::new(state.store(), state.tokens());
        let user = auth
            .current_user(&user_id)
            .await
            .map_err(|_| AppError::Unauthorized("User not found".to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a valid bearer token belonging to an admin.
pub struct RequireAdmin(pub PublicUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "Access denied. Admin privileges required.".to_string(),
            ));
        }
        Ok(Self(user))
    }
}

/// Pull the bearer token out of the `Authorization` header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
