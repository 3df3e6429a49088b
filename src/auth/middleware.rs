use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::models::{AuthenticatedUser, Role};
use crate::auth::token::TokenVerifier;
use crate::error::AppError;

/// Extract the role from token claims.
///
/// The mapping convention is:
/// - Claims containing "manager" → Manager
/// - Anything else → Reader
pub fn map_claims_to_role(roles: &[String]) -> Role {
    // Return the highest role found in the claims
    roles
        .iter()
        .filter_map(|r| Role::from_str_ci(r))
        .max()
        .unwrap_or(Role::Reader)
}

/// Build an `AuthenticatedUser` from token claims.
pub fn build_authenticated_user(user_id: String, roles: &[String]) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        role: map_claims_to_role(roles),
    }
}

/// Read the credential from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Missing bearer token".into()))?
        .to_str()
        .map_err(|_| AppError::Auth("Malformed authorization header".into()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Missing bearer token".into()))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<dyn TokenVerifier>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<dyn TokenVerifier>::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        verifier.verify(token)
    }
}

/// An authenticated caller holding the manager role.
///
/// Handlers that take this extractor never run for anyone else: missing or
/// invalid tokens are rejected with 401, non-managers with 403.
#[derive(Debug, Clone)]
pub struct ManagerUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ManagerUser
where
    S: Send + Sync,
    Arc<dyn TokenVerifier>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_manager() {
            tracing::debug!(user_id = %user.user_id, "Rejected non-manager caller");
            return Err(AppError::Forbidden("Manager role required".into()));
        }
        Ok(ManagerUser(user))
    }
}
