use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use service_core::error::AppError;
use std::convert::Infallible;

use crate::models::User;
use crate::startup::AppState;

/// Caller identity, or `None` for anonymous callers.
///
/// Never rejects: a missing, malformed or expired token, or a token whose user
/// no longer exists, all resolve to `None`.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<User>);

/// Caller identity for routes that require one. Rejects with 401.
#[derive(Debug, Clone)]
pub struct Identity(pub User);

#[async_trait]
impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state).await {
            Ok(user) => Ok(MaybeIdentity(Some(user))),
            Err(e) => {
                tracing::debug!(reason = %e, "Treating caller as anonymous");
                Ok(MaybeIdentity(None))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_identity(parts, state).await.map(Identity)
    }
}

async fn resolve_identity(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let token = session_token(parts, &state.config.auth.session_cookie)
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing session token")))?;

    let claims = state
        .jwt
        .validate(&token)
        .map_err(|e| AppError::Unauthorized(anyhow::anyhow!("Invalid session token: {}", e)))?;

    let user = state
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Session user no longer exists")))?;

    tracing::Span::current().record("user_id", user.id.as_str());

    Ok(user)
}

/// Bearer header first, then the session cookie.
fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
