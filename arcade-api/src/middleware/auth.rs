use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// `Authorization: Bearer …`, with a missing or malformed header kept as an error value.
pub type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

// ============================================================================
// User Authentication Middleware
// ============================================================================

/// Resolves the bearer token to an [`arcade_core::AuthUser`] and stores it
/// in the request extensions.
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    bearer: BearerHeader,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::unauthorized())?;

    let user = state.identity.verify_token(bearer.token()).await.map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AppError::unauthorized()
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

// ============================================================================
// Public (anon) key check
// ============================================================================

/// Signup and sign-in are called with the public anon key instead of a user token.
pub fn require_anon_key(state: &AppState, bearer: BearerHeader) -> Result<(), AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::unauthorized())?;

    if bearer.token() != state.auth.anon_key {
        return Err(AppError::unauthorized());
    }
    Ok(())
}
