use arcade_core::{AuthUser, CoreError, NewUser, Session};
use arcade_shared::pii::Masked;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::AppError,
    extract::AppJson,
    middleware::{require_anon_key, BearerHeader},
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct SignupRequest {
    email: Option<String>,
    password: Option<Masked<String>>,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignupResponse {
    user: AuthUser,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    email: String,
    password: Masked<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/token", post(sign_in))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /auth/signup
async fn signup(
    State(state): State<AppState>,
    bearer: BearerHeader,
    payload: Result<AppJson<SignupRequest>, AppError>,
) -> Result<Json<SignupResponse>, AppError> {
    require_anon_key(&state, bearer)?;
    let AppJson(req) = payload?;

    let (Some(email), Some(password), Some(name)) = (
        non_blank(req.email),
        req.password.filter(|p| !p.expose().is_empty()),
        non_blank(req.name),
    ) else {
        return Err(AppError::ValidationError("Email, password, and name are required".to_string()));
    };

    let user = state.identity.create_user(NewUser { email, password, name }).await?;
    state.accounts.provision(&user).await?;

    info!("Signed up user {}", user.id);
    Ok(Json(SignupResponse {
        user,
        message: "User created successfully".to_string(),
    }))
}

/// POST /auth/token
async fn sign_in(
    State(state): State<AppState>,
    bearer: BearerHeader,
    payload: Result<AppJson<TokenRequest>, AppError>,
) -> Result<Json<Session>, AppError> {
    require_anon_key(&state, bearer)?;
    let AppJson(req) = payload?;

    let session = state
        .identity
        .sign_in(&req.email, req.password.expose())
        .await
        .map_err(|e| match e {
            CoreError::IdentityError(msg) => AppError::ValidationError(msg),
            other => other.into(),
        })?;

    Ok(Json(session))
}
