use arcade_core::{AuthUser, MembershipTier, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, extract::AppJson, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpgradeMembershipRequest {
    #[serde(default)]
    pub tier: String,
}

#[derive(Debug, Serialize)]
pub struct MembershipBenefitsResponse {
    pub tier: MembershipTier,
    pub benefits: Vec<&'static str>,
}

/// Routes that expect an authenticated [`AuthUser`] in the request extensions.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/membership/upgrade", post(upgrade_membership))
        .route("/membership/benefits", get(membership_benefits))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /profile
async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.accounts.profile(&user).await?))
}

/// PUT /profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.accounts.update_profile(&user, update).await?))
}

/// GET /settings
async fn get_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(state.accounts.settings(&user).await?))
}

/// PUT /settings
async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(update): AppJson<SettingsUpdate>,
) -> Result<Json<UserSettings>, AppError> {
    Ok(Json(state.accounts.update_settings(&user, update).await?))
}

/// POST /membership/upgrade
async fn upgrade_membership(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<UpgradeMembershipRequest>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.accounts.upgrade_membership(&user, &req.tier).await?))
}

/// GET /membership/benefits
async fn membership_benefits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MembershipBenefitsResponse>, AppError> {
    let profile = state.accounts.profile(&user).await?;
    let tier = profile.membership_tier;

    Ok(Json(MembershipBenefitsResponse {
        tier,
        benefits: tier.benefits().to_vec(),
    }))
}
