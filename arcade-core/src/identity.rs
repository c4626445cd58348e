use arcade_shared::pii::Masked;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreResult;

/// The caller as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Masked<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: Masked<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

/// Seam to the auth/session service. Tokens are opaque to everything else.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a user with a confirmed email.
    async fn create_user(&self, new_user: NewUser) -> CoreResult<AuthUser>;

    /// Exchange email + password for an access token.
    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<Session>;

    /// Resolve a bearer token to a user. Fails with `IdentityError`.
    async fn verify_token(&self, token: &str) -> CoreResult<AuthUser>;
}
