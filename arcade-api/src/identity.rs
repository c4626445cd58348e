//! In-process stand-in for the hosted auth service.
//!
//! Users live in memory with argon2id password hashes. Access tokens are
//! HS256 JWTs carrying the same claims the hosted service puts in its
//! tokens, so the rest of the app only ever sees [`IdentityProvider`].

use std::collections::HashMap;

use arcade_core::{AuthUser, CoreError, CoreResult, IdentityProvider, NewUser, Session};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm as Argon2Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

const AUDIENCE: &str = "authenticated";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub aud: String,
    pub role: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub iat: usize,
    pub exp: usize,
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> CoreResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CoreError::InternalError(format!("create argon2 params: {e}")))?;

        Ok(Argon2::new(Argon2Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Clone)]
struct StoredUser {
    user: AuthUser,
    password_hash: String,
}

pub struct LocalIdentityProvider {
    users: RwLock<HashMap<String, StoredUser>>,
    secret: String,
    expiration_seconds: u64,
    hash_params: Argon2Params,
}

impl LocalIdentityProvider {
    pub fn new(secret: impl Into<String>, expiration_seconds: u64) -> Self {
        Self::with_hash_params(secret, expiration_seconds, Argon2Params::default())
    }

    pub fn with_hash_params(secret: impl Into<String>, expiration_seconds: u64, hash_params: Argon2Params) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            secret: secret.into(),
            expiration_seconds,
            hash_params,
        }
    }

    pub fn issue_token(&self, user: &AuthUser) -> CoreResult<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.expose().clone(),
            aud: AUDIENCE.to_string(),
            role: AUDIENCE.to_string(),
            user_metadata: UserMetadata { name: user.name.clone() },
            iat: now,
            exp: now + self.expiration_seconds as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| CoreError::InternalError(format!("Token encoding failed: {}", e)))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        validation
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str, params: Argon2Params) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .to_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::InternalError(format!("hash password: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> CoreResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CoreError::InternalError(format!("parse hash: {e}")))?;
    // Parameters come from the hash itself
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn blocking<T, F>(f: F) -> CoreResult<T>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CoreError::InternalError(format!("password task failed: {e}")))?
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_user(&self, new_user: NewUser) -> CoreResult<AuthUser> {
        let email = normalize_email(&new_user.email);
        if !email.contains('@') {
            return Err(CoreError::ValidationError("Unable to validate email address: invalid format".to_string()));
        }
        if new_user.password.expose().len() < MIN_PASSWORD_LEN {
            return Err(CoreError::ValidationError(format!(
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        if self.users.read().await.contains_key(&email) {
            return Err(duplicate_email());
        }

        let password = new_user.password.into_inner();
        let params = self.hash_params;
        let password_hash = blocking(move || hash_password(&password, params)).await?;

        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.clone().into(),
            name: Some(new_user.name),
        };

        let mut users = self.users.write().await;
        if users.contains_key(&email) {
            return Err(duplicate_email());
        }
        users.insert(email, StoredUser { user: user.clone(), password_hash });

        info!("Created user {}", user.id);
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> CoreResult<Session> {
        let stored = self.users.read().await.get(&normalize_email(email)).cloned();
        let Some(stored) = stored else {
            return Err(invalid_credentials());
        };

        let password = password.to_string();
        let hash = stored.password_hash.clone();
        if !blocking(move || verify_password(&password, &hash)).await? {
            return Err(invalid_credentials());
        }

        Ok(Session {
            access_token: self.issue_token(&stored.user)?,
            token_type: "bearer".to_string(),
            expires_in: self.expiration_seconds,
            user: stored.user,
        })
    }

    async fn verify_token(&self, token: &str) -> CoreResult<AuthUser> {
        let token_data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Self::validation(),
        )
        .map_err(|e| CoreError::IdentityError(e.to_string()))?;

        let claims = token_data.claims;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| CoreError::IdentityError("Malformed subject".to_string()))?;

        Ok(AuthUser {
            id,
            email: claims.email.into(),
            name: claims.user_metadata.name,
        })
    }
}

fn duplicate_email() -> CoreError {
    CoreError::ValidationError("A user with this email address has already been registered".to_string())
}

fn invalid_credentials() -> CoreError {
    CoreError::IdentityError("Invalid login credentials".to_string())
}
