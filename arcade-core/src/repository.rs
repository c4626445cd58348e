use async_trait::async_trait;
use uuid::Uuid;

use crate::account::{UserProfile, UserSettings};

pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

pub fn profile_key(user_id: Uuid) -> String {
    format!("user_profile:{}", user_id)
}

pub fn settings_key(user_id: Uuid) -> String {
    format!("user_settings:{}", user_id)
}

/// Repository trait for per-user profile and settings documents
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepositoryError>;

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError>;

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, RepositoryError>;

    async fn save_settings(&self, settings: &UserSettings) -> Result<(), RepositoryError>;
}
