use arcade_core::repository::{profile_key, settings_key, RepositoryError};
use arcade_core::{AccountRepository, UserProfile, UserSettings};
use async_trait::async_trait;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::StoreError;

/// Account documents stored as JSON strings in Redis.
#[derive(Clone)]
pub struct RedisAccountRepository {
    client: redis::Client,
}

impl RedisAccountRepository {
    /// Validates the URL only; connections are opened per call.
    pub fn new(connection_string: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw = serde_json::to_string(value)?;
        conn.set::<_, _, ()>(key, raw).await?;
        debug!("Stored {}", key);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for RedisAccountRepository {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.get_json(&profile_key(user_id)).await?)
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        Ok(self.set_json(&profile_key(profile.user_id), profile).await?)
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, RepositoryError> {
        Ok(self.get_json(&settings_key(user_id)).await?)
    }

    async fn save_settings(&self, settings: &UserSettings) -> Result<(), RepositoryError> {
        Ok(self.set_json(&settings_key(settings.user_id), settings).await?)
    }
}
