use arcade_core::repository::{profile_key, settings_key, RepositoryError};
use arcade_core::{AccountRepository, UserProfile, UserSettings};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local key-value store holding JSON documents, keyed like the hosted one.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RepositoryError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: String, value: &T) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(value)?;
        self.entries.write().await.insert(key, raw);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        self.get_json(&profile_key(user_id)).await
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        self.set_json(profile_key(profile.user_id), profile).await
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>, RepositoryError> {
        self.get_json(&settings_key(user_id)).await
    }

    async fn save_settings(&self, settings: &UserSettings) -> Result<(), RepositoryError> {
        self.set_json(settings_key(settings.user_id), settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::{AccountService, AuthUser, CoreError, MembershipTier, ProfileUpdate, SettingsUpdate};
    use std::sync::Arc;

    fn user(name: Option<&str>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "player@example.com".to_string().into(),
            name: name.map(str::to_string),
        }
    }

    fn service() -> (AccountService, Arc<InMemoryAccountRepository>) {
        let repo = Arc::new(InMemoryAccountRepository::new());
        (AccountService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_provision_writes_defaults() {
        let (service, repo) = service();
        let user = user(Some("Alice"));

        service.provision(&user).await.unwrap();

        let profile = repo.get_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.membership_tier, MembershipTier::Free);

        let settings = repo.get_settings(user.id).await.unwrap().unwrap();
        assert_eq!(settings, UserSettings::defaults_for(user.id));
    }

    #[tokio::test]
    async fn test_missing_records_are_created_on_read() {
        let (service, repo) = service();
        let user = user(None);

        assert!(repo.get_profile(user.id).await.unwrap().is_none());
        let profile = service.profile(&user).await.unwrap();
        assert_eq!(profile.name, "User");
        assert_eq!(repo.get_profile(user.id).await.unwrap(), Some(profile));

        let settings = service.settings(&user).await.unwrap();
        assert!(settings.rental_reminders);
        assert!(repo.get_settings(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_updates_are_persisted() {
        let (service, repo) = service();
        let user = user(Some("Alice"));
        service.provision(&user).await.unwrap();

        service
            .update_profile(
                &user,
                ProfileUpdate {
                    name: Some("Alice Liddell".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service
            .update_settings(
                &user,
                SettingsUpdate {
                    push_notifications: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let profile = repo.get_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile.name, "Alice Liddell");
        assert!(profile.updated_at.is_some());

        let settings = repo.get_settings(user.id).await.unwrap().unwrap();
        assert!(settings.push_notifications);
        assert!(settings.email_notifications);
    }

    #[tokio::test]
    async fn test_membership_upgrade() {
        let (service, _) = service();
        let user = user(Some("Alice"));

        let err = service.upgrade_membership(&user, "platinum").await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(msg) if msg == "Invalid membership tier"));

        let profile = service.upgrade_membership(&user, "premium").await.unwrap();
        assert_eq!(profile.membership_tier, MembershipTier::Premium);
        assert_eq!(profile.membership_status, "active");
        assert!(profile.membership_updated_at.is_some());
    }
}
