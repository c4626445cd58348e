use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::account::{MembershipTier, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings};
use crate::identity::AuthUser;
use crate::repository::{AccountRepository, RepositoryError};
use crate::{CoreError, CoreResult};

/// Profile, settings and membership operations on top of a key-value repository.
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Write the default profile and settings for a freshly created user.
    pub async fn provision(&self, user: &AuthUser) -> CoreResult<(UserProfile, UserSettings)> {
        let profile = UserProfile::new_default(user, Utc::now());
        let settings = UserSettings::defaults_for(user.id);

        self.repo.save_profile(&profile).await.map_err(internal("save profile"))?;
        self.repo.save_settings(&settings).await.map_err(internal("save settings"))?;

        info!("Provisioned account records for {}", user.id);
        Ok((profile, settings))
    }

    /// Stored profile, creating the default one if it is missing.
    pub async fn profile(&self, user: &AuthUser) -> CoreResult<UserProfile> {
        if let Some(profile) = self.repo.get_profile(user.id).await.map_err(internal("get profile"))? {
            return Ok(profile);
        }

        let profile = UserProfile::new_default(user, Utc::now());
        self.repo.save_profile(&profile).await.map_err(internal("save profile"))?;
        Ok(profile)
    }

    pub async fn update_profile(&self, user: &AuthUser, update: ProfileUpdate) -> CoreResult<UserProfile> {
        let mut profile = self.profile(user).await?;
        profile.apply(update, Utc::now());

        self.repo.save_profile(&profile).await.map_err(internal("update profile"))?;
        Ok(profile)
    }

    /// Stored settings, creating the defaults if they are missing.
    pub async fn settings(&self, user: &AuthUser) -> CoreResult<UserSettings> {
        if let Some(settings) = self.repo.get_settings(user.id).await.map_err(internal("get settings"))? {
            return Ok(settings);
        }

        let settings = UserSettings::defaults_for(user.id);
        self.repo.save_settings(&settings).await.map_err(internal("save settings"))?;
        Ok(settings)
    }

    pub async fn update_settings(&self, user: &AuthUser, update: SettingsUpdate) -> CoreResult<UserSettings> {
        let mut settings = self.settings(user).await?;
        settings.apply(update, Utc::now());

        self.repo.save_settings(&settings).await.map_err(internal("update settings"))?;
        Ok(settings)
    }

    /// Rejects anything but `free`, `premium` and `vip` before touching storage.
    pub async fn upgrade_membership(&self, user: &AuthUser, tier: &str) -> CoreResult<UserProfile> {
        let tier: MembershipTier = tier.parse()?;

        let mut profile = self.profile(user).await?;
        profile.change_membership(tier, Utc::now());

        self.repo.save_profile(&profile).await.map_err(internal("upgrade membership"))?;
        info!("Membership for {} set to {}", user.id, tier);
        Ok(profile)
    }
}

fn internal(operation: &'static str) -> impl Fn(RepositoryError) -> CoreError {
    move |e| {
        error!("Account repository failed to {}: {}", operation, e);
        CoreError::InternalError(format!("Failed to {}", operation))
    }
}
