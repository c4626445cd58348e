use arcade_shared::pii::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::identity::AuthUser;
use crate::CoreError;

/// Membership level shown on the dashboard banner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Free,
    Premium,
    Vip,
}

impl MembershipTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Free => "free",
            MembershipTier::Premium => "premium",
            MembershipTier::Vip => "vip",
        }
    }

    pub fn benefits(&self) -> &'static [&'static str] {
        match self {
            MembershipTier::Vip => &["Unlimited Reservations", "20% Discount", "VIP Support"],
            MembershipTier::Premium => &["5 Reservations/Day", "10% Discount", "Priority Booking"],
            MembershipTier::Free => &["2 Reservations/Day", "Standard Rates"],
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(MembershipTier::Free),
            "premium" => Ok(MembershipTier::Premium),
            "vip" => Ok(MembershipTier::Vip),
            _ => Err(CoreError::ValidationError("Invalid membership tier".to_string())),
        }
    }
}

pub const DEFAULT_MEMBERSHIP_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    pub avatar: Option<String>,
    pub membership_tier: MembershipTier,
    pub membership_status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Profile written at signup, or lazily on first read.
    pub fn new_default(user: &AuthUser, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone().unwrap_or_else(|| "User".to_string()),
            email: user.email.clone(),
            avatar: None,
            membership_tier: MembershipTier::Free,
            membership_status: DEFAULT_MEMBERSHIP_STATUS.to_string(),
            created_at: now,
            updated_at: None,
            membership_updated_at: None,
        }
    }

    /// Merge a partial update. `user_id` is never touched.
    pub fn apply(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        self.updated_at = Some(now);
    }

    pub fn change_membership(&mut self, tier: MembershipTier, now: DateTime<Utc>) {
        self.membership_tier = tier;
        self.membership_status = DEFAULT_MEMBERSHIP_STATUS.to_string();
        self.membership_updated_at = Some(now);
    }
}

/// Body of `PUT /profile`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Masked<String>>,
    /// `Some(None)` clears the avatar; absent leaves it alone.
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_id: Uuid,
    pub dark_mode: bool,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub rental_reminders: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSettings {
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            dark_mode: false,
            notifications_enabled: true,
            email_notifications: true,
            push_notifications: false,
            rental_reminders: true,
            updated_at: None,
        }
    }

    pub fn apply(&mut self, update: SettingsUpdate, now: DateTime<Utc>) {
        if let Some(v) = update.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = update.notifications_enabled {
            self.notifications_enabled = v;
        }
        if let Some(v) = update.email_notifications {
            self.email_notifications = v;
        }
        if let Some(v) = update.push_notifications {
            self.push_notifications = v;
        }
        if let Some(v) = update.rental_reminders {
            self.rental_reminders = v;
        }
        self.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub dark_mode: Option<bool>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub rental_reminders: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Masked("alice@example.com".to_string()),
            name: None,
        }
    }

    #[test]
    fn test_default_profile_falls_back_to_generic_name() {
        let profile = UserProfile::new_default(&user(), Utc::now());
        assert_eq!(profile.name, "User");
        assert_eq!(profile.membership_tier, MembershipTier::Free);
        assert_eq!(profile.membership_status, "active");
        assert!(profile.avatar.is_none());
    }

    #[test]
    fn test_profile_update_merges_only_present_fields() {
        let mut profile = UserProfile::new_default(&user(), Utc::now());
        profile.avatar = Some("https://cdn.example.com/a.png".to_string());
        let user_id = profile.user_id;

        let update: ProfileUpdate =
            serde_json::from_str(r#"{"name":"Alice","userId":"00000000-0000-0000-0000-000000000000"}"#).unwrap();
        profile.apply(update, Utc::now());

        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.avatar.as_deref(), Some("https://cdn.example.com/a.png"));
        assert!(profile.updated_at.is_some());

        let clear: ProfileUpdate = serde_json::from_str(r#"{"avatar":null}"#).unwrap();
        profile.apply(clear, Utc::now());
        assert!(profile.avatar.is_none());
    }

    #[test]
    fn test_membership_tier_parsing() {
        assert_eq!("vip".parse::<MembershipTier>().unwrap(), MembershipTier::Vip);
        assert!(matches!(
            "gold".parse::<MembershipTier>(),
            Err(CoreError::ValidationError(_))
        ));
        assert_eq!(MembershipTier::Premium.benefits().len(), 3);
    }

    #[test]
    fn test_settings_update_keeps_untouched_flags() {
        let mut settings = UserSettings::defaults_for(Uuid::new_v4());
        let update: SettingsUpdate = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        settings.apply(update, Utc::now());

        assert!(settings.dark_mode);
        assert!(settings.notifications_enabled);
        assert!(settings.rental_reminders);
        assert!(!settings.push_notifications);
    }
}
