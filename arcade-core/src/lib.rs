pub mod account;
pub mod identity;
pub mod repository;
pub mod service;

pub use account::{MembershipTier, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings};
pub use identity::{AuthUser, IdentityProvider, NewUser, Session};
pub use repository::AccountRepository;
pub use service::AccountService;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
    #[error("Identity verification failed: {0}")]
    IdentityError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
