use std::sync::Arc;
use arcade_core::{AccountService, IdentityProvider};
use arcade_rental::RentalStore;
use arcade_shared::Notification;
use tokio::sync::{broadcast, Mutex};

#[derive(Clone)]
pub struct AuthConfig {
    pub anon_key: String,
}

#[derive(Clone)]
pub struct AppState {
    pub rentals: Arc<Mutex<RentalStore>>,
    pub accounts: AccountService,
    pub identity: Arc<dyn IdentityProvider>,
    pub notifications: broadcast::Sender<Notification>,
    pub auth: AuthConfig,
}
