pub mod app_config;
pub mod memory_repo;
pub mod redis_repo;

use std::sync::Arc;

use arcade_core::AccountRepository;
use tracing::info;

pub use memory_repo::InMemoryAccountRepository;
pub use redis_repo::RedisAccountRepository;

use app_config::{StoreBackend, StoreConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store.redis_url must be set when store.backend = \"redis\"")]
    MissingRedisUrl,
}

/// Pick the account repository named by the `[store]` config section.
pub fn build_account_repository(config: &StoreConfig) -> Result<Arc<dyn AccountRepository>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory account store");
            Ok(Arc::new(InMemoryAccountRepository::new()))
        }
        StoreBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or(StoreError::MissingRedisUrl)?;
            info!("Using Redis account store");
            Ok(Arc::new(RedisAccountRepository::new(url)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_backend_requires_url() {
        let config = StoreConfig {
            backend: StoreBackend::Redis,
            redis_url: None,
        };
        assert!(matches!(build_account_repository(&config), Err(StoreError::MissingRedisUrl)));
    }
}
