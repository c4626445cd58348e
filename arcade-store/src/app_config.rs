use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub rental: RentalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// Public key the signup and token endpoints expect as bearer.
    pub anon_key: String,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RentalConfig {
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    #[serde(default = "default_reminder_lead")]
    pub reminder_lead_minutes: i64,
    #[serde(default = "default_reminder_window")]
    pub reminder_window_seconds: i64,
    #[serde(default = "default_notification_buffer")]
    pub notification_buffer: usize,
}

fn default_sweep_interval() -> u64 { 30 }
fn default_reminder_lead() -> i64 { 10 }
fn default_reminder_window() -> i64 { 30 }
fn default_notification_buffer() -> usize { 100 }

impl Default for RentalConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
            reminder_lead_minutes: default_reminder_lead(),
            reminder_window_seconds: default_reminder_window(),
            notification_buffer: default_notification_buffer(),
        }
    }
}

impl RentalConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `ARCADE_SERVER__PORT=9000` sets `server.port`
            .add_source(config::Environment::with_prefix("ARCADE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse(
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 3600
            anon_key = "anon"
            "#,
        );

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.rental.sweep_interval(), Duration::from_secs(30));
        assert_eq!(config.rental.reminder_lead_minutes, 10);
        assert_eq!(config.rental.reminder_window_seconds, 30);
    }

    #[test]
    fn test_redis_backend_and_rental_overrides() {
        let config = parse(
            r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "secret"
            jwt_expiration_seconds = 60
            anon_key = "anon"

            [store]
            backend = "redis"
            redis_url = "redis://127.0.0.1:6379"

            [rental]
            sweep_interval_seconds = 5
            "#,
        );

        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(config.rental.sweep_interval(), Duration::from_secs(5));
        assert_eq!(config.rental.notification_buffer, 100);
    }
}
