pub mod auth;

pub use auth::{require_anon_key, user_auth_middleware, BearerHeader};
