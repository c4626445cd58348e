use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use arcade_api::{
    app,
    identity::LocalIdentityProvider,
    notifications::BroadcastNotifier,
    state::{AppState, AuthConfig},
    worker::start_lifecycle_worker,
};
use arcade_core::AccountService;
use arcade_rental::{LifecyclePolicy, RentalStore, UnitRegistry};
use tokio::sync::{broadcast, watch, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcade_api=debug,arcade_rental=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = arcade_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Arcade API on port {}", config.server.port);

    // Profiles and settings
    let repository = arcade_store::build_account_repository(&config.store).context("Failed to set up account store")?;
    let identity = Arc::new(LocalIdentityProvider::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_seconds,
    ));

    // SSE Broadcast Channel
    let (notifications, _) = broadcast::channel(config.rental.notification_buffer.max(1));
    let notifier = Arc::new(BroadcastNotifier::new(notifications.clone()));
    let rentals = Arc::new(Mutex::new(RentalStore::new(UnitRegistry::seeded(), notifier)));

    // Reminder and auto-completion sweep
    let policy = LifecyclePolicy::new(
        chrono::Duration::minutes(config.rental.reminder_lead_minutes),
        chrono::Duration::seconds(config.rental.reminder_window_seconds),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = tokio::spawn(start_lifecycle_worker(
        rentals.clone(),
        policy,
        config.rental.sweep_interval(),
        shutdown_rx,
    ));

    let app_state = AppState {
        rentals,
        accounts: AccountService::new(repository),
        identity,
        notifications,
        auth: AuthConfig {
            anon_key: config.auth.anon_key.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let _ = shutdown_tx.send(true);
    worker.await.context("Lifecycle worker panicked")?;
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
