use std::convert::Infallible;

use arcade_rental::Notifier;
use arcade_shared::{Notification, NotificationLevel, RentalEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Publishes notifications on the broadcast channel behind `/notifications/stream`.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        let booking_id = notification.event.as_ref().map(RentalEvent::booking_id).unwrap_or("-");
        match notification.level {
            NotificationLevel::Warning => warn!(booking_id, "Notification: {}", notification.message),
            NotificationLevel::Error => error!(booking_id, "Notification: {}", notification.message),
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(booking_id, "Notification: {}", notification.message)
            }
        }
        // No subscribers is fine
        let _ = self.tx.send(notification);
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/notifications/stream", get(stream_notifications))
}

/// GET /notifications/stream
/// Server-sent events, one per notification, named by level
async fn stream_notifications(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifications.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(notification) => match Event::default().event(notification.level.as_str()).json_data(&notification) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    error!("Failed to encode notification: {}", e);
                    None
                }
            },
            Err(e) => {
                debug!("Notification stream lagged: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notifier_broadcasts_to_subscribers() {
        let (tx, mut rx) = broadcast::channel(4);
        let notifier = BroadcastNotifier::new(tx);

        notifier.notify(Notification::warning("Rental for Alice ending in 10 minutes!"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.level, NotificationLevel::Warning);
        assert_eq!(received.message, "Rental for Alice ending in 10 minutes!");
    }

    #[tokio::test]
    async fn test_rental_event_travels_with_notification() {
        let (tx, mut rx) = broadcast::channel(4);
        BroadcastNotifier::new(tx).notify(Notification::info("Rental for Bob has completed.").with_event(
            RentalEvent::BookingCompleted {
                booking_id: "abc123xyz".to_string(),
                unit_id: "2".to_string(),
                customer_name: "Bob".to_string(),
            },
        ));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.as_ref().map(RentalEvent::booking_id), Some("abc123xyz"));
    }

    #[test]
    fn test_notify_without_subscribers_does_not_fail() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        BroadcastNotifier::new(tx).notify(Notification::info("nobody listening"));
    }
}
