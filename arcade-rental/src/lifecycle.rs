use arcade_shared::{Notification, RentalEvent};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::ledger::RentalStore;

/// When the periodic sweep reminds and when it completes.
///
/// A reminder fires on any sweep where the time left is inside
/// `(reminder_lead - reminder_window, reminder_lead]`. There is no
/// "already reminded" flag: every sweep landing in the window fires again.
#[derive(Debug, Clone)]
pub struct LifecyclePolicy {
    pub reminder_lead: Duration,
    pub reminder_window: Duration,
}

impl LifecyclePolicy {
    pub fn new(reminder_lead: Duration, reminder_window: Duration) -> Self {
        Self {
            reminder_lead,
            reminder_window,
        }
    }

    pub fn in_reminder_window(&self, remaining: Duration) -> bool {
        remaining > Duration::zero()
            && remaining <= self.reminder_lead
            && remaining > self.reminder_lead - self.reminder_window
    }

    /// One pass over every active booking: remind the ones about to end,
    /// complete the ones whose end time has been reached.
    pub fn sweep(&self, store: &mut RentalStore, now: DateTime<Utc>) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();

        let active: Vec<_> = store
            .active_bookings()
            .map(|b| (b.id.clone(), b.unit_id.clone(), b.customer_name.clone(), b.remaining(now)))
            .collect();

        for (booking_id, unit_id, customer_name, remaining) in active {
            if self.in_reminder_window(remaining) {
                store.notify(
                    Notification::warning(format!(
                        "Rental for {} ending in {} minutes!",
                        customer_name,
                        self.reminder_lead.num_minutes()
                    ))
                    .with_event(RentalEvent::RentalReminder {
                        booking_id: booking_id.clone(),
                        unit_id: unit_id.clone(),
                        customer_name: customer_name.clone(),
                        minutes_remaining: minutes_rounded_up(remaining),
                    }),
                );
                outcome.reminded.push(booking_id.clone());
            }

            if remaining <= Duration::zero() {
                store.end_booking(&booking_id);
                store.notify(
                    Notification::info(format!("Rental for {} has completed.", customer_name)).with_event(
                        RentalEvent::BookingCompleted {
                            booking_id: booking_id.clone(),
                            unit_id,
                            customer_name,
                        },
                    ),
                );
                outcome.completed.push(booking_id);
            }
        }

        if !outcome.is_empty() {
            debug!(
                "Lifecycle sweep: {} reminded, {} completed",
                outcome.reminded.len(),
                outcome.completed.len()
            );
        }
        outcome
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self::new(Duration::minutes(10), Duration::seconds(30))
    }
}

fn minutes_rounded_up(d: Duration) -> i64 {
    (d.num_seconds() + 59) / 60
}

/// Booking ids touched by one sweep
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepOutcome {
    pub reminded: Vec<String>,
    pub completed: Vec<String>,
}

impl SweepOutcome {
    pub fn is_empty(&self) -> bool {
        self.reminded.is_empty() && self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, NewBooking, UnitStatus};
    use crate::notifier::RecordingNotifier;
    use crate::registry::UnitRegistry;
    use arcade_shared::NotificationLevel;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap()
    }

    fn one_hour_booking() -> (RentalStore, Arc<RecordingNotifier>, String) {
        let notifier = Arc::new(RecordingNotifier::new());
        let mut store = RentalStore::new(UnitRegistry::seeded(), notifier.clone());
        let booking = store
            .add_booking_at(
                NewBooking {
                    unit_id: "1".to_string(),
                    customer_name: "Alice".to_string(),
                    duration_hours: 1,
                    total_cost: 15.0,
                },
                start(),
            )
            .unwrap();
        notifier.take();
        (store, notifier, booking.id)
    }

    #[test]
    fn test_booking_is_not_completed_early() {
        let (mut store, notifier, id) = one_hour_booking();
        let policy = LifecyclePolicy::default();

        for offset in [Duration::minutes(1), Duration::minutes(45), Duration::seconds(3599)] {
            let outcome = policy.sweep(&mut store, start() + offset);
            assert!(outcome.completed.is_empty());
        }
        assert_eq!(store.booking(&id).unwrap().status, BookingStatus::Active);
        assert_eq!(store.get_unit_status("1"), UnitStatus::Rented);
        assert!(notifier.take().iter().all(|n| n.level != NotificationLevel::Info));
    }

    #[test]
    fn test_booking_completes_at_end_time() {
        let (mut store, notifier, id) = one_hour_booking();
        let policy = LifecyclePolicy::default();

        let outcome = policy.sweep(&mut store, start() + Duration::hours(1));
        assert_eq!(outcome.completed, vec![id.clone()]);
        assert_eq!(store.booking(&id).unwrap().status, BookingStatus::Completed);
        assert_eq!(store.get_unit_status("1"), UnitStatus::Available);

        let sent = notifier.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].level, NotificationLevel::Info);
        assert_eq!(sent[0].message, "Rental for Alice has completed.");

        // Completed bookings drop out of later sweeps.
        let outcome = policy.sweep(&mut store, start() + Duration::hours(2));
        assert!(outcome.is_empty());
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_late_sweep_still_completes() {
        let (mut store, _, id) = one_hour_booking();
        let outcome = LifecyclePolicy::default().sweep(&mut store, start() + Duration::hours(5));
        assert_eq!(outcome.completed, vec![id]);
    }

    #[test]
    fn test_reminder_window_bounds() {
        let policy = LifecyclePolicy::default();

        assert!(policy.in_reminder_window(Duration::minutes(10)));
        assert!(policy.in_reminder_window(Duration::seconds(9 * 60 + 45)));
        assert!(!policy.in_reminder_window(Duration::seconds(9 * 60 + 30)));
        assert!(!policy.in_reminder_window(Duration::minutes(9)));
        assert!(!policy.in_reminder_window(Duration::minutes(11)));
        assert!(!policy.in_reminder_window(Duration::zero()));
    }

    #[test]
    fn test_reminder_refires_inside_window() {
        let (mut store, notifier, id) = one_hour_booking();
        let policy = LifecyclePolicy::default();

        let first = policy.sweep(&mut store, start() + Duration::seconds(50 * 60 + 5));
        let second = policy.sweep(&mut store, start() + Duration::seconds(50 * 60 + 20));
        assert_eq!(first.reminded, vec![id.clone()]);
        assert_eq!(second.reminded, vec![id]);

        let sent = notifier.take();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|n| n.level == NotificationLevel::Warning));
        assert_eq!(sent[0].message, "Rental for Alice ending in 10 minutes!");
        match &sent[0].event {
            Some(RentalEvent::RentalReminder { minutes_remaining, .. }) => assert_eq!(*minutes_remaining, 10),
            other => panic!("unexpected event: {:?}", other),
        }

        let outside = policy.sweep(&mut store, start() + Duration::minutes(51));
        assert!(outside.reminded.is_empty());
    }
}
