use arcade_shared::{Notification, RentalEvent};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{Booking, BookingStatus, NewBooking, RentalSummary, Unit, UnitStatus};
use crate::notifier::Notifier;
use crate::registry::UnitRegistry;

const BOOKING_ID_LEN: usize = 9;
const BOOKING_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unit registry plus the booking ledger, owned as one unit.
///
/// Nothing here is persisted. One instance is created at startup and
/// shared between the HTTP handlers and the lifecycle worker.
pub struct RentalStore {
    registry: UnitRegistry,
    bookings: Vec<Booking>,
    notifier: Arc<dyn Notifier>,
}

impl RentalStore {
    pub fn new(registry: UnitRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            registry,
            bookings: Vec::new(),
            notifier,
        }
    }

    pub fn units(&self) -> &[Unit] {
        self.registry.units()
    }

    pub fn unit(&self, unit_id: &str) -> Option<&Unit> {
        self.registry.get(unit_id)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn booking(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    pub fn active_bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(|b| b.is_active())
    }

    /// Everything that is no longer active, whatever way it ended.
    pub fn past_bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(|b| !b.is_active())
    }

    pub fn bookings_with_status(&self, status: BookingStatus) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.status == status)
    }

    /// Record a booking starting now and mark its unit rented.
    pub fn add_booking(&mut self, new_booking: NewBooking) -> Result<Booking, RentalError> {
        self.add_booking_at(new_booking, Utc::now())
    }

    /// Same as [`add_booking`](Self::add_booking) with an explicit start time.
    ///
    /// The unit must exist. Whether it is currently available is the
    /// caller's business.
    pub fn add_booking_at(&mut self, new_booking: NewBooking, now: DateTime<Utc>) -> Result<Booking, RentalError> {
        if self.registry.get(&new_booking.unit_id).is_none() {
            return Err(RentalError::UnitNotFound(new_booking.unit_id));
        }
        if new_booking.duration_hours == 0 {
            return Err(RentalError::InvalidDuration(new_booking.duration_hours));
        }

        let booking = Booking {
            id: self.fresh_booking_id(),
            unit_id: new_booking.unit_id,
            customer_name: new_booking.customer_name,
            start_time: now,
            duration_hours: new_booking.duration_hours,
            total_cost: new_booking.total_cost,
            status: BookingStatus::Active,
        };

        self.registry.mark_rented(&booking.unit_id, &booking.id);
        self.bookings.push(booking.clone());

        info!(
            "Booking {} confirmed: unit {} for {} ({}h)",
            booking.id, booking.unit_id, booking.customer_name, booking.duration_hours
        );
        self.notify(
            Notification::success("Reservation confirmed!").with_event(RentalEvent::BookingConfirmed {
                booking_id: booking.id.clone(),
                unit_id: booking.unit_id.clone(),
                customer_name: booking.customer_name.clone(),
            }),
        );

        Ok(booking)
    }

    /// Complete a booking and give its unit back.
    ///
    /// Unknown ids are a no-op and return `None`. The unit is only released
    /// while it is still held by this booking.
    pub fn end_booking(&mut self, booking_id: &str) -> Option<Booking> {
        let booking = self.bookings.iter_mut().find(|b| b.id == booking_id)?;
        booking.status = BookingStatus::Completed;
        let booking = booking.clone();

        if self.registry.release(&booking.unit_id, &booking.id) {
            info!("Booking {} completed, unit {} available", booking.id, booking.unit_id);
        } else {
            debug!("Booking {} completed, unit {} not held by it", booking.id, booking.unit_id);
        }

        Some(booking)
    }

    /// Status of a unit, `Available` when the id is unknown.
    pub fn get_unit_status(&self, unit_id: &str) -> UnitStatus {
        self.registry.status_of(unit_id)
    }

    pub fn summary(&self) -> RentalSummary {
        RentalSummary {
            total_units: self.registry.units().len(),
            available_units: self.registry.count_with_status(UnitStatus::Available),
            active_rentals: self.registry.count_with_status(UnitStatus::Rented),
            revenue: self
                .bookings_with_status(BookingStatus::Completed)
                .map(|b| b.total_cost)
                .sum(),
        }
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    fn fresh_booking_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..BOOKING_ID_LEN)
                .map(|_| BOOKING_ID_ALPHABET[rng.gen_range(0..BOOKING_ID_ALPHABET.len())] as char)
                .collect();
            if self.booking(&id).is_none() {
                return id;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    #[error("Invalid rental duration: {0} hours")]
    InvalidDuration(u32),
}
