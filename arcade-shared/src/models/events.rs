use serde::{Deserialize, Serialize};

/// Booking lifecycle facts attached to outgoing notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RentalEvent {
    #[serde(rename_all = "camelCase")]
    BookingConfirmed {
        booking_id: String,
        unit_id: String,
        customer_name: String,
    },
    #[serde(rename_all = "camelCase")]
    RentalReminder {
        booking_id: String,
        unit_id: String,
        customer_name: String,
        minutes_remaining: i64,
    },
    #[serde(rename_all = "camelCase")]
    BookingCompleted {
        booking_id: String,
        unit_id: String,
        customer_name: String,
    },
}

impl RentalEvent {
    pub fn booking_id(&self) -> &str {
        match self {
            RentalEvent::BookingConfirmed { booking_id, .. }
            | RentalEvent::RentalReminder { booking_id, .. }
            | RentalEvent::BookingCompleted { booking_id, .. } => booking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = RentalEvent::RentalReminder {
            booking_id: "abc123xyz".to_string(),
            unit_id: "1".to_string(),
            customer_name: "Alice".to_string(),
            minutes_remaining: 10,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "rental_reminder");
        assert_eq!(value["bookingId"], "abc123xyz");
        assert_eq!(value["minutesRemaining"], 10);
        assert_eq!(event.booking_id(), "abc123xyz");
    }
}
