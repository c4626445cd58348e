use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Console hardware on offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    #[serde(rename = "PS5")]
    Ps5,
    #[serde(rename = "PS4 Pro")]
    Ps4Pro,
    #[serde(rename = "PS5 Digital")]
    Ps5Digital,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitStatus::Available => "available",
            UnitStatus::Rented => "rented",
            UnitStatus::Maintenance => "maintenance",
        };
        f.write_str(s)
    }
}

/// A rentable console.
///
/// While `status` is `Rented`, `current_booking_id` names the one active
/// booking holding the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub price_per_hour: f64,
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_booking_id: Option<String>,
}

impl Unit {
    pub fn new(id: &str, name: &str, unit_type: UnitType, price_per_hour: f64, status: UnitStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit_type,
            price_per_hour,
            status,
            current_booking_id: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }

    /// Price the reservation form quotes: hourly rate times hours.
    pub fn quote(&self, duration_hours: u32) -> f64 {
        self.price_per_hour * duration_hours as f64
    }
}

/// Booking status in the lifecycle. `Active` only ever moves to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub unit_id: String,
    pub customer_name: String,
    pub start_time: DateTime<Utc>,
    pub duration_hours: u32,
    pub total_cost: f64,
    pub status: BookingStatus,
}

impl Booking {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + Duration::hours(i64::from(self.duration_hours))
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }

    /// Time left until `end_time`; negative once it has passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.end_time() - now
    }
}

/// Everything the caller supplies when reserving a unit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub unit_id: String,
    pub customer_name: String,
    pub duration_hours: u32,
    pub total_cost: f64,
}

/// Admin dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSummary {
    pub total_units: usize,
    pub available_units: usize,
    pub active_rentals: usize,
    pub revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_format() {
        let unit = Unit::new("4", "Console 04", UnitType::Ps4Pro, 8.0, UnitStatus::Available);
        let value = serde_json::to_value(&unit).unwrap();

        assert_eq!(value["type"], "PS4 Pro");
        assert_eq!(value["pricePerHour"], 8.0);
        assert_eq!(value["status"], "available");
        assert!(value.get("currentBookingId").is_none());
    }

    #[test]
    fn test_booking_end_time() {
        let start = Utc::now();
        let booking = Booking {
            id: "k3j9x0a2b".to_string(),
            unit_id: "1".to_string(),
            customer_name: "Alice".to_string(),
            start_time: start,
            duration_hours: 2,
            total_cost: 30.0,
            status: BookingStatus::Active,
        };

        assert_eq!(booking.end_time(), start + Duration::hours(2));
        assert_eq!(booking.remaining(start + Duration::hours(3)), Duration::hours(-1));
    }
}
