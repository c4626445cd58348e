use arcade_rental::{Booking, BookingStatus, NewBooking, Unit, UnitStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    extract::{AppJson, AppQuery},
    state::AppState,
};

/// Longest rental the reservation form offers.
pub const MAX_RENTAL_HOURS: u32 = 12;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub unit_id: String,
    pub customer_name: String,
    pub duration_hours: u32,
    /// Defaults to the unit's hourly rate times the duration.
    pub total_cost: Option<f64>,
}

/// `?status=` values. `past` is every booking that is no longer active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingFilter {
    Active,
    Completed,
    Cancelled,
    Past,
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingFilter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStatusResponse {
    pub unit_id: String,
    pub status: UnitStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/units", get(list_units))
        .route("/units/{id}", get(get_unit))
        .route("/units/{id}/status", get(get_unit_status))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/end", post(end_booking))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /units
async fn list_units(State(state): State<AppState>) -> Json<Vec<Unit>> {
    let store = state.rentals.lock().await;
    Json(store.units().to_vec())
}

/// GET /units/{id}
async fn get_unit(State(state): State<AppState>, Path(unit_id): Path<String>) -> Result<Json<Unit>, AppError> {
    let store = state.rentals.lock().await;
    store
        .unit(&unit_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Unit not found: {}", unit_id)))
}

/// GET /units/{id}/status
/// Unknown units report `available`
async fn get_unit_status(State(state): State<AppState>, Path(unit_id): Path<String>) -> Json<UnitStatusResponse> {
    let status = state.rentals.lock().await.get_unit_status(&unit_id);
    Json(UnitStatusResponse { unit_id, status })
}

/// GET /bookings?status=active|completed|cancelled|past
async fn list_bookings(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListBookingsQuery>,
) -> Json<Vec<Booking>> {
    let store = state.rentals.lock().await;
    let bookings = match query.status {
        None => store.bookings().to_vec(),
        Some(BookingFilter::Past) => store.past_bookings().cloned().collect(),
        Some(BookingFilter::Active) => store.bookings_with_status(BookingStatus::Active).cloned().collect(),
        Some(BookingFilter::Completed) => store.bookings_with_status(BookingStatus::Completed).cloned().collect(),
        Some(BookingFilter::Cancelled) => store.bookings_with_status(BookingStatus::Cancelled).cloned().collect(),
    };
    Json(bookings)
}

/// GET /bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let store = state.rentals.lock().await;
    store
        .booking(&booking_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", booking_id)))
}

/// POST /bookings
/// Reserve an available unit starting now
async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let customer_name = req.customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(AppError::ValidationError("Customer name is required".to_string()));
    }
    if !(1..=MAX_RENTAL_HOURS).contains(&req.duration_hours) {
        return Err(AppError::ValidationError(format!(
            "Duration must be between 1 and {} hours",
            MAX_RENTAL_HOURS
        )));
    }
    if req.total_cost.is_some_and(|cost| !cost.is_finite() || cost < 0.0) {
        return Err(AppError::ValidationError("Total cost must be a non-negative amount".to_string()));
    }

    let mut store = state.rentals.lock().await;

    // The store trusts its caller on availability; this handler is that caller.
    let unit = store
        .unit(&req.unit_id)
        .ok_or_else(|| AppError::NotFoundError(format!("Unit not found: {}", req.unit_id)))?;
    if !unit.is_available() {
        return Err(AppError::ConflictError(format!("{} is {}", unit.name, unit.status)));
    }
    let total_cost = req.total_cost.unwrap_or_else(|| unit.quote(req.duration_hours));

    let booking = store.add_booking(NewBooking {
        unit_id: req.unit_id,
        customer_name,
        duration_hours: req.duration_hours,
        total_cost,
    })?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// POST /bookings/{id}/end
async fn end_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let mut store = state.rentals.lock().await;
    store
        .end_booking(&booking_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", booking_id)))
}
