use arcade_rental::RentalSummary;
use axum::{extract::State, routing::get, Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/summary", get(rental_summary))
}

/// GET /admin/summary
/// Unit counts and revenue from completed rentals
async fn rental_summary(State(state): State<AppState>) -> Json<RentalSummary> {
    let store = state.rentals.lock().await;
    Json(store.summary())
}
