use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod doc;
pub mod guests;
pub mod health;
pub mod params;
pub mod rooms;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/rooms", rooms::router())
        .nest("/guests", guests::router())
        .nest("/bookings", bookings::router())
        .nest("/dashboard", dashboard::router())
}
