pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod guests;
pub mod rooms;
