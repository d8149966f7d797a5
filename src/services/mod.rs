pub mod auth_service;
pub mod booking_service;
pub mod dashboard_service;
pub mod guest_service;
pub mod room_service;
