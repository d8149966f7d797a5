use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_rooms: i64,
    pub available_rooms: i64,
    pub occupied_rooms: i64,
    /// Occupied share of all rooms, in percent.
    pub occupancy_rate: f64,
    pub today_check_ins: i64,
    pub today_check_outs: i64,
    pub total_guests: i64,
    pub total_bookings: i64,
    pub revenue_this_month: i64,
}
