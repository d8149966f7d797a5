use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, Guest, PaymentStatus, Room};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub guest_id: Uuid,
    pub room_id: Uuid,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_amount: i64,
    /// Defaults to PENDING when omitted.
    pub status: Option<BookingStatus>,
    /// Defaults to UNPAID when omitted.
    pub payment_status: Option<PaymentStatus>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub room_id: Option<Uuid>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub total_amount: Option<i64>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<Booking>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDetail {
    pub booking: Booking,
    pub guest: Guest,
    pub room: Room,
}
