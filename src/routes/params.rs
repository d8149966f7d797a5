use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{BookingStatus, RoomStatus, RoomType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Query structs keep page/per_page inline: axum's Query goes through
// serde_urlencoded, which cannot drive numeric fields behind #[serde(flatten)].

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoomQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
}

impl RoomQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GuestQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Free-text search over name, email, and phone.
    pub q: Option<String>,
}

impl GuestQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<BookingStatus>,
    pub guest_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    /// Only bookings checking in on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Only bookings checking out on or before this date.
    pub end_date: Option<NaiveDate>,
    pub sort_order: Option<SortOrder>,
}

impl BookingListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}
