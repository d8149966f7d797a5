use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::bookings::{Column as BookingCol, Entity as Bookings, Model as BookingModel},
    error::AppResult,
    models::{Booking, BookingStatus},
};

/// Booking statuses that hold a room. PENDING reservations have not been
/// confirmed yet and CANCELLED/CHECKED_OUT ones have released the room, so
/// none of them block new bookings.
pub const BLOCKING_STATUSES: [BookingStatus; 2] =
    [BookingStatus::Confirmed, BookingStatus::CheckedIn];

#[derive(Debug, Serialize, ToSchema)]
pub struct Availability {
    pub available: bool,
    pub conflicting_bookings: Vec<Booking>,
}

/// Half-open interval intersection: `[check_in, check_out)` against
/// `[start, end)`. Touching intervals (one stay's check-out on another's
/// check-in day) do not overlap.
pub fn overlaps(check_in: NaiveDate, check_out: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    check_in < end && check_out > start
}

fn blocks(booking: &BookingModel, start: NaiveDate, end: NaiveDate) -> bool {
    BLOCKING_STATUSES.contains(&booking.status)
        && overlaps(booking.check_in_date, booking.check_out_date, start, end)
}

/// Filter a room's bookings down to the ones that make `[start, end)` unavailable.
pub fn find_conflicts(
    bookings: &[BookingModel],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<BookingModel> {
    bookings
        .iter()
        .filter(|b| blocks(b, start, end))
        .cloned()
        .collect()
}

/// Check whether a room is free for `[check_in, check_out)`.
///
/// The caller validates `check_in < check_out` and that the room exists.
/// Data-access failures propagate unchanged; a taken room is a normal
/// negative result, not an error. Generic over the connection so the
/// booking-creation path can run it inside its transaction.
pub async fn check_room_availability<C: ConnectionTrait>(
    conn: &C,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> AppResult<Availability> {
    let bookings = Bookings::find()
        .filter(BookingCol::RoomId.eq(room_id))
        .filter(BookingCol::Status.is_in(BLOCKING_STATUSES))
        .order_by_asc(BookingCol::CheckInDate)
        .all(conn)
        .await?;

    let conflicting_bookings: Vec<Booking> = find_conflicts(&bookings, check_in, check_out)
        .into_iter()
        .map(booking_from_entity)
        .collect();

    Ok(Availability {
        available: conflicting_bookings.is_empty(),
        conflicting_bookings,
    })
}

fn booking_from_entity(model: BookingModel) -> Booking {
    Booking {
        id: model.id,
        guest_id: model.guest_id,
        room_id: model.room_id,
        user_id: model.user_id,
        check_in_date: model.check_in_date,
        check_out_date: model.check_out_date,
        total_amount: model.total_amount,
        status: model.status,
        payment_status: model.payment_status,
        special_requests: model.special_requests,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    fn booking(status: BookingStatus, check_in: NaiveDate, check_out: NaiveDate) -> BookingModel {
        BookingModel {
            id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            check_in_date: check_in,
            check_out_date: check_out,
            total_amount: 30000,
            status,
            payment_status: PaymentStatus::Unpaid,
            special_requests: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!overlaps(day(1), day(3), day(3), day(5)));
        assert!(!overlaps(day(3), day(5), day(1), day(3)));
    }

    #[test]
    fn partial_overlap_conflicts() {
        let existing = booking(BookingStatus::Confirmed, day(1), day(3));
        let conflicts = find_conflicts(std::slice::from_ref(&existing), day(2), day(4));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, existing.id);
    }

    #[test]
    fn request_contained_in_existing_stay_conflicts() {
        let existing = booking(BookingStatus::Confirmed, day(1), day(10));
        assert_eq!(find_conflicts(&[existing], day(3), day(5)).len(), 1);
    }

    #[test]
    fn identical_range_checked_in_conflicts() {
        let existing = booking(BookingStatus::CheckedIn, day(4), day(8));
        assert_eq!(find_conflicts(&[existing], day(4), day(8)).len(), 1);
    }

    #[test]
    fn pending_and_cancelled_never_block() {
        let bookings = vec![
            booking(BookingStatus::Pending, day(1), day(10)),
            booking(BookingStatus::Cancelled, day(1), day(10)),
            booking(BookingStatus::CheckedOut, day(1), day(10)),
        ];
        assert!(find_conflicts(&bookings, day(3), day(5)).is_empty());
    }

    #[test]
    fn empty_booking_set_is_available() {
        assert!(find_conflicts(&[], day(1), day(30)).is_empty());
    }

    #[test]
    fn mixed_statuses_report_only_blocking_conflicts() {
        let confirmed = booking(BookingStatus::Confirmed, day(2), day(6));
        let bookings = vec![
            booking(BookingStatus::Pending, day(2), day(6)),
            confirmed.clone(),
            booking(BookingStatus::Confirmed, day(10), day(12)),
        ];
        let conflicts = find_conflicts(&bookings, day(4), day(8));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, confirmed.id);
    }
}
