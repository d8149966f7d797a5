use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RuntimeErr, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    availability::{BLOCKING_STATUSES, check_room_availability},
    dto::bookings::{BookingDetail, BookingList, CreateBookingRequest, UpdateBookingRequest},
    entity::{
        bookings::{
            ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings,
            Model as BookingModel,
        },
        guests::Entity as Guests,
        rooms::Entity as Rooms,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Booking, BookingStatus, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::{BookingListQuery, SortOrder},
    services::{guest_service::guest_from_entity, room_service::room_from_entity},
    state::AppState,
};

/// Name of the exclusion constraint in `migrations/0004_bookings.sql` that
/// forbids two blocking bookings of the same room on intersecting date ranges.
/// It backstops the in-transaction availability check against concurrent writers.
const OVERLAP_CONSTRAINT: &str = "bookings_no_overlap";

pub async fn list_bookings(
    state: &AppState,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(BookingCol::Status.eq(status));
    }
    if let Some(guest_id) = query.guest_id {
        condition = condition.add(BookingCol::GuestId.eq(guest_id));
    }
    if let Some(room_id) = query.room_id {
        condition = condition.add(BookingCol::RoomId.eq(room_id));
    }
    if let Some(start_date) = query.start_date {
        condition = condition.add(BookingCol::CheckInDate.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        condition = condition.add(BookingCol::CheckOutDate.lte(end_date));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
    let mut finder = Bookings::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(BookingCol::CheckInDate),
        SortOrder::Desc => finder.order_by_desc(BookingCol::CheckInDate),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(booking_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(meta),
    ))
}

pub async fn get_booking(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookingDetail>> {
    let booking = Bookings::find_by_id(id).one(&state.orm).await?;
    let booking = match booking {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    let guest = Guests::find_by_id(booking.guest_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let room = Rooms::find_by_id(booking.room_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = BookingDetail {
        booking: booking_from_entity(booking),
        guest: guest_from_entity(guest),
        room: room_from_entity(room),
    };
    Ok(ApiResponse::success("Booking", data, Some(Meta::empty())))
}

pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<BookingDetail>> {
    if payload.check_in_date >= payload.check_out_date {
        return Err(AppError::BadRequest(
            "check_in_date must be before check_out_date".into(),
        ));
    }

    let room = Rooms::find_by_id(payload.room_id).one(&state.orm).await?;
    let room = match room {
        Some(r) => r,
        None => return Err(AppError::BadRequest("Room does not exist".into())),
    };
    let guest = Guests::find_by_id(payload.guest_id).one(&state.orm).await?;
    let guest = match guest {
        Some(g) => g,
        None => return Err(AppError::BadRequest("Guest does not exist".into())),
    };

    // Check-then-insert runs in one transaction, and the exclusion constraint
    // still rejects a concurrent writer that committed after our check.
    let txn = state.orm.begin().await?;

    let availability =
        check_room_availability(&txn, room.id, payload.check_in_date, payload.check_out_date)
            .await?;
    if !availability.available {
        return Err(AppError::Conflict(
            "Room is not available for the requested dates".into(),
        ));
    }

    let booking = BookingActive {
        id: Set(Uuid::new_v4()),
        guest_id: Set(guest.id),
        room_id: Set(room.id),
        user_id: Set(user.user_id),
        check_in_date: Set(payload.check_in_date),
        check_out_date: Set(payload.check_out_date),
        total_amount: Set(payload.total_amount),
        status: Set(payload.status.unwrap_or(BookingStatus::Pending)),
        payment_status: Set(payload.payment_status.unwrap_or(PaymentStatus::Unpaid)),
        special_requests: Set(payload.special_requests),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let booking = match booking.insert(&txn).await {
        Ok(b) => b,
        Err(err) if is_overlap_violation(&err) => {
            return Err(AppError::Conflict(
                "Room is not available for the requested dates".into(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "booking_create",
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": booking.id, "room_id": room.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking created",
        BookingDetail {
            booking: booking_from_entity(booking),
            guest: guest_from_entity(guest),
            room: room_from_entity(room),
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let existing = Bookings::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    let new_room_id = payload.room_id.unwrap_or(existing.room_id);
    let new_check_in = payload.check_in_date.unwrap_or(existing.check_in_date);
    let new_check_out = payload.check_out_date.unwrap_or(existing.check_out_date);
    let new_status = payload.status.unwrap_or(existing.status);

    if new_check_in >= new_check_out {
        return Err(AppError::BadRequest(
            "check_in_date must be before check_out_date".into(),
        ));
    }

    let stay_changed = payload.room_id.is_some()
        || payload.check_in_date.is_some()
        || payload.check_out_date.is_some()
        || payload.status.is_some();

    let txn = state.orm.begin().await?;

    if stay_changed && BLOCKING_STATUSES.contains(&new_status) {
        let mut availability =
            check_room_availability(&txn, new_room_id, new_check_in, new_check_out).await?;
        // The booking being moved never conflicts with itself.
        availability.conflicting_bookings.retain(|b| b.id != id);
        if !availability.conflicting_bookings.is_empty() {
            return Err(AppError::Conflict(
                "Room is not available for the requested dates".into(),
            ));
        }
    }

    let mut active: BookingActive = existing.into();
    active.room_id = Set(new_room_id);
    active.check_in_date = Set(new_check_in);
    active.check_out_date = Set(new_check_out);
    active.status = Set(new_status);
    if let Some(total_amount) = payload.total_amount {
        active.total_amount = Set(total_amount);
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(special_requests) = payload.special_requests {
        active.special_requests = Set(Some(special_requests));
    }
    active.updated_at = Set(Utc::now().into());

    let booking = match active.update(&txn).await {
        Ok(b) => b,
        Err(err) if is_overlap_violation(&err) => {
            return Err(AppError::Conflict(
                "Room is not available for the requested dates".into(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "booking_update",
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": booking.id, "status": booking.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking updated",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

pub async fn delete_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Bookings::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "booking_delete",
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn is_overlap_violation(err: &DbErr) -> bool {
    let sqlx_err = match err {
        DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e)) => e,
        _ => return false,
    };
    sqlx_err
        .as_database_error()
        .and_then(|db| db.constraint())
        == Some(OVERLAP_CONSTRAINT)
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
