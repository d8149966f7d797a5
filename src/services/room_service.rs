use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::rooms::{CreateRoomRequest, RoomList, UpdateRoomRequest},
    entity::{
        bookings::{Column as BookingCol, Entity as Bookings},
        rooms::{ActiveModel as RoomActive, Column as RoomCol, Entity as Rooms, Model as RoomModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager},
    models::{Room, RoomStatus},
    response::{ApiResponse, Meta},
    routes::params::RoomQuery,
    state::AppState,
};

pub async fn list_rooms(state: &AppState, query: RoomQuery) -> AppResult<ApiResponse<RoomList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(RoomCol::Status.eq(status));
    }
    if let Some(room_type) = query.room_type {
        condition = condition.add(RoomCol::RoomType.eq(room_type));
    }

    let finder = Rooms::find()
        .filter(condition)
        .order_by_asc(RoomCol::RoomNumber);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(room_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Rooms", RoomList { items }, Some(meta)))
}

pub async fn get_room(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Room>> {
    let room = Rooms::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(room_from_entity);
    let room = match room {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Room", room, None))
}

pub async fn create_room(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRoomRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_manager(user)?;

    let exist = Rooms::find()
        .filter(RoomCol::RoomNumber.eq(payload.room_number.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Room number is already taken".into()));
    }

    let room = RoomActive {
        id: Set(Uuid::new_v4()),
        room_number: Set(payload.room_number),
        room_type: Set(payload.room_type),
        price: Set(payload.price),
        capacity: Set(payload.capacity),
        status: Set(payload.status.unwrap_or(RoomStatus::Available)),
        amenities: Set(serde_json::json!(payload.amenities.unwrap_or_default())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "room_create",
        Some("rooms"),
        Some(serde_json::json!({ "room_id": room.id, "room_number": room.room_number })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Room created",
        room_from_entity(room),
        Some(Meta::empty()),
    ))
}

pub async fn update_room(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoomRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_manager(user)?;
    let existing = Rooms::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RoomActive = existing.into();
    if let Some(room_number) = payload.room_number {
        active.room_number = Set(room_number);
    }
    if let Some(room_type) = payload.room_type {
        active.room_type = Set(room_type);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(amenities) = payload.amenities {
        active.amenities = Set(serde_json::json!(amenities));
    }
    active.updated_at = Set(Utc::now().into());

    let room = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "room_update",
        Some("rooms"),
        Some(serde_json::json!({ "room_id": room.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Room updated",
        room_from_entity(room),
        Some(Meta::empty()),
    ))
}

pub async fn delete_room(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_manager(user)?;

    let referenced = Bookings::find()
        .filter(BookingCol::RoomId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(
            "Room has bookings and cannot be deleted".into(),
        ));
    }

    let result = Rooms::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "room_delete",
        Some("rooms"),
        Some(serde_json::json!({ "room_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Room deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn room_from_entity(model: RoomModel) -> Room {
    Room {
        id: model.id,
        room_number: model.room_number,
        room_type: model.room_type,
        price: model.price,
        capacity: model.capacity,
        status: model.status,
        amenities: serde_json::from_value(model.amenities).unwrap_or_default(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
