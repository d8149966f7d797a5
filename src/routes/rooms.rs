use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    availability::{Availability, check_room_availability},
    dto::rooms::{CreateRoomRequest, RoomList, UpdateRoomRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Room,
    response::{ApiResponse, Meta},
    routes::params::{AvailabilityQuery, RoomQuery},
    services::room_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route(
            "/{id}",
            get(get_room).put(update_room).delete(delete_room),
        )
        .route("/{id}/availability", get(room_availability))
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by room status"),
        ("room_type" = Option<String>, Query, description = "Filter by room type"),
    ),
    responses(
        (status = 200, description = "List rooms", body = ApiResponse<RoomList>)
    ),
    tag = "Rooms"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<RoomQuery>,
) -> AppResult<Json<ApiResponse<RoomList>>> {
    let resp = room_service::list_rooms(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    responses(
        (status = 200, description = "Room detail", body = ApiResponse<Room>),
        (status = 404, description = "Room not found")
    ),
    tag = "Rooms"
)]
pub async fn get_room(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::get_room(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}/availability",
    params(
        ("check_in" = String, Query, description = "Requested check-in date (YYYY-MM-DD)"),
        ("check_out" = String, Query, description = "Requested check-out date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Room availability for the requested dates", body = ApiResponse<Availability>),
        (status = 400, description = "check_in is not before check_out")
    ),
    tag = "Rooms"
)]
pub async fn room_availability(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<Availability>>> {
    if query.check_in >= query.check_out {
        return Err(AppError::BadRequest(
            "check_in must be before check_out".into(),
        ));
    }
    let availability =
        check_room_availability(&state.orm, id, query.check_in, query.check_out).await?;
    Ok(Json(ApiResponse::success(
        "Availability",
        availability,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = ApiResponse<Room>),
        (status = 403, description = "Requires admin or manager role")
    ),
    tag = "Rooms"
)]
pub async fn create_room(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::create_room(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<Room>),
        (status = 404, description = "Room not found")
    ),
    tag = "Rooms"
)]
pub async fn update_room(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomRequest>,
) -> AppResult<Json<ApiResponse<Room>>> {
    let resp = room_service::update_room(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    responses(
        (status = 200, description = "Room deleted"),
        (status = 409, description = "Room still has bookings")
    ),
    tag = "Rooms"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = room_service::delete_room(&state, &user, id).await?;
    Ok(Json(resp))
}
