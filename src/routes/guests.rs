use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::guests::{CreateGuestRequest, GuestList, UpdateGuestRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Guest,
    response::ApiResponse,
    routes::params::GuestQuery,
    services::guest_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route(
            "/{id}",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
}

#[utoipa::path(
    get,
    path = "/api/guests",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search over name, email, and phone"),
    ),
    responses(
        (status = 200, description = "List guests", body = ApiResponse<GuestList>)
    ),
    tag = "Guests"
)]
pub async fn list_guests(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<GuestQuery>,
) -> AppResult<Json<ApiResponse<GuestList>>> {
    let resp = guest_service::list_guests(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/guests/{id}",
    responses(
        (status = 200, description = "Guest detail", body = ApiResponse<Guest>),
        (status = 404, description = "Guest not found")
    ),
    tag = "Guests"
)]
pub async fn get_guest(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Guest>>> {
    let resp = guest_service::get_guest(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/guests",
    request_body = CreateGuestRequest,
    responses(
        (status = 200, description = "Guest created", body = ApiResponse<Guest>),
        (status = 400, description = "Email already registered")
    ),
    tag = "Guests"
)]
pub async fn create_guest(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGuestRequest>,
) -> AppResult<Json<ApiResponse<Guest>>> {
    let resp = guest_service::create_guest(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/guests/{id}",
    request_body = UpdateGuestRequest,
    responses(
        (status = 200, description = "Guest updated", body = ApiResponse<Guest>),
        (status = 404, description = "Guest not found")
    ),
    tag = "Guests"
)]
pub async fn update_guest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGuestRequest>,
) -> AppResult<Json<ApiResponse<Guest>>> {
    let resp = guest_service::update_guest(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    responses(
        (status = 200, description = "Guest deleted"),
        (status = 409, description = "Guest still referenced by bookings")
    ),
    tag = "Guests"
)]
pub async fn delete_guest(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = guest_service::delete_guest(&state, &user, id).await?;
    Ok(Json(resp))
}
