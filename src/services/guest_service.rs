use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::guests::{CreateGuestRequest, GuestList, UpdateGuestRequest},
    entity::{
        bookings::{Column as BookingCol, Entity as Bookings},
        guests::{ActiveModel as GuestActive, Column as GuestCol, Entity as Guests, Model as GuestModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Guest,
    response::{ApiResponse, Meta},
    routes::params::GuestQuery,
    state::AppState,
};

pub async fn list_guests(state: &AppState, query: GuestQuery) -> AppResult<ApiResponse<GuestList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(GuestCol::FirstName).ilike(pattern.clone()))
                .add(Expr::col(GuestCol::LastName).ilike(pattern.clone()))
                .add(Expr::col(GuestCol::Email).ilike(pattern.clone()))
                .add(Expr::col(GuestCol::Phone).ilike(pattern)),
        );
    }

    let finder = Guests::find()
        .filter(condition)
        .order_by_asc(GuestCol::LastName);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(guest_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Guests", GuestList { items }, Some(meta)))
}

pub async fn get_guest(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Guest>> {
    let guest = Guests::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(guest_from_entity);
    let guest = match guest {
        Some(g) => g,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Guest", guest, None))
}

pub async fn create_guest(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGuestRequest,
) -> AppResult<ApiResponse<Guest>> {
    let exist = Guests::find()
        .filter(GuestCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest(
            "A guest with this email already exists".into(),
        ));
    }

    let guest = GuestActive {
        id: Set(Uuid::new_v4()),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        address: Set(payload.address),
        id_number: Set(payload.id_number),
        id_type: Set(payload.id_type),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "guest_create",
        Some("guests"),
        Some(serde_json::json!({ "guest_id": guest.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Guest created",
        guest_from_entity(guest),
        Some(Meta::empty()),
    ))
}

pub async fn update_guest(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateGuestRequest,
) -> AppResult<ApiResponse<Guest>> {
    let existing = Guests::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(g) => g,
        None => return Err(AppError::NotFound),
    };

    let mut active: GuestActive = existing.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(id_number) = payload.id_number {
        active.id_number = Set(Some(id_number));
    }
    if let Some(id_type) = payload.id_type {
        active.id_type = Set(Some(id_type));
    }
    active.updated_at = Set(Utc::now().into());

    let guest = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "guest_update",
        Some("guests"),
        Some(serde_json::json!({ "guest_id": guest.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Guest updated",
        guest_from_entity(guest),
        Some(Meta::empty()),
    ))
}

pub async fn delete_guest(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    // A guest stays on file as long as any booking references them.
    let referenced = Bookings::find()
        .filter(BookingCol::GuestId.eq(id))
        .count(&state.orm)
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(
            "Guest has bookings and cannot be deleted".into(),
        ));
    }

    let result = Guests::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "guest_delete",
        Some("guests"),
        Some(serde_json::json!({ "guest_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Guest deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn guest_from_entity(model: GuestModel) -> Guest {
    Guest {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        id_number: model.id_number,
        id_type: model.id_type,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
