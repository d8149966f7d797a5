use crate::{
    dto::dashboard::DashboardStats,
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, sqlx::FromRow)]
struct RoomCounts {
    total: i64,
    available: i64,
    occupied: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct BookingCounts {
    total: i64,
    today_check_ins: i64,
    today_check_outs: i64,
    revenue_this_month: i64,
}

pub async fn dashboard_stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let rooms: RoomCounts = sqlx::query_as(
        r#"
        SELECT count(*) AS total,
               count(*) FILTER (WHERE status = 'AVAILABLE') AS available,
               count(*) FILTER (WHERE status = 'OCCUPIED') AS occupied
        FROM rooms
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let bookings: BookingCounts = sqlx::query_as(
        r#"
        SELECT count(*) AS total,
               count(*) FILTER (WHERE check_in_date = CURRENT_DATE) AS today_check_ins,
               count(*) FILTER (WHERE check_out_date = CURRENT_DATE) AS today_check_outs,
               coalesce(sum(total_amount) FILTER (
                   WHERE created_at >= date_trunc('month', now())
                     AND status <> 'CANCELLED'
               ), 0)::bigint AS revenue_this_month
        FROM bookings
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let total_guests: (i64,) = sqlx::query_as("SELECT count(*) FROM guests")
        .fetch_one(&state.pool)
        .await?;

    let occupancy_rate = if rooms.total > 0 {
        (rooms.occupied as f64 / rooms.total as f64) * 100.0
    } else {
        0.0
    };

    let stats = DashboardStats {
        total_rooms: rooms.total,
        available_rooms: rooms.available,
        occupied_rooms: rooms.occupied,
        occupancy_rate,
        today_check_ins: bookings.today_check_ins,
        today_check_outs: bookings.today_check_outs,
        total_guests: total_guests.0,
        total_bookings: bookings.total,
        revenue_this_month: bookings.revenue_this_month,
    };

    Ok(ApiResponse::success(
        "Dashboard stats",
        stats,
        Some(Meta::empty()),
    ))
}
