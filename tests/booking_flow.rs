use axum_hotel_api::{
    availability::check_room_availability,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::bookings::{CreateBookingRequest, UpdateBookingRequest},
    entity::{
        bookings::ActiveModel as BookingActive, guests::ActiveModel as GuestActive,
        rooms::ActiveModel as RoomActive, users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{BookingStatus, PaymentStatus, RoomStatus, RoomType, UserRole},
    services::{booking_service, dashboard_service, guest_service},
    state::AppState,
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: staff creates a confirmed booking; overlapping requests are
// rejected, back-to-back stays are not, and referenced guests cannot be deleted.
#[tokio::test]
async fn booking_conflicts_and_guards_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let staff_id = create_user(&state, UserRole::Staff, "staff@example.com").await?;
    let admin_id = create_user(&state, UserRole::Admin, "admin@example.com").await?;
    let room_id = create_room(&state, "101").await?;
    let other_room_id = create_room(&state, "102").await?;
    let guest_id = create_guest(&state, "alice@example.com").await?;

    let auth_staff = AuthUser {
        user_id: staff_id,
        role: UserRole::Staff,
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: UserRole::Admin,
    };

    let check_in = Utc::now().date_naive();
    let check_out = check_in + Duration::days(3);

    // Confirmed booking holds the room.
    let created = booking_service::create_booking(
        &state,
        &auth_staff,
        booking_request(guest_id, room_id, check_in, check_out, BookingStatus::Confirmed),
    )
    .await?;
    let booking = created.data.expect("booking detail").booking;
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_amount, 45000);

    // Overlapping request is a conflict, and the checker names the offender.
    let availability =
        check_room_availability(&state.orm, room_id, check_in + Duration::days(1), check_out)
            .await?;
    assert!(!availability.available);
    assert_eq!(availability.conflicting_bookings.len(), 1);
    assert_eq!(availability.conflicting_bookings[0].id, booking.id);

    let err = booking_service::create_booking(
        &state,
        &auth_staff,
        booking_request(
            guest_id,
            room_id,
            check_in + Duration::days(1),
            check_out + Duration::days(1),
            BookingStatus::Confirmed,
        ),
    )
    .await
    .expect_err("overlapping booking must be rejected");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Back-to-back stay on the check-out day is fine (half-open interval).
    let adjacent = booking_service::create_booking(
        &state,
        &auth_staff,
        booking_request(
            guest_id,
            room_id,
            check_out,
            check_out + Duration::days(2),
            BookingStatus::Confirmed,
        ),
    )
    .await?;
    let adjacent_id = adjacent.data.expect("booking detail").booking.id;

    // A cancelled booking never blocks the room.
    insert_cancelled_booking(&state, guest_id, other_room_id, staff_id, check_in, check_out)
        .await?;
    let availability =
        check_room_availability(&state.orm, other_room_id, check_in, check_out).await?;
    assert!(availability.available);

    // Moving the adjacent stay onto the first one must conflict.
    let err = booking_service::update_booking(
        &state,
        &auth_staff,
        adjacent_id,
        UpdateBookingRequest {
            room_id: None,
            check_in_date: Some(check_in),
            check_out_date: Some(check_out),
            total_amount: None,
            status: None,
            payment_status: None,
            special_requests: None,
        },
    )
    .await
    .expect_err("moving onto an occupied range must be rejected");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Guests referenced by bookings cannot be deleted.
    let err = guest_service::delete_guest(&state, &auth_staff, guest_id)
        .await
        .expect_err("guest with bookings must not be deletable");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // Booking deletion is an admin action.
    let err = booking_service::delete_booking(&state, &auth_staff, adjacent_id)
        .await
        .expect_err("staff must not delete bookings");
    assert!(matches!(err, AppError::Forbidden), "got {err:?}");
    booking_service::delete_booking(&state, &auth_admin, adjacent_id).await?;

    // Dashboard reflects the seeded data.
    let stats = dashboard_service::dashboard_stats(&state)
        .await?
        .data
        .expect("stats");
    assert_eq!(stats.total_rooms, 2);
    assert_eq!(stats.total_guests, 1);
    assert!(stats.total_bookings >= 1);
    assert!(stats.today_check_ins >= 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE bookings, audit_logs, guests, rooms, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

fn booking_request(
    guest_id: Uuid,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: BookingStatus,
) -> CreateBookingRequest {
    CreateBookingRequest {
        guest_id,
        room_id,
        check_in_date: check_in,
        check_out_date: check_out,
        total_amount: 45000,
        status: Some(status),
        payment_status: None,
        special_requests: None,
    }
}

async fn create_user(state: &AppState, role: UserRole, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set("Test User".into()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn create_room(state: &AppState, room_number: &str) -> anyhow::Result<Uuid> {
    let room = RoomActive {
        id: Set(Uuid::new_v4()),
        room_number: Set(room_number.to_string()),
        room_type: Set(RoomType::Double),
        price: Set(15000),
        capacity: Set(2),
        status: Set(RoomStatus::Available),
        amenities: Set(serde_json::json!(["WiFi"])),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(room.id)
}

async fn create_guest(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let guest = GuestActive {
        id: Set(Uuid::new_v4()),
        first_name: Set("Alice".into()),
        last_name: Set("Walker".into()),
        email: Set(email.to_string()),
        phone: Set(None),
        address: Set(None),
        id_number: Set(None),
        id_type: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(guest.id)
}

async fn insert_cancelled_booking(
    state: &AppState,
    guest_id: Uuid,
    room_id: Uuid,
    user_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> anyhow::Result<()> {
    BookingActive {
        id: Set(Uuid::new_v4()),
        guest_id: Set(guest_id),
        room_id: Set(room_id),
        user_id: Set(user_id),
        check_in_date: Set(check_in),
        check_out_date: Set(check_out),
        total_amount: Set(15000),
        status: Set(BookingStatus::Cancelled),
        payment_status: Set(PaymentStatus::Unpaid),
        special_requests: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(())
}
