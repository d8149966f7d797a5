use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use axum_hotel_api::{config::AppConfig, db::create_pool};
use chrono::{Duration, Utc};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "Admin User", "admin@example.com", "admin123", "ADMIN").await?;
    let staff_id = ensure_user(&pool, "Staff User", "staff@example.com", "staff123", "STAFF").await?;
    seed_rooms(&pool).await?;
    seed_guests(&pool).await?;
    seed_sample_booking(&pool, staff_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, Staff ID: {staff_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_rooms(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    // (type, nightly price in minor units, capacity)
    let room_types: [(&str, i64, i32); 5] = [
        ("SINGLE", 10000, 1),
        ("DOUBLE", 15000, 2),
        ("TWIN", 15000, 2),
        ("SUITE", 30000, 4),
        ("DELUXE", 40000, 2),
    ];

    for i in 1..=20u32 {
        let room_number = format!("{i:03}");
        let (room_type, price, capacity) = room_types[(i as usize - 1) % room_types.len()];

        sqlx::query(
            r#"
            INSERT INTO rooms (id, room_number, room_type, price, capacity, status, amenities)
            VALUES ($1, $2, $3, $4, $5, 'AVAILABLE', $6)
            ON CONFLICT (room_number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&room_number)
        .bind(room_type)
        .bind(price)
        .bind(capacity)
        .bind(serde_json::json!(["WiFi", "TV", "Air Conditioning"]))
        .execute(pool)
        .await?;
    }

    println!("Ensured 20 rooms");
    Ok(())
}

async fn seed_guests(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let guests = [
        ("John", "Doe", "john.doe@example.com", "+1234567890"),
        ("Jane", "Smith", "jane.smith@example.com", "+0987654321"),
    ];

    for (first_name, last_name, email, phone) in guests {
        sqlx::query(
            r#"
            INSERT INTO guests (id, first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .execute(pool)
        .await?;
    }

    println!("Ensured sample guests");
    Ok(())
}

async fn seed_sample_booking(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let existing: (i64,) = sqlx::query_as("SELECT count(*) FROM bookings")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        return Ok(());
    }

    let room: Option<(Uuid, i64)> =
        sqlx::query_as("SELECT id, price FROM rooms ORDER BY room_number LIMIT 1")
            .fetch_optional(pool)
            .await?;
    let guest: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM guests ORDER BY last_name LIMIT 1")
            .fetch_optional(pool)
            .await?;

    if let (Some((room_id, price)), Some((guest_id,))) = (room, guest) {
        let check_in = Utc::now().date_naive();
        let check_out = check_in + Duration::days(3);

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, guest_id, room_id, user_id, check_in_date, check_out_date,
                 total_amount, status, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'CHECKED_IN', 'PAID')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(guest_id)
        .bind(room_id)
        .bind(user_id)
        .bind(check_in)
        .bind(check_out)
        .bind(price * 3)
        .execute(pool)
        .await?;

        println!("Created sample booking");
    }

    Ok(())
}
