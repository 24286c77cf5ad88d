use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_elearning_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_countries(&pool).await?;
    let student_id = ensure_user(&pool, "student@example.com", "student123", "student").await?;
    let teacher_user_id = ensure_user(&pool, "teacher@example.com", "teacher123", "teacher").await?;
    let teacher_id = ensure_teacher(&pool, teacher_user_id).await?;
    seed_catalog(&pool, teacher_id).await?;

    println!("Seed completed. Student ID: {student_id}, Teacher ID: {teacher_id}");
    Ok(())
}

async fn seed_countries(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let countries = vec![
        ("United States", "10.00"),
        ("United Kingdom", "20.00"),
        ("Germany", "19.00"),
        ("Indonesia", "11.00"),
    ];

    for (name, rate) in countries {
        sqlx::query(
            r#"
            INSERT INTO countries (id, name, tax_rate)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET tax_rate = EXCLUDED.tax_rate
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Decimal::from_str(rate)?)
        .execute(pool)
        .await?;
    }

    println!("Seeded countries");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
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

    let full_name = email.split('@').next().unwrap_or(email);

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, full_name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

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

    sqlx::query(
        r#"
        INSERT INTO profiles (id, user_id, full_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(full_name)
    .execute(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_teacher(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO teachers (id, user_id, full_name, bio)
        VALUES ($1, $2, 'Demo Teacher', 'Teaches Rust for a living')
        ON CONFLICT (user_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let teacher_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM teachers WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    Ok(teacher_id)
}

async fn seed_catalog(pool: &sqlx::PgPool, teacher_id: Uuid) -> anyhow::Result<()> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO categories (id, title, slug, active)
        VALUES ($1, 'Programming', 'programming', TRUE)
        ON CONFLICT (slug) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .fetch_optional(pool)
    .await?;
    let category_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) =
                sqlx::query_as("SELECT id FROM categories WHERE slug = 'programming'")
                    .fetch_one(pool)
                    .await?;
            existing.0
        }
    };

    let courses = vec![
        ("Async Rust from Scratch", "async-rust-from-scratch", "100.00"),
        ("Practical SQL for Backends", "practical-sql-for-backends", "80.00"),
        ("Web APIs with Axum", "web-apis-with-axum", "120.00"),
    ];

    for (title, slug, price) in courses {
        let course_id = Uuid::new_v4();
        let inserted = sqlx::query(
            r#"
            INSERT INTO courses
                (id, category_id, teacher_id, title, slug, price, language, level,
                 platform_status, teacher_status, featured)
            VALUES ($1, $2, $3, $4, $5, $6, 'English', 'Beginner', 'Published', 'Published', FALSE)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(course_id)
        .bind(category_id)
        .bind(teacher_id)
        .bind(title)
        .bind(slug)
        .bind(Decimal::from_str(price)?)
        .execute(pool)
        .await?;

        if inserted.rows_affected() > 0 {
            let variant_id = Uuid::new_v4();
            sqlx::query("INSERT INTO variants (id, course_id, title) VALUES ($1, $2, 'Introduction')")
                .bind(variant_id)
                .bind(course_id)
                .execute(pool)
                .await?;
            sqlx::query(
                "INSERT INTO variant_items (id, variant_id, title, preview) VALUES ($1, $2, 'Welcome', TRUE)",
            )
            .bind(Uuid::new_v4())
            .bind(variant_id)
            .execute(pool)
            .await?;
        }
    }

    sqlx::query(
        r#"
        INSERT INTO coupons (id, teacher_id, code, discount, active)
        VALUES ($1, $2, 'WELCOME20', 20.00, TRUE)
        ON CONFLICT (code) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(teacher_id)
    .execute(pool)
    .await?;

    println!("Seeded catalog");
    Ok(())
}
