use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use axum_elearning_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    services::teacher_service,
    state::AppState,
};

// Revenue windows: the monthly figure only counts items sold in the last 28
// days, while the total keeps everything that was paid.
#[tokio::test]
async fn monthly_revenue_window_excludes_old_sales() -> anyhow::Result<()> {
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

    let student_id = seed_user(&state, "buyer@example.com", "student").await?;
    let teacher_user_id = seed_user(&state, "seller@example.com", "teacher").await?;
    let teacher_id = seed_teacher(&state, teacher_user_id).await?;
    let course_id = seed_course(&state, teacher_id).await?;

    // One recent sale and one 40 days old, both on paid orders.
    let order_id = seed_paid_order(&state, student_id).await?;
    seed_order_item(&state, order_id, course_id, teacher_id, "100.00", 0).await?;
    seed_order_item(&state, order_id, course_id, teacher_id, "60.00", 40).await?;

    let summary = teacher_service::summary(&state.pool, teacher_id).await?;
    let data = summary.data.unwrap();
    assert_eq!(data.total_revenue, Decimal::from_str("160.00")?);
    assert_eq!(data.monthly_revenue, Decimal::from_str("100.00")?);

    // Calendar-month grouping covers all paid items, windowed or not.
    let earnings = teacher_service::monthly_earnings(&state.pool, teacher_id).await?;
    let rows = earnings.data.unwrap();
    let grouped_total: Decimal = rows.iter().map(|r| r.total_earning).sum();
    assert_eq!(grouped_total, Decimal::from_str("160.00")?);
    for row in &rows {
        assert!((1..=12).contains(&row.month));
    }

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    use sea_orm::{ConnectionTrait, Statement};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum_elearning_api::{
        config::AppConfig,
        error::AppResult,
        gateway::{CheckoutOrder, CheckoutSession, PaymentGateway, PaymentStatus},
    };

    struct NoopGateway;

    #[async_trait]
    impl PaymentGateway for NoopGateway {
        async fn create_checkout_session(
            &self,
            _order: &CheckoutOrder,
        ) -> AppResult<CheckoutSession> {
            Ok(CheckoutSession {
                id: "sess_noop".to_string(),
                url: "https://pay.example.test/noop".to_string(),
            })
        }

        async fn payment_status(&self, _provider_ref: &str) -> AppResult<PaymentStatus> {
            Ok(PaymentStatus::Failed)
        }
    }

    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;

    let schema_present: (Option<String>,) =
        sqlx::query_as("SELECT to_regclass('public.users')::text")
            .fetch_one(&pool)
            .await?;
    if schema_present.0.is_none() {
        run_migrations(&orm).await?;
    }

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, notifications, enrollments, coupon_used_by, order_coupons, \
         order_item_coupons, coupons, order_teachers, order_items, orders, cart_items, \
         completed_lessons, certificates, reviews, wishlist, variant_items, variants, courses, \
         categories, countries, teachers, profiles, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        stripe_secret_key: String::new(),
        paypal_client_id: String::new(),
        paypal_secret_id: String::new(),
        frontend_site_url: "http://localhost:5173/".to_string(),
    };

    Ok(AppState {
        pool,
        orm,
        config,
        stripe: Arc::new(NoopGateway),
        paypal: Arc::new(NoopGateway),
    })
}

async fn seed_user(state: &AppState, email: &str, role: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, email, full_name, password_hash, role) VALUES ($1, $2, $3, 'dummy', $4)",
    )
    .bind(id)
    .bind(email)
    .bind(email.split('@').next().unwrap_or(email))
    .bind(role)
    .execute(&state.pool)
    .await?;

    sqlx::query("INSERT INTO profiles (id, user_id, full_name) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(email)
        .execute(&state.pool)
        .await?;

    Ok(id)
}

async fn seed_teacher(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO teachers (id, user_id, full_name) VALUES ($1, $2, 'Window Teacher')")
        .bind(id)
        .bind(user_id)
        .execute(&state.pool)
        .await?;
    Ok(id)
}

async fn seed_course(state: &AppState, teacher_id: Uuid) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO courses (id, teacher_id, title, slug, price, language, level,
                             platform_status, teacher_status, featured)
        VALUES ($1, $2, 'Window Course', 'window-course', 100.00, 'English', 'Beginner',
                'Published', 'Published', FALSE)
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .execute(&state.pool)
    .await?;
    Ok(id)
}

async fn seed_paid_order(state: &AppState, student_id: Uuid) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO orders (id, oid, student_id, full_name, email, country,
                            sub_total, tax_fee, total, initial_total, saved, payment_status)
        VALUES ($1, $2, $3, 'Buyer', 'buyer@example.com', 'United States',
                160.00, 0, 160.00, 160.00, 0, 'Paid')
        "#,
    )
    .bind(id)
    .bind(format!("ORD-TEST-{}", &id.to_string()[..8]))
    .bind(student_id)
    .execute(&state.pool)
    .await?;
    Ok(id)
}

async fn seed_order_item(
    state: &AppState,
    order_id: Uuid,
    course_id: Uuid,
    teacher_id: Uuid,
    price: &str,
    age_days: i32,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let price = Decimal::from_str(price)?;
    sqlx::query(
        r#"
        INSERT INTO order_items (id, order_id, course_id, teacher_id, price, tax_fee,
                                 total, initial_total, saved, applied_coupon, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, $5, $5, 0, FALSE, NOW() - make_interval(days => $6))
        "#,
    )
    .bind(id)
    .bind(order_id)
    .bind(course_id)
    .bind(teacher_id)
    .bind(price)
    .bind(age_days)
    .execute(&state.pool)
    .await?;
    Ok(id)
}
