use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

use axum_elearning_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{cart::AddToCartRequest, orders::CreateOrderRequest, payments::PaymentSuccessRequest},
    error::AppResult,
    gateway::{CheckoutOrder, CheckoutSession, PaymentGateway, PaymentStatus},
    services::{
        cart_service,
        coupon_service::{self, CouponApplication},
        order_service, payment_service,
    },
    state::AppState,
};

struct FakeGateway {
    status: PaymentStatus,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(&self, _order: &CheckoutOrder) -> AppResult<CheckoutSession> {
        Ok(CheckoutSession {
            id: "sess_test".to_string(),
            url: "https://pay.example.test/session/sess_test".to_string(),
        })
    }

    async fn payment_status(&self, _provider_ref: &str) -> AppResult<PaymentStatus> {
        Ok(self.status)
    }
}

// Full purchase flow: cart upsert -> order snapshot -> coupon -> payment
// confirmation with its enrollment and notification side effects.
#[tokio::test]
async fn cart_to_paid_enrollment_flow() -> anyhow::Result<()> {
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

    // Seed a taxed country, a teacher with a course, a student and a coupon.
    sqlx::query("INSERT INTO countries (id, name, tax_rate) VALUES ($1, 'United States', 10.00)")
        .bind(Uuid::new_v4())
        .execute(&state.pool)
        .await?;

    let student_id = create_user(&state, "student", "student@example.com").await?;
    let teacher_user_id = create_user(&state, "teacher", "teacher@example.com").await?;
    let teacher_id = create_teacher(&state, teacher_user_id).await?;
    let course_id = create_course(&state, teacher_id, "async-rust", "100.00").await?;

    sqlx::query(
        "INSERT INTO coupons (id, teacher_id, code, discount, active) VALUES ($1, $2, 'SAVE20', 20.00, TRUE)",
    )
    .bind(Uuid::new_v4())
    .bind(teacher_id)
    .execute(&state.pool)
    .await?;

    let cart_id = "test-cart-token";

    // First add creates the row, the second one overwrites it in place.
    let first = cart_service::add_to_cart(
        &state.pool,
        AddToCartRequest {
            course_id,
            user_id: Some(student_id),
            price: Decimal::from_str("90.00")?,
            country: "United States".to_string(),
            cart_id: cart_id.to_string(),
        },
    )
    .await?;
    assert!(first.created);

    let second = cart_service::add_to_cart(
        &state.pool,
        AddToCartRequest {
            course_id,
            user_id: Some(student_id),
            price: Decimal::from_str("100.00")?,
            country: "United States".to_string(),
            cart_id: cart_id.to_string(),
        },
    )
    .await?;
    assert!(!second.created);
    assert_eq!(second.item.tax_fee, Decimal::from_str("10.00")?);
    assert_eq!(second.item.total, Decimal::from_str("110.00")?);

    let listed = cart_service::list_cart(&state.pool, cart_id).await?;
    assert_eq!(listed.data.unwrap().items.len(), 1);

    // Order snapshots the cart with current and initial fields equal.
    let created = order_service::create_order(
        &state,
        CreateOrderRequest {
            full_name: "Test Student".to_string(),
            email: "student@example.com".to_string(),
            country: "United States".to_string(),
            cart_id: cart_id.to_string(),
            user_id: Some(student_id),
        },
    )
    .await?;
    let oid = created.data.unwrap().order_oid;
    assert!(oid.starts_with("ORD-"));

    let fetched = order_service::get_order(&state, &oid).await?;
    let view = fetched.data.unwrap();
    assert_eq!(view.order.sub_total, Decimal::from_str("100.00")?);
    assert_eq!(view.order.tax_fee, Decimal::from_str("10.00")?);
    assert_eq!(view.order.total, Decimal::from_str("110.00")?);
    assert_eq!(view.order.initial_total, Decimal::from_str("110.00")?);
    assert_eq!(view.order.payment_status, "Processing");
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].total, view.items[0].initial_total);

    // 20% off the 110.00 item is 22.00; applying twice is refused.
    let applied = coupon_service::apply_coupon(&state, &oid, "SAVE20").await?;
    assert_eq!(applied, CouponApplication::Applied);

    let discounted = order_service::get_order(&state, &oid).await?;
    let view = discounted.data.unwrap();
    assert_eq!(view.order.total, Decimal::from_str("88.00")?);
    assert_eq!(view.order.saved, Decimal::from_str("22.00")?);
    assert_eq!(view.order.initial_total, Decimal::from_str("110.00")?);
    assert!(view.items[0].applied_coupon);
    assert_eq!(view.coupons.len(), 1);

    let again = coupon_service::apply_coupon(&state, &oid, "SAVE20").await?;
    assert_eq!(again, CouponApplication::AlreadyApplied);

    // The refused re-apply must not touch the totals.
    let unchanged = order_service::get_order(&state, &oid).await?;
    let view = unchanged.data.unwrap();
    assert_eq!(view.order.sub_total, Decimal::from_str("100.00")?);
    assert_eq!(view.order.total, Decimal::from_str("88.00")?);
    assert_eq!(view.order.saved, Decimal::from_str("22.00")?);
    assert_eq!(view.coupons.len(), 1);

    // A coupon from a teacher with no item in this order is rejected without
    // mutating the order either.
    let other_user_id = create_user(&state, "teacher", "other-teacher@example.com").await?;
    let other_teacher_id = create_teacher(&state, other_user_id).await?;
    sqlx::query(
        "INSERT INTO coupons (id, teacher_id, code, discount, active) VALUES ($1, $2, 'OTHER10', 10.00, TRUE)",
    )
    .bind(Uuid::new_v4())
    .bind(other_teacher_id)
    .execute(&state.pool)
    .await?;

    let foreign = coupon_service::apply_coupon(&state, &oid, "OTHER10").await?;
    assert_eq!(foreign, CouponApplication::NoMatchingItems);

    let untouched = order_service::get_order(&state, &oid).await?;
    let view = untouched.data.unwrap();
    assert_eq!(view.order.total, Decimal::from_str("88.00")?);
    assert_eq!(view.order.saved, Decimal::from_str("22.00")?);
    assert_eq!(view.coupons.len(), 1);

    // Confirmation flips the order to Paid once and writes the side effects.
    let confirmed = payment_service::confirm_payment(
        &state,
        PaymentSuccessRequest {
            order_oid: oid.clone(),
            session_id: Some("sess_test".to_string()),
            paypal_order_id: None,
        },
    )
    .await?;
    assert_eq!(confirmed.message, "Payment Successful");

    let paid = order_service::get_order(&state, &oid).await?;
    assert_eq!(paid.data.unwrap().order.payment_status, "Paid");

    let (enrollments,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
            .bind(student_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(enrollments, 1);

    let (student_notifications,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(student_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(student_notifications, 1);

    let (teacher_notifications,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE teacher_id = $1")
            .bind(teacher_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(teacher_notifications, 1);

    // Re-confirming is a no-op success and must not duplicate anything.
    let reconfirmed = payment_service::confirm_payment(
        &state,
        PaymentSuccessRequest {
            order_oid: oid.clone(),
            session_id: Some("sess_test".to_string()),
            paypal_order_id: None,
        },
    )
    .await?;
    assert_eq!(reconfirmed.message, "Already Paid");

    let (enrollments_after,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
            .bind(student_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(enrollments_after, 1);

    Ok(())
}

// A provider that does not report the payment as settled must leave the order
// untouched.
#[tokio::test]
async fn pending_payment_does_not_enroll() -> anyhow::Result<()> {
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

    let mut state = setup_state(&database_url).await?;
    state.stripe = Arc::new(FakeGateway {
        status: PaymentStatus::Pending,
    });

    sqlx::query("INSERT INTO countries (id, name, tax_rate) VALUES ($1, 'Germany', 19.00)")
        .bind(Uuid::new_v4())
        .execute(&state.pool)
        .await?;

    let student_id = create_user(&state, "student", "pending@example.com").await?;
    let teacher_user_id = create_user(&state, "teacher", "pending-teacher@example.com").await?;
    let teacher_id = create_teacher(&state, teacher_user_id).await?;
    let course_id = create_course(&state, teacher_id, "pending-course", "50.00").await?;

    let cart_id = "pending-cart-token";
    cart_service::add_to_cart(
        &state.pool,
        AddToCartRequest {
            course_id,
            user_id: Some(student_id),
            price: Decimal::from_str("50.00")?,
            country: "Germany".to_string(),
            cart_id: cart_id.to_string(),
        },
    )
    .await?;

    let created = order_service::create_order(
        &state,
        CreateOrderRequest {
            full_name: "Pending Student".to_string(),
            email: "pending@example.com".to_string(),
            country: "Germany".to_string(),
            cart_id: cart_id.to_string(),
            user_id: Some(student_id),
        },
    )
    .await?;
    let oid = created.data.unwrap().order_oid;

    let outcome = payment_service::confirm_payment(
        &state,
        PaymentSuccessRequest {
            order_oid: oid.clone(),
            session_id: Some("sess_pending".to_string()),
            paypal_order_id: None,
        },
    )
    .await?;
    assert_eq!(outcome.message, "Payment Failed");

    let fetched = order_service::get_order(&state, &oid).await?;
    assert_eq!(fetched.data.unwrap().order.payment_status, "Processing");

    let (enrollments,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
            .bind(student_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(enrollments, 0);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;

    // Apply the schema only on a fresh database.
    let schema_present: (Option<String>,) =
        sqlx::query_as("SELECT to_regclass('public.users')::text")
            .fetch_one(&pool)
            .await?;
    if schema_present.0.is_none() {
        run_migrations(&orm).await?;
    }

    // Clean tables between runs
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
        stripe: Arc::new(FakeGateway {
            status: PaymentStatus::Paid,
        }),
        paypal: Arc::new(FakeGateway {
            status: PaymentStatus::Paid,
        }),
    })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
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

async fn create_teacher(state: &AppState, user_id: Uuid) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO teachers (id, user_id, full_name) VALUES ($1, $2, 'Test Teacher')")
        .bind(id)
        .bind(user_id)
        .execute(&state.pool)
        .await?;
    Ok(id)
}

async fn create_course(
    state: &AppState,
    teacher_id: Uuid,
    slug: &str,
    price: &str,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO courses (id, teacher_id, title, slug, price, language, level,
                             platform_status, teacher_status, featured)
        VALUES ($1, $2, $3, $4, $5, 'English', 'Beginner', 'Published', 'Published', FALSE)
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .bind(slug)
    .bind(slug)
    .bind(Decimal::from_str(price)?)
    .execute(&state.pool)
    .await?;
    Ok(id)
}
