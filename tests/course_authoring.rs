use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

use axum_elearning_api::{
    db::{DbPool, create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::UpdateProfileRequest,
        teacher::{CreateCourseRequest, CreateVariantItemRequest, CreateVariantRequest},
    },
    services::{auth_service, catalog_service, teacher_service},
};

// Profile retrieval and partial update, keyed by the owning user.
#[tokio::test]
async fn profile_update_is_partial() -> anyhow::Result<()> {
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

    let pool = setup_pool(&database_url).await?;
    let user_id = create_user(&pool, "student", "profile@example.com").await?;

    let fetched = auth_service::get_profile(&pool, user_id).await?;
    let profile = fetched.data.unwrap();
    assert_eq!(profile.user_id, user_id);
    assert!(profile.country.is_none());

    let updated = auth_service::update_profile(
        &pool,
        user_id,
        UpdateProfileRequest {
            full_name: None,
            image: None,
            country: Some("Indonesia".to_string()),
            about: Some("Learning in public".to_string()),
        },
    )
    .await?;
    let profile = updated.data.unwrap();
    assert_eq!(profile.country.as_deref(), Some("Indonesia"));
    assert_eq!(profile.about.as_deref(), Some("Learning in public"));

    // Untouched fields keep their stored values across a re-fetch.
    let refetched = auth_service::get_profile(&pool, user_id).await?;
    let profile = refetched.data.unwrap();
    assert_eq!(profile.full_name, "profile@example.com");
    assert_eq!(profile.country.as_deref(), Some("Indonesia"));

    // An unknown user has no profile to update.
    let missing = auth_service::update_profile(
        &pool,
        Uuid::new_v4(),
        UpdateProfileRequest {
            full_name: Some("Nobody".to_string()),
            image: None,
            country: None,
            about: None,
        },
    )
    .await;
    assert!(missing.is_err());

    Ok(())
}

// Course authoring writes the course and its curriculum in one go; the new
// course shows up in the teacher's own list but not in the public catalog
// until published.
#[tokio::test]
async fn created_course_is_a_draft_with_curriculum() -> anyhow::Result<()> {
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

    let pool = setup_pool(&database_url).await?;
    let teacher_user_id = create_user(&pool, "teacher", "author@example.com").await?;
    let teacher_id = create_teacher(&pool, teacher_user_id).await?;

    let created = teacher_service::create_course(
        &pool,
        teacher_id,
        CreateCourseRequest {
            title: "Ownership & Borrowing".to_string(),
            description: Some("The borrow checker explained".to_string()),
            image: None,
            price: Decimal::from_str("75.00")?,
            language: None,
            level: Some("Intermediate".to_string()),
            category_id: None,
            variants: vec![
                CreateVariantRequest {
                    title: "Getting Started".to_string(),
                    items: vec![
                        CreateVariantItemRequest {
                            title: "Welcome".to_string(),
                            description: None,
                            file_url: None,
                            preview: true,
                        },
                        CreateVariantItemRequest {
                            title: "Moves".to_string(),
                            description: Some("Move semantics".to_string()),
                            file_url: None,
                            preview: false,
                        },
                    ],
                },
                CreateVariantRequest {
                    title: "Lifetimes".to_string(),
                    items: vec![],
                },
            ],
        },
    )
    .await?;
    let course = created.data.unwrap();
    assert_eq!(course.teacher_id, teacher_id);
    assert!(course.slug.starts_with("ownership-borrowing-"));
    assert_eq!(course.language, "English");
    assert_eq!(course.level, "Intermediate");
    assert_eq!(course.teacher_status, "Draft");

    let (variants,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM variants WHERE course_id = $1")
            .bind(course.id)
            .fetch_one(&pool)
            .await?;
    assert_eq!(variants, 2);

    let (items,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM variant_items vi JOIN variants v ON v.id = vi.variant_id WHERE v.course_id = $1",
    )
    .bind(course.id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(items, 2);

    // The teacher's list includes the draft, the public catalog does not.
    let own = teacher_service::list_teacher_courses(&pool, teacher_id).await?;
    let own = own.data.unwrap();
    assert!(own.items.iter().any(|c| c.id == course.id));

    let public = catalog_service::list_courses(&pool).await?;
    let public = public.data.unwrap();
    assert!(public.items.iter().all(|c| c.id != course.id));

    // Same title again, distinct slug.
    let twin = teacher_service::create_course(
        &pool,
        teacher_id,
        CreateCourseRequest {
            title: "Ownership & Borrowing".to_string(),
            description: None,
            image: None,
            price: Decimal::from_str("75.00")?,
            language: None,
            level: None,
            category_id: None,
            variants: vec![],
        },
    )
    .await?;
    let twin = twin.data.unwrap();
    assert_ne!(twin.slug, course.slug);

    // Authoring against an unknown teacher id is a lookup failure.
    let orphan = teacher_service::create_course(
        &pool,
        Uuid::new_v4(),
        CreateCourseRequest {
            title: "No One's Course".to_string(),
            description: None,
            image: None,
            price: Decimal::ZERO,
            language: None,
            level: None,
            category_id: None,
            variants: vec![],
        },
    )
    .await;
    assert!(orphan.is_err());

    Ok(())
}

async fn setup_pool(database_url: &str) -> anyhow::Result<DbPool> {
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

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, notifications, enrollments, coupon_used_by, order_coupons, \
         order_item_coupons, coupons, order_teachers, order_items, orders, cart_items, \
         completed_lessons, certificates, reviews, wishlist, variant_items, variants, courses, \
         categories, countries, teachers, profiles, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(pool)
}

async fn create_user(pool: &DbPool, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, email, full_name, password_hash, role) VALUES ($1, $2, $3, 'dummy', $4)",
    )
    .bind(id)
    .bind(email)
    .bind(email.split('@').next().unwrap_or(email))
    .bind(role)
    .execute(pool)
    .await?;

    sqlx::query("INSERT INTO profiles (id, user_id, full_name) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(email)
        .execute(pool)
        .await?;

    Ok(id)
}

async fn create_teacher(pool: &DbPool, user_id: Uuid) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO teachers (id, user_id, full_name) VALUES ($1, $2, 'Test Teacher')")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(id)
}
