use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::catalog::{CategoryList, CourseDetail, CourseList, CurriculumSection, ReviewWithProfile},
    error::{AppError, AppResult},
    models::{Category, Course, Profile, Review, Variant, VariantItem},
    response::{ApiResponse, Meta},
};

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<CategoryList>> {
    let items = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE active = TRUE ORDER BY title",
    )
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CategoryList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn list_courses(pool: &DbPool) -> AppResult<ApiResponse<CourseList>> {
    let items = sqlx::query_as::<_, Course>(
        r#"
        SELECT * FROM courses
        WHERE platform_status = 'Published' AND teacher_status = 'Published'
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CourseList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn search_courses(pool: &DbPool, query: &str) -> AppResult<ApiResponse<CourseList>> {
    let items = sqlx::query_as::<_, Course>(
        r#"
        SELECT * FROM courses
        WHERE title ILIKE '%' || $1 || '%'
          AND platform_status = 'Published' AND teacher_status = 'Published'
        ORDER BY created_at DESC
        "#,
    )
    .bind(query)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CourseList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

/// Detailed course shape with curriculum and reviews; list endpoints stick to
/// the flat summary rows.
pub async fn get_course(pool: &DbPool, slug: &str) -> AppResult<ApiResponse<CourseDetail>> {
    let course: Option<Course> = sqlx::query_as(
        r#"
        SELECT * FROM courses
        WHERE slug = $1 AND platform_status = 'Published' AND teacher_status = 'Published'
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    let course = match course {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let variants = sqlx::query_as::<_, Variant>(
        "SELECT * FROM variants WHERE course_id = $1 ORDER BY created_at",
    )
    .bind(course.id)
    .fetch_all(pool)
    .await?;

    let variant_ids: Vec<Uuid> = variants.iter().map(|v| v.id).collect();
    let items = sqlx::query_as::<_, VariantItem>(
        "SELECT * FROM variant_items WHERE variant_id = ANY($1) ORDER BY created_at",
    )
    .bind(&variant_ids)
    .fetch_all(pool)
    .await?;

    let mut items_by_variant: HashMap<Uuid, Vec<VariantItem>> = HashMap::new();
    for item in items {
        items_by_variant.entry(item.variant_id).or_default().push(item);
    }
    let curriculum = variants
        .into_iter()
        .map(|variant| {
            let items = items_by_variant.remove(&variant.id).unwrap_or_default();
            CurriculumSection { variant, items }
        })
        .collect();

    let reviews = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE course_id = $1 AND active = TRUE ORDER BY created_at DESC",
    )
    .bind(course.id)
    .fetch_all(pool)
    .await?;

    let reviewer_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
    let profiles = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ANY($1)")
        .bind(&reviewer_ids)
        .fetch_all(pool)
        .await?;
    let mut profiles_by_user: HashMap<Uuid, Profile> =
        profiles.into_iter().map(|p| (p.user_id, p)).collect();

    let (average_rating, rating_count): (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE course_id = $1 AND active = TRUE",
    )
    .bind(course.id)
    .fetch_one(pool)
    .await?;

    let reviews = reviews
        .into_iter()
        .map(|review| {
            let profile = profiles_by_user.remove(&review.user_id);
            ReviewWithProfile { review, profile }
        })
        .collect();

    let detail = CourseDetail {
        course,
        curriculum,
        reviews,
        average_rating: average_rating.unwrap_or(0.0),
        rating_count,
    };

    Ok(ApiResponse::success("OK", detail, Some(Meta::empty())))
}
