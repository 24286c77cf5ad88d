use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::student::{
        CreateReviewRequest, EnrolledCourse, EnrolledCourseList, StudentSummary,
        ToggleCompletedLessonRequest, UpdateReviewRequest, WishlistList, WishlistToggleRequest,
    },
    error::{AppError, AppResult},
    models::{Course, Enrollment, Review, WishlistItem},
    response::{ApiResponse, Meta},
};

pub async fn summary(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<StudentSummary>> {
    let (total_courses,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let (completed_lessons,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM completed_lessons WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let (achieved_certificates,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM certificates WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    let data = StudentSummary {
        total_courses,
        completed_lessons,
        achieved_certificates,
    };
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub async fn enrolled_courses(
    pool: &DbPool,
    user_id: Uuid,
) -> AppResult<ApiResponse<EnrolledCourseList>> {
    let enrollments = sqlx::query_as::<_, Enrollment>(
        "SELECT * FROM enrollments WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let items = with_courses(pool, enrollments).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        EnrolledCourseList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn enrollment_detail(
    pool: &DbPool,
    user_id: Uuid,
    enrollment_id: Uuid,
) -> AppResult<ApiResponse<EnrolledCourse>> {
    let enrollment: Option<Enrollment> =
        sqlx::query_as("SELECT * FROM enrollments WHERE id = $1 AND user_id = $2")
            .bind(enrollment_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    let enrollment = match enrollment {
        Some(e) => e,
        None => return Err(AppError::NotFound),
    };

    let course: Course = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
        .bind(enrollment.course_id)
        .fetch_one(pool)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        EnrolledCourse { enrollment, course },
        Some(Meta::empty()),
    ))
}

/// Toggle semantics: a second submission for the same lesson un-completes it.
pub async fn toggle_completed_lesson(
    pool: &DbPool,
    payload: ToggleCompletedLessonRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let deleted = sqlx::query(
        "DELETE FROM completed_lessons WHERE user_id = $1 AND course_id = $2 AND variant_item_id = $3",
    )
    .bind(payload.user_id)
    .bind(payload.course_id)
    .bind(payload.variant_item_id)
    .execute(pool)
    .await?;

    if deleted.rows_affected() > 0 {
        return Ok(ApiResponse::success(
            "Lesson marked as not completed",
            serde_json::json!({}),
            None,
        ));
    }

    sqlx::query(
        "INSERT INTO completed_lessons (id, user_id, course_id, variant_item_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(payload.user_id)
    .bind(payload.course_id)
    .bind(payload.variant_item_id)
    .execute(pool)
    .await?;

    Ok(ApiResponse::success(
        "Lesson marked as completed",
        serde_json::json!({}),
        None,
    ))
}

pub async fn list_wishlist(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<WishlistList>> {
    let items = sqlx::query_as::<_, WishlistItem>(
        "SELECT * FROM wishlist WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        WishlistList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn toggle_wishlist(
    pool: &DbPool,
    payload: WishlistToggleRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let deleted = sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND course_id = $2")
        .bind(payload.user_id)
        .bind(payload.course_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() > 0 {
        return Ok(ApiResponse::success(
            "Wishlist Deleted",
            serde_json::json!({}),
            None,
        ));
    }

    sqlx::query("INSERT INTO wishlist (id, user_id, course_id) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(payload.user_id)
        .bind(payload.course_id)
        .execute(pool)
        .await?;

    Ok(ApiResponse::success(
        "Wishlist created successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn create_review(
    pool: &DbPool,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (id, user_id, course_id, rating, review, active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.user_id)
    .bind(payload.course_id)
    .bind(payload.rating)
    .bind(payload.review.as_str())
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Review created successfully",
        review,
        None,
    ))
}

pub async fn update_review(
    pool: &DbPool,
    user_id: Uuid,
    review_id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("rating must be between 1 and 5".into()));
    }

    let review: Option<Review> = sqlx::query_as(
        r#"
        UPDATE reviews SET rating = $3, review = $4
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(review_id)
    .bind(user_id)
    .bind(payload.rating)
    .bind(payload.review.as_str())
    .fetch_optional(pool)
    .await?;

    match review {
        Some(review) => Ok(ApiResponse::success("Review updated", review, None)),
        None => Err(AppError::NotFound),
    }
}

async fn with_courses(
    pool: &DbPool,
    enrollments: Vec<Enrollment>,
) -> AppResult<Vec<EnrolledCourse>> {
    let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
    let courses = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ANY($1)")
        .bind(&course_ids)
        .fetch_all(pool)
        .await?;
    let by_id: HashMap<Uuid, Course> = courses.into_iter().map(|c| (c.id, c)).collect();

    let mut items = Vec::with_capacity(enrollments.len());
    for enrollment in enrollments {
        let course = by_id
            .get(&enrollment.course_id)
            .cloned()
            .ok_or(AppError::NotFound)?;
        items.push(EnrolledCourse { enrollment, course });
    }
    Ok(items)
}
