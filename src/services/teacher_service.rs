use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{
        catalog::CourseList,
        teacher::{
            BestSellingCourse, CouponList, CreateCouponRequest, CreateCourseRequest,
            MonthlyEarning, NotificationList, OrderItemList, ReviewReplyRequest, RosterStudent,
            TeacherSummary, UpdateCouponRequest,
        },
    },
    error::{AppError, AppResult},
    models::{Coupon, Course, Notification, OrderItem, Review},
    response::{ApiResponse, Meta},
};

/// Dashboard headline numbers. Revenue sums item price over paid orders; the
/// monthly figure is windowed to the last 28 days.
pub async fn summary(pool: &DbPool, teacher_id: Uuid) -> AppResult<ApiResponse<TeacherSummary>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let (total_courses,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM courses WHERE teacher_id = $1")
            .bind(teacher_id)
            .fetch_one(pool)
            .await?;

    let (total_students,): (i64,) = sqlx::query_as(
        "SELECT COUNT(DISTINCT user_id) FROM enrollments WHERE teacher_id = $1 AND user_id IS NOT NULL",
    )
    .bind(teacher_id)
    .fetch_one(pool)
    .await?;

    let (total_revenue,): (Option<Decimal>,) = sqlx::query_as(
        r#"
        SELECT SUM(oi.price) FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE oi.teacher_id = $1 AND o.payment_status = 'Paid'
        "#,
    )
    .bind(teacher_id)
    .fetch_one(pool)
    .await?;

    let (monthly_revenue,): (Option<Decimal>,) = sqlx::query_as(
        r#"
        SELECT SUM(oi.price) FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE oi.teacher_id = $1 AND o.payment_status = 'Paid'
          AND oi.created_at >= NOW() - INTERVAL '28 days'
        "#,
    )
    .bind(teacher_id)
    .fetch_one(pool)
    .await?;

    let data = TeacherSummary {
        total_courses,
        total_students,
        total_revenue: total_revenue.unwrap_or(Decimal::ZERO),
        monthly_revenue: monthly_revenue.unwrap_or(Decimal::ZERO),
    };
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

/// Enrolled students deduplicated by identity; a student buying three courses
/// appears once.
pub async fn student_roster(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<Vec<RosterStudent>>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let students = sqlx::query_as::<_, RosterStudent>(
        r#"
        SELECT DISTINCT ON (e.user_id)
               p.full_name, p.image, p.country, e.created_at AS date
        FROM enrollments e
        JOIN profiles p ON p.user_id = e.user_id
        WHERE e.teacher_id = $1 AND e.user_id IS NOT NULL
        ORDER BY e.user_id, e.created_at
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    let total = students.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        students,
        Some(Meta::new(1, total.max(1), total)),
    ))
}

/// Earnings grouped by calendar month over all paid items, recomputed from the
/// source tables on each call.
pub async fn monthly_earnings(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<Vec<MonthlyEarning>>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let rows = sqlx::query_as::<_, MonthlyEarning>(
        r#"
        SELECT EXTRACT(MONTH FROM oi.created_at)::int4 AS month,
               SUM(oi.price) AS total_earning
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        WHERE oi.teacher_id = $1 AND o.payment_status = 'Paid'
        GROUP BY month
        ORDER BY month
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("OK", rows, Some(Meta::empty())))
}

pub async fn best_selling_courses(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<Vec<BestSellingCourse>>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let rows = sqlx::query_as::<_, BestSellingCourse>(
        r#"
        SELECT c.title AS course_title, c.image AS course_image,
               COALESCE(SUM(oi.price), 0) AS revenue,
               COUNT(e.id) AS sales
        FROM courses c
        LEFT JOIN enrollments e ON e.course_id = c.id
        LEFT JOIN order_items oi ON oi.id = e.order_item_id
        WHERE c.teacher_id = $1
        GROUP BY c.id
        ORDER BY revenue DESC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("OK", rows, Some(Meta::empty())))
}

pub async fn course_orders(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<OrderItemList>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE teacher_id = $1 ORDER BY created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        OrderItemList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn list_reviews(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<Vec<Review>>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT r.* FROM reviews r
        JOIN courses c ON c.id = r.course_id
        WHERE c.teacher_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("OK", reviews, Some(Meta::empty())))
}

pub async fn reply_to_review(
    pool: &DbPool,
    teacher_id: Uuid,
    review_id: Uuid,
    payload: ReviewReplyRequest,
) -> AppResult<ApiResponse<Review>> {
    let review: Option<Review> = sqlx::query_as(
        r#"
        UPDATE reviews r SET reply = $3
        FROM courses c
        WHERE r.id = $1 AND c.id = r.course_id AND c.teacher_id = $2
        RETURNING r.*
        "#,
    )
    .bind(review_id)
    .bind(teacher_id)
    .bind(payload.reply.as_str())
    .fetch_optional(pool)
    .await?;

    match review {
        Some(review) => Ok(ApiResponse::success("Reply saved", review, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn unseen_notifications(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<NotificationList>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let items = sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE teacher_id = $1 AND seen = FALSE ORDER BY created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        NotificationList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn mark_notification_seen(
    pool: &DbPool,
    teacher_id: Uuid,
    notification_id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let notification: Option<Notification> = sqlx::query_as(
        "UPDATE notifications SET seen = TRUE WHERE id = $1 AND teacher_id = $2 RETURNING *",
    )
    .bind(notification_id)
    .bind(teacher_id)
    .fetch_optional(pool)
    .await?;

    match notification {
        Some(notification) => Ok(ApiResponse::success("Notification seen", notification, None)),
        None => Err(AppError::NotFound),
    }
}

/// All of the teacher's own courses regardless of status; unlike the public
/// catalog this includes drafts and disabled courses.
pub async fn list_teacher_courses(
    pool: &DbPool,
    teacher_id: Uuid,
) -> AppResult<ApiResponse<CourseList>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let items = sqlx::query_as::<_, Course>(
        "SELECT * FROM courses WHERE teacher_id = $1 ORDER BY created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CourseList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

/// Creates the course and its curriculum in one transaction. The slug is
/// derived from the title with a random suffix so repeated titles never
/// collide. New courses start as a draft until the teacher publishes.
pub async fn create_course(
    pool: &DbPool,
    teacher_id: Uuid,
    payload: CreateCourseRequest,
) -> AppResult<ApiResponse<Course>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let suffix = Uuid::new_v4().simple().to_string();
    let slug = format!("{}-{}", slugify(&payload.title), &suffix[..8]);

    let mut tx = pool.begin().await?;

    let course: Course = sqlx::query_as(
        r#"
        INSERT INTO courses
            (id, category_id, teacher_id, title, slug, description, image, price,
             language, level, platform_status, teacher_status, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                COALESCE($9, 'English'), COALESCE($10, 'Beginner'), 'Published', 'Draft', FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.category_id)
    .bind(teacher_id)
    .bind(payload.title.trim())
    .bind(slug.as_str())
    .bind(payload.description)
    .bind(payload.image)
    .bind(payload.price)
    .bind(payload.language)
    .bind(payload.level)
    .fetch_one(&mut *tx)
    .await?;

    for variant in payload.variants {
        let variant_id = Uuid::new_v4();
        sqlx::query("INSERT INTO variants (id, course_id, title) VALUES ($1, $2, $3)")
            .bind(variant_id)
            .bind(course.id)
            .bind(variant.title.as_str())
            .execute(&mut *tx)
            .await?;

        for item in variant.items {
            sqlx::query(
                r#"
                INSERT INTO variant_items (id, variant_id, title, description, file_url, preview)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(variant_id)
            .bind(item.title.as_str())
            .bind(item.description)
            .bind(item.file_url)
            .bind(item.preview)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(ApiResponse::success("Course created", course, None))
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if matches!(ch, ' ' | '-' | '_') && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

pub async fn list_coupons(pool: &DbPool, teacher_id: Uuid) -> AppResult<ApiResponse<CouponList>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    let items = sqlx::query_as::<_, Coupon>(
        "SELECT * FROM coupons WHERE teacher_id = $1 ORDER BY created_at DESC",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CouponList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn create_coupon(
    pool: &DbPool,
    teacher_id: Uuid,
    payload: CreateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    ensure_teacher_exists(pool, teacher_id).await?;

    if payload.discount <= Decimal::ZERO || payload.discount > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest(
            "discount must be between 0 and 100".into(),
        ));
    }

    let coupon: Coupon = sqlx::query_as(
        r#"
        INSERT INTO coupons (id, teacher_id, code, discount, active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(teacher_id)
    .bind(payload.code.as_str())
    .bind(payload.discount)
    .bind(payload.active)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Coupon created", coupon, None))
}

pub async fn get_coupon(
    pool: &DbPool,
    teacher_id: Uuid,
    coupon_id: Uuid,
) -> AppResult<ApiResponse<Coupon>> {
    let coupon: Option<Coupon> =
        sqlx::query_as("SELECT * FROM coupons WHERE id = $1 AND teacher_id = $2")
            .bind(coupon_id)
            .bind(teacher_id)
            .fetch_optional(pool)
            .await?;

    match coupon {
        Some(coupon) => Ok(ApiResponse::success("OK", coupon, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn update_coupon(
    pool: &DbPool,
    teacher_id: Uuid,
    coupon_id: Uuid,
    payload: UpdateCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    if let Some(discount) = payload.discount {
        if discount <= Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
            return Err(AppError::BadRequest(
                "discount must be between 0 and 100".into(),
            ));
        }
    }

    let coupon: Option<Coupon> = sqlx::query_as(
        r#"
        UPDATE coupons
        SET code = COALESCE($3, code),
            discount = COALESCE($4, discount),
            active = COALESCE($5, active)
        WHERE id = $1 AND teacher_id = $2
        RETURNING *
        "#,
    )
    .bind(coupon_id)
    .bind(teacher_id)
    .bind(payload.code)
    .bind(payload.discount)
    .bind(payload.active)
    .fetch_optional(pool)
    .await?;

    match coupon {
        Some(coupon) => Ok(ApiResponse::success("Coupon updated", coupon, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn delete_coupon(
    pool: &DbPool,
    teacher_id: Uuid,
    coupon_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM coupons WHERE id = $1 AND teacher_id = $2")
        .bind(coupon_id)
        .bind(teacher_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Coupon deleted",
        serde_json::json!({}),
        None,
    ))
}

async fn ensure_teacher_exists(pool: &DbPool, teacher_id: Uuid) -> AppResult<()> {
    let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM teachers WHERE id = $1")
        .bind(teacher_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Async Rust from Scratch"), "async-rust-from-scratch");
    }

    #[test]
    fn slugify_collapses_separators_and_symbols() {
        assert_eq!(slugify("C++  &  Rust -- FFI!"), "c-rust-ffi");
        assert_eq!(slugify("  trimmed  "), "trimmed");
    }
}
