use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::CourseList,
        teacher::{
            BestSellingCourse, CouponList, CreateCouponRequest, CreateCourseRequest,
            MonthlyEarning, NotificationList, OrderItemList, ReviewReplyRequest, RosterStudent,
            TeacherSummary, UpdateCouponRequest,
        },
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_teacher},
    models::{Coupon, Course, Notification, Review},
    response::ApiResponse,
    services::teacher_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary/{teacher_id}", get(summary))
        .route("/students/{teacher_id}", get(student_roster))
        .route("/earnings/{teacher_id}", get(monthly_earnings))
        .route("/best-selling/{teacher_id}", get(best_selling))
        .route("/orders/{teacher_id}", get(course_orders))
        .route(
            "/courses/{teacher_id}",
            get(list_teacher_courses).post(create_course),
        )
        .route("/reviews/{teacher_id}", get(list_reviews))
        .route("/reviews/{teacher_id}/{review_id}/reply", put(reply_to_review))
        .route("/notifications/{teacher_id}", get(unseen_notifications))
        .route(
            "/notifications/{teacher_id}/{notification_id}/seen",
            put(mark_notification_seen),
        )
        .route(
            "/coupons/{teacher_id}",
            get(list_coupons).post(create_coupon),
        )
        .route(
            "/coupons/{teacher_id}/{coupon_id}",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
}

#[utoipa::path(
    get,
    path = "/api/teacher/summary/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Dashboard headline numbers", body = ApiResponse<TeacherSummary>),
        (status = 403, description = "Caller is not a teacher"),
        (status = 404, description = "Teacher not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TeacherSummary>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::summary(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/students/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Deduplicated enrolled students", body = ApiResponse<Vec<RosterStudent>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn student_roster(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<RosterStudent>>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::student_roster(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/earnings/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Earnings grouped by calendar month", body = ApiResponse<Vec<MonthlyEarning>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn monthly_earnings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<MonthlyEarning>>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::monthly_earnings(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/best-selling/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Courses ranked by revenue", body = ApiResponse<Vec<BestSellingCourse>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn best_selling(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<BestSellingCourse>>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::best_selling_courses(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/orders/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Order items for the teacher's courses", body = ApiResponse<OrderItemList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn course_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderItemList>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::course_orders(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/courses/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "All of the teacher's courses, drafts included", body = ApiResponse<CourseList>),
        (status = 404, description = "Teacher not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn list_teacher_courses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::list_teacher_courses(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/teacher/courses/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created with its curriculum", body = ApiResponse<Course>),
        (status = 400, description = "Invalid title or price"),
        (status = 404, description = "Teacher not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
    Json(payload): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Course>>)> {
    ensure_teacher(&user)?;
    let resp = teacher_service::create_course(&state.pool, teacher_id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/reviews/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Reviews on the teacher's courses", body = ApiResponse<Vec<Review>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::list_reviews(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/teacher/reviews/{teacher_id}/{review_id}/reply",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("review_id" = Uuid, Path, description = "Review id")
    ),
    request_body = ReviewReplyRequest,
    responses(
        (status = 200, description = "Reply saved", body = ApiResponse<Review>),
        (status = 404, description = "Review not found for this teacher"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn reply_to_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path((teacher_id, review_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ReviewReplyRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::reply_to_review(&state.pool, teacher_id, review_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/notifications/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Unseen notifications", body = ApiResponse<NotificationList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn unseen_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::unseen_notifications(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/teacher/notifications/{teacher_id}/{notification_id}/seen",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("notification_id" = Uuid, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked seen", body = ApiResponse<Notification>),
        (status = 404, description = "Notification not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn mark_notification_seen(
    State(state): State<AppState>,
    user: AuthUser,
    Path((teacher_id, notification_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    ensure_teacher(&user)?;
    let resp =
        teacher_service::mark_notification_seen(&state.pool, teacher_id, notification_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/teacher/coupons/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Coupons issued by the teacher", body = ApiResponse<CouponList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::list_coupons(&state.pool, teacher_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/teacher/coupons/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher id")),
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = ApiResponse<Coupon>),
        (status = 400, description = "Discount out of range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(teacher_id): Path<Uuid>,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Coupon>>)> {
    ensure_teacher(&user)?;
    let resp = teacher_service::create_coupon(&state.pool, teacher_id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/teacher/coupons/{teacher_id}/{coupon_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("coupon_id" = Uuid, Path, description = "Coupon id")
    ),
    responses(
        (status = 200, description = "Coupon", body = ApiResponse<Coupon>),
        (status = 404, description = "Coupon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn get_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path((teacher_id, coupon_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::get_coupon(&state.pool, teacher_id, coupon_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/teacher/coupons/{teacher_id}/{coupon_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("coupon_id" = Uuid, Path, description = "Coupon id")
    ),
    request_body = UpdateCouponRequest,
    responses(
        (status = 200, description = "Coupon updated", body = ApiResponse<Coupon>),
        (status = 404, description = "Coupon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn update_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path((teacher_id, coupon_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::update_coupon(&state.pool, teacher_id, coupon_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/teacher/coupons/{teacher_id}/{coupon_id}",
    params(
        ("teacher_id" = Uuid, Path, description = "Teacher id"),
        ("coupon_id" = Uuid, Path, description = "Coupon id")
    ),
    responses(
        (status = 200, description = "Coupon deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Coupon not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Teacher"
)]
pub async fn delete_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path((teacher_id, coupon_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_teacher(&user)?;
    let resp = teacher_service::delete_coupon(&state.pool, teacher_id, coupon_id).await?;
    Ok(Json(resp))
}
