use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::student::{
        CreateReviewRequest, EnrolledCourse, EnrolledCourseList, StudentSummary,
        ToggleCompletedLessonRequest, UpdateReviewRequest, WishlistList, WishlistToggleRequest,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_self},
    models::Review,
    response::ApiResponse,
    services::student_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary/{user_id}", get(summary))
        .route("/courses/{user_id}", get(enrolled_courses))
        .route("/courses/{user_id}/{enrollment_id}", get(enrollment_detail))
        .route("/toggle-completed-lesson", post(toggle_completed_lesson))
        .route("/wishlist/{user_id}", get(list_wishlist))
        .route("/wishlist", post(toggle_wishlist))
        .route("/reviews", post(create_review))
        .route("/reviews/{review_id}", put(update_review))
}

#[utoipa::path(
    get,
    path = "/api/student/summary/{user_id}",
    params(("user_id" = Uuid, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<StudentSummary>),
        (status = 403, description = "Not the caller's records"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StudentSummary>>> {
    ensure_self(&user, user_id)?;
    let resp = student_service::summary(&state.pool, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/student/courses/{user_id}",
    params(("user_id" = Uuid, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Enrollments with course data", body = ApiResponse<EnrolledCourseList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn enrolled_courses(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EnrolledCourseList>>> {
    ensure_self(&user, user_id)?;
    let resp = student_service::enrolled_courses(&state.pool, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/student/courses/{user_id}/{enrollment_id}",
    params(
        ("user_id" = Uuid, Path, description = "Student user id"),
        ("enrollment_id" = Uuid, Path, description = "Enrollment id")
    ),
    responses(
        (status = 200, description = "Single enrollment with course data", body = ApiResponse<EnrolledCourse>),
        (status = 404, description = "Enrollment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn enrollment_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path((user_id, enrollment_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<EnrolledCourse>>> {
    ensure_self(&user, user_id)?;
    let resp = student_service::enrollment_detail(&state.pool, user_id, enrollment_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/student/toggle-completed-lesson",
    request_body = ToggleCompletedLessonRequest,
    responses(
        (status = 200, description = "Lesson completion toggled", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn toggle_completed_lesson(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ToggleCompletedLessonRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_self(&user, payload.user_id)?;
    let resp = student_service::toggle_completed_lesson(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/student/wishlist/{user_id}",
    params(("user_id" = Uuid, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Wishlist rows", body = ApiResponse<WishlistList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WishlistList>>> {
    ensure_self(&user, user_id)?;
    let resp = student_service::list_wishlist(&state.pool, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/student/wishlist",
    request_body = WishlistToggleRequest,
    responses(
        (status = 200, description = "Wishlist entry toggled", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<WishlistToggleRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    ensure_self(&user, payload.user_id)?;
    let resp = student_service::toggle_wishlist(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/student/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 400, description = "Rating out of range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    ensure_self(&user, payload.user_id)?;
    let resp = student_service::create_review(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/student/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review id")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = student_service::update_review(&state.pool, user.user_id, review_id, payload).await?;
    Ok(Json(resp))
}
