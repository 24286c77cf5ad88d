use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    dto::catalog::{CategoryList, CourseDetail, CourseList},
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub q: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/courses", get(list_courses))
        .route("/courses/search", get(search_courses))
        .route("/courses/{slug}", get(get_course))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses(
        (status = 200, description = "Active categories", body = ApiResponse<CategoryList>),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/courses",
    responses(
        (status = 200, description = "Published courses", body = ApiResponse<CourseList>),
    ),
    tag = "Catalog"
)]
pub async fn list_courses(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    let resp = catalog_service::list_courses(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/courses/search",
    params(
        ("q" = String, Query, description = "Case-insensitive title substring")
    ),
    responses(
        (status = 200, description = "Matching published courses", body = ApiResponse<CourseList>),
    ),
    tag = "Catalog"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    let resp = catalog_service::search_courses(&state.pool, &query.q).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/courses/{slug}",
    params(
        ("slug" = String, Path, description = "Course slug")
    ),
    responses(
        (status = 200, description = "Course detail with curriculum and reviews", body = ApiResponse<CourseDetail>),
        (status = 404, description = "Course not found or unpublished"),
    ),
    tag = "Catalog"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CourseDetail>>> {
    let resp = catalog_service::get_course(&state.pool, &slug).await?;
    Ok(Json(resp))
}
