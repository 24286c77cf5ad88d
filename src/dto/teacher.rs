use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Coupon, Notification, OrderItem};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeacherSummary {
    pub total_courses: i64,
    pub total_students: i64,
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct RosterStudent {
    pub full_name: String,
    pub image: Option<String>,
    pub country: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MonthlyEarning {
    /// Calendar month 1..=12.
    pub month: i32,
    pub total_earning: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct BestSellingCourse {
    pub course_title: String,
    pub course_image: Option<String>,
    pub revenue: Decimal,
    pub sales: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemList {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponList {
    pub items: Vec<Coupon>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount: Decimal,
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub code: Option<String>,
    pub discount: Option<Decimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewReplyRequest {
    pub reply: String,
}

/// Course authoring payload; curriculum sections come inline as plain JSON.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Decimal,
    pub language: Option<String>,
    pub level: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub variants: Vec<CreateVariantRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVariantRequest {
    pub title: String,
    #[serde(default)]
    pub items: Vec<CreateVariantItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVariantItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_url: Option<String>,
    #[serde(default)]
    pub preview: bool,
}
