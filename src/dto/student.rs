use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, Enrollment, WishlistItem};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    pub total_courses: i64,
    pub completed_lessons: i64,
    pub achieved_certificates: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCourseList {
    pub items: Vec<EnrolledCourse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleCompletedLessonRequest {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub variant_item_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WishlistToggleRequest {
    pub user_id: Uuid,
    pub course_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistList {
    pub items: Vec<WishlistItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub rating: i32,
    pub review: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: i32,
    pub review: String,
}
