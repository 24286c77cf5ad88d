use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Course, Profile, Review, Variant, VariantItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseList {
    pub items: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurriculumSection {
    pub variant: Variant,
    pub items: Vec<VariantItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewWithProfile {
    pub review: Review,
    pub profile: Option<Profile>,
}

/// Detailed course shape; the list endpoints return the summary `Course` instead.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    pub course: Course,
    pub curriculum: Vec<CurriculumSection>,
    pub reviews: Vec<ReviewWithProfile>,
    pub average_rating: f64,
    pub rating_count: i64,
}
