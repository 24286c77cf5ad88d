use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest,
            UpdateProfileRequest,
        },
        cart::{AddToCartRequest, CartList, CartStats},
        catalog::{CategoryList, CourseDetail, CourseList, CurriculumSection, ReviewWithProfile},
        orders::{ApplyCouponRequest, CreateOrderRequest, OrderCreated, OrderWithItems},
        payments::{CheckoutSessionResponse, PaymentSuccessRequest},
        student::{
            CreateReviewRequest, EnrolledCourse, EnrolledCourseList, StudentSummary,
            ToggleCompletedLessonRequest, UpdateReviewRequest, WishlistList, WishlistToggleRequest,
        },
        teacher::{
            BestSellingCourse, CouponList, CreateCouponRequest, CreateCourseRequest,
            CreateVariantItemRequest, CreateVariantRequest, MonthlyEarning, NotificationList,
            OrderItemList, ReviewReplyRequest, RosterStudent, TeacherSummary, UpdateCouponRequest,
        },
    },
    models::{
        CartItem, Category, CompletedLesson, Country, Coupon, Course, Enrollment, Notification,
        Order, OrderItem, Profile, Review, User, Variant, VariantItem, WishlistItem,
    },
    response::{ApiResponse, Meta},
    routes::{auth, cart, catalog, health, orders, payments, student, teacher},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::change_password,
        auth::get_profile,
        auth::update_profile,
        catalog::list_categories,
        catalog::list_courses,
        catalog::search_courses,
        catalog::get_course,
        cart::add_to_cart,
        cart::cart_list,
        cart::cart_stats,
        cart::remove_from_cart,
        orders::create_order,
        orders::get_order,
        orders::apply_coupon,
        payments::stripe_checkout,
        payments::payment_success,
        student::summary,
        student::enrolled_courses,
        student::enrollment_detail,
        student::toggle_completed_lesson,
        student::list_wishlist,
        student::toggle_wishlist,
        student::create_review,
        student::update_review,
        teacher::summary,
        teacher::student_roster,
        teacher::monthly_earnings,
        teacher::best_selling,
        teacher::course_orders,
        teacher::list_teacher_courses,
        teacher::create_course,
        teacher::list_reviews,
        teacher::reply_to_review,
        teacher::unseen_notifications,
        teacher::mark_notification_seen,
        teacher::list_coupons,
        teacher::create_coupon,
        teacher::get_coupon,
        teacher::update_coupon,
        teacher::delete_coupon
    ),
    components(
        schemas(
            User,
            Profile,
            Country,
            Category,
            Course,
            Variant,
            VariantItem,
            CartItem,
            Order,
            OrderItem,
            Coupon,
            Enrollment,
            Notification,
            CompletedLesson,
            Review,
            WishlistItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            UpdateProfileRequest,
            AddToCartRequest,
            CartList,
            CartStats,
            CategoryList,
            CourseList,
            CurriculumSection,
            ReviewWithProfile,
            CourseDetail,
            CreateOrderRequest,
            OrderCreated,
            OrderWithItems,
            ApplyCouponRequest,
            CheckoutSessionResponse,
            PaymentSuccessRequest,
            StudentSummary,
            EnrolledCourse,
            EnrolledCourseList,
            ToggleCompletedLessonRequest,
            WishlistToggleRequest,
            WishlistList,
            CreateReviewRequest,
            UpdateReviewRequest,
            TeacherSummary,
            RosterStudent,
            MonthlyEarning,
            BestSellingCourse,
            OrderItemList,
            CouponList,
            CreateCouponRequest,
            UpdateCouponRequest,
            NotificationList,
            ReviewReplyRequest,
            CreateCourseRequest,
            CreateVariantRequest,
            CreateVariantItemRequest,
            catalog::SearchQuery,
            Meta,
            ApiResponse<Course>,
            ApiResponse<CourseList>,
            ApiResponse<CourseDetail>,
            ApiResponse<CartList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderCreated>,
            ApiResponse<TeacherSummary>,
            ApiResponse<StudentSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Public catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order and coupon endpoints"),
        (name = "Payments", description = "Payment provider endpoints"),
        (name = "Student", description = "Student dashboard endpoints"),
        (name = "Teacher", description = "Teacher dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
