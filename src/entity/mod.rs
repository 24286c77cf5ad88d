pub mod carts;
pub mod coupon_used_by;
pub mod coupons;
pub mod courses;
pub mod enrollments;
pub mod notifications;
pub mod order_coupons;
pub mod order_item_coupons;
pub mod order_items;
pub mod order_teachers;
pub mod orders;

pub use carts::Entity as Carts;
pub use coupon_used_by::Entity as CouponUsedBy;
pub use coupons::Entity as Coupons;
pub use courses::Entity as Courses;
pub use enrollments::Entity as Enrollments;
pub use notifications::Entity as Notifications;
pub use order_coupons::Entity as OrderCoupons;
pub use order_item_coupons::Entity as OrderItemCoupons;
pub use order_items::Entity as OrderItems;
pub use order_teachers::Entity as OrderTeachers;
pub use orders::Entity as Orders;
