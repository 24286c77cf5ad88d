use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub course_id: Uuid,
    /// Absent for guests browsing before an account exists.
    pub user_id: Option<Uuid>,
    pub price: Decimal,
    pub country: String,
    /// Client-held opaque token grouping cart rows.
    pub cart_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartStats {
    pub price: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}
