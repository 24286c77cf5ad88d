use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartList, CartStats},
    error::{AppError, AppResult},
    models::CartItem,
    pricing,
    response::{ApiResponse, Meta},
};

pub struct CartUpsert {
    pub item: CartItem,
    /// True when the row was inserted rather than overwritten.
    pub created: bool,
}

pub async fn add_to_cart(pool: &DbPool, payload: AddToCartRequest) -> AppResult<CartUpsert> {
    let course: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM courses WHERE id = $1")
        .bind(payload.course_id)
        .fetch_optional(pool)
        .await?;
    if course.is_none() {
        return Err(AppError::BadRequest("course not found".to_string()));
    }

    // Unknown countries fall back to a zero tax rate.
    let country: Option<(String, Decimal)> =
        sqlx::query_as("SELECT name, tax_rate FROM countries WHERE name = $1")
            .bind(payload.country.as_str())
            .fetch_optional(pool)
            .await?;
    let (country_name, tax_rate) = match country {
        Some((name, rate)) => (name, rate),
        None => ("Unknown".to_string(), Decimal::ZERO),
    };

    let tax_fee = pricing::tax_amount(payload.price, tax_rate);
    let total = payload.price + tax_fee;

    // One atomic statement keyed by (cart_id, course_id); concurrent submits
    // cannot produce duplicate rows or lost updates. `xmax = 0` distinguishes
    // a fresh insert from a conflict overwrite.
    let (item, created): (CartItem, bool) = {
        #[derive(sqlx::FromRow)]
        struct UpsertRow {
            #[sqlx(flatten)]
            item: CartItem,
            created: bool,
        }
        let row: UpsertRow = sqlx::query_as(
            r#"
            INSERT INTO cart_items (id, cart_id, course_id, user_id, country, price, tax_fee, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (cart_id, course_id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                country = EXCLUDED.country,
                price = EXCLUDED.price,
                tax_fee = EXCLUDED.tax_fee,
                total = EXCLUDED.total
            RETURNING *, (xmax = 0) AS created
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.cart_id.as_str())
        .bind(payload.course_id)
        .bind(payload.user_id)
        .bind(country_name)
        .bind(payload.price)
        .bind(tax_fee)
        .bind(total)
        .fetch_one(pool)
        .await?;
        (row.item, row.created)
    };

    if let Err(err) = log_audit(
        pool,
        payload.user_id,
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_id": payload.cart_id, "course_id": payload.course_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(CartUpsert { item, created })
}

pub async fn list_cart(pool: &DbPool, cart_id: &str) -> AppResult<ApiResponse<CartList>> {
    let items = sqlx::query_as::<_, CartItem>(
        "SELECT * FROM cart_items WHERE cart_id = $1 ORDER BY created_at DESC",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;

    let total = items.len() as i64;
    let meta = Meta::new(1, total.max(1), total);
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

pub async fn remove_from_cart(
    pool: &DbPool,
    cart_id: &str,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = $2")
        .bind(cart_id)
        .bind(item_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn cart_statistics(pool: &DbPool, cart_id: &str) -> AppResult<ApiResponse<CartStats>> {
    let (price, tax, total): (Option<Decimal>, Option<Decimal>, Option<Decimal>) = sqlx::query_as(
        "SELECT SUM(price), SUM(tax_fee), SUM(total) FROM cart_items WHERE cart_id = $1",
    )
    .bind(cart_id)
    .fetch_one(pool)
    .await?;

    let stats = CartStats {
        price: price.unwrap_or(Decimal::ZERO),
        tax: tax.unwrap_or(Decimal::ZERO),
        total: total.unwrap_or(Decimal::ZERO),
    };

    Ok(ApiResponse::success("OK", stats, Some(Meta::empty())))
}
