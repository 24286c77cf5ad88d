use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderCreated, OrderWithItems},
    entity::{
        carts::{Column as CartCol, Entity as Carts},
        courses::Entity as Courses,
        order_items::ActiveModel as OrderItemActive,
        order_teachers::{self, Entity as OrderTeachers},
        orders::ActiveModel as OrderActive,
    },
    error::{AppError, AppResult},
    models::{Coupon, Order, OrderItem},
    pricing,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Materialize the cart rows of a session into a persistent order. Runs in a
/// single transaction with the cart rows locked, so a concurrent upsert cannot
/// slip between the snapshot and the item inserts.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderCreated>> {
    let buyer = payload.user_id.filter(|id| !id.is_nil());

    let txn = state.orm.begin().await?;

    let carts = Carts::find()
        .filter(CartCol::CartId.eq(payload.cart_id.as_str()))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    if carts.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let order_id = Uuid::new_v4();
    let oid = pricing::build_order_oid(order_id);

    let order = OrderActive {
        id: Set(order_id),
        oid: Set(oid),
        student_id: Set(buyer),
        full_name: Set(payload.full_name),
        email: Set(payload.email),
        country: Set(payload.country),
        sub_total: Set(Decimal::ZERO),
        tax_fee: Set(Decimal::ZERO),
        total: Set(Decimal::ZERO),
        initial_total: Set(Decimal::ZERO),
        saved: Set(Decimal::ZERO),
        payment_status: Set("Processing".into()),
        stripe_session_id: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut sub_total = Decimal::ZERO;
    let mut tax_fee = Decimal::ZERO;
    let mut total = Decimal::ZERO;

    for cart in &carts {
        let course = Courses::find_by_id(cart.course_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        // Current and initial fields start equal; coupons later move only the
        // current ones.
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            course_id: Set(cart.course_id),
            teacher_id: Set(course.teacher_id),
            price: Set(cart.price),
            tax_fee: Set(cart.tax_fee),
            total: Set(cart.total),
            initial_total: Set(cart.total),
            saved: Set(Decimal::ZERO),
            applied_coupon: Set(false),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        sub_total += cart.price;
        tax_fee += cart.tax_fee;
        total += cart.total;

        // Set semantics: the same teacher across several items is one row.
        OrderTeachers::insert(order_teachers::ActiveModel {
            order_id: Set(order.id),
            teacher_id: Set(course.teacher_id),
        })
        .on_conflict(
            OnConflict::columns([
                order_teachers::Column::OrderId,
                order_teachers::Column::TeacherId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
    }

    let oid = order.oid.clone();
    let mut active: OrderActive = order.into();
    active.sub_total = Set(sub_total);
    active.tax_fee = Set(tax_fee);
    active.total = Set(total);
    active.initial_total = Set(total);
    active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        buyer,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_oid": oid })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order Created Successfully",
        OrderCreated { order_oid: oid },
        Some(Meta::empty()),
    ))
}

/// Checkout view: the order, its items and any coupons applied so far.
pub async fn get_order(state: &AppState, oid: &str) -> AppResult<ApiResponse<OrderWithItems>> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE oid = $1")
        .bind(oid)
        .fetch_optional(&state.pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at",
    )
    .bind(order.id)
    .fetch_all(&state.pool)
    .await?;

    let coupons = sqlx::query_as::<_, Coupon>(
        r#"
        SELECT c.* FROM coupons c
        JOIN order_coupons oc ON oc.coupon_id = c.id
        WHERE oc.order_id = $1
        "#,
    )
    .bind(order.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order,
            items,
            coupons,
        },
        Some(Meta::empty()),
    ))
}
