use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit::log_audit,
    entity::{
        coupon_used_by::{self, Entity as CouponUsedBy},
        coupons::{Column as CouponCol, Entity as Coupons},
        order_coupons::{self, Entity as OrderCoupons},
        order_item_coupons::{self, Entity as OrderItemCoupons},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    pricing,
    state::AppState,
};

/// Outcome of a coupon application attempt; the route layer decides the HTTP
/// shape for each.
#[derive(Debug, PartialEq, Eq)]
pub enum CouponApplication {
    Applied,
    AlreadyApplied,
    NoMatchingItems,
}

/// Apply a teacher-scoped coupon to an order. Coupons target order items whose
/// teacher issued the coupon; an item carries a given coupon at most once.
///
/// Processing stops after the first qualifying item; a multi-item order from
/// one teacher takes the discount on a single item per call.
pub async fn apply_coupon(
    state: &AppState,
    oid: &str,
    coupon_code: &str,
) -> AppResult<CouponApplication> {
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(OrderCol::Oid.eq(oid))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let coupon = Coupons::find()
        .filter(CouponCol::Code.eq(coupon_code))
        .filter(CouponCol::Active.eq(true))
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .filter(OrderItemCol::TeacherId.eq(coupon.teacher_id))
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    for item in items {
        let already = OrderItemCoupons::find_by_id((item.id, coupon.id))
            .one(&txn)
            .await?
            .is_some();
        if already {
            return Ok(CouponApplication::AlreadyApplied);
        }

        let discount = pricing::discount_amount(item.total, coupon.discount);

        let new_total = item.total - discount;
        let new_price = item.price - discount;
        let new_saved = item.saved + discount;

        let mut item_active: OrderItemActive = item.clone().into();
        item_active.total = Set(new_total);
        item_active.price = Set(new_price);
        item_active.saved = Set(new_saved);
        item_active.applied_coupon = Set(true);
        item_active.update(&txn).await?;

        OrderItemCoupons::insert(order_item_coupons::ActiveModel {
            order_item_id: Set(item.id),
            coupon_id: Set(coupon.id),
        })
        .exec_without_returning(&txn)
        .await?;

        OrderCoupons::insert(order_coupons::ActiveModel {
            order_id: Set(order.id),
            coupon_id: Set(coupon.id),
        })
        .on_conflict(
            OnConflict::columns([
                order_coupons::Column::OrderId,
                order_coupons::Column::CouponId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        let buyer = order.student_id;
        let order_total = order.total - discount;
        let order_sub_total = order.sub_total - discount;
        let order_saved = order.saved + discount;

        let mut order_active: OrderActive = order.into();
        order_active.total = Set(order_total);
        order_active.sub_total = Set(order_sub_total);
        order_active.saved = Set(order_saved);
        order_active.update(&txn).await?;

        if let Some(user_id) = buyer {
            CouponUsedBy::insert(coupon_used_by::ActiveModel {
                coupon_id: Set(coupon.id),
                user_id: Set(user_id),
            })
            .on_conflict(
                OnConflict::columns([
                    coupon_used_by::Column::CouponId,
                    coupon_used_by::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;

        if let Err(err) = log_audit(
            &state.pool,
            buyer,
            "coupon_apply",
            Some("order_items"),
            Some(serde_json::json!({ "order_oid": oid, "coupon_code": coupon_code })),
        )
        .await
        {
            tracing::warn!(error = %err, "audit log failed");
        }

        return Ok(CouponApplication::Applied);
    }

    Ok(CouponApplication::NoMatchingItems)
}
