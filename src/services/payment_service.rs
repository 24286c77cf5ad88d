use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{CheckoutSessionResponse, PaymentSuccessRequest},
    entity::{
        enrollments::ActiveModel as EnrollmentActive,
        notifications::ActiveModel as NotificationActive,
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    gateway::{CheckoutOrder, PaymentStatus},
    response::ApiResponse,
    state::AppState,
};

pub const STATUS_PROCESSING: &str = "Processing";
pub const STATUS_PAID: &str = "Paid";

pub const NOTIFY_ENROLLMENT_COMPLETED: &str = "Course Enrollment Completed";
pub const NOTIFY_NEW_ORDER: &str = "New Order";

/// Open a Stripe checkout session for an order and remember the session id so
/// the confirmation call can be matched back. A provider failure answers with
/// a failure body and leaves the order untouched.
pub async fn stripe_checkout(
    state: &AppState,
    oid: &str,
) -> AppResult<ApiResponse<CheckoutSessionResponse>> {
    let order = Orders::find()
        .filter(OrderCol::Oid.eq(oid))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let checkout_order = CheckoutOrder {
        oid: order.oid.clone(),
        full_name: order.full_name.clone(),
        email: order.email.clone(),
        total: order.total,
    };

    match state.stripe.create_checkout_session(&checkout_order).await {
        Ok(session) => {
            let url = session.url.clone();
            let mut active: OrderActive = order.into();
            active.stripe_session_id = Set(Some(session.id));
            active.update(&state.orm).await?;

            Ok(ApiResponse::success(
                "Checkout session created",
                CheckoutSessionResponse { checkout_url: url },
                None,
            ))
        }
        Err(AppError::PaymentProvider(msg)) => {
            tracing::warn!(order_oid = %oid, error = %msg, "stripe checkout failed");
            Ok(ApiResponse {
                message: format!(
                    "Something went wrong when trying to make payment. Error: {msg}"
                ),
                icon: Some("error".to_string()),
                data: None,
                meta: None,
            })
        }
        Err(err) => Err(err),
    }
}

/// Confirm a payment with whichever provider the client paid through, and on
/// success transition the order to Paid exactly once, creating the enrollment
/// and notification records. Re-confirming a paid order is a no-op success.
pub async fn confirm_payment(
    state: &AppState,
    payload: PaymentSuccessRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let paypal_ref = payload
        .paypal_order_id
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "null");
    let stripe_ref = payload
        .session_id
        .as_deref()
        .filter(|s| !s.is_empty() && *s != "null");

    let status = if let Some(provider_ref) = paypal_ref {
        match state.paypal.payment_status(provider_ref).await {
            Ok(status) => status,
            Err(AppError::PaymentProvider(msg)) => {
                tracing::warn!(order_oid = %payload.order_oid, error = %msg, "paypal status check failed");
                return Ok(ApiResponse::with_icon(
                    "PayPal Error Occurred",
                    "error",
                    serde_json::json!({}),
                ));
            }
            Err(err) => return Err(err),
        }
    } else if let Some(provider_ref) = stripe_ref {
        match state.stripe.payment_status(provider_ref).await {
            Ok(status) => status,
            Err(AppError::PaymentProvider(msg)) => {
                tracing::warn!(order_oid = %payload.order_oid, error = %msg, "stripe status check failed");
                return Ok(ApiResponse::with_icon(
                    "Stripe Error Occurred",
                    "error",
                    serde_json::json!({}),
                ));
            }
            Err(err) => return Err(err),
        }
    } else {
        return Err(AppError::BadRequest(
            "session_id or paypal_order_id is required".into(),
        ));
    };

    if status != PaymentStatus::Paid {
        return Ok(ApiResponse::with_icon(
            "Payment Failed",
            "error",
            serde_json::json!({}),
        ));
    }

    // Provider says paid; flip the order under a row lock so a racing
    // confirmation cannot double-enroll.
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(OrderCol::Oid.eq(payload.order_oid.as_str()))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.payment_status == STATUS_PAID {
        return Ok(ApiResponse::success(
            "Already Paid",
            serde_json::json!({}),
            None,
        ));
    }
    if order.payment_status != STATUS_PROCESSING {
        return Ok(ApiResponse::with_icon(
            "Payment Failed",
            "error",
            serde_json::json!({}),
        ));
    }

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&txn)
        .await?;

    let order_id = order.id;
    let student_id = order.student_id;

    let mut active: OrderActive = order.into();
    active.payment_status = Set(STATUS_PAID.into());
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    // One aggregate notification for the buyer.
    NotificationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(student_id),
        teacher_id: Set(None),
        order_id: Set(order_id),
        order_item_id: Set(None),
        kind: Set(NOTIFY_ENROLLMENT_COMPLETED.into()),
        seen: Set(false),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    // Per item: one teacher notification and one enrollment.
    for item in &items {
        NotificationActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(None),
            teacher_id: Set(Some(item.teacher_id)),
            order_id: Set(order_id),
            order_item_id: Set(Some(item.id)),
            kind: Set(NOTIFY_NEW_ORDER.into()),
            seen: Set(false),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        EnrollmentActive {
            id: Set(Uuid::new_v4()),
            course_id: Set(item.course_id),
            user_id: Set(student_id),
            teacher_id: Set(item.teacher_id),
            order_item_id: Set(item.id),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        student_id,
        "payment_confirmed",
        Some("orders"),
        Some(serde_json::json!({ "order_oid": payload.order_oid })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::with_icon(
        "Payment Successful",
        "success",
        serde_json::json!({}),
    ))
}
