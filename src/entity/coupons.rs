use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub code: String,
    pub discount: Decimal,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item_coupons::Entity")]
    OrderItemCoupons,
    #[sea_orm(has_many = "super::coupon_used_by::Entity")]
    CouponUsedBy,
}

impl Related<super::order_item_coupons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItemCoupons.def()
    }
}

impl Related<super::coupon_used_by::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CouponUsedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
