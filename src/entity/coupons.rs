use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub starts_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    /// Optional applicability sets; NULL or empty means the whole cart.
    pub product_ids: Option<Json>,
    pub category_ids: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
