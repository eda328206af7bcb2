use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shipping_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub country: String,
    pub state: String,
    pub min_price: i64,
    /// NULL means unbounded above.
    pub max_price: Option<i64>,
    pub fee: i64,
    pub delivery_time: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
