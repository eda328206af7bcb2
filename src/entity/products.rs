use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: i64,
    pub sale_price: Option<i64>,
    /// Required at the validation boundary unless variant colors are present.
    pub stock: Option<i32>,
    pub images: Json,
    pub colors: Option<Json>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_categories::Entity")]
    ProductCategories,
    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,
    #[sea_orm(has_many = "super::wishlist_items::Entity")]
    WishlistItems,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::benefits::Entity")]
    Benefits,
    #[sea_orm(has_many = "super::videos::Entity")]
    Videos,
    #[sea_orm(has_many = "super::faqs::Entity")]
    Faqs,
}

impl Related<super::product_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategories.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_categories::Relation::Categories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_categories::Relation::Products.def().rev())
    }
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::wishlist_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WishlistItems.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::benefits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Benefits.def()
    }
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::faqs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faqs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
