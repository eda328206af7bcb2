use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_categories::Entity")]
    SubCategories,
    #[sea_orm(has_many = "super::product_categories::Entity")]
    ProductCategories,
}

impl Related<super::sub_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubCategories.def()
    }
}

impl Related<super::product_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategories.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_categories::Relation::Products.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_categories::Relation::Categories.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
