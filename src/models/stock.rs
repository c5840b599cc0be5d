use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub book_id: i32,
    pub shop_id: i32,
    /// Copies on hand in the shop
    pub count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::shop::Entity",
        from = "Column::ShopId",
        to = "super::shop::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Shop,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sale,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StockFields {
    #[serde(alias = "id_book")]
    pub book_id: i32,
    #[serde(alias = "id_shop")]
    pub shop_id: i32,
    pub count: i32,
}

impl StockFields {
    pub fn with_pk(self, pk: i32) -> ActiveModel {
        ActiveModel {
            id: Set(pk),
            book_id: Set(self.book_id),
            shop_id: Set(self.shop_id),
            count: Set(self.count),
        }
    }
}
