//! SeaORM implementation of SalesRepository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use crate::domain::{
    DomainError, MatchCase, PublisherRef, PublisherSelector, SaleLine, SalesRepository,
};
use crate::models::publisher::{self, Entity as PublisherEntity};
use crate::models::{book, sale, shop, stock};

/// Projection of the publisher -> book -> stock -> shop/sale join
#[derive(Debug, FromQueryResult)]
struct SaleRow {
    sale_id: i32,
    title: String,
    shop: String,
    price: f64,
    count: i32,
    date_sale: NaiveDateTime,
}

impl From<SaleRow> for SaleLine {
    fn from(row: SaleRow) -> Self {
        Self {
            sale_id: row.sale_id,
            title: row.title,
            shop: row.shop,
            price: row.price,
            count: row.count,
            date_sale: row.date_sale,
        }
    }
}

/// SeaORM-based implementation of SalesRepository
pub struct SeaOrmSalesRepository {
    db: DatabaseConnection,
}

impl SeaOrmSalesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SalesRepository for SeaOrmSalesRepository {
    async fn find_publishers(
        &self,
        selector: &PublisherSelector,
    ) -> Result<Vec<PublisherRef>, DomainError> {
        let mut query = PublisherEntity::find().order_by_asc(publisher::Column::Id);

        match selector {
            PublisherSelector::Id(id) => {
                let Ok(id) = i32::try_from(*id) else {
                    return Ok(Vec::new());
                };
                query = query.filter(publisher::Column::Id.eq(id));
            }
            // LIKE only narrows the candidates; its case folding and escaping
            // differ per backend, so `matches` below has the final say.
            PublisherSelector::NameContains {
                fragment,
                case: MatchCase::Sensitive,
            } if !has_like_wildcards(fragment) => {
                query = query.filter(publisher::Column::Name.contains(fragment.as_str()));
            }
            PublisherSelector::NameContains { .. } => {}
        }

        let publishers = query.all(&self.db).await?;

        Ok(publishers
            .into_iter()
            .filter(|p| selector.matches(p.id, &p.name))
            .map(|p| PublisherRef {
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    async fn find_sales(&self, publisher_ids: &[i32]) -> Result<Vec<SaleLine>, DomainError> {
        if publisher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = PublisherEntity::find()
            .select_only()
            .column_as(sale::Column::Id, "sale_id")
            .column_as(book::Column::Title, "title")
            .column_as(shop::Column::Name, "shop")
            .column_as(sale::Column::Price, "price")
            .column_as(sale::Column::Count, "count")
            .column_as(sale::Column::DateSale, "date_sale")
            .join(JoinType::InnerJoin, publisher::Relation::Book.def())
            .join(JoinType::InnerJoin, book::Relation::Stock.def())
            .join(JoinType::InnerJoin, stock::Relation::Shop.def())
            .join(JoinType::InnerJoin, stock::Relation::Sale.def())
            .filter(publisher::Column::Id.is_in(publisher_ids.iter().copied()))
            .order_by_asc(sale::Column::DateSale)
            .order_by_asc(sale::Column::Id)
            .into_model::<SaleRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(SaleLine::from).collect())
    }
}

fn has_like_wildcards(fragment: &str) -> bool {
    fragment.contains(['%', '_', '\\'])
}
