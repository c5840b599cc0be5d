use sea_orm::sea_query::Table;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName, EntityTrait, Schema,
};

use crate::domain::DomainError;
use crate::models::{book, publisher, sale, shop, stock};

/// Open a connection and make sure the five tables exist.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DomainError> {
    let db = Database::connect(database_url).await?;

    create_schema(&db).await?;

    Ok(db)
}

/// Create any missing table, referenced tables first.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, publisher::Entity).await?;
    create_table(db, shop::Entity).await?;
    create_table(db, book::Entity).await?;
    create_table(db, stock::Entity).await?;
    create_table(db, sale::Entity).await?;
    Ok(())
}

/// Drop the five tables (referencing tables first) and recreate them empty.
pub async fn reset_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    drop_table(db, sale::Entity).await?;
    drop_table(db, stock::Entity).await?;
    drop_table(db, book::Entity).await?;
    drop_table(db, shop::Entity).await?;
    drop_table(db, publisher::Entity).await?;

    tracing::debug!("Dropped sales schema");

    create_schema(db).await
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}

async fn drop_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statement = Table::drop()
        .table(entity.table_ref())
        .if_exists()
        .to_owned();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}
