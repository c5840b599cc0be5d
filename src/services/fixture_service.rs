//! Fixture Service - Loads a fixture into the store in a single transaction

use std::path::Path;

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, TransactionTrait};

use crate::domain::DomainError;
use crate::import::{self, FixtureRecord, ModelKind, RawRecord};
use crate::models::{book, publisher, sale, shop, stock};

/// Rows inserted per kind by one load
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub publishers: usize,
    pub shops: usize,
    pub books: usize,
    pub stocks: usize,
    pub sales: usize,
}

impl LoadSummary {
    pub fn count(&self, kind: ModelKind) -> usize {
        match kind {
            ModelKind::Publisher => self.publishers,
            ModelKind::Shop => self.shops,
            ModelKind::Book => self.books,
            ModelKind::Stock => self.stocks,
            ModelKind::Sale => self.sales,
        }
    }

    pub fn total(&self) -> usize {
        ModelKind::ALL.into_iter().map(|kind| self.count(kind)).sum()
    }

    fn record(&mut self, kind: ModelKind) {
        let slot = match kind {
            ModelKind::Publisher => &mut self.publishers,
            ModelKind::Shop => &mut self.shops,
            ModelKind::Book => &mut self.books,
            ModelKind::Stock => &mut self.stocks,
            ModelKind::Sale => &mut self.sales,
        };
        *slot += 1;
    }
}

/// Read a fixture file and load it.
pub async fn load_fixture_file(
    db: &DatabaseConnection,
    path: &Path,
) -> Result<LoadSummary, DomainError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DomainError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("Loading fixture {}", path.display());
    load_fixture(db, &content).await
}

/// Parse a fixture document and load it.
pub async fn load_fixture(
    db: &DatabaseConnection,
    content: &str,
) -> Result<LoadSummary, DomainError> {
    let records = import::parse_fixture(content)?;
    load_records(db, records).await
}

/// Insert every record in order and commit once.
///
/// Records must come in dependency order. The first failure (unknown model,
/// bad fields, constraint violation) rolls the whole batch back.
pub async fn load_records(
    db: &DatabaseConnection,
    records: Vec<RawRecord>,
) -> Result<LoadSummary, DomainError> {
    let txn = db.begin().await?;

    match insert_records(&txn, records).await {
        Ok(summary) => {
            txn.commit().await?;
            tracing::info!(
                "Loaded {} records ({} publishers, {} books, {} shops, {} stock lines, {} sales)",
                summary.total(),
                summary.publishers,
                summary.books,
                summary.shops,
                summary.stocks,
                summary.sales
            );
            Ok(summary)
        }
        Err(e) => {
            tracing::error!("Fixture load failed, rolling back: {}", e);
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn insert_records(
    txn: &DatabaseTransaction,
    records: Vec<RawRecord>,
) -> Result<LoadSummary, DomainError> {
    let mut summary = LoadSummary::default();

    for raw in records {
        let record = FixtureRecord::try_from(raw)?;
        let (kind, pk) = (record.kind(), record.pk());

        insert_record(txn, record)
            .await
            .map_err(|e| DomainError::from_insert(e, kind.as_str(), pk))?;

        tracing::debug!("Inserted {} #{}", kind, pk);
        summary.record(kind);
    }

    Ok(summary)
}

async fn insert_record(txn: &DatabaseTransaction, record: FixtureRecord) -> Result<(), DbErr> {
    match record {
        FixtureRecord::Publisher { pk, fields } => {
            publisher::Entity::insert(fields.with_pk(pk))
                .exec_without_returning(txn)
                .await?;
        }
        FixtureRecord::Shop { pk, fields } => {
            shop::Entity::insert(fields.with_pk(pk))
                .exec_without_returning(txn)
                .await?;
        }
        FixtureRecord::Book { pk, fields } => {
            book::Entity::insert(fields.with_pk(pk))
                .exec_without_returning(txn)
                .await?;
        }
        FixtureRecord::Stock { pk, fields } => {
            stock::Entity::insert(fields.with_pk(pk))
                .exec_without_returning(txn)
                .await?;
        }
        FixtureRecord::Sale { pk, fields } => {
            sale::Entity::insert(fields.with_pk(pk))
                .exec_without_returning(txn)
                .await?;
        }
    }
    Ok(())
}
