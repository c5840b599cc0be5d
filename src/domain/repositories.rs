//! Repository trait definitions
//!
//! The reporter reads the store only through this contract; the SeaORM
//! implementation lives in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use super::report::{PublisherRef, PublisherSelector, SaleLine};

/// Read side of the store used by the sales reporter
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Publishers selected by `selector`, ordered by id
    async fn find_publishers(
        &self,
        selector: &PublisherSelector,
    ) -> Result<Vec<PublisherRef>, DomainError>;

    /// Every sale of the given publishers' books, ordered by sale date and
    /// then sale id
    async fn find_sales(&self, publisher_ids: &[i32]) -> Result<Vec<SaleLine>, DomainError>;
}
