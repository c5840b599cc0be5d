//! Report Service - Sales of a publisher's books across all shops

use crate::domain::{DomainError, MatchCase, PublisherSelector, SalesReport, SalesRepository};

/// Build the sales report for a publisher id or name fragment.
///
/// Matching nothing is not an error: the report is simply empty.
pub async fn sales_by_publisher(
    repo: &dyn SalesRepository,
    identifier: &str,
    case: MatchCase,
) -> Result<SalesReport, DomainError> {
    let selector = PublisherSelector::parse(identifier, case);

    let publishers = repo.find_publishers(&selector).await?;
    if publishers.is_empty() {
        tracing::info!("No publisher matches {}", selector);
        return Ok(SalesReport::new(selector, publishers, Vec::new()));
    }

    let publisher_ids: Vec<i32> = publishers.iter().map(|p| p.id).collect();
    let lines = repo.find_sales(&publisher_ids).await?;

    tracing::debug!(
        "{} publisher(s) match {}, {} sale(s) found",
        publishers.len(),
        selector,
        lines.len()
    );

    Ok(SalesReport::new(selector, publishers, lines))
}
