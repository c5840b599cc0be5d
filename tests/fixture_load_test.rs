use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use publisher_sales::db;
use publisher_sales::domain::DomainError;
use publisher_sales::import::{self, ModelKind};
use publisher_sales::models::{book, publisher, sale, shop, stock};
use publisher_sales::services;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn sample_fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/tests_data.json")
}

// Helper returning the row count of every table
async fn table_counts(db: &DatabaseConnection) -> HashMap<ModelKind, u64> {
    let mut counts = HashMap::new();
    counts.insert(
        ModelKind::Publisher,
        publisher::Entity::find().count(db).await.expect("DB error"),
    );
    counts.insert(
        ModelKind::Shop,
        shop::Entity::find().count(db).await.expect("DB error"),
    );
    counts.insert(
        ModelKind::Book,
        book::Entity::find().count(db).await.expect("DB error"),
    );
    counts.insert(
        ModelKind::Stock,
        stock::Entity::find().count(db).await.expect("DB error"),
    );
    counts.insert(
        ModelKind::Sale,
        sale::Entity::find().count(db).await.expect("DB error"),
    );
    counts
}

async fn assert_store_empty(db: &DatabaseConnection) {
    for (kind, count) in table_counts(db).await {
        assert_eq!(count, 0, "{} table should be empty", kind);
    }
}

#[tokio::test]
async fn test_sample_fixture_row_counts_match_records() {
    let db = setup_test_db().await;
    let path = sample_fixture_path();

    let summary = services::load_fixture_file(&db, &path)
        .await
        .expect("Sample fixture should load");

    let content = std::fs::read_to_string(&path).expect("Failed to read fixture");
    let records = import::parse_fixture(&content).expect("Failed to parse fixture");
    let mut expected: HashMap<ModelKind, u64> = HashMap::new();
    for record in &records {
        let kind: ModelKind = record.model.parse().expect("Unknown model in sample");
        *expected.entry(kind).or_insert(0) += 1;
    }

    let counts = table_counts(&db).await;
    for kind in ModelKind::ALL {
        assert_eq!(
            counts[&kind],
            expected.get(&kind).copied().unwrap_or(0),
            "row count for {}",
            kind
        );
        assert_eq!(summary.count(kind) as u64, counts[&kind]);
    }

    assert_eq!(summary.total(), records.len());
    assert_eq!(counts[&ModelKind::Publisher], 4);
    assert_eq!(counts[&ModelKind::Sale], 6);
}

#[tokio::test]
async fn test_loaded_values_match_fixture() {
    let db = setup_test_db().await;
    services::load_fixture_file(&db, &sample_fixture_path())
        .await
        .expect("Sample fixture should load");

    let sale = sale::Entity::find_by_id(1)
        .one(&db)
        .await
        .expect("DB error")
        .expect("Sale 1 should exist");

    assert_eq!(sale.price, 50.05);
    assert_eq!(sale.count, 16);
    assert_eq!(sale.stock_id, 1);
    assert_eq!(sale.date_sale.to_string(), "2018-10-25 09:45:24.552");

    let book = book::Entity::find_by_id(6)
        .one(&db)
        .await
        .expect("DB error")
        .expect("Book 6 should exist");
    assert_eq!(book.publisher_id, 3);
}

#[tokio::test]
async fn test_unknown_model_commits_nothing() {
    let db = setup_test_db().await;

    let err = services::load_fixture(
        &db,
        r#"[
            {"model": "publisher", "pk": 1, "fields": {"name": "Pearson"}},
            {"model": "shop", "pk": 1, "fields": {"name": "OZON"}},
            {"model": "author", "pk": 1, "fields": {"name": "Andrew Tanenbaum"}}
        ]"#,
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, DomainError::MalformedFixture(ref message) if message.contains("author")),
        "unexpected error {:?}",
        err
    );
    assert_store_empty(&db).await;
}

#[tokio::test]
async fn test_missing_attribute_commits_nothing() {
    let db = setup_test_db().await;

    let err = services::load_fixture(
        &db,
        r#"[
            {"model": "publisher", "pk": 1, "fields": {"name": "Pearson"}},
            {"model": "book", "pk": 1, "fields": {"title": "Modern Operating Systems"}}
        ]"#,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DomainError::MalformedFixture(_)));
    assert_store_empty(&db).await;
}

#[tokio::test]
async fn test_forward_reference_is_referential_violation() {
    let db = setup_test_db().await;

    let err = services::load_fixture(
        &db,
        r#"[
            {"model": "shop", "pk": 1, "fields": {"name": "OZON"}},
            {"model": "book", "pk": 1, "fields": {"title": "Modern Operating Systems", "id_publisher": 2}},
            {"model": "publisher", "pk": 2, "fields": {"name": "Pearson"}}
        ]"#,
    )
    .await
    .unwrap_err();

    match err {
        DomainError::ReferentialViolation { model, pk, .. } => {
            assert_eq!(model, "book");
            assert_eq!(pk, 1);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_store_empty(&db).await;
}

#[tokio::test]
async fn test_duplicate_name_is_unique_violation() {
    let db = setup_test_db().await;

    let err = services::load_fixture(
        &db,
        r#"[
            {"model": "shop", "pk": 1, "fields": {"name": "OZON"}},
            {"model": "shop", "pk": 2, "fields": {"name": "OZON"}}
        ]"#,
    )
    .await
    .unwrap_err();

    match err {
        DomainError::UniqueViolation { model, pk, .. } => {
            assert_eq!(model, "shop");
            assert_eq!(pk, 2);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_store_empty(&db).await;
}

#[tokio::test]
async fn test_failed_load_keeps_earlier_batches() {
    let db = setup_test_db().await;

    services::load_fixture(
        &db,
        r#"[{"model": "publisher", "pk": 1, "fields": {"name": "Pearson"}}]"#,
    )
    .await
    .expect("First batch should load");

    let result = services::load_fixture(
        &db,
        r#"[
            {"model": "publisher", "pk": 2, "fields": {"name": "Microsoft Press"}},
            {"model": "magazine", "pk": 1, "fields": {}}
        ]"#,
    )
    .await;
    assert!(result.is_err());

    let publishers = publisher::Entity::find().all(&db).await.expect("DB error");
    assert_eq!(publishers.len(), 1);
    assert_eq!(publishers[0].name, "Pearson");
}

#[tokio::test]
async fn test_load_from_file_and_reset() {
    let db = setup_test_db().await;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"[
            {{"model": "publisher", "pk": 7, "fields": {{"name": "No starch press"}}}},
            {{"model": "shop", "pk": 3, "fields": {{"name": "Amazon"}}}}
        ]"#
    )
    .expect("Failed to write fixture");

    let summary = services::load_fixture_file(&db, file.path())
        .await
        .expect("Fixture file should load");
    assert_eq!(summary.publishers, 1);
    assert_eq!(summary.shops, 1);

    db::reset_schema(&db).await.expect("Reset failed");
    assert_store_empty(&db).await;

    // Same ids load again after the reset
    services::load_fixture_file(&db, file.path())
        .await
        .expect("Fixture should load after reset");
}
