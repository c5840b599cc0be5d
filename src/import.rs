//! Fixture parsing
//!
//! A fixture is a JSON array of `{"model": ..., "pk": ..., "fields": {...}}`
//! objects. Parsing is split in two steps so the loader can convert records
//! one by one inside its transaction: [`parse_fixture`] only checks the
//! envelope, [`FixtureRecord::try_from`] dispatches on `model` and checks the
//! fields.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::DomainError;
use crate::models::{BookFields, PublisherFields, SaleFields, ShopFields, StockFields};

/// One fixture entry before its `fields` are interpreted
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub model: String,
    pub pk: i32,
    pub fields: Value,
}

/// The five record kinds a fixture may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Publisher,
    Shop,
    Book,
    Stock,
    Sale,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::Publisher,
        ModelKind::Shop,
        ModelKind::Book,
        ModelKind::Stock,
        ModelKind::Sale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Publisher => "publisher",
            ModelKind::Shop => "shop",
            ModelKind::Book => "book",
            ModelKind::Stock => "stock",
            ModelKind::Sale => "sale",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::MalformedFixture(format!("unknown model {:?}", s)))
    }
}

/// A fixture entry with typed fields, ready to insert
#[derive(Debug, Clone)]
pub enum FixtureRecord {
    Publisher { pk: i32, fields: PublisherFields },
    Shop { pk: i32, fields: ShopFields },
    Book { pk: i32, fields: BookFields },
    Stock { pk: i32, fields: StockFields },
    Sale { pk: i32, fields: SaleFields },
}

impl FixtureRecord {
    pub fn kind(&self) -> ModelKind {
        match self {
            FixtureRecord::Publisher { .. } => ModelKind::Publisher,
            FixtureRecord::Shop { .. } => ModelKind::Shop,
            FixtureRecord::Book { .. } => ModelKind::Book,
            FixtureRecord::Stock { .. } => ModelKind::Stock,
            FixtureRecord::Sale { .. } => ModelKind::Sale,
        }
    }

    pub fn pk(&self) -> i32 {
        match self {
            FixtureRecord::Publisher { pk, .. }
            | FixtureRecord::Shop { pk, .. }
            | FixtureRecord::Book { pk, .. }
            | FixtureRecord::Stock { pk, .. }
            | FixtureRecord::Sale { pk, .. } => *pk,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        let blank = match self {
            FixtureRecord::Publisher { fields, .. } => fields.name.trim().is_empty(),
            FixtureRecord::Shop { fields, .. } => fields.name.trim().is_empty(),
            FixtureRecord::Book { fields, .. } => fields.title.trim().is_empty(),
            FixtureRecord::Stock { .. } | FixtureRecord::Sale { .. } => false,
        };

        if blank {
            return Err(DomainError::MalformedFixture(format!(
                "{} #{} has an empty name",
                self.kind(),
                self.pk()
            )));
        }

        if let FixtureRecord::Sale { pk, fields } = self
            && fields.count <= 0
        {
            tracing::warn!("sale #{} has a non-positive count ({})", pk, fields.count);
        }

        Ok(())
    }
}

impl TryFrom<RawRecord> for FixtureRecord {
    type Error = DomainError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let kind: ModelKind = raw.model.parse()?;
        let pk = raw.pk;

        let record = match kind {
            ModelKind::Publisher => FixtureRecord::Publisher {
                pk,
                fields: typed_fields(kind, pk, raw.fields)?,
            },
            ModelKind::Shop => FixtureRecord::Shop {
                pk,
                fields: typed_fields(kind, pk, raw.fields)?,
            },
            ModelKind::Book => FixtureRecord::Book {
                pk,
                fields: typed_fields(kind, pk, raw.fields)?,
            },
            ModelKind::Stock => FixtureRecord::Stock {
                pk,
                fields: typed_fields(kind, pk, raw.fields)?,
            },
            ModelKind::Sale => FixtureRecord::Sale {
                pk,
                fields: typed_fields(kind, pk, raw.fields)?,
            },
        };

        record.validate()?;
        Ok(record)
    }
}

fn typed_fields<T: DeserializeOwned>(
    kind: ModelKind,
    pk: i32,
    fields: Value,
) -> Result<T, DomainError> {
    serde_json::from_value(fields)
        .map_err(|e| DomainError::MalformedFixture(format!("{} #{}: {}", kind, pk, e)))
}

/// Parse the fixture envelope: a JSON array of `model`/`pk`/`fields` objects.
pub fn parse_fixture(content: &str) -> Result<Vec<RawRecord>, DomainError> {
    serde_json::from_str(content).map_err(|e| DomainError::MalformedFixture(e.to_string()))
}
