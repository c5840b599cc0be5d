//! Domain error types
//!
//! Every failure the loader or the reporter can surface. "No matching sales"
//! is not among them: the reporter returns an empty report for that.

use std::path::PathBuf;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Unknown `model`, missing or ill-typed attribute, or a document that is
    /// not a fixture array at all
    #[error("Malformed fixture: {0}")]
    MalformedFixture(String),

    /// A record references a row that does not exist (yet)
    #[error("{model} #{pk} references a missing row: {message}")]
    ReferentialViolation {
        model: String,
        pk: i32,
        message: String,
    },

    /// A record repeats a primary key or a unique name/title
    #[error("{model} #{pk} duplicates an existing row: {message}")]
    UniqueViolation {
        model: String,
        pk: i32,
        message: String,
    },

    #[error("Failed to read fixture {}: {source}", path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store is unreachable or misconfigured
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    /// Classify a store error raised while inserting one fixture record.
    pub fn from_insert(err: DbErr, model: &str, pk: i32) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                DomainError::ReferentialViolation {
                    model: model.to_string(),
                    pk,
                    message,
                }
            }
            Some(SqlErr::UniqueConstraintViolation(message)) => DomainError::UniqueViolation {
                model: model.to_string(),
                pk,
                message,
            },
            _ => DomainError::from(err),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e {
            DbErr::Conn(_) | DbErr::ConnectionAcquire { .. } => DomainError::Connection(e.to_string()),
            other => DomainError::Database(other.to_string()),
        }
    }
}
