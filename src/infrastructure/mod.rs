//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema bootstrap (db)
//! - Configuration loading (config)
//! - Repository implementations (repositories)

pub mod config;
pub mod db;
pub mod repositories;

pub use repositories::*;
