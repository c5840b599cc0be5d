//! Domain layer - Pure business abstractions
//!
//! Report types, the repository contract and domain error types.

pub mod errors;
pub mod report;
pub mod repositories;

pub use errors::DomainError;
pub use report::*;
pub use repositories::*;
