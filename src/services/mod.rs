//! Services Layer
//!
//! Fixture loading and sales reporting. Both take the store handle
//! explicitly; nothing here keeps global state.

pub mod fixture_service;
pub mod report_service;

pub use fixture_service::{LoadSummary, load_fixture, load_fixture_file, load_records};
pub use report_service::sales_by_publisher;
