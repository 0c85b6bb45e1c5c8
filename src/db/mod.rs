//! Database module for the JARI server
//!
//! PostgreSQL connection pool and the row types read from it.

pub mod models;
pub mod operations;

pub use models::{PoiRow, PointOfInterest};
pub use operations::DbOperations;
