//! Store module for the JARI server
//!
//! Read-only access to persisted points of interest and users. The search
//! engine and handlers only see these traits; `DbOperations` backs them with
//! PostgreSQL and `MemoryStore` with an in-process list.

mod memory;

use async_trait::async_trait;
use geo::Rect;

use crate::db::PointOfInterest;
use crate::error::DatabaseError;

pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiStore: Send + Sync {
    /// Return every POI whose category is one of `categories` and whose
    /// location lies inside `bbox` (edges inclusive, `x = longitude`,
    /// `y = latitude`). Order is unspecified.
    async fn query_by_category_and_bbox(
        &self,
        bbox: &Rect<f64>,
        categories: &[String],
    ) -> Result<Vec<PointOfInterest>, DatabaseError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn count_users(&self) -> Result<i64, DatabaseError>;
}
