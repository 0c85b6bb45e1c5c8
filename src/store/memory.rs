use async_trait::async_trait;
use geo::{Intersects, Rect};

use crate::db::PointOfInterest;
use crate::error::DatabaseError;
use crate::store::{PoiStore, UserStore};

/// Store holding its records in memory. Used by tests and local runs
/// without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pois: Vec<PointOfInterest>,
    user_count: i64,
}

impl MemoryStore {
    pub fn new(pois: Vec<PointOfInterest>) -> Self {
        Self { pois, user_count: 0 }
    }

    pub fn with_user_count(mut self, user_count: i64) -> Self {
        self.user_count = user_count;
        self
    }
}

#[async_trait]
impl PoiStore for MemoryStore {
    async fn query_by_category_and_bbox(
        &self,
        bbox: &Rect<f64>,
        categories: &[String],
    ) -> Result<Vec<PointOfInterest>, DatabaseError> {
        Ok(self
            .pois
            .iter()
            .filter(|poi| categories.contains(&poi.category))
            // `Intersects` treats boundary points as inside the rectangle.
            .filter(|poi| bbox.intersects(&poi.location()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn count_users(&self) -> Result<i64, DatabaseError> {
        Ok(self.user_count)
    }
}
