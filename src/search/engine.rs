use futures::future::try_join_all;
use geo::Point;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::db::PointOfInterest;
use crate::error::{AppError, DatabaseError};
use crate::search::categories::CategoryRegistry;
use crate::spatial::{bounding_boxes, distance_m, wgs84_point};
use crate::store::PoiStore;

/// A validated proximity query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Search center, `x = longitude` and `y = latitude`.
    pub center: Point<f64>,
    pub radius_m: u32,
    /// Canonical category tags.
    pub categories: Vec<String>,
    /// Lowercase needle; `None` disables text filtering.
    pub query_text: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

/// A matching POI and its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPoi {
    #[serde(flatten)]
    pub poi: PointOfInterest,
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineResult {
    /// The requested page, nearest first.
    pub pois: Vec<ScoredPoi>,
    /// Number of matches before `offset`/`limit` were applied.
    pub total_all: usize,
}

/// Radius search over a [`PoiStore`].
///
/// Holds no mutable state; one engine serves any number of concurrent
/// searches.
pub struct QueryEngine {
    store: Arc<dyn PoiStore>,
    categories: CategoryRegistry,
    config: SearchConfig,
}

impl QueryEngine {
    pub fn new(
        store: Arc<dyn PoiStore>,
        categories: CategoryRegistry,
        config: SearchConfig,
    ) -> Self {
        Self { store, categories, config }
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<EngineResult, AppError> {
        self.validate(query)?;

        let candidates = self.fetch_candidates(query).await?;
        let result = rank(query, candidates);

        debug!(
            total_all = result.total_all,
            returned = result.pois.len(),
            "Search completed"
        );
        Ok(result)
    }

    fn validate(&self, query: &SearchQuery) -> Result<(), AppError> {
        wgs84_point(query.center.y(), query.center.x())?;

        if query.radius_m == 0 || query.radius_m > self.config.max_radius_m {
            return Err(AppError::ValidationError(format!(
                "radius_m must be between 1 and {}",
                self.config.max_radius_m
            )));
        }

        if query.categories.is_empty() {
            return Err(AppError::ValidationError(
                "categories must name at least one category".to_string(),
            ));
        }
        if let Some(unknown) = query
            .categories
            .iter()
            .find(|tag| !self.categories.is_known_tag(tag))
        {
            return Err(AppError::ValidationError(format!("unknown category: {unknown}")));
        }

        if query.limit == 0 || query.limit > self.config.max_limit {
            return Err(AppError::ValidationError(format!(
                "limit must be between 1 and {}",
                self.config.max_limit
            )));
        }

        Ok(())
    }

    /// Query the store once per bounding box, bounded by the configured
    /// timeout. Points on a shared box edge come back once.
    async fn fetch_candidates(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<PointOfInterest>, AppError> {
        let boxes = bounding_boxes(query.center, f64::from(query.radius_m));
        let lookups = boxes
            .iter()
            .map(|bbox| self.store.query_by_category_and_bbox(bbox, &query.categories));

        let timeout = self.config.query_timeout();
        let batches = tokio::time::timeout(timeout, try_join_all(lookups))
            .await
            .map_err(|_| {
                warn!(?timeout, "POI store did not answer in time");
                DatabaseError::Timeout(timeout)
            })?
            .map_err(|e| {
                warn!(error = %e, "POI store query failed");
                e
            })?;

        let mut by_id = HashMap::new();
        for poi in batches.into_iter().flatten() {
            by_id.entry(poi.id).or_insert(poi);
        }
        Ok(by_id.into_values().collect())
    }
}

/// Filter, order and paginate candidates.
fn rank(query: &SearchQuery, candidates: Vec<PointOfInterest>) -> EngineResult {
    let radius_m = f64::from(query.radius_m);

    let mut matches: Vec<ScoredPoi> = candidates
        .into_iter()
        .filter(|poi| query.categories.contains(&poi.category))
        .filter_map(|poi| {
            let distance_m = distance_m(query.center, Point::from(poi.location()));
            (distance_m <= radius_m).then_some(ScoredPoi { poi, distance_m })
        })
        .filter(|scored| match &query.query_text {
            Some(needle) => matches_text(&scored.poi, needle),
            None => true,
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.poi.id.cmp(&b.poi.id))
    });

    let total_all = matches.len();
    let pois = matches
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    EngineResult { pois, total_all }
}

/// Case-insensitive substring match on the name or any scalar inside the
/// metadata. `needle` must already be lowercase.
pub fn matches_text(poi: &PointOfInterest, needle: &str) -> bool {
    poi.name.to_lowercase().contains(needle)
        || poi.metadata.values().any(|value| value_contains(value, needle))
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| value_contains(item, needle)),
        Value::Object(map) => map.values().any(|item| value_contains(item, needle)),
        Value::Bool(_) | Value::Null => false,
    }
}
