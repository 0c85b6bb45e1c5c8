use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::search::categories::CategoryRegistry;
use crate::search::engine::{QueryEngine, ScoredPoi, SearchQuery};
use crate::spatial::wgs84_point;

/// Body of `POST /search`.
///
/// Integers are signed so that negative values are reported as validation
/// failures with a readable message.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: Option<String>,
    pub categories: Vec<String>,
    pub radius_m: i64,
    pub center_lat: f64,
    pub center_lon: f64,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub center: Center,
    pub pois: Vec<ScoredPoi>,
    pub total_all: usize,
}

/// Turns wire requests into engine queries and engine results into the
/// response shape.
pub struct SearchService {
    engine: QueryEngine,
}

impl SearchService {
    pub fn new(engine: QueryEngine) -> Self {
        Self { engine }
    }

    pub fn categories(&self) -> &CategoryRegistry {
        self.engine.categories()
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, AppError> {
        let label = request
            .q
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let query = self.build_query(request, &label)?;

        let result = self.engine.search(&query).await?;

        Ok(SearchResponse {
            center: Center {
                lat: query.center.y(),
                lon: query.center.x(),
                label,
            },
            pois: result.pois,
            total_all: result.total_all,
        })
    }

    fn build_query(&self, request: &SearchRequest, label: &str) -> Result<SearchQuery, AppError> {
        let config = self.engine.config();
        let center = wgs84_point(request.center_lat, request.center_lon)?;

        let radius_m = u32::try_from(request.radius_m)
            .ok()
            .filter(|radius| (1..=config.max_radius_m).contains(radius))
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "radius_m must be between 1 and {}, got {}",
                    config.max_radius_m, request.radius_m
                ))
            })?;

        let categories = self.categories().resolve_all(&request.categories)?;

        let limit = match request.limit {
            None => config.default_limit,
            Some(limit) => usize::try_from(limit)
                .ok()
                .filter(|limit| (1..=config.max_limit).contains(limit))
                .ok_or_else(|| {
                    AppError::ValidationError(format!(
                        "limit must be between 1 and {}, got {}",
                        config.max_limit, limit
                    ))
                })?,
        };

        let offset = match request.offset {
            None => 0,
            Some(offset) => usize::try_from(offset).map_err(|_| {
                AppError::ValidationError(format!("offset must not be negative, got {offset}"))
            })?,
        };

        let query_text = (!label.is_empty()).then(|| label.to_lowercase());

        Ok(SearchQuery {
            center,
            radius_m,
            categories,
            query_text,
            limit,
            offset,
        })
    }
}
