use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// A located, categorized place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: i64,
    /// Canonical category tag, e.g. `"cafe"`.
    pub category: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl PointOfInterest {
    pub fn new(id: i64, category: &str, name: &str, lat: f64, lon: f64) -> Self {
        Self {
            id,
            category: category.to_string(),
            name: name.to_string(),
            lat,
            lon,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Location as a `geo` coordinate (`x = lon`, `y = lat`).
    pub fn location(&self) -> Coord<f64> {
        Coord { x: self.lon, y: self.lat }
    }
}

/// Row shape of the `poi` table.
#[derive(Debug, Clone, FromRow)]
pub struct PoiRow {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub metadata: Option<Json<Map<String, Value>>>,
}

impl From<PoiRow> for PointOfInterest {
    fn from(row: PoiRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            name: row.name,
            lat: row.lat,
            lon: row.lon,
            metadata: row.metadata.map(|Json(map)| map).unwrap_or_default(),
        }
    }
}
