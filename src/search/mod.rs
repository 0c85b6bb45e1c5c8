//! Proximity search
//!
//! Radius queries over categorized points of interest: the category
//! registry, the query engine, the request-shaping service and the HTTP
//! handlers.

pub mod categories;
pub mod engine;
pub mod handlers;
pub mod service;

pub use categories::{Category, CategoryRegistry, KNOWN_CATEGORIES};
pub use engine::{EngineResult, QueryEngine, ScoredPoi, SearchQuery};
pub use service::{Center, SearchRequest, SearchResponse, SearchService};
