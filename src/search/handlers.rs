use actix_web::{web, HttpRequest, HttpResponse};
use actix_web::error::JsonPayloadError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::search::service::SearchRequest;
use crate::AppState;

#[instrument(
    skip(req, state),
    fields(
        request_id = %Uuid::new_v4(),
        radius_m = req.radius_m,
        categories = ?req.categories,
    )
)]
pub async fn search(
    req: web::Json<SearchRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match state.search.search(&req).await {
        Ok(response) => {
            info!(total_all = response.total_all, returned = response.pois.len(), "Search served");
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            warn!(error_kind = e.kind(), "Search failed: {}", e);
            Err(e)
        }
    }
}

pub async fn list_categories(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "categories": state.search.categories().all(),
    }))
}

/// Report malformed or incomplete JSON bodies in the standard error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        warn!("Rejected request body: {}", err);
        AppError::ValidationError(err.to_string()).into()
    })
}
