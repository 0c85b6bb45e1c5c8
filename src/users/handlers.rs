use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::error;

use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UserCountResponse {
    pub count: i64,
}

pub async fn users_count(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let timeout = state.config.database.query_timeout();
    let count = tokio::time::timeout(timeout, state.users.count_users())
        .await
        .unwrap_or(Err(DatabaseError::Timeout(timeout)))
        .map_err(|e| {
            error!("Counting users failed: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(UserCountResponse { count }))
}
