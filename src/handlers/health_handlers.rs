use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{database, error::ApiError, AppState};

/// Liveness plus a database ping when a pool is attached.
pub async fn health_check(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let database = match &app_state.db_pool {
        Some(pool) => match database::health_check(pool).await {
            Ok(()) => json!({ "healthy": true }),
            Err(e) => {
                tracing::error!("Database health check failed: {}", e);
                return Err(ApiError::internal("Service is unhealthy"));
            }
        },
        None => json!({ "healthy": true, "message": "no database attached" }),
    };

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": { "database": database },
    })))
}
