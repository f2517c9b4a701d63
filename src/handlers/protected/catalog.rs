use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::catalog;
use crate::error::ApiError;

/// GET /api/models - The full model catalog.
pub async fn models() -> impl IntoResponse {
    match catalog::all_models().await {
        Ok(models) => Json(json!({
            "success": true,
            "data": { "models": models }
        })),
        Err(e) => {
            tracing::warn!("all_models failed: {}", e);
            Json(json!({
                "success": true,
                "data": { "models": [] },
                "warning": "Error communicating with database"
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub description: String,
}

/// POST /api/search - Case-insensitive description search over models.
pub async fn search(Json(payload): Json<SearchRequest>) -> Result<impl IntoResponse, ApiError> {
    let models = catalog::search_models(&payload.description).await?;

    let nothing_found = models.is_empty();
    let mut body = json!({
        "success": true,
        "data": { "models": models }
    });
    if nothing_found {
        body["warning"] = json!("No models with that keyword in description found!");
    }

    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct WeightSearchRequest {
    /// Requested weight buckets; 0 covers [0, 20], any other w covers
    /// [w, w + 19].
    pub weights: Vec<i32>,
    pub description: String,
}

/// POST /api/search/weight - Weight-bucket filter over a description
/// search. Overlapping buckets return duplicate rows; clients render the
/// concatenation as-is.
pub async fn search_weight(
    Json(payload): Json<WeightSearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.weights.is_empty() {
        return Err(ApiError::bad_request("At least one weight bucket is required"));
    }

    let models = catalog::search_models_by_weight(&payload.weights, &payload.description).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "models": models }
    })))
}
