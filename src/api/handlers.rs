use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::models::{GenerateRequest, GenerateResponse, HealthResponse, ModelInfoResponse};
use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Hugging Face LLM API" }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running successfully".to_string(),
    })
}

pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model: state.client.model_name().to_string(),
        description: "Current model used for text generation".to_string(),
    })
}

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    tracing::info!("Received prompt: {}", payload.text);

    let generated_text = state
        .client
        .generate(
            &payload.text,
            payload.max_tokens,
            payload.temperature,
            payload.top_p,
        )
        .await
        .map_err(|e| {
            tracing::error!("Hugging Face API error: {}", e);
            e
        })?;

    tracing::info!("Text generation completed successfully");

    Ok(Json(GenerateResponse {
        generated_text,
        model: state.client.model_name().to_string(),
        prompt: payload.text,
    }))
}
