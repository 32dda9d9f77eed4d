//! Thin axum server over [`AppComponents`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::components::AppComponents;
use crate::core::InsightsError;
use crate::insights::{group_insights, weekly_insights};
use crate::messages;
use crate::webhook::handle_webhook;

/// Error body is always `{"status": "error", "message": ...}`.
#[derive(Debug)]
pub struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({"status": "error", "message": self.1}))).into_response()
    }
}

impl From<InsightsError> for AppError {
    fn from(err: InsightsError) -> Self {
        match err {
            InsightsError::InvalidPayload(msg) => AppError(StatusCode::BAD_REQUEST, msg),
            InsightsError::NotFound(msg) => AppError(StatusCode::NOT_FOUND, msg),
            other => {
                error!(error = %other, "request failed");
                AppError(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

fn bad_request(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::BAD_REQUEST, msg.into())
}

pub fn router(components: AppComponents) -> Router {
    Router::new()
        .route("/api/webhook", post(webhook_handler))
        .route(
            "/api/groups/{group_id}/messages/{message_id}/history",
            get(history_handler),
        )
        .route(
            "/api/groups/{group_id}/messages/{message_id}/delete",
            post(delete_handler),
        )
        .route(
            "/api/groups/{group_id}/messages/bulk-delete",
            post(bulk_delete_handler),
        )
        .route("/api/analyze-message", post(analyze_handler))
        .route("/api/groups/{group_id}/insights", get(group_insights_handler))
        .route("/api/insights/weekly", get(weekly_insights_handler))
        .route("/api/ai/status", get(ai_status_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(components)
}

/// Binds and serves until the process is stopped.
pub async fn serve(components: AppComponents, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(bind_addr = %bind_addr, "Listening");
    axum::serve(listener, router(components)).await?;
    Ok(())
}

/// The body is taken as text so malformed JSON gets the same error shape as other input errors.
async fn webhook_handler(
    State(components): State<AppComponents>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let response = handle_webhook(&components, &body).await?;
    Ok(Json(json!(response)))
}

async fn history_handler(
    State(components): State<AppComponents>,
    Path((group_id, message_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    let history = messages::message_history(&components.store, group_id, message_id).await?;
    let entries: Vec<Value> = history
        .iter()
        .map(|h| {
            json!({
                "id": h.id,
                "old_text": h.old_text,
                "new_text": h.new_text,
                "edited_at": h.edited_at,
                "edit_metadata": h.metadata.0,
            })
        })
        .collect();
    Ok(Json(json!({
        "status": "success",
        "message_id": message_id,
        "count": entries.len(),
        "history": entries,
    })))
}

async fn delete_handler(
    State(components): State<AppComponents>,
    Path((group_id, message_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    messages::mark_deleted(&components.store, group_id, message_id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Message marked as deleted",
    })))
}

#[derive(Debug, Deserialize)]
struct BulkDeleteRequest {
    #[serde(default)]
    message_ids: Vec<i64>,
}

async fn bulk_delete_handler(
    State(components): State<AppComponents>,
    Path(group_id): Path<i64>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let request: BulkDeleteRequest =
        serde_json::from_str(&body).map_err(|e| bad_request(format!("malformed JSON: {e}")))?;
    let count =
        messages::bulk_mark_deleted(&components.store, group_id, &request.message_ids).await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("{count} messages marked as deleted"),
        "count": count,
    })))
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    text: Option<String>,
}

async fn analyze_handler(
    State(components): State<AppComponents>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let request: AnalyzeRequest =
        serde_json::from_str(&body).map_err(|e| bad_request(format!("malformed JSON: {e}")))?;
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| bad_request("text required"))?;
    let analysis = components.ai.analyze_comprehensive(&text).await;
    Ok(Json(json!({
        "text": text,
        "sentiment": analysis.sentiment,
        "intent": analysis.intent,
        "topics": analysis.topics,
        "urgency": analysis.urgency,
        "ai_available": components.ai.is_available(),
    })))
}

async fn group_insights_handler(
    State(components): State<AppComponents>,
    Path(group_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let insights = group_insights(&components.store, &components.ai, group_id).await?;
    Ok(Json(json!(insights)))
}

async fn weekly_insights_handler(
    State(components): State<AppComponents>,
) -> Result<Json<Value>, AppError> {
    let insights = weekly_insights(&components.store, &components.ai, Utc::now()).await?;
    Ok(Json(json!(insights)))
}

async fn ai_status_handler(State(components): State<AppComponents>) -> Json<Value> {
    Json(json!(components.ai.api_status()))
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
