//! Per-message analysis. One row per message, replaced on re-analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisRecord {
    pub id: String,
    pub message_id: String,
    pub topic: String,
    pub sentiment: String,
    /// In [-1.0, 1.0].
    pub sentiment_score: f64,
    pub intent: String,
    pub keywords: Json<Vec<String>>,
    pub is_question: bool,
    /// Which analyzer produced the row.
    pub analyzer: String,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub message_id: String,
    pub topic: String,
    pub sentiment: String,
    pub sentiment_score: f64,
    pub intent: String,
    pub keywords: Vec<String>,
    pub is_question: bool,
    pub analyzer: String,
}
