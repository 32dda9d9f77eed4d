//! Message analyses: one row per message, replaced as a whole on re-analysis.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::models::{AnalysisRecord, NewAnalysis};
use crate::StorageError;

pub async fn upsert_analysis<'e, E>(
    executor: E,
    analysis: &NewAnalysis,
) -> Result<AnalysisRecord, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(sqlx::query_as::<_, AnalysisRecord>(
        r#"
        INSERT INTO message_analysis (
            id, message_id, topic, sentiment, sentiment_score, intent,
            keywords, is_question, analyzer, analyzed_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(message_id) DO UPDATE SET
            topic = excluded.topic,
            sentiment = excluded.sentiment,
            sentiment_score = excluded.sentiment_score,
            intent = excluded.intent,
            keywords = excluded.keywords,
            is_question = excluded.is_question,
            analyzer = excluded.analyzer,
            analyzed_at = excluded.analyzed_at
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&analysis.message_id)
    .bind(&analysis.topic)
    .bind(&analysis.sentiment)
    .bind(analysis.sentiment_score)
    .bind(&analysis.intent)
    .bind(Json(&analysis.keywords))
    .bind(analysis.is_question)
    .bind(&analysis.analyzer)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?)
}

pub async fn get_analysis<'e, E>(
    executor: E,
    message_id: &str,
) -> Result<Option<AnalysisRecord>, StorageError>
where
    E: SqliteExecutor<'e>,
{
    Ok(
        sqlx::query_as::<_, AnalysisRecord>("SELECT * FROM message_analysis WHERE message_id = ?")
            .bind(message_id)
            .fetch_optional(executor)
            .await?,
    )
}
