//! Storage crate: SQLite persistence for the chat corpus.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Records (users, groups, messages, analyses, history) and write inputs
//! - [`user_repo`], [`group_repo`] – Entity upserts keyed on external ids
//! - [`message_repo`] – Message upsert, lookups, deletion flags, enrichment bookkeeping
//! - [`history_repo`] – Append-only edit history
//! - [`analysis_repo`] – One analysis per message
//! - [`digest_repo`] – Summary read queries
//! - [`sqlite_pool`] – SqlitePoolManager
//!
//! Query functions take any [`sqlx::SqliteExecutor`], so the same call works on the pool
//! or inside a transaction (`&mut *tx`).

mod error;
mod models;
mod schema;
mod sqlite_pool;
mod store;

pub mod analysis_repo;
pub mod digest_repo;
pub mod group_repo;
pub mod history_repo;
pub mod message_repo;
pub mod user_repo;


pub use error::StorageError;
pub use models::{
    AnalysisRecord, GroupRecord, GroupUpsert, HistoryRecord, MediaKind, MessageDigest,
    MessageRecord, MessageUpsert, NewAnalysis, UserRecord, UserUpsert, WindowCounts,
};
pub use sqlite_pool::SqlitePoolManager;
pub use store::ChatStore;
