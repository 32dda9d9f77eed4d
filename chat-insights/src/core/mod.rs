//! Error type and logging setup shared by every entry point.

pub mod error;
pub mod logger;

pub use error::{InsightsError, Result};
pub use logger::init_tracing;
