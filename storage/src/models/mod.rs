//! Row models and write inputs.

mod analysis_record;
mod group_record;
mod history_record;
mod media_kind;
mod message_digest;
mod message_record;
mod user_record;

pub use analysis_record::{AnalysisRecord, NewAnalysis};
pub use group_record::{GroupRecord, GroupUpsert};
pub use history_record::HistoryRecord;
pub use media_kind::MediaKind;
pub use message_digest::{MessageDigest, WindowCounts};
pub use message_record::{MessageRecord, MessageUpsert};
pub use user_record::{UserRecord, UserUpsert};
