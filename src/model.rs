use serde::{Deserialize, Serialize};

/// Item tallies across the whole journal root, reported by the
/// active-file operations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counts {
    pub current: usize,
    pub total: usize,
    pub files: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

/// Authoritative reply for any per-date mutation: the full item list
/// for that date after the change was applied.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayItems {
    pub date: String,
    pub items: Vec<String>,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActiveFile {
    pub filename: String,
    pub text: String,
    pub counts: Counts,
}

/// Reply for the archive/restore-in-document operations: the rewritten
/// file text plus refreshed tallies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveResult {
    pub text: String,
    pub counts: Counts,
}

#[derive(thiserror::Error, Debug)]
pub enum JournalError {
    #[error("could not load journal for {0}")]
    LoadFailed(String),
    #[error("could not save journal for {0}")]
    SaveFailed(String),
    #[error("could not delete item {index} for {date}")]
    DeleteFailed { date: String, index: usize },
    #[error("item {index} no longer exists for {date}")]
    IndexOutOfRange { date: String, index: usize },
    #[error("could not copy to clipboard")]
    CopyFailed,
    #[error("could not read clipboard")]
    PasteFailed,
}
