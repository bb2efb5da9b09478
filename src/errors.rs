use thiserror::Error;

/// Error taxonomy shared by every module in this crate.
///
/// Variants are grouped the way the design notes describe: user errors
/// (validation, not-found, conflict), system errors (I/O, JSON, the VCS
/// adapter), and `NotOurRecord`, which is not really a failure — it is a
/// sentinel propagated during decode/list so callers can skip foreign
/// files without treating them as broken ones.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// `validate()` found one or more missing required fields.
    #[error("entry is missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// No entry exists with the requested id.
    #[error("entry `{id}` not found")]
    NotFound { id: String },

    /// A write without `force` landed on an existing destination.
    #[error("entry `{id}` already exists")]
    Conflict { id: String },

    /// Valid JSON, but `schema` doesn't carry the `ledger.devlog/` prefix.
    #[error("not a devlog record")]
    NotOurRecord,

    /// Bytes handed to `decode` were not valid JSON at all.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("VCS adapter error: {0}")]
    Vcs(#[from] crate::vcs::VcsError),

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("invalid work item: {0}")]
    InvalidWorkItem(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
