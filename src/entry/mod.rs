//! Entry schema: the single unit of the devlog — a "what/why/how" record
//! anchored to a run of VCS commits.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Schema tag written to every entry. Decoders accept any tag sharing this
/// prefix (forward compatible with future minor versions) and reject
/// everything else as [`LedgerError::NotOurRecord`].
pub const SCHEMA_PREFIX: &str = "ledger.devlog/";
pub const SCHEMA_CURRENT: &str = "ledger.devlog/v1";
const KIND: &str = "entry";
const ID_PREFIX: &str = "dlg";

/// A single devlog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub schema: String,
    pub kind: String,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workset: Workset,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_items: Vec<WorkItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workset {
    pub anchor_commit: String,
    pub commits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffstat: Option<Diffstat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diffstat {
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub what: String,
    pub why: String,
    pub how: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub system: String,
    pub id: String,
}

impl Entry {
    /// Builds a fully-formed entry, deriving its id from `anchor` and
    /// `created_at`. Does not validate — callers that need a guaranteed
    /// persistable entry should call [`validate`] before handing it to the
    /// file store.
    pub fn new(
        anchor_commit: impl Into<String>,
        commits: Vec<String>,
        created_at: DateTime<Utc>,
        summary: Summary,
    ) -> Self {
        let anchor_commit = anchor_commit.into();
        let id = generate_id(&anchor_commit, created_at);
        Self {
            schema: SCHEMA_CURRENT.to_string(),
            kind: KIND.to_string(),
            id,
            created_at,
            updated_at: created_at,
            workset: Workset {
                anchor_commit,
                commits,
                range: None,
                diffstat: None,
            },
            summary,
            tags: Vec::new(),
            work_items: Vec::new(),
        }
    }
}

/// Deterministic id derivation: equal `(anchor, timestamp)` always produces
/// an equal id. Form is `<prefix><rfc3339-utc-seconds>_<short-anchor>`.
pub fn generate_id(anchor: &str, timestamp: DateTime<Utc>) -> String {
    let stamp = timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
    let short = &anchor[..anchor.len().min(6)];
    format!("{ID_PREFIX}_{stamp}_{short}")
}

/// Canonical JSON encoding. Optional fields absent/empty are omitted by the
/// `serde` attributes on [`Entry`]/[`Workset`] rather than serialized as
/// `null`/`[]`.
pub fn encode(entry: &Entry) -> Result<Vec<u8>, LedgerError> {
    Ok(serde_json::to_vec_pretty(entry)?)
}

/// Decodes bytes into an [`Entry`], distinguishing invalid JSON from a
/// schema mismatch ("not our record" — propagated so directory scans can
/// skip foreign files quietly).
pub fn decode(bytes: &[u8]) -> Result<Entry, LedgerError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(LedgerError::InvalidJson)?;
    let schema = value.get("schema").and_then(|v| v.as_str());
    match schema {
        Some(schema) if schema.starts_with(SCHEMA_PREFIX) => {}
        _ => return Err(LedgerError::NotOurRecord),
    }
    let entry: Entry = serde_json::from_value(value)?;
    Ok(entry)
}

/// Validates an entry against the invariants in §3 of the spec. Returns the
/// dotted paths of whatever is missing, in the stable order the spec
/// prescribes, rather than failing on the first problem.
pub fn validate(entry: &Entry) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();

    if !entry.schema.starts_with(SCHEMA_PREFIX) {
        missing.push("schema".to_string());
    }
    if entry.kind != KIND {
        missing.push("kind".to_string());
    }
    if entry.id.is_empty() {
        missing.push("id".to_string());
    }
    if entry.created_at.timestamp() == 0 {
        missing.push("created_at".to_string());
    }
    if entry.updated_at.timestamp() == 0 {
        missing.push("updated_at".to_string());
    }
    if entry.workset.anchor_commit.is_empty() {
        missing.push("workset.anchor_commit".to_string());
    }
    if entry.workset.commits.is_empty() {
        missing.push("workset.commits".to_string());
    }
    if entry.summary.what.is_empty() {
        missing.push("summary.what".to_string());
    }
    if entry.summary.why.is_empty() {
        missing.push("summary.why".to_string());
    }
    if entry.summary.how.is_empty() {
        missing.push("summary.how".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Checks that every work item carries both sub-fields non-empty, per §3 of
/// the design notes. Kept separate from [`validate`] because it reports a
/// different error shape (`InvalidWorkItem`, not a missing-field list) —
/// callers that persist an entry should run both.
pub fn validate_work_items(entry: &Entry) -> Result<(), LedgerError> {
    for (index, item) in entry.work_items.iter().enumerate() {
        if item.system.is_empty() || item.id.is_empty() {
            return Err(LedgerError::InvalidWorkItem(format!(
                "work_items[{index}] must have both `system` and `id` non-empty"
            )));
        }
    }
    Ok(())
}
