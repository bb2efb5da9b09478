//! The VCS adapter contract (spec.md §4.3).
//!
//! The core never shells out to a version-control tool itself — it consumes
//! this capability set. Concrete adapters (subprocess `git`, libgit2, or an
//! in-memory double for tests) live outside this crate; only the trait and
//! its supporting types live here.

use thiserror::Error;

use crate::entry::Diffstat;

/// A single commit as the VCS adapter reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub short_sha: String,
    pub subject: String,
    pub body: String,
    pub author: String,
    pub author_email: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Whether a commit's touched files are known. `commit_files` reports
/// `Unknown` when the adapter cannot determine the file list (e.g. a
/// truncated history view); the ledger service treats `Unknown` as "keep
/// this commit, don't filter it out" per spec.md §4.4 step 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileList {
    Known(Vec<String>),
    Unknown,
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("system error talking to the VCS: {0}")]
    System(String),
    #[error("{0}")]
    User(String),
}

/// Capability set the ledger core consumes. Implementations are external;
/// this crate never imports a concrete subprocess runner.
pub trait VcsAdapter: Send + Sync {
    /// Resolves the current HEAD commit SHA.
    fn head(&self) -> Result<String, VcsError>;

    /// Commits strictly after `from_exclusive` up to and including
    /// `to_inclusive`. An empty `from_exclusive` means "since the beginning
    /// of history".
    fn log(
        &self,
        from_exclusive: &str,
        to_inclusive: &str,
    ) -> Result<Vec<CommitRecord>, VcsError>;

    /// All commits reachable from `reference`, most-recent-first.
    fn commits_reachable_from(&self, reference: &str) -> Result<Vec<CommitRecord>, VcsError>;

    /// Aggregate diff statistics over `from_exclusive..to_inclusive`. When
    /// `from_exclusive` is empty or unresolvable, the adapter substitutes
    /// the empty-tree sentinel so a root commit still yields a sensible
    /// diffstat.
    fn diffstat(&self, from_exclusive: &str, to_inclusive: &str) -> Result<Diffstat, VcsError>;

    /// Repository-relative paths touched by `sha`, or `Unknown` if the
    /// adapter cannot determine them.
    fn commit_files(&self, sha: &str) -> Result<FileList, VcsError>;

    /// Stages `path` for the next commit.
    fn stage_path(&self, path: &std::path::Path) -> Result<(), VcsError>;

    /// Commits exactly `path` (pathspec-scoped) with `message`.
    fn commit_path(&self, path: &std::path::Path, message: &str) -> Result<(), VcsError>;
}
