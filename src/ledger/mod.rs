//! Ledger service: composes the file store and the VCS adapter
//! (spec.md §4.4). This is the layer callers actually talk to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entry::{Diffstat, Entry};
use crate::errors::LedgerError;
use crate::query;
use crate::store::FileStore;
use crate::vcs::{CommitRecord, FileList, VcsAdapter, VcsError};

/// Result of [`LedgerService::pending_commits`]: the commits not yet
/// documented, the latest entry (if any), and an advisory warning when the
/// latest entry's anchor is no longer reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommits {
    pub commits: Vec<CommitRecord>,
    pub latest: Option<Entry>,
    pub stale_anchor_warning: bool,
}

pub struct LedgerService {
    store: FileStore,
    vcs: Arc<dyn VcsAdapter>,
    /// Repository-relative path of the ledger root (e.g. `devlog`), used to
    /// recognize ledger-only commits in [`LedgerService::filter_ledger_only`].
    /// Kept separate from the file store's filesystem root, which is an
    /// absolute path with no notion of "relative to the repository".
    ledger_root_relative: PathBuf,
}

impl LedgerService {
    /// `fs_root` is where entry files actually live on disk. `ledger_root_relative`
    /// is that same directory's path as it appears in `commit_files()` output
    /// (repository-relative) — used only to recognize ledger-only commits.
    pub fn new(
        fs_root: impl Into<PathBuf>,
        ledger_root_relative: impl Into<PathBuf>,
        vcs: Arc<dyn VcsAdapter>,
    ) -> Self {
        let store = FileStore::new(fs_root, vcs.clone());
        Self {
            store,
            vcs,
            ledger_root_relative: ledger_root_relative.into(),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Most recently created entry, or `None` for an empty ledger. Ties on
    /// `created_at` break stably in listing order.
    pub fn latest_entry(&self) -> Result<Option<Entry>, LedgerError> {
        let entries = self.store.list()?;
        Ok(entries
            .into_iter()
            .fold(None::<Entry>, |best, candidate| match best {
                Some(best) if best.created_at >= candidate.created_at => Some(best),
                _ => Some(candidate),
            }))
    }

    /// Up to `n` entries sorted newest-first. The direct path for "last N"
    /// requests with no other filters, per spec.md §4.5.
    pub fn last_n(&self, n: usize) -> Result<Vec<Entry>, LedgerError> {
        let entries = self.store.list()?;
        let sorted = query::sort_by_created_at_desc(entries);
        Ok(query::top_n(sorted, n))
    }

    pub fn entry_by_id(&self, id: &str) -> Result<Entry, LedgerError> {
        self.store.read(id)
    }

    /// Writes a new entry (force=false: the entry must not already exist).
    pub fn write(&self, entry: &Entry) -> Result<(), LedgerError> {
        self.store.write(entry, false)
    }

    /// Amends an existing entry in place. The id must already be present on
    /// disk — per spec.md §9, amend must never silently create a new id.
    pub fn amend(&self, entry: &Entry) -> Result<(), LedgerError> {
        if !self.store.exists(&entry.id) {
            return Err(LedgerError::NotFound {
                id: entry.id.clone(),
            });
        }
        self.store.write(entry, true)
    }

    /// Commits reachable from HEAD that no entry's workset documents yet.
    ///
    /// Algorithm (spec.md §4.4):
    /// 1. resolve HEAD;
    /// 2. if there's no latest entry, every commit reachable from HEAD is
    ///    pending;
    /// 3. otherwise `log(latest.anchor, HEAD)`;
    /// 4. if the anchor is no longer reachable (squash, rebase, gc), fall
    ///    back to `commits_reachable_from(HEAD)` and carry a stale-anchor
    ///    warning; surface the error only if the fallback also fails;
    /// 5. filter out commits whose files are entirely under the ledger root.
    pub fn pending_commits(&self) -> Result<PendingCommits, LedgerError> {
        let head = self.vcs.head()?;
        let latest = self.latest_entry()?;

        let (commits, stale_anchor_warning) = match &latest {
            None => {
                tracing::debug!("no entries yet; every commit reachable from HEAD is pending");
                (self.vcs.commits_reachable_from(&head)?, false)
            }
            Some(entry) => match self.vcs.log(&entry.workset.anchor_commit, &head) {
                Ok(commits) => (commits, false),
                Err(err) => {
                    tracing::warn!(
                        anchor = %entry.workset.anchor_commit,
                        %err,
                        "anchor unreachable; falling back to full history from HEAD"
                    );
                    (self.vcs.commits_reachable_from(&head)?, true)
                }
            },
        };

        let commits = self.filter_ledger_only(commits)?;

        Ok(PendingCommits {
            commits,
            latest,
            stale_anchor_warning,
        })
    }

    fn filter_ledger_only(
        &self,
        commits: Vec<CommitRecord>,
    ) -> Result<Vec<CommitRecord>, LedgerError> {
        let mut kept = Vec::with_capacity(commits.len());
        for commit in commits {
            match self.vcs.commit_files(&commit.sha)? {
                FileList::Unknown => kept.push(commit),
                FileList::Known(files) => {
                    let ledger_only = !files.is_empty()
                        && files
                            .iter()
                            .all(|file| self.is_under_ledger_root(file));
                    if !ledger_only {
                        kept.push(commit);
                    }
                }
            }
        }
        Ok(kept)
    }

    pub fn log_range(
        &self,
        from_exclusive: &str,
        to_inclusive: &str,
    ) -> Result<Vec<CommitRecord>, VcsError> {
        self.vcs.log(from_exclusive, to_inclusive)
    }

    pub fn diffstat(&self, from_exclusive: &str, to_inclusive: &str) -> Result<Diffstat, VcsError> {
        self.vcs.diffstat(from_exclusive, to_inclusive)
    }

    fn is_under_ledger_root(&self, path: &str) -> bool {
        Path::new(path).starts_with(&self.ledger_root_relative)
    }
}
