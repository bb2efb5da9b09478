//! File store: owns the ledger-root directory and the atomic
//! write-stage-commit protocol (spec.md §4.2).

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entry::{self, Entry};
use crate::errors::LedgerError;
use crate::paths;
use crate::vcs::VcsAdapter;

const TMP_PREFIX: &str = ".tmp-";

/// Counters returned by [`FileStore::list_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListStats {
    pub total: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub not_ours: usize,
    pub parse_errors: usize,
}

/// Owns `<root>` and delegates staging/committing to a [`VcsAdapter`].
pub struct FileStore {
    root: PathBuf,
    vcs: Arc<dyn VcsAdapter>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, vcs: Arc<dyn VcsAdapter>) -> Self {
        Self {
            root: root.into(),
            vcs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for `id`, per the date-partitioned layout of spec.md I4.
    pub fn path_for(&self, id: &str) -> PathBuf {
        paths::entry_path(&self.root, id)
    }

    pub fn dir_exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Reads and decodes the entry at `id`. Distinguishes not-found from a
    /// foreign-schema file from a parse error, as spec.md §4.2 requires.
    pub fn read(&self, id: &str) -> Result<Entry, LedgerError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(LedgerError::NotFound { id: id.to_string() });
        }
        let bytes = fs::read(&path)?;
        entry::decode(&bytes)
    }

    /// Walks `<root>` recursively, parsing every `.json` file. Parse errors
    /// and not-our-record files are skipped silently; order is unspecified.
    pub fn list(&self) -> Result<Vec<Entry>, LedgerError> {
        let (entries, _) = self.list_with_stats()?;
        Ok(entries)
    }

    /// Like [`FileStore::list`] but also reports exact counters: total
    /// `.json` files visited, how many parsed, and a breakdown of why the
    /// rest were skipped. An absent root is not an error — it returns an
    /// empty listing with zeroed stats.
    pub fn list_with_stats(&self) -> Result<(Vec<Entry>, ListStats), LedgerError> {
        let mut stats = ListStats::default();
        if !self.root.is_dir() {
            return Ok((Vec::new(), stats));
        }

        let mut entries = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let read_dir = match fs::read_dir(&dir) {
                Ok(read_dir) => read_dir,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), %err, "failed to read directory during scan");
                    continue;
                }
            };
            for item in read_dir {
                let item = match item {
                    Ok(item) => item,
                    Err(err) => {
                        tracing::warn!(%err, "failed to read directory entry during scan");
                        continue;
                    }
                };
                let path = item.path();
                if path.is_dir() {
                    stack.push(path);
                    continue;
                }
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                stats.total += 1;
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(_) => {
                        stats.parse_errors += 1;
                        stats.skipped += 1;
                        continue;
                    }
                };
                match entry::decode(&bytes) {
                    Ok(entry) => {
                        stats.parsed += 1;
                        entries.push(entry);
                    }
                    Err(LedgerError::NotOurRecord) => {
                        stats.not_ours += 1;
                        stats.skipped += 1;
                    }
                    Err(_) => {
                        stats.parse_errors += 1;
                        stats.skipped += 1;
                    }
                }
            }
        }
        Ok((entries, stats))
    }

    /// Validates, atomically persists, and commits `entry`.
    ///
    /// Order: validate -> mkdir -> conflict check -> serialize -> write temp
    /// -> rename -> stage -> commit. The rename is the linearization point
    /// for on-disk visibility; the VCS commit is the linearization point for
    /// VCS visibility. If commit fails after rename, the entry is left on
    /// disk and the error surfaces to the caller (spec.md §7).
    pub fn write(&self, entry: &Entry, force: bool) -> Result<(), LedgerError> {
        entry::validate(entry).map_err(|missing| LedgerError::Validation { missing })?;
        entry::validate_work_items(entry)?;

        let path = self.path_for(&entry.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !force && path.exists() {
            return Err(LedgerError::Conflict {
                id: entry.id.clone(),
            });
        }

        let bytes = entry::encode(entry)?;
        let tmp = tmp_path(&path);
        if let Err(err) = write_atomic(&tmp, &bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        tracing::debug!(id = %entry.id, path = %path.display(), "entry written");

        self.vcs.stage_path(&path)?;
        self.vcs
            .commit_path(&path, &format!("ledger: document {}", entry.id))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("entry.json");
    path.with_file_name(format!("{TMP_PREFIX}{file_name}"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LedgerError> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}
