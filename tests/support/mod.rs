use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use devlog_core::{CommitRecord, Diffstat, FileList, VcsAdapter, VcsError};

/// In-memory VCS double, as spec.md §9 prescribes: "prefer an
/// interface/trait boundary so tests can substitute an in-memory double
/// producing canned commit lists and file-lists."
#[derive(Default)]
pub struct FakeVcs {
    head: Mutex<String>,
    reachable: Mutex<Vec<CommitRecord>>,
    log_result: Mutex<Option<Result<Vec<CommitRecord>, String>>>,
    files: Mutex<HashMap<String, FileList>>,
    staged: Mutex<Vec<std::path::PathBuf>>,
    committed: Mutex<Vec<(std::path::PathBuf, String)>>,
}

impl FakeVcs {
    pub fn set_head(&self, sha: &str) {
        *self.head.lock().unwrap() = sha.to_string();
    }

    pub fn set_reachable(&self, commits: Vec<CommitRecord>) {
        *self.reachable.lock().unwrap() = commits;
    }

    pub fn set_log_ok(&self, commits: Vec<CommitRecord>) {
        *self.log_result.lock().unwrap() = Some(Ok(commits));
    }

    #[allow(dead_code)]
    pub fn set_log_err(&self, message: &str) {
        *self.log_result.lock().unwrap() = Some(Err(message.to_string()));
    }

    pub fn set_files(&self, sha: &str, files: FileList) {
        self.files.lock().unwrap().insert(sha.to_string(), files);
    }

    pub fn committed_messages(&self) -> Vec<String> {
        self.committed
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn staged_paths(&self) -> Vec<std::path::PathBuf> {
        self.staged.lock().unwrap().clone()
    }
}

pub fn commit(sha: &str, subject: &str, timestamp: DateTime<Utc>) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        short_sha: sha[..7.min(sha.len())].to_string(),
        subject: subject.to_string(),
        body: String::new(),
        author: "dev".to_string(),
        author_email: "dev@example.com".to_string(),
        timestamp,
    }
}

impl VcsAdapter for FakeVcs {
    fn head(&self) -> Result<String, VcsError> {
        Ok(self.head.lock().unwrap().clone())
    }

    fn log(&self, _from_exclusive: &str, _to_inclusive: &str) -> Result<Vec<CommitRecord>, VcsError> {
        match self.log_result.lock().unwrap().clone() {
            Some(result) => result.map_err(VcsError::System),
            None => Ok(Vec::new()),
        }
    }

    fn commits_reachable_from(&self, _reference: &str) -> Result<Vec<CommitRecord>, VcsError> {
        Ok(self.reachable.lock().unwrap().clone())
    }

    fn diffstat(&self, _from_exclusive: &str, _to_inclusive: &str) -> Result<Diffstat, VcsError> {
        Ok(Diffstat {
            files: 0,
            insertions: 0,
            deletions: 0,
        })
    }

    fn commit_files(&self, sha: &str) -> Result<FileList, VcsError> {
        Ok(self.files.lock().unwrap().get(sha).cloned().unwrap_or(FileList::Unknown))
    }

    fn stage_path(&self, path: &Path) -> Result<(), VcsError> {
        self.staged.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn commit_path(&self, path: &Path, message: &str) -> Result<(), VcsError> {
        self.committed
            .lock()
            .unwrap()
            .push((path.to_path_buf(), message.to_string()));
        Ok(())
    }
}
