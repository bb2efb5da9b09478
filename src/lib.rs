#![doc(test(attr(deny(warnings))))]

//! Devlog Core: the append-only, per-repository development ledger. Entries
//! are "what/why/how" records anchored to VCS commits, stored one file per
//! entry under a date-partitioned ledger root so independent branches can
//! create and merge entries without coordination.
//!
//! This crate is the LEDGER CORE only: the entry schema, the on-disk file
//! store, the pending-commits computation against a VCS adapter contract,
//! the query/filter engine, and the output adapter. The command-line
//! surface, terminal styling, and the concrete VCS subprocess
//! implementation are external collaborators that consume these types.

pub mod entry;
pub mod errors;
pub mod ledger;
pub mod output;
pub mod paths;
pub mod query;
pub mod store;
pub mod vcs;

pub use entry::{Diffstat, Entry, Summary, WorkItem, Workset};
pub use errors::LedgerError;
pub use ledger::{LedgerService, PendingCommits};
pub use store::{FileStore, ListStats};
pub use vcs::{CommitRecord, FileList, VcsAdapter, VcsError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with a default directive scoped to this
/// crate, matching the teacher crate's one-shot `init()` convention.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("devlog_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("devlog_core tracing initialized");
    });
}
