//! Output adapter: renders entry sequences as JSON, Markdown, or a
//! file-per-entry fanout (spec.md §4.6).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::entry::{self, Entry};
use crate::errors::LedgerError;
use crate::paths::short_sha;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const OWNER_RW: u32 = 0o600;

/// Encodes `entries` as a single JSON array, preserving each entry's
/// canonical field order. Matches `serde_json`'s own `[]` for an empty
/// slice.
pub fn to_json_array(entries: &[Entry]) -> Result<Vec<u8>, LedgerError> {
    Ok(serde_json::to_vec_pretty(entries)?)
}

/// Renders `entries` as a single Markdown document: one YAML-frontmatter
/// block plus What/Why/How paragraphs and an Evidence section per entry.
pub fn to_markdown(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        write_markdown_entry(&mut out, entry);
    }
    out
}

/// Writes one file per entry under `dir`: `<id>.json` and `<id>.md`, both
/// created with owner-only read/write permissions where the platform
/// honors them.
pub fn write_fanout(dir: &Path, entries: &[Entry]) -> Result<(), LedgerError> {
    fs::create_dir_all(dir)?;
    for entry in entries {
        let json_path = dir.join(format!("{}.json", entry.id));
        let json_bytes = entry::encode(entry)?;
        fs::write(&json_path, &json_bytes)?;
        restrict_to_owner(&json_path)?;

        let mut markdown = String::new();
        write_markdown_entry(&mut markdown, entry);
        let md_path = dir.join(format!("{}.md", entry.id));
        fs::write(&md_path, markdown.as_bytes())?;
        restrict_to_owner(&md_path)?;
    }
    Ok(())
}

fn write_markdown_entry(out: &mut String, entry: &Entry) {
    let date = entry.created_at.format("%Y-%m-%d");
    let anchor = &entry.workset.anchor_commit[..entry.workset.anchor_commit.len().min(12)];

    let _ = writeln!(out, "---");
    let _ = writeln!(out, "schema: ledger.export/v1");
    let _ = writeln!(out, "id: {}", entry.id);
    let _ = writeln!(out, "date: {date}");
    let _ = writeln!(out, "anchor_commit: {anchor}");
    let _ = writeln!(out, "commit_count: {}", entry.workset.commits.len());
    if !entry.tags.is_empty() {
        let _ = writeln!(out, "tags: [{}]", entry.tags.join(", "));
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "# {}", entry.summary.what);
    let _ = writeln!(out);
    let _ = writeln!(out, "**What:** {}", entry.summary.what);
    let _ = writeln!(out, "**Why:** {}", entry.summary.why);
    let _ = writeln!(out, "**How:** {}", entry.summary.how);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Evidence");
    let range = entry
        .workset
        .range
        .clone()
        .or_else(|| display_commit_range(&entry.workset.commits))
        .unwrap_or_default();
    if range.is_empty() {
        let _ = writeln!(out, "{} commit(s)", entry.workset.commits.len());
    } else {
        let _ = writeln!(out, "{} commit(s), {range}", entry.workset.commits.len());
    }
    if let Some(diffstat) = &entry.workset.diffstat {
        let _ = writeln!(
            out,
            "Files changed: {} (+{}/-{})",
            diffstat.files, diffstat.insertions, diffstat.deletions
        );
    }
    let _ = writeln!(out);
}

/// Display-only range fallback used when an entry carries no
/// `workset.range`: `short(first)..short(last)`. Distinct from the storage
/// convention for `workset.range` itself (`short(last)..short(first)`,
/// see [`crate::paths::commit_range`]) — this one is purely for rendering.
fn display_commit_range(commits: &[String]) -> Option<String> {
    let first = commits.first()?;
    let last = commits.last()?;
    Some(format!("{}..{}", short_sha(first), short_sha(last)))
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<(), LedgerError> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(OWNER_RW);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> Result<(), LedgerError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Diffstat, Entry, Summary};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_entry() -> Entry {
        let mut entry = Entry::new(
            "8f2c1a9abcdef012",
            vec!["8f2c1a9abcdef012".to_string(), "deadbeefcafe".to_string()],
            Utc.with_ymd_and_hms(2026, 1, 15, 15, 4, 5).unwrap(),
            Summary {
                what: "added retries".to_string(),
                why: "flaky network calls".to_string(),
                how: "wrapped the client".to_string(),
            },
        );
        entry.tags = vec!["reliability".to_string()];
        entry.workset.diffstat = Some(Diffstat {
            files: 3,
            insertions: 42,
            deletions: 7,
        });
        entry
    }

    #[test]
    fn json_array_round_trips_through_serde() {
        let entries = vec![sample_entry()];
        let bytes = to_json_array(&entries).unwrap();
        let decoded: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0]["id"], entries[0].id);
    }

    #[test]
    fn json_array_of_empty_slice_is_empty_array() {
        let bytes = to_json_array(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[]");
    }

    #[test]
    fn markdown_contains_frontmatter_and_evidence() {
        let markdown = to_markdown(&[sample_entry()]);
        assert!(markdown.contains("schema: ledger.export/v1"));
        assert!(markdown.contains("anchor_commit: 8f2c1a9abcde"));
        assert!(markdown.contains("tags: [reliability]"));
        assert!(markdown.contains("# added retries"));
        assert!(markdown.contains("**Why:** flaky network calls"));
        assert!(markdown.contains("Files changed: 3 (+42/-7)"));
    }

    #[test]
    fn markdown_omits_tags_key_when_empty() {
        let mut entry = sample_entry();
        entry.tags.clear();
        let markdown = to_markdown(&[entry]);
        assert!(!markdown.contains("tags:"));
    }

    #[test]
    fn write_fanout_creates_one_json_and_md_per_entry() {
        let temp = TempDir::new().unwrap();
        let entries = vec![sample_entry()];
        write_fanout(temp.path(), &entries).unwrap();

        let json_path = temp.path().join(format!("{}.json", entries[0].id));
        let md_path = temp.path().join(format!("{}.md", entries[0].id));
        assert!(json_path.exists());
        assert!(md_path.exists());

        #[cfg(unix)]
        {
            let mode = fs::metadata(&json_path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, OWNER_RW);
        }
    }
}
