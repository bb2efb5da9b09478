//! Id/path utilities: date-partition derivation from an entry id, short SHA
//! formatting, and commit-range display strings (spec.md §2, §4.6).

use std::path::{Path, PathBuf};

const SHORT_SHA_LEN: usize = 7;

/// Splits an id of the form `<prefix>_<rfc3339>_<short>` into the date
/// portion (`YYYY-MM-DD`) used to compute its partition directory. Returns
/// `None` for malformed ids, in which case callers fall back to a
/// root-relative path per spec.md I4.
pub fn date_partition(id: &str) -> Option<(&str, &str, &str)> {
    let rest = id.split_once('_').map(|(_, rest)| rest)?;
    let timestamp = rest.split_once('_').map(|(ts, _)| ts)?;
    if timestamp.len() < 10 {
        return None;
    }
    let year = &timestamp[0..4];
    let month = &timestamp[5..7];
    let day = &timestamp[8..10];
    if timestamp.as_bytes().get(4) != Some(&b'-') || timestamp.as_bytes().get(7) != Some(&b'-') {
        return None;
    }
    Some((year, month, day))
}

/// Computes `<root>/YYYY/MM/DD/<id>.json`, falling back to `<root>/<id>.json`
/// when the id doesn't parse into a date partition.
pub fn entry_path(root: &Path, id: &str) -> PathBuf {
    match date_partition(id) {
        Some((year, month, day)) => root.join(year).join(month).join(day).join(format!("{id}.json")),
        None => root.join(format!("{id}.json")),
    }
}

/// First `SHORT_SHA_LEN` characters of a SHA, or the whole thing if shorter.
pub fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(SHORT_SHA_LEN)]
}

/// Storage form of a commit range: `short(last)..short(first)`, matching
/// `workset.range`'s convention. `commits` is expected oldest-last (anchor
/// first), the same ordering `workset.commits` uses.
pub fn commit_range(commits: &[String]) -> Option<String> {
    let first = commits.first()?;
    let last = commits.last()?;
    Some(format!("{}..{}", short_sha(last), short_sha(first)))
}
