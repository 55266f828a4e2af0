//! Watch targets, change notifications and notices

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Matches file names ending in a fixed suffix (e.g. `.mdc`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter(String);

impl SuffixFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self(suffix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the final path component of `path`
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| self.matches_name(n))
            .unwrap_or(false)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        name.len() > self.0.len() && name.ends_with(&self.0)
    }
}

/// A directory plus the filter selecting which of its files matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub dir: PathBuf,
    pub filter: SuffixFilter,
}

impl WatchTarget {
    pub fn new(dir: impl Into<PathBuf>, filter: SuffixFilter) -> Self {
        Self {
            dir: dir.into(),
            filter,
        }
    }

    /// File names directly inside `dir` that pass the filter, sorted
    pub fn matching_files(&self) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if self.filter.matches_name(&name) && entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Which rung of the strategy ladder produced the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTier {
    /// One recursive subscription for the whole tree
    Recursive,
    /// One subscription per file plus (usually) one for the directory
    PerFile,
    /// No automatic change detection
    Unavailable,
}

/// What happened to a watched file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Modified,
    Created,
    Removed,
}

/// Best-effort metadata about the changed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatReport {
    Available {
        len: u64,
        modified: Option<DateTime<Local>>,
    },
    Failed {
        reason: String,
    },
    /// Not gathered (the file is gone)
    Skipped,
}

impl StatReport {
    /// Stat `path`; failures are recorded, never raised
    pub fn collect(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => StatReport::Available {
                len: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
            },
            Err(e) => StatReport::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// A change notification for one rule file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleChange {
    /// File name, relative to the watched directory
    pub filename: String,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
    pub stat: StatReport,
}

impl RuleChange {
    pub(crate) fn observe(dir: &Path, filename: impl Into<String>, kind: ChangeKind) -> Self {
        let filename = filename.into();
        let stat = match kind {
            ChangeKind::Removed => StatReport::Skipped,
            _ => StatReport::collect(&dir.join(&filename)),
        };
        Self {
            filename,
            kind,
            timestamp: Utc::now(),
            stat,
        }
    }
}

/// Decisions and degradations worth reporting to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum WatchNotice {
    /// The recursive tier is not supported here
    RecursiveUnavailable { reason: String },
    /// The recursive tier failed for another reason
    RecursiveFailed { reason: String },
    /// Per-file tier is enumerating `count` files
    WatchingFiles { count: usize },
    /// The directory could not be listed
    ListingFailed { reason: String },
    /// Nothing matched the filter, so nothing is watched
    NoFilesToWatch { suffix: String },
    FileWatchAdded { filename: String },
    FileWatchRemoved { filename: String },
    FileWatchFailed { filename: String, reason: String },
    /// Only the files present at start are watched
    DirectoryWatchFailed { reason: String },
    /// A handle is live
    Started {
        tier: StrategyTier,
        subscriptions: usize,
        detects_new_files: bool,
    },
    /// No tier produced a subscription
    Unavailable,
    /// A subscription reported an error and no handler was registered
    SubscriptionError { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn suffix_filter_matches_extension_only() {
        let filter = SuffixFilter::new(".mdc");
        assert!(filter.matches(Path::new("rules/style.mdc")));
        assert!(!filter.matches(Path::new("rules/style.md")));
        assert!(!filter.matches(Path::new("rules/.mdc")));
        assert!(!filter.matches(Path::new("rules/style.mdc.swp")));
    }

    #[test]
    fn matching_files_lists_sorted_regular_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mdc"), "b").unwrap();
        fs::write(dir.path().join("a.mdc"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.mdc")).unwrap();

        let target = WatchTarget::new(dir.path(), SuffixFilter::new(".mdc"));
        assert_eq!(target.matching_files().unwrap(), vec!["a.mdc", "b.mdc"]);
    }

    #[test]
    fn stat_report_records_failure() {
        let dir = tempdir().unwrap();
        let report = StatReport::collect(&dir.path().join("missing.mdc"));
        assert!(matches!(report, StatReport::Failed { .. }));
    }

    #[test]
    fn removed_change_skips_stat() {
        let dir = tempdir().unwrap();
        let change = RuleChange::observe(dir.path(), "gone.mdc", ChangeKind::Removed);
        assert_eq!(change.stat, StatReport::Skipped);
    }

    #[test]
    fn modified_change_reports_length() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mdc"), "12345").unwrap();
        let change = RuleChange::observe(dir.path(), "a.mdc", ChangeKind::Modified);
        assert!(matches!(change.stat, StatReport::Available { len: 5, .. }));
    }

    #[test]
    fn notice_serializes_with_tag() {
        let json = serde_json::to_string(&WatchNotice::WatchingFiles { count: 2 }).unwrap();
        assert_eq!(json, r#"{"notice":"watching_files","count":2}"#);
    }
}
