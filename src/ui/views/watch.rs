use ruledeck::watcher::{
    ChangeKind, RuleChange, StatReport, StrategyTier, SubscriptionError, WatchNotice,
};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::{paint, Tone};

pub fn render_watch_header(
    project: &str,
    rules_dir: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Watch, "ruledeck watch");
    header.add("Project", project);
    header.add("Rules", rules_dir);
    header.add("Hint", "Press Ctrl+C to stop");
    header.render(supports_color, supports_unicode)
}

/// One line (plus detail lines) for a manager decision
pub fn render_notice(notice: &WatchNotice, supports_color: bool, supports_unicode: bool) -> String {
    let ok = Icon::Success.colored(supports_color, supports_unicode);
    let warn = Icon::Warning.colored(supports_color, supports_unicode);
    let watch = Icon::Watch.colored(supports_color, supports_unicode);
    let hint = Icon::Hint.colored(supports_color, supports_unicode);
    let detail = |text: &str| format!("  {}\n", paint(text, Tone::Dim, supports_color));

    match notice {
        WatchNotice::RecursiveUnavailable { reason } => format!(
            "{warn} Recursive watching not available, trying per-file watches\n{}",
            detail(reason)
        ),
        WatchNotice::RecursiveFailed { reason } => format!(
            "{warn} Recursive watching failed: {reason}, trying per-file watches\n"
        ),
        WatchNotice::WatchingFiles { count } => {
            format!("{watch} Watching {count} individual rule file(s)\n")
        }
        WatchNotice::ListingFailed { reason } => {
            format!("{warn} Could not list rules directory: {reason}\n")
        }
        WatchNotice::NoFilesToWatch { suffix } => {
            format!("{warn} No {suffix} files found to watch\n")
        }
        WatchNotice::FileWatchAdded { filename } => {
            format!("{watch} Added watch for: {filename}\n")
        }
        WatchNotice::FileWatchRemoved { filename } => {
            format!("{watch} Removed watch for: {filename}\n")
        }
        WatchNotice::FileWatchFailed { filename, reason } => {
            format!("{warn} Could not watch {filename}: {reason}\n")
        }
        WatchNotice::DirectoryWatchFailed { reason } => format!(
            "{warn} Directory watching failed: {reason}\n{}",
            detail("Only existing files are watched (new files require a restart)")
        ),
        WatchNotice::Started {
            tier,
            subscriptions,
            detects_new_files,
        } => {
            let mode = match tier {
                StrategyTier::Recursive => "Recursive file watching",
                StrategyTier::PerFile if *detects_new_files => {
                    "Per-file watching + directory monitoring"
                }
                StrategyTier::PerFile => "Per-file watching (existing files only)",
                StrategyTier::Unavailable => "No file watching",
            };
            let mut out = format!("{ok} {mode} enabled ({subscriptions} subscription(s))\n");
            if *detects_new_files {
                out.push_str(&format!("{hint} New rule files will be detected automatically\n"));
            }
            out
        }
        WatchNotice::Unavailable => format!(
            "{warn} File watching not available on this platform\n{}{}",
            detail("File changes will not be detected automatically"),
            detail("Edit rule files manually and restart the IDE to reload them")
        ),
        WatchNotice::SubscriptionError { key, message } => format!(
            "{} File watching error ({key}): {message}\n",
            Icon::Error.colored(supports_color, supports_unicode)
        ),
    }
}

/// A change notification with its reload hint and file stats
pub fn render_change(
    timestamp: &str,
    change: &RuleChange,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = paint(&format!("[{timestamp}]"), Tone::Dim, supports_color);
    let (icon, label) = match change.kind {
        ChangeKind::Modified => (Icon::Changed, "Rule file changed"),
        ChangeKind::Created => (Icon::Added, "New rule file detected"),
        ChangeKind::Removed => (Icon::Removed, "Rule file deleted"),
    };

    let mut out = format!(
        "{prefix} {} {label}: {}\n",
        icon.colored(supports_color, supports_unicode),
        change.filename
    );
    match &change.stat {
        StatReport::Available { len, modified } => {
            let modified = modified
                .as_ref()
                .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            out.push_str(&format!(
                "  {}\n",
                paint(
                    &format!("Size: {len} bytes, last modified: {modified}"),
                    Tone::Dim,
                    supports_color
                )
            ));
        }
        StatReport::Failed { reason } => out.push_str(&format!(
            "  {} Could not get file stats: {reason}\n",
            Icon::Warning.colored(supports_color, supports_unicode)
        )),
        StatReport::Skipped => {}
    }
    out.push_str(&format!(
        "  {} Restart the IDE to reload the updated rules\n",
        Icon::Hint.colored(supports_color, supports_unicode)
    ));
    out
}

pub fn render_watch_error(
    timestamp: &str,
    error: &SubscriptionError,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    format!(
        "{} {} File watching error ({}): {}\n",
        paint(&format!("[{timestamp}]"), Tone::Dim, supports_color),
        Icon::Error.colored(supports_color, supports_unicode),
        error.key,
        error.message
    )
}

pub fn render_shutdown(supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "\n{} Shutting down file watcher...\n",
        Icon::Watch.colored(supports_color, supports_unicode)
    )
}
