//! The strategy ladder
//!
//! Each strategy tries exactly once to establish subscriptions for a target.
//! The manager walks the list in order and keeps the first success.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use super::backend::{
    Signal, Subscription, SubscriptionKey, WatchBackend, WatchError, WatchErrorKind, WatchMode,
};
use super::event::{StrategyTier, WatchNotice, WatchTarget};

/// Subscriptions owned by one handle, keyed by what they watch
pub type SubscriptionMap = BTreeMap<SubscriptionKey, Box<dyn Subscription>>;

/// Everything a strategy needs to subscribe and report
pub struct StartContext<'a> {
    pub backend: &'a dyn WatchBackend,
    pub sink: &'a Sender<Signal>,
    pub notices: &'a mut Vec<WatchNotice>,
}

/// Result of one rung of the ladder
pub enum StrategyOutcome {
    /// At least one subscription is live
    Started(SubscriptionMap),
    /// Nothing matched; stop without trying further tiers
    NothingToWatch,
    /// This tier could not establish anything; try the next one
    Failed(WatchError),
}

/// One way of watching a directory
pub trait WatchStrategy: Send + Sync {
    fn tier(&self) -> StrategyTier;

    fn try_start(&self, target: &WatchTarget, ctx: &mut StartContext<'_>) -> StrategyOutcome;
}

/// A single recursive subscription over the whole directory tree
#[derive(Debug, Default, Clone, Copy)]
pub struct RecursiveStrategy;

impl WatchStrategy for RecursiveStrategy {
    fn tier(&self) -> StrategyTier {
        StrategyTier::Recursive
    }

    fn try_start(&self, target: &WatchTarget, ctx: &mut StartContext<'_>) -> StrategyOutcome {
        match ctx.backend.subscribe(
            &target.dir,
            WatchMode::Recursive,
            SubscriptionKey::Tree,
            ctx.sink.clone(),
        ) {
            Ok(sub) => {
                let mut subs = SubscriptionMap::new();
                subs.insert(SubscriptionKey::Tree, sub);
                StrategyOutcome::Started(subs)
            }
            Err(e) => {
                let reason = e.message.clone();
                ctx.notices.push(if e.is_unsupported() {
                    WatchNotice::RecursiveUnavailable { reason }
                } else {
                    WatchNotice::RecursiveFailed { reason }
                });
                StrategyOutcome::Failed(e)
            }
        }
    }
}

/// One subscription per matching file, plus a directory subscription that
/// notices files being created or deleted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerFileStrategy;

impl WatchStrategy for PerFileStrategy {
    fn tier(&self) -> StrategyTier {
        StrategyTier::PerFile
    }

    fn try_start(&self, target: &WatchTarget, ctx: &mut StartContext<'_>) -> StrategyOutcome {
        let names = match target.matching_files() {
            Ok(names) => names,
            Err(e) => {
                ctx.notices.push(WatchNotice::ListingFailed {
                    reason: e.to_string(),
                });
                return StrategyOutcome::Failed(WatchError::from_io(&e));
            }
        };

        if names.is_empty() {
            ctx.notices.push(WatchNotice::NoFilesToWatch {
                suffix: target.filter.as_str().to_string(),
            });
            return StrategyOutcome::NothingToWatch;
        }

        ctx.notices.push(WatchNotice::WatchingFiles { count: names.len() });

        let mut subs = SubscriptionMap::new();
        for name in names {
            match subscribe_file(ctx.backend, target, &name, ctx.sink) {
                Ok(sub) => {
                    ctx.notices.push(WatchNotice::FileWatchAdded {
                        filename: name.clone(),
                    });
                    subs.insert(SubscriptionKey::File(name), sub);
                }
                Err(e) => ctx.notices.push(WatchNotice::FileWatchFailed {
                    filename: name,
                    reason: e.message,
                }),
            }
        }

        match ctx.backend.subscribe(
            &target.dir,
            WatchMode::NonRecursive,
            SubscriptionKey::Directory,
            ctx.sink.clone(),
        ) {
            Ok(sub) => {
                subs.insert(SubscriptionKey::Directory, sub);
            }
            Err(e) => ctx.notices.push(WatchNotice::DirectoryWatchFailed { reason: e.message }),
        }

        if subs.is_empty() {
            return StrategyOutcome::Failed(WatchError::new(
                WatchErrorKind::Io,
                "no file or directory subscription could be established",
            ));
        }
        StrategyOutcome::Started(subs)
    }
}

/// Subscribe to one file inside the target directory
pub(crate) fn subscribe_file(
    backend: &dyn WatchBackend,
    target: &WatchTarget,
    name: &str,
    sink: &Sender<Signal>,
) -> Result<Box<dyn Subscription>, WatchError> {
    backend.subscribe(
        &target.dir.join(name),
        WatchMode::NonRecursive,
        SubscriptionKey::File(name.to_string()),
        sink.clone(),
    )
}

/// The default ladder: recursive first, then per-file
pub fn default_strategies() -> Vec<Box<dyn WatchStrategy>> {
    vec![Box::new(RecursiveStrategy), Box::new(PerFileStrategy)]
}
