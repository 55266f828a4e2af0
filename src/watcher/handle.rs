//! The uniform handle returned by a successful start

use std::path::Path;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use super::backend::{RawKind, Signal, SubscriptionKey, WatchBackend};
use super::event::{ChangeKind, RuleChange, StrategyTier, WatchNotice, WatchTarget};
use super::strategy::{subscribe_file, SubscriptionMap};

/// Error reported by a live subscription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionError {
    pub key: SubscriptionKey,
    pub message: String,
}

type ErrorHandler = Box<dyn FnMut(&SubscriptionError) + Send>;

/// Output of one [`WatchHandle::next_batch`] call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchBatch {
    pub changes: Vec<RuleChange>,
    pub notices: Vec<WatchNotice>,
}

impl WatchBatch {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.notices.is_empty()
    }
}

/// Owns every subscription established for a target, whichever tier won.
///
/// Signals from the OS are queued on a channel and only applied inside
/// [`next_batch`](Self::next_batch), so the subscription map is touched from
/// the caller's thread alone.
pub struct WatchHandle {
    target: WatchTarget,
    tier: StrategyTier,
    backend: Arc<dyn WatchBackend>,
    sink: Sender<Signal>,
    signals: Receiver<Signal>,
    subscriptions: SubscriptionMap,
    error_handlers: Vec<ErrorHandler>,
    closed: bool,
}

impl WatchHandle {
    pub(crate) fn new(
        target: WatchTarget,
        tier: StrategyTier,
        backend: Arc<dyn WatchBackend>,
        (sink, signals): (Sender<Signal>, Receiver<Signal>),
        subscriptions: SubscriptionMap,
    ) -> Self {
        Self {
            target,
            tier,
            backend,
            sink,
            signals,
            subscriptions,
            error_handlers: Vec::new(),
            closed: false,
        }
    }

    pub fn tier(&self) -> StrategyTier {
        self.tier
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Number of live OS-level subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether `filename` currently has its own subscription
    pub fn is_watching(&self, filename: &str) -> bool {
        self.subscriptions
            .contains_key(&SubscriptionKey::File(filename.to_string()))
    }

    /// Files created after start will be noticed
    pub fn detects_new_files(&self) -> bool {
        self.subscriptions.contains_key(&SubscriptionKey::Tree)
            || self.subscriptions.contains_key(&SubscriptionKey::Directory)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Register a handler for errors reported by any subscription.
    ///
    /// Errors never tear down sibling subscriptions. Without a handler they
    /// are surfaced as [`WatchNotice::SubscriptionError`].
    pub fn on_error(&mut self, handler: impl FnMut(&SubscriptionError) + Send + 'static) {
        self.error_handlers.push(Box::new(handler));
    }

    /// Wait up to `timeout` for activity, then apply everything queued.
    pub fn next_batch(&mut self, timeout: Duration) -> WatchBatch {
        let mut batch = WatchBatch::default();
        if self.closed {
            return batch;
        }

        match self.signals.recv_timeout(timeout) {
            Ok(signal) => self.apply(signal, &mut batch),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return batch,
        }
        while let Ok(signal) = self.signals.try_recv() {
            self.apply(signal, &mut batch);
        }
        batch
    }

    /// Release every subscription. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for (_, mut sub) in std::mem::take(&mut self.subscriptions) {
            sub.close();
        }
        self.closed = true;
    }

    fn apply(&mut self, signal: Signal, batch: &mut WatchBatch) {
        match signal {
            Signal::Error { key, message } => self.report_error(key, message, batch),
            Signal::Event { key, kind, paths } => match key {
                SubscriptionKey::Tree => self.apply_tree_event(kind, &paths, batch),
                SubscriptionKey::Directory => {
                    if !kind.is_rename_class() {
                        return;
                    }
                    for path in &paths {
                        if let Some(name) = self.matching_name(path) {
                            self.reconcile(name, batch);
                        }
                    }
                }
                SubscriptionKey::File(name) => self.apply_file_event(name, kind, batch),
            },
        }
    }

    fn report_error(&mut self, key: SubscriptionKey, message: String, batch: &mut WatchBatch) {
        if self.error_handlers.is_empty() {
            batch.notices.push(WatchNotice::SubscriptionError {
                key: key.to_string(),
                message,
            });
            return;
        }
        let err = SubscriptionError { key, message };
        for handler in &mut self.error_handlers {
            handler(&err);
        }
    }

    fn apply_tree_event(&self, kind: RawKind, paths: &[std::path::PathBuf], batch: &mut WatchBatch) {
        for path in paths {
            if !self.target.filter.matches(path) {
                continue;
            }
            let kind = match kind {
                RawKind::Created => ChangeKind::Created,
                RawKind::Removed => ChangeKind::Removed,
                RawKind::Renamed if path.exists() => ChangeKind::Created,
                RawKind::Renamed => ChangeKind::Removed,
                RawKind::Modified => ChangeKind::Modified,
                RawKind::Metadata | RawKind::Other => continue,
            };
            let name = path
                .strip_prefix(&self.target.dir)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();
            batch
                .changes
                .push(RuleChange::observe(&self.target.dir, name, kind));
        }
    }

    fn apply_file_event(&mut self, name: String, kind: RawKind, batch: &mut WatchBatch) {
        let key = SubscriptionKey::File(name.clone());
        if !self.subscriptions.contains_key(&key) {
            // Late event from a subscription that was already released
            return;
        }

        match kind {
            RawKind::Modified => batch.changes.push(RuleChange::observe(
                &self.target.dir,
                name,
                ChangeKind::Modified,
            )),
            kind if kind.is_rename_class() => {
                // The watched inode is gone (delete, move, or replace-on-save)
                if let Some(mut stale) = self.subscriptions.remove(&key) {
                    stale.close();
                }
                if self.target.dir.join(&name).exists() {
                    self.add_file(&name, batch);
                    batch.changes.push(RuleChange::observe(
                        &self.target.dir,
                        name,
                        ChangeKind::Modified,
                    ));
                } else {
                    batch
                        .notices
                        .push(WatchNotice::FileWatchRemoved { filename: name.clone() });
                    batch.changes.push(RuleChange::observe(
                        &self.target.dir,
                        name,
                        ChangeKind::Removed,
                    ));
                }
            }
            _ => {}
        }
    }

    /// Decide whether a rename-class event meant "created" or "deleted" by
    /// checking the filesystem now. A file created and deleted before this
    /// check runs is missed.
    fn reconcile(&mut self, name: String, batch: &mut WatchBatch) {
        let key = SubscriptionKey::File(name.clone());
        let exists = self.target.dir.join(&name).exists();

        if exists {
            if self.subscriptions.contains_key(&key) {
                return;
            }
            self.add_file(&name, batch);
            batch.changes.push(RuleChange::observe(
                &self.target.dir,
                name,
                ChangeKind::Created,
            ));
        } else if let Some(mut sub) = self.subscriptions.remove(&key) {
            sub.close();
            batch
                .notices
                .push(WatchNotice::FileWatchRemoved { filename: name.clone() });
            batch.changes.push(RuleChange::observe(
                &self.target.dir,
                name,
                ChangeKind::Removed,
            ));
        }
    }

    fn add_file(&mut self, name: &str, batch: &mut WatchBatch) {
        match subscribe_file(self.backend.as_ref(), &self.target, name, &self.sink) {
            Ok(sub) => {
                self.subscriptions
                    .insert(SubscriptionKey::File(name.to_string()), sub);
                batch.notices.push(WatchNotice::FileWatchAdded {
                    filename: name.to_string(),
                });
            }
            Err(e) => batch.notices.push(WatchNotice::FileWatchFailed {
                filename: name.to_string(),
                reason: e.message,
            }),
        }
    }

    fn matching_name(&self, path: &Path) -> Option<String> {
        if !self.target.filter.matches(path) {
            return None;
        }
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("target", &self.target)
            .field("tier", &self.tier)
            .field("subscriptions", &self.subscriptions.keys().collect::<Vec<_>>())
            .field("closed", &self.closed)
            .finish()
    }
}
