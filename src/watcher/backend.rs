//! OS notification backend
//!
//! A backend turns "watch this path" into a [`Subscription`] whose callbacks
//! are forwarded as [`Signal`]s over a channel. Nothing here touches the
//! handle's state: callbacks may run on a backend thread, the channel is the
//! only thing they share with the consumer.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

/// Identifies one subscription inside a handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubscriptionKey {
    /// Recursive watch over the whole tree
    Tree,
    /// Non-recursive watch on the directory itself
    Directory,
    /// Watch on a single file, by file name
    File(String),
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionKey::Tree => f.write_str("tree"),
            SubscriptionKey::Directory => f.write_str("directory"),
            SubscriptionKey::File(name) => write!(f, "file:{name}"),
        }
    }
}

/// How a path is watched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    Recursive,
    NonRecursive,
}

impl From<WatchMode> for RecursiveMode {
    fn from(mode: WatchMode) -> Self {
        match mode {
            WatchMode::Recursive => RecursiveMode::Recursive,
            WatchMode::NonRecursive => RecursiveMode::NonRecursive,
        }
    }
}

/// Coarse classification of a raw OS event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Created,
    Removed,
    Renamed,
    Modified,
    /// Permissions, timestamps, link count
    Metadata,
    Other,
}

impl RawKind {
    /// Create, remove and rename all arrive as the same "rename" class and
    /// have to be disambiguated by looking at the filesystem afterwards.
    pub fn is_rename_class(self) -> bool {
        matches!(self, RawKind::Created | RawKind::Removed | RawKind::Renamed)
    }
}

impl From<&EventKind> for RawKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => RawKind::Created,
            EventKind::Remove(_) => RawKind::Removed,
            EventKind::Modify(ModifyKind::Name(_)) => RawKind::Renamed,
            EventKind::Modify(ModifyKind::Metadata(_)) => RawKind::Metadata,
            EventKind::Modify(_) => RawKind::Modified,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => RawKind::Other,
        }
    }
}

/// Message from a subscription to its handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Event {
        key: SubscriptionKey,
        kind: RawKind,
        paths: Vec<PathBuf>,
    },
    Error {
        key: SubscriptionKey,
        message: String,
    },
}

/// Why a watch could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchErrorKind {
    /// The platform lacks the requested capability
    Unsupported,
    /// The path to watch does not exist
    NotFound,
    /// The OS watch limit was hit
    LimitReached,
    /// Any other I/O failure
    Io,
}

/// Error establishing or running a watch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WatchError {
    pub kind: WatchErrorKind,
    pub message: String,
}

impl WatchError {
    pub fn new(kind: WatchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(WatchErrorKind::Unsupported, message)
    }

    pub fn is_unsupported(&self) -> bool {
        self.kind == WatchErrorKind::Unsupported
    }

    pub fn from_io(err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => WatchErrorKind::NotFound,
            std::io::ErrorKind::Unsupported => WatchErrorKind::Unsupported,
            _ => WatchErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<notify::Error> for WatchError {
    fn from(err: notify::Error) -> Self {
        let kind = match &err.kind {
            notify::ErrorKind::PathNotFound => WatchErrorKind::NotFound,
            notify::ErrorKind::MaxFilesWatch => WatchErrorKind::LimitReached,
            notify::ErrorKind::InvalidConfig(_) => WatchErrorKind::Unsupported,
            notify::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::Unsupported => {
                WatchErrorKind::Unsupported
            }
            notify::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                WatchErrorKind::NotFound
            }
            _ => WatchErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

/// One live OS-level watch
pub trait Subscription: Send {
    /// Release the underlying OS resource. Must be safe to call twice.
    fn close(&mut self);
}

/// Factory for subscriptions
pub trait WatchBackend: Send + Sync {
    fn subscribe(
        &self,
        path: &Path,
        mode: WatchMode,
        key: SubscriptionKey,
        sink: Sender<Signal>,
    ) -> Result<Box<dyn Subscription>, WatchError>;
}

/// Backend over the platform's recommended `notify` watcher.
///
/// File subscriptions share one watcher instance per backend and are told
/// apart by path, so the per-file tier costs a single OS instance however
/// many rule files there are. Tree and directory subscriptions get a watcher
/// of their own: a directory watch also sees its children's events, and
/// sharing would deliver those twice.
#[derive(Debug, Default, Clone)]
pub struct NotifyBackend {
    files: Arc<SharedFileWatcher>,
}

impl NotifyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the shared file watcher is currently allocated
    pub fn has_file_watcher(&self) -> bool {
        lock(&self.files.state).watcher.is_some()
    }

    /// Distinct file paths registered with the shared watcher
    pub fn watched_file_count(&self) -> usize {
        lock(&self.files.state).watched.len()
    }
}

impl WatchBackend for NotifyBackend {
    fn subscribe(
        &self,
        path: &Path,
        mode: WatchMode,
        key: SubscriptionKey,
        sink: Sender<Signal>,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        match (&key, mode) {
            (SubscriptionKey::File(_), WatchMode::NonRecursive) => {
                SharedFileWatcher::subscribe(&self.files, path, key, sink)
            }
            _ => subscribe_alone(path, mode, key, sink),
        }
    }
}

fn subscribe_alone(
    path: &Path,
    mode: WatchMode,
    key: SubscriptionKey,
    sink: Sender<Signal>,
) -> Result<Box<dyn Subscription>, WatchError> {
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            let signal = match res {
                Ok(event) => Signal::Event {
                    key: key.clone(),
                    kind: RawKind::from(&event.kind),
                    paths: event.paths,
                },
                Err(e) => Signal::Error {
                    key: key.clone(),
                    message: e.to_string(),
                },
            };
            // The handle may already be gone; late events are dropped
            let _ = sink.send(signal);
        },
        Config::default(),
    )?;

    watcher.watch(path, mode.into())?;

    Ok(Box::new(NotifySubscription {
        watcher: Some(watcher),
        path: path.to_path_buf(),
    }))
}

struct NotifySubscription {
    watcher: Option<RecommendedWatcher>,
    path: PathBuf,
}

impl Subscription for NotifySubscription {
    fn close(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            // The path may already be gone (deleted file); dropping still frees the watcher
            let _ = watcher.unwatch(&self.path);
        }
    }
}

impl Drop for NotifySubscription {
    fn drop(&mut self) {
        self.close();
    }
}

/// Where events for one file subscription go
struct FileRoute {
    id: u64,
    /// The path as subscribed, plus its canonical form when that differs
    paths: Vec<PathBuf>,
    key: SubscriptionKey,
    sink: Sender<Signal>,
}

impl FileRoute {
    fn covers(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

#[derive(Default)]
struct SharedState {
    watcher: Option<RecommendedWatcher>,
    /// Subscriptions per OS-watched path
    watched: HashMap<PathBuf, usize>,
}

/// One `notify` watcher multiplexed over every file subscription.
///
/// The callback only takes the route lock and `watch`/`unwatch` only run
/// under the state lock, so a callback in flight never blocks them.
#[derive(Default)]
struct SharedFileWatcher {
    routes: Arc<Mutex<Vec<FileRoute>>>,
    state: Mutex<SharedState>,
    next_id: AtomicU64,
}

impl fmt::Debug for SharedFileWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFileWatcher")
            .field("routes", &lock(&self.routes).len())
            .field("watched", &lock(&self.state).watched.len())
            .finish()
    }
}

impl SharedFileWatcher {
    fn subscribe(
        this: &Arc<Self>,
        path: &Path,
        key: SubscriptionKey,
        sink: Sender<Signal>,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let id = this.next_id.fetch_add(1, Ordering::Relaxed);
        let mut paths = vec![path.to_path_buf()];
        if let Ok(canonical) = path.canonicalize() {
            if canonical != path {
                paths.push(canonical);
            }
        }
        lock(&this.routes).push(FileRoute {
            id,
            paths,
            key,
            sink,
        });

        if let Err(e) = this.watch(path) {
            lock(&this.routes).retain(|r| r.id != id);
            return Err(e);
        }

        Ok(Box::new(SharedFileSubscription {
            owner: Some(Arc::clone(this)),
            id,
            path: path.to_path_buf(),
        }))
    }

    fn watch(&self, path: &Path) -> Result<(), WatchError> {
        let mut guard = lock(&self.state);
        let state = &mut *guard;

        if let Some(count) = state.watched.get_mut(path) {
            *count += 1;
            return Ok(());
        }

        let watcher = match state.watcher.take() {
            Some(watcher) => watcher,
            None => {
                let routes = Arc::clone(&self.routes);
                RecommendedWatcher::new(
                    move |res: Result<Event, notify::Error>| route(&routes, res),
                    Config::default(),
                )?
            }
        };
        let result = state
            .watcher
            .insert(watcher)
            .watch(path, RecursiveMode::NonRecursive);
        match result {
            Ok(()) => {
                state.watched.insert(path.to_path_buf(), 1);
                Ok(())
            }
            Err(e) => {
                if state.watched.is_empty() {
                    state.watcher = None;
                }
                Err(e.into())
            }
        }
    }

    fn release(&self, id: u64, path: &Path) {
        lock(&self.routes).retain(|r| r.id != id);

        let mut guard = lock(&self.state);
        let state = &mut *guard;
        let remaining = match state.watched.get_mut(path) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => return,
        };
        if remaining > 0 {
            return;
        }
        state.watched.remove(path);
        if let Some(watcher) = state.watcher.as_mut() {
            // Fails when the file was deleted and the OS already dropped the watch
            let _ = watcher.unwatch(path);
        }
        if state.watched.is_empty() {
            state.watcher = None;
        }
    }
}

/// Deliver one raw event to every file subscription whose path it names
fn route(routes: &Mutex<Vec<FileRoute>>, res: Result<Event, notify::Error>) {
    let routes = lock(routes);
    match res {
        Ok(event) => {
            let kind = RawKind::from(&event.kind);
            for r in routes.iter() {
                let paths: Vec<PathBuf> = event
                    .paths
                    .iter()
                    .filter(|p| r.covers(p))
                    .cloned()
                    .collect();
                if !paths.is_empty() {
                    let _ = r.sink.send(Signal::Event {
                        key: r.key.clone(),
                        kind,
                        paths,
                    });
                }
            }
        }
        Err(e) => {
            let message = e.to_string();
            for r in routes
                .iter()
                .filter(|r| e.paths.is_empty() || e.paths.iter().any(|p| r.covers(p)))
            {
                let _ = r.sink.send(Signal::Error {
                    key: r.key.clone(),
                    message: message.clone(),
                });
            }
        }
    }
}

struct SharedFileSubscription {
    owner: Option<Arc<SharedFileWatcher>>,
    id: u64,
    path: PathBuf,
}

impl Subscription for SharedFileSubscription {
    fn close(&mut self) {
        if let Some(owner) = self.owner.take() {
            owner.release(self.id, &self.path);
        }
    }
}

impl Drop for SharedFileSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
