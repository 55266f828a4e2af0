//! Scripted backend for exercising the ladder without the OS

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use super::backend::{
    RawKind, Signal, Subscription, SubscriptionKey, WatchBackend, WatchError, WatchMode,
};

#[derive(Default)]
struct Script {
    fail_recursive: Option<WatchError>,
    fail_directory: Option<WatchError>,
    fail_files: HashSet<String>,
    sinks: HashMap<SubscriptionKey, Sender<Signal>>,
    active: usize,
    opened: usize,
}

/// Records every subscription and lets tests push events through them.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn without_recursive(self) -> Self {
        self.fail_recursive_with(WatchError::unsupported(
            "recursive watching is not available on this platform",
        ))
    }

    pub(crate) fn fail_recursive_with(self, err: WatchError) -> Self {
        self.script.lock().unwrap().fail_recursive = Some(err);
        self
    }

    pub(crate) fn without_directory_watch(self) -> Self {
        self.script.lock().unwrap().fail_directory = Some(WatchError::new(
            super::backend::WatchErrorKind::Io,
            "directory watch refused",
        ));
        self
    }

    pub(crate) fn fail_file(self, name: &str) -> Self {
        self.script.lock().unwrap().fail_files.insert(name.to_string());
        self
    }

    /// Subscriptions currently open (opened and not yet closed)
    pub(crate) fn active(&self) -> usize {
        self.script.lock().unwrap().active
    }

    /// Subscriptions ever opened
    pub(crate) fn opened(&self) -> usize {
        self.script.lock().unwrap().opened
    }

    /// Deliver an event as if the subscription for `key` had fired
    pub(crate) fn emit(&self, key: SubscriptionKey, kind: RawKind, path: impl Into<PathBuf>) {
        let sink = self.script.lock().unwrap().sinks.get(&key).cloned();
        let sink = sink.unwrap_or_else(|| panic!("no subscription for {key}"));
        sink.send(Signal::Event {
            key,
            kind,
            paths: vec![path.into()],
        })
        .unwrap();
    }

    pub(crate) fn emit_error(&self, key: SubscriptionKey, message: &str) {
        let sink = self.script.lock().unwrap().sinks.get(&key).cloned().unwrap();
        sink.send(Signal::Error {
            key,
            message: message.to_string(),
        })
        .unwrap();
    }
}

impl WatchBackend for ScriptedBackend {
    fn subscribe(
        &self,
        path: &Path,
        mode: WatchMode,
        key: SubscriptionKey,
        sink: Sender<Signal>,
    ) -> Result<Box<dyn Subscription>, WatchError> {
        let mut script = self.script.lock().unwrap();

        if !path.exists() {
            return Err(WatchError::new(
                super::backend::WatchErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        match (&key, mode) {
            (SubscriptionKey::Tree, WatchMode::Recursive) => {
                if let Some(err) = &script.fail_recursive {
                    return Err(err.clone());
                }
            }
            (SubscriptionKey::Directory, _) => {
                if let Some(err) = &script.fail_directory {
                    return Err(err.clone());
                }
            }
            (SubscriptionKey::File(name), _) if script.fail_files.contains(name) => {
                return Err(WatchError::new(
                    super::backend::WatchErrorKind::Io,
                    format!("cannot watch {name}"),
                ));
            }
            _ => {}
        }

        script.sinks.insert(key, sink);
        script.active += 1;
        script.opened += 1;
        Ok(Box::new(ScriptedSubscription {
            script: Arc::clone(&self.script),
            closed: false,
        }))
    }
}

struct ScriptedSubscription {
    script: Arc<Mutex<Script>>,
    closed: bool,
}

impl Subscription for ScriptedSubscription {
    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.script.lock().unwrap().active -= 1;
        }
    }
}
