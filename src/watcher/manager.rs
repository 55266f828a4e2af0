//! Directory watch manager

use std::sync::mpsc::channel;
use std::sync::Arc;

use super::backend::{NotifyBackend, WatchBackend};
use super::event::{StrategyTier, WatchNotice, WatchTarget};
use super::handle::WatchHandle;
use super::strategy::{
    default_strategies, PerFileStrategy, StartContext, StrategyOutcome, WatchStrategy,
};

/// What `start` produced: maybe a handle, and the decisions made on the way
#[derive(Debug, Default)]
pub struct StartOutcome {
    pub handle: Option<WatchHandle>,
    pub notices: Vec<WatchNotice>,
}

impl StartOutcome {
    pub fn into_handle(self) -> Option<WatchHandle> {
        self.handle
    }
}

/// Walks the strategy ladder for a target and hands back one uniform handle.
///
/// The manager holds no global state; whoever owns the handle is
/// responsible for closing it on shutdown.
pub struct WatchManager {
    backend: Arc<dyn WatchBackend>,
    strategies: Vec<Box<dyn WatchStrategy>>,
}

impl WatchManager {
    /// Manager with the default ladder (recursive, then per-file)
    pub fn new(backend: impl WatchBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            strategies: default_strategies(),
        }
    }

    /// Manager over the platform's native notification facility
    pub fn native() -> Self {
        Self::new(NotifyBackend::new())
    }

    /// Replace the ladder
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn WatchStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Skip the recursive tier
    pub fn per_file_only(self) -> Self {
        self.with_strategies(vec![Box::new(PerFileStrategy)])
    }

    pub fn tiers(&self) -> Vec<StrategyTier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Establish change notification for `target`.
    ///
    /// Returns no handle when nothing matches the filter or when no strategy
    /// could subscribe; neither case is an error for the caller.
    pub fn start(&self, target: WatchTarget) -> StartOutcome {
        let mut notices = Vec::new();

        match target.matching_files() {
            Ok(names) if names.is_empty() => {
                notices.push(WatchNotice::NoFilesToWatch {
                    suffix: target.filter.as_str().to_string(),
                });
                return StartOutcome {
                    handle: None,
                    notices,
                };
            }
            Ok(_) => {}
            Err(e) => notices.push(WatchNotice::ListingFailed {
                reason: e.to_string(),
            }),
        }

        let (sink, signals) = channel();

        for strategy in &self.strategies {
            let outcome = {
                let mut ctx = StartContext {
                    backend: self.backend.as_ref(),
                    sink: &sink,
                    notices: &mut notices,
                };
                strategy.try_start(&target, &mut ctx)
            };

            match outcome {
                StrategyOutcome::Started(subscriptions) => {
                    let handle = WatchHandle::new(
                        target,
                        strategy.tier(),
                        Arc::clone(&self.backend),
                        (sink, signals),
                        subscriptions,
                    );
                    notices.push(WatchNotice::Started {
                        tier: handle.tier(),
                        subscriptions: handle.subscription_count(),
                        detects_new_files: handle.detects_new_files(),
                    });
                    return StartOutcome {
                        handle: Some(handle),
                        notices,
                    };
                }
                StrategyOutcome::NothingToWatch => {
                    return StartOutcome {
                        handle: None,
                        notices,
                    };
                }
                StrategyOutcome::Failed(_) => continue,
            }
        }

        notices.push(WatchNotice::Unavailable);
        StartOutcome {
            handle: None,
            notices,
        }
    }
}

impl std::fmt::Debug for WatchManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchManager")
            .field("tiers", &self.tiers())
            .finish()
    }
}
