//! Directory watching for rule files
//!
//! Change notification degrades across three tiers:
//! 1. one recursive watch over the directory tree
//! 2. one watch per matching file plus a directory watch for create/delete
//! 3. nothing (the caller keeps running without live reload)
//!
//! Whichever tier wins, the caller gets the same [`WatchHandle`].

mod backend;
mod event;
mod handle;
mod manager;
mod strategy;
#[cfg(test)]
mod testing;

pub use backend::{
    NotifyBackend, RawKind, Signal, Subscription, SubscriptionKey, WatchBackend, WatchError,
    WatchErrorKind, WatchMode,
};
pub use event::{
    ChangeKind, RuleChange, StatReport, StrategyTier, SuffixFilter, WatchNotice, WatchTarget,
};
pub use handle::{SubscriptionError, WatchBatch, WatchHandle};
pub use manager::{StartOutcome, WatchManager};
pub use strategy::{
    default_strategies, PerFileStrategy, RecursiveStrategy, StartContext, StrategyOutcome,
    SubscriptionMap, WatchStrategy,
};
