// src/watch/mod.rs

//! Repository change notification.
//!
//! This module is responsible for:
//! - Holding one OS-level watch per repository root while at least one
//!   subscriber is attached (reference counted, see [`registry`]).
//! - Draining the `notify` event stream on a single background task and
//!   fanning qualifying events out to every subscriber of every repository
//!   that contains the changed path.
//! - A bounded long-poll primitive, [`ChangeNotifier::wait_for_change`].
//!
//! Delivery is best-effort and coalescing: each subscriber has a one-slot
//! channel and a send into a full slot is dropped. A wakeup means "at least
//! one change happened since the slot was last drained", never "one event".

use std::time::Duration;

pub mod event_filter;
pub mod notifier;
pub mod path_utils;
pub mod registry;
pub mod subscription;

pub use notifier::ChangeNotifier;
pub use registry::SubscriberId;
pub use subscription::Subscription;

/// Settings for a [`ChangeNotifier`].
///
/// Usually produced by `ConfigFile::notifier_options`.
#[derive(Debug, Clone)]
pub struct NotifierOptions {
    /// Metadata subdirectory of each repository root (e.g. `.git`).
    pub metadata_dir: String,
    /// Watch roots recursively. When false the root and its metadata
    /// subdirectory are watched individually.
    pub recursive: bool,
    /// Bound used by callers that do not pick their own timeout.
    pub default_timeout: Duration,
    /// Repo-relative globs whose events never wake subscribers.
    pub exclude: Vec<String>,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            metadata_dir: ".git".to_string(),
            recursive: true,
            default_timeout: Duration::from_secs(30),
            exclude: Vec::new(),
        }
    }
}
