// src/watch/registry.rs

//! Per-repository subscriber bookkeeping.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Identifies one subscriber channel within a notifier.
pub type SubscriberId = u64;

/// Outcome of fanning one event out to a registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Channels that received a fresh notification.
    pub delivered: usize,
    /// Channels that already had one pending; the send was dropped.
    pub coalesced: usize,
}

/// State for one watched repository root.
///
/// Exists only while at least one subscriber is attached. Owned by the
/// notifier and mutated only under its lock.
#[derive(Debug)]
pub struct WatchRegistration {
    root: PathBuf,
    /// Paths handed to the OS watcher (empty in degraded mode).
    watched: Vec<PathBuf>,
    subscribers: HashMap<SubscriberId, mpsc::Sender<()>>,
}

impl WatchRegistration {
    pub(crate) fn new(root: PathBuf, watched: Vec<PathBuf>) -> Self {
        Self {
            root,
            watched,
            subscribers: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Number of attached subscribers.
    pub fn ref_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn attach(&mut self, id: SubscriberId, tx: mpsc::Sender<()>) {
        self.subscribers.insert(id, tx);
    }

    /// Remove a subscriber. Dropping its sender closes the channel.
    ///
    /// Returns false if `id` was not attached.
    pub(crate) fn detach(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Non-blocking send to every subscriber; full slots are skipped.
    pub(crate) fn signal(&self) -> Delivery {
        let mut delivery = Delivery::default();
        for tx in self.subscribers.values() {
            match tx.try_send(()) {
                Ok(()) => delivery.delivered += 1,
                Err(TrySendError::Full(())) => delivery.coalesced += 1,
                // Receiver already gone; detach will follow.
                Err(TrySendError::Closed(())) => {}
            }
        }
        delivery
    }

    /// Consume the registration, closing every remaining channel, and
    /// return the paths that must be unwatched.
    pub(crate) fn into_watched(self) -> Vec<PathBuf> {
        self.watched
    }
}
