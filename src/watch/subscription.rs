// src/watch/subscription.rs

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::watch::notifier::Shared;
use crate::watch::registry::SubscriberId;

/// One caller's notification channel for a repository.
///
/// Holds a single-slot receiver: a pending notification means at least one
/// change happened since the slot was last drained. Dropping the
/// subscription (or calling [`Subscription::unsubscribe`]) detaches it, and
/// the last subscriber of a repository tears down the OS watch.
pub struct Subscription {
    shared: Arc<Shared>,
    root: PathBuf,
    id: SubscriberId,
    rx: mpsc::Receiver<()>,
    attached: bool,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("root", &self.root)
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    pub(crate) fn new(
        shared: Arc<Shared>,
        root: PathBuf,
        id: SubscriberId,
        rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            shared,
            root,
            id,
            rx,
            attached: true,
        }
    }

    /// Canonical repository root this subscription observes.
    pub fn repository(&self) -> &Path {
        &self.root
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next notification.
    ///
    /// Returns `true` when a change was signalled and `false` once the
    /// channel is closed (unsubscribed or notifier shut down).
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Drain a pending notification without waiting.
    pub fn try_changed(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Detach from the notifier and close the channel.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            self.shared.detach(&self.root, self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
