// src/watch/notifier.rs

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::errors::{RepowatchError, Result};
use crate::watch::NotifierOptions;
use crate::watch::event_filter::{is_content_change, EventFilter};
use crate::watch::path_utils::{canonical_root, is_under_path, relative_str};
use crate::watch::registry::{SubscriberId, WatchRegistration};
use crate::watch::subscription::Subscription;

/// Lets many callers long-poll "has anything changed under this repository?".
///
/// Cloning is cheap; clones share the same registrations and OS watcher.
///
/// Construct inside a Tokio runtime: the dispatch task is spawned on the
/// current runtime. Without one, or if the platform watcher cannot be
/// created, the notifier runs degraded and every wait simply times out.
#[derive(Clone)]
pub struct ChangeNotifier {
    shared: Arc<Shared>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("degraded", &self.shared.degraded)
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

/// State shared between notifier handles, subscriptions and the dispatch task.
pub(crate) struct Shared {
    state: Mutex<NotifierState>,
    options: NotifierOptions,
    filter: EventFilter,
    degraded: bool,
    next_id: AtomicU64,
}

struct NotifierState {
    /// `None` when degraded or closed.
    watcher: Option<RecommendedWatcher>,
    registrations: HashMap<PathBuf, WatchRegistration>,
    closed: bool,
}

impl ChangeNotifier {
    /// Create a notifier backed by the platform's recommended watcher.
    ///
    /// Only an invalid `exclude` glob is an error; watcher setup failures
    /// produce a degraded notifier.
    pub fn new(options: NotifierOptions) -> Result<Self> {
        let filter = event_filter(&options)?;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                warn!(error = %err, "no Tokio runtime; change notifications disabled");
                return Ok(Self::build(options, filter, None));
            }
        };

        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // Fails only after the dispatch task has exited.
                let _ = event_tx.send(res);
            },
            Config::default(),
        );

        let watcher = match watcher {
            Ok(w) => w,
            Err(err) => {
                warn!(error = %err, "could not create file watcher; change notifications disabled");
                return Ok(Self::build(options, filter, None));
            }
        };

        let notifier = Self::build(options, filter, Some(watcher));
        runtime.spawn(dispatch_loop(Arc::downgrade(&notifier.shared), event_rx));

        info!("change notifier started");
        Ok(notifier)
    }

    /// Create a notifier that never installs OS watches.
    ///
    /// Subscriptions work but never fire.
    pub fn degraded(options: NotifierOptions) -> Result<Self> {
        let filter = event_filter(&options)?;
        Ok(Self::build(options, filter, None))
    }

    fn build(
        options: NotifierOptions,
        filter: EventFilter,
        watcher: Option<RecommendedWatcher>,
    ) -> Self {
        let degraded = watcher.is_none();
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(NotifierState {
                    watcher,
                    registrations: HashMap::new(),
                    closed: false,
                }),
                options,
                filter,
                degraded,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn options(&self) -> &NotifierOptions {
        &self.shared.options
    }

    pub fn is_degraded(&self) -> bool {
        self.shared.degraded
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Attach a new subscriber to `repository`.
    ///
    /// The first subscriber of a repository installs the OS watch; failing
    /// to watch the root is returned as an error and leaves no registration
    /// behind. Failing to watch the metadata subdirectory is only logged.
    pub fn subscribe(&self, repository: impl AsRef<Path>) -> Result<Subscription> {
        let root = canonical_root(repository.as_ref());
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(1);

        let mut state = self.shared.lock();
        if state.closed {
            return Err(RepowatchError::NotifierClosed);
        }

        let NotifierState {
            watcher,
            registrations,
            ..
        } = &mut *state;

        let registration = match registrations.entry(root.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let watched = install_watches(watcher.as_mut(), &root, &self.shared.options)?;
                entry.insert(WatchRegistration::new(root.clone(), watched))
            }
        };
        registration.attach(id, tx);

        debug!(
            repository = ?root,
            subscriber = id,
            subscribers = registration.ref_count(),
            "subscribed to repository changes"
        );
        drop(state);

        Ok(Subscription::new(Arc::clone(&self.shared), root, id, rx))
    }

    /// Block until `repository` changes or `timeout` elapses.
    ///
    /// Returns `true` on a change. Always unsubscribes before returning. If
    /// the notifier is closed this returns `false` at once; any other
    /// subscribe failure is logged and reported as a timeout after
    /// `timeout` has elapsed, so long-poll callers never spin.
    pub async fn wait_for_change(&self, repository: impl AsRef<Path>, timeout: Duration) -> bool {
        let repository = repository.as_ref();

        let mut subscription = match self.subscribe(repository) {
            Ok(sub) => sub,
            Err(RepowatchError::NotifierClosed) => return false,
            Err(err) => {
                warn!(?repository, error = %err, "failed to subscribe to repository changes");
                tokio::time::sleep(timeout).await;
                return false;
            }
        };

        let changed = matches!(
            tokio::time::timeout(timeout, subscription.changed()).await,
            Ok(true)
        );
        subscription.unsubscribe();

        trace!(?repository, changed, "wait for change finished");
        changed
    }

    /// [`ChangeNotifier::wait_for_change`] with `options.default_timeout`.
    pub async fn wait_with_default_timeout(&self, repository: impl AsRef<Path>) -> bool {
        let timeout = self.shared.options.default_timeout;
        self.wait_for_change(repository, timeout).await
    }

    /// Shut down: close every subscriber channel, drop all registrations and
    /// release the OS watcher. Later `subscribe` calls fail with
    /// [`RepowatchError::NotifierClosed`].
    pub fn close(&self) {
        let mut state = self.shared.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        let registrations = std::mem::take(&mut state.registrations);
        let watcher = state.watcher.take();
        drop(state);

        let subscribers: usize = registrations.values().map(|r| r.ref_count()).sum();
        drop(registrations);
        drop(watcher);

        info!(subscribers, "change notifier closed");
    }

    /// Canonical roots that currently have a registration, sorted.
    pub fn watched_repositories(&self) -> Vec<PathBuf> {
        let state = self.shared.lock();
        let mut roots: Vec<PathBuf> = state.registrations.keys().cloned().collect();
        roots.sort();
        roots
    }

    /// Number of subscribers attached to `repository`.
    pub fn subscriber_count(&self, repository: impl AsRef<Path>) -> usize {
        let root = canonical_root(repository.as_ref());
        self.shared
            .lock()
            .registrations
            .get(&root)
            .map_or(0, WatchRegistration::ref_count)
    }

    /// Paths the OS watcher holds for `repository` (empty if unwatched or
    /// degraded).
    pub fn watched_paths(&self, repository: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = canonical_root(repository.as_ref());
        self.shared
            .lock()
            .registrations
            .get(&root)
            .map(|r| r.watched_paths().to_vec())
            .unwrap_or_default()
    }
}

fn event_filter(options: &NotifierOptions) -> Result<EventFilter> {
    EventFilter::new(&options.exclude).map_err(|e| RepowatchError::ConfigError(format!("{e:#}")))
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, NotifierState> {
        // Every critical section leaves the state consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove one subscriber; the last one tears down the OS watch.
    pub(crate) fn detach(&self, root: &Path, id: SubscriberId) {
        let mut state = self.lock();
        let NotifierState {
            watcher,
            registrations,
            ..
        } = &mut *state;

        let Some(registration) = registrations.get_mut(root) else {
            return;
        };
        if !registration.detach(id) {
            return;
        }

        debug!(
            repository = ?root,
            subscriber = id,
            subscribers = registration.ref_count(),
            "unsubscribed from repository changes"
        );

        if registration.is_empty() {
            if let Some(registration) = registrations.remove(root) {
                remove_watches(watcher.as_mut(), root, registration.into_watched());
            }
        }
    }

    /// Signal every registration that contains one of `paths`.
    fn dispatch(&self, paths: &[PathBuf]) {
        let state = self.lock();

        for registration in state.registrations.values() {
            let root = registration.root();
            let relevant = paths
                .iter()
                .filter(|path| is_under_path(path, root))
                .any(|path| relative_str(root, path).is_some_and(|rel| !self.filter.is_excluded(&rel)));
            if !relevant {
                continue;
            }

            let delivery = registration.signal();
            trace!(
                repository = ?registration.root(),
                delivered = delivery.delivered,
                coalesced = delivery.coalesced,
                "dispatched change"
            );
        }
    }
}

fn install_watches(
    watcher: Option<&mut RecommendedWatcher>,
    root: &Path,
    options: &NotifierOptions,
) -> Result<Vec<PathBuf>> {
    let Some(watcher) = watcher else {
        debug!(repository = ?root, "notifier degraded; registering without an OS watch");
        return Ok(Vec::new());
    };

    let mode = if options.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    watcher
        .watch(root, mode)
        .map_err(|source| RepowatchError::WatchPath {
            path: root.to_path_buf(),
            source,
        })?;
    let mut watched = vec![root.to_path_buf()];

    // A recursive root watch already covers the metadata directory.
    if !options.recursive {
        let metadata = root.join(&options.metadata_dir);
        match watcher.watch(&metadata, RecursiveMode::NonRecursive) {
            Ok(()) => watched.push(metadata),
            Err(err) => warn!(
                path = ?metadata,
                error = %err,
                "could not watch metadata directory; root watch still active"
            ),
        }
    }

    info!(repository = ?root, ?mode, "watching repository");
    Ok(watched)
}

fn remove_watches(watcher: Option<&mut RecommendedWatcher>, root: &Path, watched: Vec<PathBuf>) {
    if let Some(watcher) = watcher {
        for path in watched.iter().rev() {
            if let Err(err) = watcher.unwatch(path) {
                debug!(?path, error = %err, "failed to remove watch");
            }
        }
    }
    info!(repository = ?root, "stopped watching repository");
}

/// Drain raw events and fan them out until the watcher is dropped.
async fn dispatch_loop(
    shared: Weak<Shared>,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
) {
    while let Some(res) = events.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "file watch error");
                continue;
            }
        };

        if !is_content_change(&event.kind) {
            trace!(kind = ?event.kind, "ignoring non-content event");
            continue;
        }

        let Some(shared) = shared.upgrade() else {
            break;
        };
        debug!(kind = ?event.kind, paths = ?event.paths, "received notify event");
        shared.dispatch(&event.paths);
    }

    debug!("change notifier dispatch loop finished");
}
