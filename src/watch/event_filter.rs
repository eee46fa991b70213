// src/watch/event_filter.rs

//! Decides which raw `notify` events may wake subscribers.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::EventKind;
use notify::event::ModifyKind;

/// True for write, create, remove and rename events.
///
/// Metadata-only modifications (permissions, timestamps), access events and
/// `Other` are ignored. The unclassified `Any` kind is treated as a change.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Any => true,
        _ => false,
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Repo-relative exclusion globs from `[notifier].exclude`.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    exclude: Option<GlobSet>,
}

impl EventFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let exclude = if patterns.is_empty() {
            None
        } else {
            Some(build_globset(patterns).context("building notifier exclude globset")?)
        };
        Ok(Self { exclude })
    }

    /// True if an event at `rel_path` must not wake subscribers.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        match &self.exclude {
            Some(set) => set.is_match(rel_path),
            None => false,
        }
    }
}
