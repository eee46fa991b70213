// src/ignore/mod.rs

//! Ignore-file rules.
//!
//! Lines of an ignore file (usually `.gitignore`) are compiled into ordered
//! [`IgnoreRule`]s. [`IgnoreMatcher::is_ignored`] walks every rule and the
//! **last** matching rule decides, so `!important.log` after `*.log`
//! re-includes that one file.
//!
//! Matching is pure: a matcher holds no shared mutable state and can be used
//! from any number of threads at once.

pub mod matcher;
pub mod pattern;

pub use matcher::{IgnoreMatcher, IgnoreRule};
pub use pattern::glob_to_regex;
