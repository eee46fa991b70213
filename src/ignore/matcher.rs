// src/ignore/matcher.rs

use std::fmt;
use std::path::Path;

use regex::Regex;
use tracing::{debug, trace};

use crate::fs::FileSystem;
use crate::ignore::pattern::glob_to_regex;

/// One compiled ignore-file line.
///
/// Immutable once compiled.
#[derive(Clone)]
pub struct IgnoreRule {
    source: String,
    regex: Regex,
    negate: bool,
    dir_only: bool,
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRule")
            .field("source", &self.source)
            .field("regex", &self.regex.as_str())
            .field("negate", &self.negate)
            .field("dir_only", &self.dir_only)
            .finish()
    }
}

impl IgnoreRule {
    /// Compile a single ignore line.
    ///
    /// Returns `Ok(None)` for lines that carry no rule (blank, comment, or a
    /// pattern that is empty once its markers are stripped) and `Err` when
    /// the translated pattern does not compile.
    pub fn parse(line: &str) -> Result<Option<Self>, regex::Error> {
        let source = line.trim();
        if source.is_empty() || source.starts_with('#') {
            return Ok(None);
        }

        let mut pattern = source;

        let negate = match pattern.strip_prefix('!') {
            Some(rest) => {
                pattern = rest;
                true
            }
            None => false,
        };

        let dir_only = match pattern.strip_suffix('/') {
            Some(rest) => {
                pattern = rest;
                true
            }
            None => false,
        };

        if pattern.trim_start_matches('/').is_empty() {
            return Ok(None);
        }

        let regex = Regex::new(&glob_to_regex(pattern))?;

        Ok(Some(Self {
            source: source.to_string(),
            regex,
            negate,
            dir_only,
        }))
    }

    /// The trimmed line this rule was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The translated regex source.
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    /// `!pattern`: a match un-ignores the path.
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// `pattern/`: only applies to directories.
    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Ordered rule set for one repository.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    rules: Vec<IgnoreRule>,
}

impl IgnoreMatcher {
    /// A matcher with no rules; nothing is ignored.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile lines in file order. Lines that fail to compile are skipped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();

        for line in lines {
            let line = line.as_ref();
            match IgnoreRule::parse(line) {
                Ok(Some(rule)) => {
                    trace!(rule = ?rule, "compiled ignore rule");
                    rules.push(rule);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(line = %line, error = %err, "skipping invalid ignore pattern");
                }
            }
        }

        Self { rules }
    }

    /// Load `<repo_root>/<file_name>`.
    ///
    /// A missing or unreadable file yields an empty matcher.
    pub fn load(fs: &dyn FileSystem, repo_root: &Path, file_name: &str) -> Self {
        let path = repo_root.join(file_name);
        if !fs.is_file(&path) {
            debug!(?path, "no ignore file; nothing is ignored");
            return Self::empty();
        }

        match fs.read_to_string(&path) {
            Ok(contents) => {
                let matcher = Self::from_lines(contents.lines());
                debug!(?path, rules = matcher.len(), "loaded ignore file");
                matcher
            }
            Err(err) => {
                debug!(?path, error = %err, "could not read ignore file; nothing is ignored");
                Self::empty()
            }
        }
    }

    /// Decide whether `path` (relative to the repository root) is excluded.
    ///
    /// Backslashes are treated as separators. Directory-only rules are
    /// skipped when `is_dir` is false. The last matching rule wins.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let path = path.replace('\\', "/");

        let mut ignored = false;
        for rule in &self.rules {
            if rule.dir_only && !is_dir {
                continue;
            }
            if rule.matches(&path) {
                ignored = !rule.negate;
            }
        }

        ignored
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
