mod common;
use crate::common::{init_tracing, RepoFixture};

use std::error::Error;
use std::path::Path;

use proptest::prelude::*;
use repowatch::fs::mock::MockFileSystem;
use repowatch::fs::RealFileSystem;
use repowatch::ignore::{glob_to_regex, IgnoreMatcher, IgnoreRule};

type TestResult = Result<(), Box<dyn Error>>;

const SAMPLE_IGNORE: &str = "# Test gitignore
node_modules/
*.log
temp/
!important.log
build
*.tmp
";

fn matcher(lines: &[&str]) -> IgnoreMatcher {
    IgnoreMatcher::from_lines(lines.iter().copied())
}

#[test]
fn sample_ignore_file_table() -> TestResult {
    init_tracing();

    let repo = RepoFixture::new()?;
    repo.write(".gitignore", SAMPLE_IGNORE)?;
    let gi = IgnoreMatcher::load(&RealFileSystem, repo.path(), ".gitignore");
    assert_eq!(gi.len(), 6);

    let cases = [
        ("node_modules", true, true),
        ("app.log", false, true),
        ("important.log", false, false),
        ("src/app.js", false, false),
        ("temp", true, true),
        ("build", false, true),
        ("build", true, true),
        ("build/output.o", false, true),
        ("file.tmp", false, true),
        ("src/file.txt", false, false),
        ("logs/nested/app.log", false, true),
    ];

    for (path, is_dir, expected) in cases {
        assert_eq!(
            gi.is_ignored(path, is_dir),
            expected,
            "is_ignored({path:?}, {is_dir})"
        );
    }

    Ok(())
}

#[test]
fn pattern_translation_is_exact() {
    assert_eq!(glob_to_regex("*.log"), r"(^|.*?/)[^/]*\.log(/.*)?$");
    assert_eq!(glob_to_regex("node_modules"), "(^|.*?/)node_modules(/.*)?$");
    assert_eq!(glob_to_regex("/build"), "^build(/.*)?$");
}

#[test]
fn anchored_pattern_only_matches_at_root() {
    let gi = matcher(&["/build"]);

    assert!(gi.is_ignored("build", true));
    assert!(gi.is_ignored("build/out.o", false));
    assert!(!gi.is_ignored("sub/build", true));
    assert!(!gi.is_ignored("builder", false));
}

#[test]
fn unanchored_pattern_matches_at_any_depth() {
    let gi = matcher(&["build"]);

    assert!(gi.is_ignored("build", false));
    assert!(gi.is_ignored("sub/build", true));
    assert!(gi.is_ignored("a/b/build/c.txt", false));
    assert!(!gi.is_ignored("rebuild", false));
}

#[test]
fn last_matching_rule_wins() {
    let gi = matcher(&["*.log", "!important.log"]);
    assert!(gi.is_ignored("app.log", false));
    assert!(!gi.is_ignored("important.log", false));

    let reversed = matcher(&["!important.log", "*.log"]);
    assert!(reversed.is_ignored("important.log", false));

    let only_negation = matcher(&["!keep.txt"]);
    assert!(!only_negation.is_ignored("keep.txt", false));
}

#[test]
fn directory_only_rules_skip_files() {
    let gi = matcher(&["temp/"]);
    assert!(gi.is_ignored("temp", true));
    assert!(!gi.is_ignored("temp", false));
    // The directory itself is excluded from listings, so its files are never
    // visited; on its own the rule does not apply to file paths.
    assert!(!gi.is_ignored("temp/file.txt", false));

    let with_file_rule = matcher(&["temp/", "temp"]);
    assert!(with_file_rule.is_ignored("temp", false));
}

#[test]
fn double_star_spans_directories() {
    let docs = matcher(&["docs/**/*.md"]);
    assert!(docs.is_ignored("docs/readme.md", false));
    assert!(docs.is_ignored("docs/a/b/readme.md", false));
    assert!(!docs.is_ignored("docs/readme.txt", false));

    let target = matcher(&["**/target"]);
    assert!(target.is_ignored("target", true));
    assert!(target.is_ignored("crates/core/target", true));

    let trailing = matcher(&["/vendor/**"]);
    assert!(trailing.is_ignored("vendor/lib/x.c", false));
}

#[test]
fn single_char_wildcard_excludes_separator() {
    let gi = matcher(&["file?.txt"]);
    assert!(gi.is_ignored("file1.txt", false));
    assert!(!gi.is_ignored("file10.txt", false));
    assert!(!gi.is_ignored("file/.txt", false));
}

#[test]
fn regex_metacharacters_are_literal() {
    let gi = matcher(&["a+b(1).txt", "[draft]"]);
    assert!(gi.is_ignored("a+b(1).txt", false));
    assert!(!gi.is_ignored("aab(1).txt", false));
    assert!(gi.is_ignored("[draft]", false));
    assert!(!gi.is_ignored("d", false));
}

#[test]
fn backslash_separators_are_normalized() {
    let gi = matcher(&["/build"]);
    assert!(gi.is_ignored("build\\out.o", false));
}

#[test]
fn blank_comment_and_empty_pattern_lines_are_skipped() {
    let gi = matcher(&["# comment", "", "   ", "!", "/", "!/", "*.tmp"]);
    assert_eq!(gi.len(), 1);
    assert_eq!(gi.rules()[0].source(), "*.tmp");
}

#[test]
fn rule_flags_are_parsed() -> TestResult {
    let rule = IgnoreRule::parse("  !/out/  ")?.ok_or("expected a rule")?;
    assert!(rule.is_negated());
    assert!(rule.is_dir_only());
    assert_eq!(rule.source(), "!/out/");
    assert_eq!(rule.regex(), "^out(/.*)?$");

    assert!(IgnoreRule::parse("# nothing")?.is_none());
    Ok(())
}

#[test]
fn missing_ignore_file_is_permissive() -> TestResult {
    let repo = RepoFixture::new()?;
    let gi = IgnoreMatcher::load(&RealFileSystem, repo.path(), ".gitignore");
    assert!(gi.is_empty());
    assert!(!gi.is_ignored("anything", false));
    Ok(())
}

#[test]
fn ignore_file_loads_through_mock_fs() {
    let fs = MockFileSystem::new();
    fs.add_file("./.customignore", b"*.bak\n");

    let gi = IgnoreMatcher::load(&fs, Path::new("."), ".customignore");
    assert_eq!(gi.len(), 1);
    assert!(gi.is_ignored("notes.bak", false));

    // A directory with the ignore file's name is not an ignore file.
    fs.add_dir("./.otherignore");
    assert!(IgnoreMatcher::load(&fs, Path::new("."), ".otherignore").is_empty());
}

proptest! {
    #[test]
    fn unmatched_paths_are_never_ignored(
        rules in proptest::collection::vec("x[a-z]{0,6}(/)?", 0..8),
        segments in proptest::collection::vec("y[a-z]{0,6}", 1..4),
        is_dir in any::<bool>(),
    ) {
        let gi = IgnoreMatcher::from_lines(rules.iter());
        let path = segments.join("/");
        prop_assert!(!gi.is_ignored(&path, is_dir));
    }

    #[test]
    fn trailing_negation_always_unignores(
        name in "[a-z]{1,8}",
        is_dir in any::<bool>(),
    ) {
        let gi = IgnoreMatcher::from_lines([name.clone(), "*".to_string(), format!("!{name}")]);
        prop_assert!(!gi.is_ignored(&name, is_dir));
    }
}
