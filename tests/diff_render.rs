// tests/diff_render.rs
mod common;
use crate::common::init_tracing;

use std::error::Error;

use proptest::prelude::*;
use repowatch::diff::{render_diff, ChangeKind, ChangeSet, DiffEngine, FileDiff, HunkHeader};
use repowatch::errors::RepowatchError;
use repowatch::types::DiffAlgorithm;

type TestResult = Result<(), Box<dyn Error>>;

/// Lines after the hunk header.
fn body(diff: &FileDiff) -> Vec<&str> {
    diff.patch
        .lines()
        .skip_while(|l| !l.starts_with("@@"))
        .skip(1)
        .collect()
}

const NO_NEWLINE: &str = "\\ No newline at end of file";

fn hunk_line(diff: &FileDiff) -> Option<&str> {
    diff.patch.lines().find(|l| l.starts_with("@@"))
}

#[test]
fn new_file_counts_every_line_as_added() {
    init_tracing();

    let engine = DiffEngine::default();
    let diff = engine.render("src/lib.rs", None, Some("a\nb"));

    assert_eq!(diff.change_type, ChangeKind::Added);
    assert_eq!((diff.additions(), diff.deletions()), (2, 0));
    assert!(diff.patch.contains("new file mode 100644\n"));
    assert!(diff.patch.contains("--- /dev/null\n+++ b/src/lib.rs\n"));
    assert_eq!(hunk_line(&diff), Some("@@ -0,0 +1,2 @@"));
    assert_eq!(body(&diff), vec!["+a", "+b", NO_NEWLINE]);
}

#[test]
fn empty_old_side_is_all_additions() {
    let diff = render_diff("notes.txt", "", "a\nb");
    assert_eq!(diff.change_type, ChangeKind::Modified);
    assert_eq!((diff.additions(), diff.deletions()), (2, 0));
    // Modified-file ranges always start at line 1.
    assert_eq!(hunk_line(&diff), Some("@@ -1,0 +1,2 @@"));
}

#[test]
fn deleted_file_counts_every_line_as_removed() {
    let engine = DiffEngine::default();
    let diff = engine.render("old.txt", Some("a\nb"), None);

    assert_eq!(diff.change_type, ChangeKind::Deleted);
    assert_eq!((diff.additions(), diff.deletions()), (0, 2));
    assert!(diff.patch.contains("deleted file mode 100644\n"));
    assert!(diff.patch.contains("--- a/old.txt\n+++ /dev/null\n"));
    assert_eq!(hunk_line(&diff), Some("@@ -1,2 +0,0 @@"));
    assert_eq!(body(&diff), vec!["-a", "-b", NO_NEWLINE]);

    let emptied = render_diff("old.txt", "a\nb", "");
    assert_eq!((emptied.additions(), emptied.deletions()), (0, 2));
}

#[test]
fn identical_content_has_no_changes() {
    for algorithm in [DiffAlgorithm::Positional, DiffAlgorithm::Myers] {
        let diff = DiffEngine::new(algorithm).render("same.txt", Some("x\ny\n"), Some("x\ny\n"));

        assert!(!diff.has_changes(), "{algorithm:?}");
        assert!(
            body(&diff).iter().all(|l| l.starts_with(' ')),
            "{algorithm:?}: {}",
            diff.patch
        );
    }
}

#[test]
fn modified_header_is_stable() {
    let diff = render_diff("src/main.rs", "fn main() {}", "fn main() { run() }");

    let header: Vec<&str> = diff.patch.lines().take(5).collect();
    assert_eq!(
        header,
        vec![
            "diff --git a/src/main.rs b/src/main.rs",
            "index 0000000..0000000",
            "--- a/src/main.rs",
            "+++ b/src/main.rs",
            "@@ -1,1 +1,1 @@",
        ]
    );
    assert!(diff.patch.ends_with('\n'));
}

#[test]
fn single_line_edit_shows_both_versions() {
    let diff = render_diff("test.txt", "Hello, World!", "Hello, Modified World!");

    assert!(diff.patch.contains("-Hello, World!\n"));
    assert!(diff.patch.contains("+Hello, Modified World!\n"));
    assert_eq!((diff.additions(), diff.deletions()), (1, 1));
}

#[test]
fn positional_alignment_pairs_lines_by_index() {
    let diff = render_diff("f.txt", "a\nb\nc\n", "a\nB\nc\nd\n");

    assert_eq!(hunk_line(&diff), Some("@@ -1,3 +1,4 @@"));
    assert_eq!(body(&diff), vec![" a", "-b", "+B", " c", "+d"]);
    assert_eq!((diff.additions(), diff.deletions()), (2, 1));
}

#[test]
fn positional_insertion_at_top_shifts_every_line() {
    let diff = render_diff("f.txt", "a\nb\n", "x\na\nb\n");

    assert_eq!(body(&diff), vec!["-a", "+x", "-b", "+a", "+b"]);
    assert_eq!((diff.additions(), diff.deletions()), (3, 2));
}

#[test]
fn myers_alignment_finds_the_insertion() {
    let engine = DiffEngine::new(DiffAlgorithm::Myers);
    let diff = engine.render("f.txt", Some("a\nb\n"), Some("x\na\nb\n"));

    assert_eq!(body(&diff), vec!["+x", " a", " b"]);
    assert_eq!((diff.additions(), diff.deletions()), (1, 0));
    assert_eq!(hunk_line(&diff), Some("@@ -1,2 +1,3 @@"));
}

#[test]
fn line_ending_conversion_is_a_change() {
    for algorithm in [DiffAlgorithm::Positional, DiffAlgorithm::Myers] {
        let engine = DiffEngine::new(algorithm);

        let diff = engine.render("win.txt", Some("a\r\nb\r\n"), Some("a\nb\n"));
        assert!(diff.has_changes(), "{algorithm:?}: {}", diff.patch);
        assert_eq!((diff.additions(), diff.deletions()), (2, 2), "{algorithm:?}");
        assert!(diff.patch.contains("-a\r\n"));
        assert!(diff.patch.contains("+a\n"));

        let same = engine.render("win.txt", Some("a\r\nb\r\n"), Some("a\r\nb\r\n"));
        assert!(!same.has_changes(), "{algorithm:?}");
    }
}

#[test]
fn trailing_newline_change_is_a_change() {
    for algorithm in [DiffAlgorithm::Positional, DiffAlgorithm::Myers] {
        let engine = DiffEngine::new(algorithm);

        let added = engine.render("eof.txt", Some("a\nb"), Some("a\nb\n"));
        assert_eq!((added.additions(), added.deletions()), (1, 1), "{algorithm:?}");
        assert_eq!(body(&added), vec![" a", "-b", NO_NEWLINE, "+b"], "{algorithm:?}");

        let removed = engine.render("eof.txt", Some("a\nb\n"), Some("a\nb"));
        assert_eq!((removed.additions(), removed.deletions()), (1, 1), "{algorithm:?}");
        assert_eq!(body(&removed), vec![" a", "-b", "+b", NO_NEWLINE], "{algorithm:?}");
    }
}

#[test]
fn blank_final_line_is_kept() {
    let diff = render_diff("f.txt", "a\n", "a\n\n");
    assert_eq!(body(&diff), vec![" a", "+"]);
    assert_eq!(diff.additions(), 1);
}

#[test]
fn hunk_header_uses_zero_start_for_empty_side() {
    assert_eq!(HunkHeader::whole_file(0, 0).to_string(), "@@ -0,0 +0,0 @@");
    assert_eq!(HunkHeader::whole_file(3, 0).to_string(), "@@ -1,3 +0,0 @@");
    assert_eq!(HunkHeader::whole_file(2, 5).to_string(), "@@ -1,2 +1,5 @@");

    assert_eq!(HunkHeader::modified(0, 2).to_string(), "@@ -1,0 +1,2 @@");
    assert_eq!(HunkHeader::modified(3, 0).to_string(), "@@ -1,3 +1,0 @@");
}

#[test]
fn both_sides_missing_is_an_empty_modification() {
    let diff = DiffEngine::default().render("ghost", None, None);
    assert_eq!(diff.change_type, ChangeKind::Modified);
    assert!(!diff.has_changes());
    assert_eq!(hunk_line(&diff), Some("@@ -1,0 +1,0 @@"));
}

#[test]
fn non_utf8_content_is_rejected() {
    let engine = DiffEngine::default();

    let err = engine
        .render_bytes("image.png", Some(b"\x89PNG\xff\xfe".as_slice()), Some(b"text".as_slice()))
        .unwrap_err();
    assert!(matches!(err, RepowatchError::BinaryContent(ref p) if p == "image.png"));

    let ok = engine.render_bytes("a.txt", None, Some(b"hello\n".as_slice())).unwrap();
    assert_eq!(ok.additions(), 1);
}

#[test]
fn change_set_totals_and_json_shape() -> TestResult {
    let engine = DiffEngine::default();
    let set: ChangeSet = vec![
        engine.render("new.txt", None, Some("a\nb")),
        engine.render("gone.txt", Some("x"), None),
        render_diff("edit.txt", "1\n2", "1\n3"),
    ]
    .into_iter()
    .collect();

    let stats = set.stats();
    assert_eq!(stats.files_changed, 3);
    assert_eq!(stats.additions, 3);
    assert_eq!(stats.deletions, 2);

    let json = serde_json::to_value(&set)?;
    assert_eq!(json["stats"]["files_changed"], 3);
    assert_eq!(json["stats"]["additions"], 3);
    assert_eq!(json["changes"][0]["path"], "new.txt");
    assert_eq!(json["changes"][0]["change_type"], "added");
    assert_eq!(json["changes"][0]["additions"], 2);
    assert_eq!(json["changes"][1]["change_type"], "deleted");
    assert_eq!(json["changes"][2]["change_type"], "modified");
    assert!(json["changes"][2]["patch"].as_str().is_some_and(|p| p.contains("+3")));

    assert!(ChangeSet::new().stats() == Default::default());
    Ok(())
}

fn content() -> impl Strategy<Value = String> {
    proptest::collection::vec("[abc]{0,3}", 0..12).prop_map(|lines| lines.join("\n"))
}

fn algorithm() -> impl Strategy<Value = DiffAlgorithm> {
    prop_oneof![Just(DiffAlgorithm::Positional), Just(DiffAlgorithm::Myers)]
}

proptest! {
    #[test]
    fn stats_match_emitted_lines(old in content(), new in content(), algorithm in algorithm()) {
        let diff = DiffEngine::new(algorithm).render("p.txt", Some(&old), Some(&new));
        let lines = body(&diff);

        let plus = lines.iter().filter(|l| l.starts_with('+')).count();
        let minus = lines.iter().filter(|l| l.starts_with('-')).count();
        prop_assert_eq!(diff.additions(), plus);
        prop_assert_eq!(diff.deletions(), minus);

        // Every line of both sides is accounted for.
        let context = lines.iter().filter(|l| l.starts_with(' ')).count();
        prop_assert_eq!(context + minus, old.split_terminator('\n').count());
        prop_assert_eq!(context + plus, new.split_terminator('\n').count());
    }

    #[test]
    fn identical_sides_never_change(text in content(), algorithm in algorithm()) {
        let diff = DiffEngine::new(algorithm).render("p.txt", Some(&text), Some(&text));
        prop_assert!(!diff.has_changes());
    }
}
