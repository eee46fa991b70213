// src/ignore/pattern.rs

//! Translation of ignore globs into regular expressions.

/// Translate a single ignore glob (already stripped of `!` and a trailing
/// `/`) into a regex source string.
///
/// - A leading `/` anchors the pattern to the repository root.
/// - `**/` matches zero or more leading directories, any other `**` matches
///   anything including `/`.
/// - `*` matches any run of characters except `/`.
/// - `?` matches exactly one character except `/`.
/// - Everything else is literal.
///
/// The result also matches any path below a match (`(/.*)?$`), so a
/// directory pattern covers its contents.
pub fn glob_to_regex(pattern: &str) -> String {
    let (anchored, body) = match pattern.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };

    let translated = translate_body(body);

    if anchored {
        format!("^{translated}(/.*)?$")
    } else {
        format!("(^|.*?/){translated}(/.*)?$")
    }
}

fn translate_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len() * 2);
    let mut chars = body.chars().peekable();
    let mut literal = [0u8; 4];

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut literal))),
        }
    }

    out
}
