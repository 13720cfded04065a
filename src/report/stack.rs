//! Best-effort source-location extraction from error text
//!
//! Pure string-to-optional-struct parsing, kept independent of any live
//! error so it can be unit tested directly. The primary pattern matches
//! `in <path>:[line ]<number>` as emitted by managed-runtime stack traces;
//! the fallback matches backtrace frames of the form `at <path>:<line>[:<col>]`.

use once_cell::sync::Lazy;
use regex::Regex;

static IN_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"in\s+(\S+?):(?:line\s+)?(\d+)").expect("valid regex"));

static AT_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*at\s+(\S+?):(\d+)(?::\d+)?\s*$").expect("valid regex"));

/// A parsed `file:line` pair. `file` is the final path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// Parse the first source location out of an error's textual trace.
///
/// Returns `None` when neither pattern matches; callers leave both fields
/// absent in that case.
pub fn parse(trace: &str) -> Option<SourceLocation> {
    capture(&IN_LOCATION, trace).or_else(|| capture(&AT_FRAME, trace))
}

fn capture(pattern: &Regex, trace: &str) -> Option<SourceLocation> {
    let captures = pattern.captures(trace)?;
    let path = captures.get(1)?.as_str();
    let line = captures.get(2)?.as_str().parse().ok()?;
    Some(SourceLocation {
        file: file_name(path).to_owned(),
        line,
    })
}

/// Final component of a path, accepting both separators.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
