//! The external pattern-matching seam.
//!
//! The substitution pipeline consumes matching as a black box: compile a
//! pattern with a set of options, then probe a haystack from an offset and
//! get back the match span plus one optional span per capture group. The
//! [`Matcher`] trait is that contract; the adapters in this module implement
//! it per code-unit width on top of the `fancy-regex` backtracking engine.

pub mod errors;
mod utf8;
mod wide;

pub use errors::{CompileError, ExecError};
pub use utf8::Utf8Matcher;
pub use wide::{Utf16Matcher, Utf32Matcher};

use crate::text::CodeUnit;

/// Compile-time options derived from a job's flags segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// `i`: letters match either case.
    pub case_insensitive: bool,
    /// `m`: `^`/`$` also match at internal line boundaries.
    pub multiline: bool,
    /// `s`: `.` also matches newline.
    pub dot_matches_newline: bool,
    /// `x`: free-spacing pattern syntax.
    pub extended: bool,
    /// Backtracking budget for scan-time probes (`None` = engine default).
    pub backtrack_limit: Option<usize>,
}

/// A half-open span in code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// One match: the whole-match span plus one optional span per capture group.
///
/// `groups[0]` is always the whole match. A `None` entry means the group did
/// not participate in the match, which is a normal outcome for optional
/// groups, not an error.
#[derive(Debug, Clone)]
pub struct MatchSpans {
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Option<Span>>,
}

impl MatchSpans {
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The external matching capability the engine builds on.
pub trait Matcher: Sized {
    /// Code unit this matcher's offsets count in.
    type Unit: CodeUnit;

    /// Compile a pattern, or fail with a structured diagnostic.
    fn compile(pattern: &[Self::Unit], options: CompileOptions) -> Result<Self, CompileError>;

    /// Probe for the first match at or after `start`.
    ///
    /// Anchors and look-behind see the whole haystack, not a slice starting
    /// at `start`. A `start` past the end of the haystack is a plain
    /// no-match.
    fn find_at(
        &self,
        haystack: &[Self::Unit],
        start: usize,
    ) -> Result<Option<MatchSpans>, ExecError>;

    /// Number of capture groups, counting group 0 (the whole match).
    fn group_count(&self) -> usize;

    /// Index of a named capture group, if the pattern defines one.
    fn group_index(&self, name: &str) -> Option<usize>;
}

/// Build the underlying regex with the options folded in as inline flags.
pub(crate) fn build_regex(
    pattern: &str,
    options: CompileOptions,
) -> Result<fancy_regex::Regex, CompileError> {
    let mut inline = String::new();
    if options.case_insensitive {
        inline.push('i');
    }
    if options.multiline {
        inline.push('m');
    }
    if options.dot_matches_newline {
        inline.push('s');
    }
    if options.extended {
        inline.push('x');
    }

    let mut source = String::with_capacity(pattern.len() + inline.len() + 3);
    if !inline.is_empty() {
        source.push_str("(?");
        source.push_str(&inline);
        source.push(')');
    }
    source.push_str(pattern);

    let mut builder = fancy_regex::RegexBuilder::new(&source);
    if let Some(limit) = options.backtrack_limit {
        builder.backtrack_limit(limit);
    }
    builder.build().map_err(|e| CompileError::Syntax {
        message: e.to_string(),
    })
}

/// Find the index of `name` among the regex's capture names.
pub(crate) fn named_group_index(regex: &fancy_regex::Regex, name: &str) -> Option<usize> {
    regex.capture_names().position(|n| n == Some(name))
}
