//! Replacement templates.
//!
//! The replacement segment of a command is parsed once, at job-compile time,
//! into literal runs and capture references. References are resolved and
//! range-checked against the compiled pattern here, so a bad `\7` fails the
//! job up front instead of surfacing mid-substitution.

use crate::matcher::{MatchSpans, Matcher};
use crate::text::{display_char, CodeUnit};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("back-reference \\{index} exceeds the pattern's {groups} capture group(s)")]
    GroupOutOfRange { index: usize, groups: usize },

    #[error("unknown group name '{name}' in replacement")]
    UnknownGroupName { name: String },

    #[error("malformed named back-reference, expected \\g<name>")]
    MalformedNamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<U> {
    Literal(Vec<U>),
    Group(usize),
}

/// A parsed replacement: literal runs interleaved with capture references.
///
/// `\N` (consecutive digits) references group N, with group 0 the whole
/// match; `\g<name>` references a named group by its resolved index. `\\`,
/// `\n`, `\t` and `\r` unescape to the usual characters; any other escaped
/// character is emitted literally.
#[derive(Debug, Clone)]
pub struct Template<U> {
    segments: Vec<Segment<U>>,
}

impl<U: CodeUnit> Template<U> {
    /// Parse a replacement segment, resolving references against `pattern`.
    pub fn parse<M>(replacement: &[U], pattern: &M) -> Result<Self, TemplateError>
    where
        M: Matcher<Unit = U>,
    {
        let backslash = U::from_ascii(b'\\');
        let mut segments = Vec::new();
        let mut literal: Vec<U> = Vec::new();
        let mut i = 0;

        while i < replacement.len() {
            let unit = replacement[i];
            if unit != backslash || i + 1 == replacement.len() {
                literal.push(unit);
                i += 1;
                continue;
            }

            let next = replacement[i + 1];
            match next.as_ascii() {
                Some(b'0'..=b'9') => {
                    let mut index = 0usize;
                    let mut j = i + 1;
                    while j < replacement.len() {
                        match replacement[j].as_ascii() {
                            Some(d) if d.is_ascii_digit() => {
                                index = index
                                    .saturating_mul(10)
                                    .saturating_add(usize::from(d - b'0'));
                                j += 1;
                            }
                            _ => break,
                        }
                    }
                    if index >= pattern.group_count() {
                        return Err(TemplateError::GroupOutOfRange {
                            index,
                            groups: pattern.group_count(),
                        });
                    }
                    flush(&mut segments, &mut literal);
                    segments.push(Segment::Group(index));
                    i = j;
                }
                Some(b'g') => {
                    let (name, after) = read_group_name(replacement, i + 2)?;
                    let Some(index) = pattern.group_index(&name) else {
                        return Err(TemplateError::UnknownGroupName { name });
                    };
                    flush(&mut segments, &mut literal);
                    segments.push(Segment::Group(index));
                    i = after;
                }
                Some(b'n') => {
                    literal.push(U::from_ascii(b'\n'));
                    i += 2;
                }
                Some(b't') => {
                    literal.push(U::from_ascii(b'\t'));
                    i += 2;
                }
                Some(b'r') => {
                    literal.push(U::from_ascii(b'\r'));
                    i += 2;
                }
                _ => {
                    // unknown escape keeps the escaped character itself
                    literal.push(next);
                    i += 2;
                }
            }
        }

        flush(&mut segments, &mut literal);
        Ok(Self { segments })
    }

    /// Render this template for one match, appending to `out`.
    ///
    /// Pure over its inputs: literal runs verbatim, group references append
    /// the captured span of `source`, and a group that did not participate
    /// appends nothing.
    pub fn render_into(&self, out: &mut Vec<U>, spans: &MatchSpans, source: &[U]) {
        for segment in &self.segments {
            match segment {
                Segment::Literal(units) => out.extend_from_slice(units),
                Segment::Group(index) => {
                    if let Some(Some(span)) = spans.groups.get(*index) {
                        out.extend_from_slice(&source[span.start..span.end]);
                    }
                }
            }
        }
    }

    /// Convenience wrapper over [`render_into`](Self::render_into).
    #[must_use]
    pub fn render(&self, spans: &MatchSpans, source: &[U]) -> Vec<U> {
        let mut out = Vec::new();
        self.render_into(&mut out, spans, source);
        out
    }
}

fn flush<U>(segments: &mut Vec<Segment<U>>, literal: &mut Vec<U>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

/// Read `<name>` starting at `at`, returning the name and the offset just
/// past the closing `>`.
fn read_group_name<U: CodeUnit>(
    replacement: &[U],
    at: usize,
) -> Result<(String, usize), TemplateError> {
    if replacement.get(at).and_then(|u| u.as_ascii()) != Some(b'<') {
        return Err(TemplateError::MalformedNamedRef);
    }
    let mut name = String::new();
    let mut j = at + 1;
    while j < replacement.len() {
        let unit = replacement[j];
        if unit.as_ascii() == Some(b'>') {
            if name.is_empty() {
                return Err(TemplateError::MalformedNamedRef);
            }
            return Ok((name, j + 1));
        }
        name.push(display_char(unit));
        j += 1;
    }
    Err(TemplateError::MalformedNamedRef)
}
