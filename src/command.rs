//! Raw command parsing.
//!
//! A command has the classic sed shape `<sep>pattern<sep>replacement<sep>flags`,
//! where the first code unit of the command picks the delimiter. Any
//! non-alphanumeric, non-backslash character works, so patterns containing
//! `/` can use another delimiter instead of escaping.

use crate::matcher::CompileOptions;
use crate::text::{display_char, CodeUnit};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("delimiter '{delimiter}' must not be alphanumeric or backslash")]
    BadDelimiter { delimiter: char },

    #[error("command needs three '{delimiter}'-separated segments, found {found}")]
    MissingSegments { delimiter: char, found: usize },
}

/// Scan-time behavior switches from the flags segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFlags {
    /// `g`: replace every non-overlapping match instead of only the first.
    pub global: bool,
}

/// A command split into its three segments, with `\<sep>` escapes resolved
/// and the flags segment decoded.
#[derive(Debug)]
pub struct ParsedCommand<U> {
    pub pattern: Vec<U>,
    pub replacement: Vec<U>,
    pub flags: JobFlags,
    pub options: CompileOptions,
    /// Flag characters nobody recognizes. The caller reports them as a
    /// warning; they never fail the command.
    pub unknown_flags: Vec<char>,
}

pub fn parse<U: CodeUnit>(command: &[U]) -> Result<ParsedCommand<U>, CommandError> {
    let Some((&delimiter, rest)) = command.split_first() else {
        return Err(CommandError::Empty);
    };

    let delimiter_char = display_char(delimiter);
    let backslash = U::from_ascii(b'\\');
    if delimiter_char.is_alphanumeric() || delimiter == backslash {
        return Err(CommandError::BadDelimiter {
            delimiter: delimiter_char,
        });
    }

    // Split on unescaped delimiters. Once the flags segment begins there is
    // nothing left to escape: delimiters there are just (unknown) flag
    // characters.
    let mut segments: Vec<Vec<U>> = vec![Vec::new()];
    let mut i = 0;
    while i < rest.len() {
        let unit = rest[i];
        if segments.len() < 3 {
            if unit == backslash && i + 1 < rest.len() {
                let next = rest[i + 1];
                if next == delimiter {
                    push_unit(&mut segments, delimiter);
                } else {
                    push_unit(&mut segments, backslash);
                    push_unit(&mut segments, next);
                }
                i += 2;
                continue;
            }
            if unit == delimiter {
                segments.push(Vec::new());
                i += 1;
                continue;
            }
        }
        push_unit(&mut segments, unit);
        i += 1;
    }

    if segments.len() < 3 {
        return Err(CommandError::MissingSegments {
            delimiter: delimiter_char,
            found: segments.len(),
        });
    }

    let flag_units = segments.pop().unwrap_or_default();
    let replacement = segments.pop().unwrap_or_default();
    let pattern = segments.pop().unwrap_or_default();

    let mut flags = JobFlags::default();
    let mut options = CompileOptions::default();
    let mut unknown_flags = Vec::new();
    for unit in flag_units {
        match unit.as_ascii() {
            Some(b'g') => flags.global = true,
            Some(b'i') => options.case_insensitive = true,
            Some(b'm') => options.multiline = true,
            Some(b's') => options.dot_matches_newline = true,
            Some(b'x') => options.extended = true,
            _ => unknown_flags.push(display_char(unit)),
        }
    }

    Ok(ParsedCommand {
        pattern,
        replacement,
        flags,
        options,
        unknown_flags,
    })
}

fn push_unit<U: CodeUnit>(segments: &mut [Vec<U>], unit: U) {
    if let Some(segment) = segments.last_mut() {
        segment.push(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bytes(command: &[u8]) -> Result<ParsedCommand<u8>, CommandError> {
        parse(command)
    }

    #[test]
    fn splits_three_segments() {
        let parsed = parse_bytes(b"/abc/xyz/g").unwrap();
        assert_eq!(parsed.pattern, b"abc");
        assert_eq!(parsed.replacement, b"xyz");
        assert!(parsed.flags.global);
        assert!(parsed.unknown_flags.is_empty());
    }

    #[test]
    fn empty_flags_segment_is_fine() {
        let parsed = parse_bytes(b"/a/b/").unwrap();
        assert!(!parsed.flags.global);
    }

    #[test]
    fn any_punctuation_delimiter_works() {
        let parsed = parse_bytes(b"#http://x#y#").unwrap();
        assert_eq!(parsed.pattern, b"http://x");
        assert_eq!(parsed.replacement, b"y");
    }

    #[test]
    fn escaped_delimiter_becomes_literal() {
        let parsed = parse_bytes(br"/a\/b/c/").unwrap();
        assert_eq!(parsed.pattern, b"a/b");
    }

    #[test]
    fn escaped_backslash_stays_escaped() {
        // `\\` is for the pattern compiler, not the splitter
        let parsed = parse_bytes(br"/a\\/b/").unwrap();
        assert_eq!(parsed.pattern, br"a\\");
        assert_eq!(parsed.replacement, b"b");
    }

    #[test]
    fn alphanumeric_delimiter_rejected() {
        assert!(matches!(
            parse_bytes(b"sabc"),
            Err(CommandError::BadDelimiter { delimiter: 's' })
        ));
    }

    #[test]
    fn backslash_delimiter_rejected() {
        assert!(matches!(
            parse_bytes(br"\a\b\"),
            Err(CommandError::BadDelimiter { .. })
        ));
    }

    #[test]
    fn missing_segments_rejected() {
        assert!(matches!(
            parse_bytes(b"/only-pattern"),
            Err(CommandError::MissingSegments { found: 1, .. })
        ));
        assert!(matches!(
            parse_bytes(b"/pat/rep"),
            Err(CommandError::MissingSegments { found: 2, .. })
        ));
        assert!(matches!(parse_bytes(b""), Err(CommandError::Empty)));
    }

    #[test]
    fn compile_flags_decode() {
        let parsed = parse_bytes(b"/a/b/imsx").unwrap();
        assert!(parsed.options.case_insensitive);
        assert!(parsed.options.multiline);
        assert!(parsed.options.dot_matches_newline);
        assert!(parsed.options.extended);
    }

    #[test]
    fn unknown_flags_collected_not_fatal() {
        let parsed = parse_bytes(b"/a/b/gQz").unwrap();
        assert!(parsed.flags.global);
        assert_eq!(parsed.unknown_flags, vec!['Q', 'z']);
    }

    #[test]
    fn delimiter_in_flags_segment_is_unknown_flag() {
        let parsed = parse_bytes(b"/a/b/g/").unwrap();
        assert!(parsed.flags.global);
        assert_eq!(parsed.unknown_flags, vec!['/']);
    }

    #[test]
    fn wide_units_parse_too() {
        let command: Vec<u16> = "/\u{1F600}/x/g".encode_utf16().collect();
        let parsed = parse::<u16>(&command).unwrap();
        assert_eq!(parsed.pattern.len(), 2);
        assert!(parsed.flags.global);
    }
}
