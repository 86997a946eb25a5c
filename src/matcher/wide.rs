//! 16- and 32-bit adapters.
//!
//! The backtracking engine matches UTF-8 text, so each probe decodes the
//! wide haystack into a UTF-8 view plus a per-character offset table and
//! translates spans back into code-unit offsets. The view is adapter-private
//! scratch; nothing about it is visible to the pipeline beyond performance.

use crate::matcher::errors::{CompileError, ExecError};
use crate::matcher::{build_regex, named_group_index, CompileOptions, MatchSpans, Matcher, Span};
use crate::text::{CodeUnit, WidthError};

/// UTF-8 rendering of a wide haystack with one `(byte, unit)` offset pair
/// per character, plus a trailing end-of-text entry.
struct DecodedView {
    text: String,
    index: Vec<(usize, usize)>,
}

impl DecodedView {
    /// Byte offset of the character boundary at unit offset `unit`, if
    /// `unit` sits on one.
    fn byte_of_unit(&self, unit: usize) -> Option<usize> {
        self.index
            .binary_search_by_key(&unit, |&(_, u)| u)
            .ok()
            .map(|i| self.index[i].0)
    }

    /// Unit offset of the character boundary at `byte`. Offsets reported by
    /// the regex always land on boundaries; a mid-character byte rounds
    /// down.
    fn unit_of_byte(&self, byte: usize) -> usize {
        match self.index.binary_search_by_key(&byte, |&(b, _)| b) {
            Ok(i) => self.index[i].1,
            Err(i) => self.index[i.saturating_sub(1)].1,
        }
    }
}

fn utf16_view(units: &[u16]) -> Result<DecodedView, WidthError> {
    let mut text = String::with_capacity(units.len());
    let mut index = Vec::with_capacity(units.len() + 1);
    let mut byte = 0;
    let mut unit = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        let c = decoded.map_err(|_| WidthError::UnpairedSurrogate { offset: unit })?;
        index.push((byte, unit));
        text.push(c);
        byte += c.len_utf8();
        unit += c.len_utf16();
    }
    index.push((byte, unit));
    Ok(DecodedView { text, index })
}

fn utf32_view(units: &[u32]) -> Result<DecodedView, WidthError> {
    let mut text = String::with_capacity(units.len());
    let mut index = Vec::with_capacity(units.len() + 1);
    let mut byte = 0;
    for (unit, &value) in units.iter().enumerate() {
        let c = char::from_u32(value).ok_or(WidthError::InvalidScalar {
            value,
            offset: unit,
        })?;
        index.push((byte, unit));
        text.push(c);
        byte += c.len_utf8();
    }
    index.push((byte, units.len()));
    Ok(DecodedView { text, index })
}

/// Run one probe against a decoded view and translate spans back to units.
fn find_in_view(
    regex: &fancy_regex::Regex,
    view: &DecodedView,
    start: usize,
) -> Result<Option<MatchSpans>, ExecError> {
    let Some(byte_start) = view.byte_of_unit(start) else {
        return Ok(None);
    };
    let captures =
        regex
            .captures_from_pos(&view.text, byte_start)
            .map_err(|e| ExecError::Runtime {
                message: e.to_string(),
            })?;

    if let Some(caps) = captures {
        if let Some(whole) = caps.get(0) {
            let groups = (0..caps.len())
                .map(|i| {
                    caps.get(i)
                        .map(|m| Span::new(view.unit_of_byte(m.start()), view.unit_of_byte(m.end())))
                })
                .collect();
            return Ok(Some(MatchSpans {
                start: view.unit_of_byte(whole.start()),
                end: view.unit_of_byte(whole.end()),
                groups,
            }));
        }
    }
    Ok(None)
}

/// 16-bit adapter: offsets count UTF-16 code units, so a character outside
/// the basic plane occupies two.
pub struct Utf16Matcher {
    regex: fancy_regex::Regex,
}

impl Matcher for Utf16Matcher {
    type Unit = u16;

    fn compile(pattern: &[u16], options: CompileOptions) -> Result<Self, CompileError> {
        let pattern =
            u16::units_to_string(pattern).map_err(|e| CompileError::InvalidPatternText {
                message: e.to_string(),
            })?;
        Ok(Self {
            regex: build_regex(&pattern, options)?,
        })
    }

    fn find_at(&self, haystack: &[u16], start: usize) -> Result<Option<MatchSpans>, ExecError> {
        if start > haystack.len() {
            return Ok(None);
        }
        let view = utf16_view(haystack).map_err(|e| ExecError::InvalidText {
            message: e.to_string(),
        })?;
        find_in_view(&self.regex, &view, start)
    }

    fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        named_group_index(&self.regex, name)
    }
}

/// 32-bit adapter: one unit per scalar value.
pub struct Utf32Matcher {
    regex: fancy_regex::Regex,
}

impl Matcher for Utf32Matcher {
    type Unit = u32;

    fn compile(pattern: &[u32], options: CompileOptions) -> Result<Self, CompileError> {
        let pattern =
            u32::units_to_string(pattern).map_err(|e| CompileError::InvalidPatternText {
                message: e.to_string(),
            })?;
        Ok(Self {
            regex: build_regex(&pattern, options)?,
        })
    }

    fn find_at(&self, haystack: &[u32], start: usize) -> Result<Option<MatchSpans>, ExecError> {
        if start > haystack.len() {
            return Ok(None);
        }
        let view = utf32_view(haystack).map_err(|e| ExecError::InvalidText {
            message: e.to_string(),
        })?;
        find_in_view(&self.regex, &view, start)
    }

    fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        named_group_index(&self.regex, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_offsets_count_surrogate_pairs() {
        let haystack = u16::units_from_str("\u{1F600}abc");
        let m = Utf16Matcher::compile(&u16::units_from_str("abc"), CompileOptions::default())
            .unwrap();
        let found = m.find_at(&haystack, 0).unwrap().unwrap();
        assert_eq!((found.start, found.end), (2, 5));
    }

    #[test]
    fn utf16_capture_spans_translate() {
        let haystack = u16::units_from_str("\u{1F600}x\u{1F601}");
        let m = Utf16Matcher::compile(&u16::units_from_str("(x)"), CompileOptions::default())
            .unwrap();
        let found = m.find_at(&haystack, 0).unwrap().unwrap();
        assert_eq!(found.groups[1], Some(Span::new(2, 3)));
    }

    #[test]
    fn utf16_probe_from_offset() {
        let haystack = u16::units_from_str("aba");
        let m = Utf16Matcher::compile(&u16::units_from_str("a"), CompileOptions::default())
            .unwrap();
        let found = m.find_at(&haystack, 1).unwrap().unwrap();
        assert_eq!(found.start, 2);
    }

    #[test]
    fn utf16_unpaired_surrogate_is_exec_error() {
        let m = Utf16Matcher::compile(&u16::units_from_str("a"), CompileOptions::default())
            .unwrap();
        let err = m.find_at(&[u16::from(b'a'), 0xDC00], 0).unwrap_err();
        assert!(matches!(err, ExecError::InvalidText { .. }));
    }

    #[test]
    fn utf32_offsets_count_scalars() {
        let haystack = u32::units_from_str("\u{1F600}abc");
        let m = Utf32Matcher::compile(&u32::units_from_str("abc"), CompileOptions::default())
            .unwrap();
        let found = m.find_at(&haystack, 0).unwrap().unwrap();
        assert_eq!((found.start, found.end), (1, 4));
    }

    #[test]
    fn utf32_invalid_scalar_is_exec_error() {
        let m = Utf32Matcher::compile(&u32::units_from_str("a"), CompileOptions::default())
            .unwrap();
        let err = m.find_at(&[u32::from(b'a'), 0xD800], 0).unwrap_err();
        assert!(matches!(err, ExecError::InvalidText { .. }));
    }

    #[test]
    fn end_of_text_probe_matches_empty() {
        let haystack = u16::units_from_str("ab");
        let m = Utf16Matcher::compile(&u16::units_from_str("x*"), CompileOptions::default())
            .unwrap();
        let found = m.find_at(&haystack, 2).unwrap().unwrap();
        assert_eq!((found.start, found.end), (2, 2));
    }
}
