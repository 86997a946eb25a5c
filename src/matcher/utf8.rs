use crate::matcher::errors::{CompileError, ExecError};
use crate::matcher::{build_regex, named_group_index, CompileOptions, MatchSpans, Matcher, Span};

/// 8-bit adapter: UTF-8 text, where the engine's byte offsets are already
/// the code-unit offsets the regex reports. No transcoding anywhere.
#[derive(Debug)]
pub struct Utf8Matcher {
    regex: fancy_regex::Regex,
}

impl Matcher for Utf8Matcher {
    type Unit = u8;

    fn compile(pattern: &[u8], options: CompileOptions) -> Result<Self, CompileError> {
        let pattern =
            std::str::from_utf8(pattern).map_err(|e| CompileError::InvalidPatternText {
                message: e.to_string(),
            })?;
        Ok(Self {
            regex: build_regex(pattern, options)?,
        })
    }

    fn find_at(&self, haystack: &[u8], start: usize) -> Result<Option<MatchSpans>, ExecError> {
        if start > haystack.len() {
            return Ok(None);
        }
        let text = std::str::from_utf8(haystack).map_err(|e| ExecError::InvalidText {
            message: e.to_string(),
        })?;
        let captures = self
            .regex
            .captures_from_pos(text, start)
            .map_err(|e| ExecError::Runtime {
                message: e.to_string(),
            })?;

        if let Some(caps) = captures {
            if let Some(whole) = caps.get(0) {
                let groups = (0..caps.len())
                    .map(|i| caps.get(i).map(|m| Span::new(m.start(), m.end())))
                    .collect();
                return Ok(Some(MatchSpans {
                    start: whole.start(),
                    end: whole.end(),
                    groups,
                }));
            }
        }
        Ok(None)
    }

    fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        named_group_index(&self.regex, name)
    }
}
