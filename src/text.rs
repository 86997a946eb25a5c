use thiserror::Error;

/// Failure converting between the 8-bit transmission encoding and a wide
/// code-unit buffer at the process boundary.
#[derive(Error, Debug)]
pub enum WidthError {
    #[error("buffer is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unpaired surrogate at unit offset {offset}")]
    UnpairedSurrogate { offset: usize },

    #[error("invalid scalar value {value:#x} at unit offset {offset}")]
    InvalidScalar { value: u32, offset: usize },
}

/// The fixed-width storage unit of a text representation: 8-, 16- or 32-bit.
///
/// The substitution pipeline is generic over this trait; everything
/// width-specific (character boundaries, boundary transcoding) lives behind
/// it, so the engine is written once rather than per width.
pub trait CodeUnit: Copy + Eq + std::fmt::Debug + 'static {
    /// Widen an ASCII byte into a unit of this width.
    fn from_ascii(byte: u8) -> Self;

    /// Numeric value of the unit.
    fn value(self) -> u32;

    /// Offset just past the whole character starting at `pos`.
    ///
    /// Always returns at least `pos + 1`, including when `pos` is at or past
    /// the end of `units` or does not sit on a character boundary.
    fn char_step(units: &[Self], pos: usize) -> usize;

    /// Decode UTF-8 text into code units. Process boundary only.
    fn units_from_str(text: &str) -> Vec<Self>;

    /// Encode code units back into UTF-8 text. Process boundary only.
    fn units_to_string(units: &[Self]) -> Result<String, WidthError>;

    /// The unit as an ASCII byte, if it is one.
    fn as_ascii(self) -> Option<u8> {
        u8::try_from(self.value()).ok().filter(u8::is_ascii)
    }
}

/// Printable stand-in for a code unit in diagnostics.
pub(crate) fn display_char<U: CodeUnit>(unit: U) -> char {
    char::from_u32(unit.value()).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl CodeUnit for u8 {
    fn from_ascii(byte: u8) -> Self {
        byte
    }

    fn value(self) -> u32 {
        u32::from(self)
    }

    fn char_step(units: &[Self], pos: usize) -> usize {
        let Some(&byte) = units.get(pos) else {
            return pos + 1;
        };
        let width = match byte {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            // continuation or invalid byte: resync one unit at a time
            _ => 1,
        };
        (pos + width).min(units.len())
    }

    fn units_from_str(text: &str) -> Vec<Self> {
        text.as_bytes().to_vec()
    }

    fn units_to_string(units: &[Self]) -> Result<String, WidthError> {
        Ok(String::from_utf8(units.to_vec())?)
    }
}

impl CodeUnit for u16 {
    fn from_ascii(byte: u8) -> Self {
        Self::from(byte)
    }

    fn value(self) -> u32 {
        u32::from(self)
    }

    fn char_step(units: &[Self], pos: usize) -> usize {
        let Some(&unit) = units.get(pos) else {
            return pos + 1;
        };
        let paired = (0xD800..=0xDBFF).contains(&unit)
            && units
                .get(pos + 1)
                .is_some_and(|next| (0xDC00..=0xDFFF).contains(next));
        if paired {
            pos + 2
        } else {
            pos + 1
        }
    }

    fn units_from_str(text: &str) -> Vec<Self> {
        text.encode_utf16().collect()
    }

    fn units_to_string(units: &[Self]) -> Result<String, WidthError> {
        let mut out = String::with_capacity(units.len());
        let mut offset = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    out.push(c);
                    offset += c.len_utf16();
                }
                Err(_) => return Err(WidthError::UnpairedSurrogate { offset }),
            }
        }
        Ok(out)
    }
}

impl CodeUnit for u32 {
    fn from_ascii(byte: u8) -> Self {
        Self::from(byte)
    }

    fn value(self) -> u32 {
        self
    }

    fn char_step(_units: &[Self], pos: usize) -> usize {
        pos + 1
    }

    fn units_from_str(text: &str) -> Vec<Self> {
        text.chars().map(u32::from).collect()
    }

    fn units_to_string(units: &[Self]) -> Result<String, WidthError> {
        let mut out = String::with_capacity(units.len());
        for (offset, &value) in units.iter().enumerate() {
            match char::from_u32(value) {
                Some(c) => out.push(c),
                None => return Err(WidthError::InvalidScalar { value, offset }),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_widths() {
        let text = "caf\u{e9} \u{1F600} plain";
        assert_eq!(u8::units_to_string(&u8::units_from_str(text)).unwrap(), text);
        assert_eq!(
            u16::units_to_string(&u16::units_from_str(text)).unwrap(),
            text
        );
        assert_eq!(
            u32::units_to_string(&u32::units_from_str(text)).unwrap(),
            text
        );
    }

    #[test]
    fn char_step_spans_multibyte_utf8() {
        let units = u8::units_from_str("\u{e9}a");
        assert_eq!(u8::char_step(&units, 0), 2);
        assert_eq!(u8::char_step(&units, 2), 3);
    }

    #[test]
    fn char_step_spans_surrogate_pair() {
        let units = u16::units_from_str("\u{1F600}a");
        assert_eq!(units.len(), 3);
        assert_eq!(u16::char_step(&units, 0), 2);
        assert_eq!(u16::char_step(&units, 2), 3);
    }

    #[test]
    fn char_step_past_end_still_advances() {
        let units = u8::units_from_str("a");
        assert_eq!(u8::char_step(&units, 1), 2);
        assert_eq!(u32::char_step(&[], 0), 1);
    }

    #[test]
    fn unpaired_surrogate_reports_offset() {
        let units = vec![u16::from(b'a'), 0xD800];
        match u16::units_to_string(&units) {
            Err(WidthError::UnpairedSurrogate { offset }) => assert_eq!(offset, 1),
            other => panic!("expected unpaired surrogate, got {other:?}"),
        }
    }

    #[test]
    fn invalid_scalar_reports_offset() {
        let units = vec![u32::from(b'a'), 0x0011_0000];
        match u32::units_to_string(&units) {
            Err(WidthError::InvalidScalar { offset, .. }) => assert_eq!(offset, 1),
            other => panic!("expected invalid scalar, got {other:?}"),
        }
    }

    #[test]
    fn ascii_probe() {
        assert_eq!(u16::from(b'g').as_ascii(), Some(b'g'));
        assert_eq!(0x1F600u32.as_ascii(), None);
    }
}
