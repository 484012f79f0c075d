//! Buffering and decoding of `\uXXXX` escape sequences.
//!
//! The [`UnicodeEscapeBuffer`] accumulates four ASCII hexadecimal digits and
//! yields the UTF-16 code unit they spell. Surrogate halves are returned as
//! code units; pairing them into a scalar value is left to the lexer via
//! [`combine_surrogates`].

use super::SyntaxError;

#[derive(Debug)]
pub(crate) struct UnicodeEscapeBuffer {
    buffer: [u8; 4],
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self {
            buffer: [0; 4],
            len: 0,
        }
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Feeds one ASCII hex digit.
    ///
    /// Returns `Ok(Some(unit))` once four digits have been collected, and
    /// resets for the next escape.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, SyntaxError> {
        if !b.is_ascii_hexdigit() {
            return Err(SyntaxError::InvalidUnicodeEscapeChar(char::from(b)));
        }

        self.buffer[usize::from(self.len)] = b;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self
            .buffer
            .iter()
            .fold(0u16, |acc, &digit| (acc << 4) | u16::from(hex_value(digit)));
        self.reset();
        Ok(Some(unit))
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combines a high and low surrogate into the scalar value they encode.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
