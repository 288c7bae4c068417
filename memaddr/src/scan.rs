// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte cursor over definition text.

/// Forward-only cursor over ASCII definition text.
///
/// Non-ASCII bytes are never consumed by any of the `read_*`/`eat*` helpers, so every position the
/// cursor stops at is a valid `str` boundary.
#[derive(Clone, Debug)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + ahead).copied()
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// Consumes `byte` if it is next.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes `byte` if it is next, ignoring ASCII case.
    pub(crate) fn eat_ignore_case(&mut self, byte: u8) -> bool {
        match self.peek() {
            Some(b) if b.eq_ignore_ascii_case(&byte) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consumes `tag` if the remaining text starts with it, ignoring ASCII case.
    pub(crate) fn eat_tag(&mut self, tag: &str) -> bool {
        let rest = &self.text.as_bytes()[self.pos..];
        if rest.len() >= tag.len() && rest[..tag.len()].eq_ignore_ascii_case(tag.as_bytes()) {
            self.pos += tag.len();
            true
        } else {
            false
        }
    }

    fn digits(&self, radix: u32) -> usize {
        self.text.as_bytes()[self.pos..]
            .iter()
            .take_while(|b| (**b as char).is_digit(radix))
            .count()
    }

    /// Reads an unsigned integer, saturating at `u32::MAX`.
    ///
    /// Returns `None` without consuming anything if no digit follows.
    pub(crate) fn read_unsigned(&mut self, radix: u32) -> Option<u32> {
        let n = self.digits(radix);
        if n == 0 {
            return None;
        }
        let mut value: u32 = 0;
        for b in &self.text.as_bytes()[self.pos..self.pos + n] {
            let d = (*b as char).to_digit(radix).unwrap_or(0);
            value = value.saturating_mul(radix).saturating_add(d);
        }
        self.pos += n;
        Some(value)
    }

    /// Reads an optionally signed decimal integer, saturating at the `i64` range.
    pub(crate) fn read_signed(&mut self) -> Option<i64> {
        let start = self.pos;
        let negative = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };
        let n = self.digits(10);
        if n == 0 {
            self.pos = start;
            return None;
        }
        let mut value: i64 = 0;
        for b in &self.text.as_bytes()[self.pos..self.pos + n] {
            value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        }
        self.pos += n;
        Some(if negative { -value } else { value })
    }

    /// Reads a decimal floating-point number: sign, digits, optional fraction, optional exponent.
    ///
    /// At least one mantissa digit is required.
    pub(crate) fn read_float(&mut self) -> Option<f64> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut mantissa = self.digits(10);
        self.pos += mantissa;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            let frac = self.digits(10);
            self.pos += frac;
            mantissa += frac;
        }
        if mantissa == 0 {
            self.pos = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp = self.digits(10);
            if exp == 0 {
                self.pos = mark;
            } else {
                self.pos += exp;
            }
        }
        let lexeme = &self.text[start..self.pos];
        match lexeme.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }
}
