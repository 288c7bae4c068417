// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaderboard value formats.

use core::fmt;

/// How a leaderboard value is presented.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Frame count at 60 frames per second, shown as `MM:SS.cc`.
    Frames,
    /// Seconds, shown as `MM:SS`.
    Seconds,
    /// Hundredths of a second, shown as `MM:SS.cc`.
    Centiseconds,
    /// Points, shown as `NNNNNN Points`.
    Score,
    /// Plain signed decimal.
    #[default]
    Value,
    /// Signed decimal zero-padded to six digits.
    Other,
}

impl Format {
    /// Parses a format name; unknown names fall back to [`Format::Value`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "TIME" | "FRAMES" => Self::Frames,
            "SECS" | "SECONDS" => Self::Seconds,
            "MILLISECS" | "CENTISECS" | "CENTISECONDS" => Self::Centiseconds,
            "POINTS" | "SCORE" => Self::Score,
            "OTHER" => Self::Other,
            _ => Self::Value,
        }
    }

    /// Pairs `value` with this format for display.
    #[must_use]
    pub const fn render(self, value: u32) -> FormattedValue {
        FormattedValue {
            format: self,
            value,
        }
    }
}

/// A value rendered through [`fmt::Display`] according to its [`Format`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FormattedValue {
    format: Format,
    value: u32,
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.value;
        // Non-time formats print the value reinterpreted as signed.
        let signed = v as i32;
        match self.format {
            Format::Frames => write!(
                f,
                "{:02}:{:02}.{:02}",
                v / 3600,
                (v % 3600) / 60,
                (v % 60) * 10 / 6
            ),
            Format::Seconds => write!(f, "{:02}:{:02}", v / 60, v % 60),
            Format::Centiseconds => {
                write!(f, "{:02}:{:02}.{:02}", v / 6000, (v % 6000) / 100, v % 100)
            }
            Format::Score => write!(f, "{signed:06} Points"),
            Format::Value => write!(f, "{signed}"),
            Format::Other => write!(f, "{signed:06}"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn names() {
        assert_eq!(Format::parse("TIME"), Format::Frames);
        assert_eq!(Format::parse("FRAMES"), Format::Frames);
        assert_eq!(Format::parse("SECS"), Format::Seconds);
        assert_eq!(Format::parse("MILLISECS"), Format::Centiseconds);
        assert_eq!(Format::parse("CENTISECONDS"), Format::Centiseconds);
        assert_eq!(Format::parse("SCORE"), Format::Score);
        assert_eq!(Format::parse("OTHER"), Format::Other);
        assert_eq!(Format::parse("VALUE"), Format::Value);
        assert_eq!(Format::parse("bogus"), Format::Value);
    }

    #[test]
    fn rendering() {
        assert_eq!(Format::Frames.render(3600 + 61).to_string(), "01:01.01");
        assert_eq!(Format::Frames.render(30).to_string(), "00:00.50");
        assert_eq!(Format::Seconds.render(125).to_string(), "02:05");
        assert_eq!(Format::Centiseconds.render(12345).to_string(), "02:03.45");
        assert_eq!(Format::Score.render(1234).to_string(), "001234 Points");
        assert_eq!(Format::Value.render(u32::MAX).to_string(), "-1");
        assert_eq!(Format::Other.render(42).to_string(), "000042");
    }
}
