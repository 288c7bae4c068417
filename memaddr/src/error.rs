// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parse error taxonomy.

use core::fmt;

/// A parse failure.
///
/// Parsing stops at the first error and never yields a partial structure. Each variant maps to a
/// stable negative code (see [`ParseError::code`]) so embedders can keep reporting the numeric
/// values older frontends used.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// A script (`@`) operand was found; scripted operands are not supported.
    InvalidScriptOperand,
    /// A memory operand was malformed (missing `0x`, bad size, or no address digits).
    InvalidMemoryOperand,
    /// A constant operand had no digits.
    InvalidConstOperand,
    /// A floating-point operand had no digits.
    InvalidFloatOperand,
    /// The condition role prefix (`X:`) was not one of `P`, `R`, `A`, `B`, `C`.
    InvalidConditionType,
    /// The comparison operator was missing or unknown.
    InvalidOperator,
    /// The hit-count suffix was malformed.
    InvalidRequiredHits,
    /// `STA:` appeared more than once.
    DuplicatedStart,
    /// `CAN:` appeared more than once.
    DuplicatedCancel,
    /// `SUB:` appeared more than once.
    DuplicatedSubmit,
    /// `VAL:` appeared more than once.
    DuplicatedValue,
    /// `PRO:` appeared more than once.
    DuplicatedProgress,
    /// The leaderboard has no `STA:` field.
    MissingStart,
    /// The leaderboard has no `CAN:` field.
    MissingCancel,
    /// The leaderboard has no `SUB:` field.
    MissingSubmit,
    /// The leaderboard has no `VAL:` field.
    MissingValue,
    /// A leaderboard field tag was not recognized.
    InvalidLeaderboardField,
}

impl ParseError {
    /// Returns the stable negative integer code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidScriptOperand => -1,
            Self::InvalidMemoryOperand => -2,
            Self::InvalidConstOperand => -3,
            Self::InvalidFloatOperand => -4,
            Self::InvalidConditionType => -5,
            Self::InvalidOperator => -6,
            Self::InvalidRequiredHits => -7,
            Self::DuplicatedStart => -8,
            Self::DuplicatedCancel => -9,
            Self::DuplicatedSubmit => -10,
            Self::DuplicatedValue => -11,
            Self::DuplicatedProgress => -12,
            Self::MissingStart => -13,
            Self::MissingCancel => -14,
            Self::MissingSubmit => -15,
            Self::MissingValue => -16,
            Self::InvalidLeaderboardField => -17,
        }
    }

    /// Maps a negative code back to its error, if known.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::InvalidScriptOperand,
            -2 => Self::InvalidMemoryOperand,
            -3 => Self::InvalidConstOperand,
            -4 => Self::InvalidFloatOperand,
            -5 => Self::InvalidConditionType,
            -6 => Self::InvalidOperator,
            -7 => Self::InvalidRequiredHits,
            -8 => Self::DuplicatedStart,
            -9 => Self::DuplicatedCancel,
            -10 => Self::DuplicatedSubmit,
            -11 => Self::DuplicatedValue,
            -12 => Self::DuplicatedProgress,
            -13 => Self::MissingStart,
            -14 => Self::MissingCancel,
            -15 => Self::MissingSubmit,
            -16 => Self::MissingValue,
            -17 => Self::InvalidLeaderboardField,
            _ => return None,
        })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidScriptOperand => "invalid script operand",
            Self::InvalidMemoryOperand => "invalid memory operand",
            Self::InvalidConstOperand => "invalid constant operand",
            Self::InvalidFloatOperand => "invalid floating-point operand",
            Self::InvalidConditionType => "invalid condition type",
            Self::InvalidOperator => "invalid operator",
            Self::InvalidRequiredHits => "invalid required hits",
            Self::DuplicatedStart => "duplicated start condition",
            Self::DuplicatedCancel => "duplicated cancel condition",
            Self::DuplicatedSubmit => "duplicated submit condition",
            Self::DuplicatedValue => "duplicated value expression",
            Self::DuplicatedProgress => "duplicated progress expression",
            Self::MissingStart => "missing start condition",
            Self::MissingCancel => "missing cancel condition",
            Self::MissingSubmit => "missing submit condition",
            Self::MissingValue => "missing value expression",
            Self::InvalidLeaderboardField => "invalid field in leaderboard",
        };
        write!(f, "{msg} (code {})", self.code())
    }
}

impl core::error::Error for ParseError {}
