// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operands: the leaf value sources of every definition.
//!
//! Operand text grammar (sizes are case-insensitive):
//!
//! | Text | Operand |
//! |---|---|
//! | `0x` size? hex | live memory |
//! | `d0x` size? hex | previous-frame memory ([`Operand::Delta`]) |
//! | `b0x` size? hex | BCD-decoded live memory |
//! | `h` hex | constant |
//! | decimal | constant (saturating) |
//! | `v` signed decimal | constant, terms only (negative values wrap) |
//! | `+`, `-`, `.`, decimal with fraction | float constant, terms only |
//! | `@name` | script operand, rejected |
//!
//! Size characters: `M`..`T` bit 0..7, `L` low nibble, `U` high nibble, `H` 8-bit, space or none
//! 16-bit, `W` 24-bit, `X` 32-bit.

use crate::error::ParseError;
use crate::scan::Cursor;

/// Byte-level memory reader.
///
/// Implementations compose multi-byte reads little-endian. Reads of addresses with no backing
/// memory return 0.
pub trait Peek {
    /// Reads `num_bytes` (1, 2 or 4) bytes at `address`.
    fn peek(&mut self, address: u32, num_bytes: u32) -> u32;
}

impl<F> Peek for F
where
    F: FnMut(u32, u32) -> u32,
{
    #[inline]
    fn peek(&mut self, address: u32, num_bytes: u32) -> u32 {
        self(address, num_bytes)
    }
}

/// Width of a memory read.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "variant names are the widths")]
pub enum Size {
    Bit0,
    Bit1,
    Bit2,
    Bit3,
    Bit4,
    Bit5,
    Bit6,
    Bit7,
    /// Bits 0..3 of a byte.
    Low,
    /// Bits 4..7 of a byte.
    High,
    EightBits,
    SixteenBits,
    TwentyFourBits,
    ThirtyTwoBits,
}

impl Size {
    fn from_char(c: u8) -> Option<Self> {
        Some(match c.to_ascii_uppercase() {
            b'M' => Self::Bit0,
            b'N' => Self::Bit1,
            b'O' => Self::Bit2,
            b'P' => Self::Bit3,
            b'Q' => Self::Bit4,
            b'R' => Self::Bit5,
            b'S' => Self::Bit6,
            b'T' => Self::Bit7,
            b'L' => Self::Low,
            b'U' => Self::High,
            b'H' => Self::EightBits,
            b' ' => Self::SixteenBits,
            b'W' => Self::TwentyFourBits,
            b'X' => Self::ThirtyTwoBits,
            _ => return None,
        })
    }

    /// Bit index for single-bit sizes.
    #[must_use]
    pub const fn bit(self) -> Option<u32> {
        Some(match self {
            Self::Bit0 => 0,
            Self::Bit1 => 1,
            Self::Bit2 => 2,
            Self::Bit3 => 3,
            Self::Bit4 => 4,
            Self::Bit5 => 5,
            Self::Bit6 => 6,
            Self::Bit7 => 7,
            _ => return None,
        })
    }

    /// All-ones value of this width.
    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Bit0
            | Self::Bit1
            | Self::Bit2
            | Self::Bit3
            | Self::Bit4
            | Self::Bit5
            | Self::Bit6
            | Self::Bit7 => 0x1,
            Self::Low | Self::High => 0xF,
            Self::EightBits => 0xFF,
            Self::SixteenBits => 0xFFFF,
            Self::TwentyFourBits => 0xFF_FFFF,
            Self::ThirtyTwoBits => 0xFFFF_FFFF,
        }
    }

    /// Number of bytes fetched through [`Peek`] for this width.
    #[must_use]
    pub const fn peek_bytes(self) -> u32 {
        match self {
            Self::SixteenBits => 2,
            Self::TwentyFourBits | Self::ThirtyTwoBits => 4,
            _ => 1,
        }
    }
}

/// A memory reference: address, width and BCD decoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemRef {
    /// Logical address in the scripting address space.
    pub address: u32,
    /// Read width.
    pub size: Size,
    /// Decode the read value as packed BCD.
    pub bcd: bool,
}

impl MemRef {
    /// Reads the current value through `peek`.
    pub fn read<P: Peek + ?Sized>(&self, peek: &mut P) -> u32 {
        let a = self.address;
        let raw = match self.size {
            Size::Low => peek.peek(a, 1) & 0xF,
            Size::High => (peek.peek(a, 1) >> 4) & 0xF,
            Size::EightBits => peek.peek(a, 1),
            Size::SixteenBits => peek.peek(a, 2),
            Size::TwentyFourBits => peek.peek(a, 4) & 0xFF_FFFF,
            Size::ThirtyTwoBits => peek.peek(a, 4),
            bits => (peek.peek(a, 1) >> bits.bit().unwrap_or(0)) & 1,
        };
        if self.bcd { decode_bcd(raw) } else { raw }
    }
}

/// Decodes packed BCD, one decimal digit per nibble.
#[must_use]
pub fn decode_bcd(mut raw: u32) -> u32 {
    let mut out = 0_u32;
    let mut scale = 1_u32;
    while raw != 0 {
        out = out.wrapping_add((raw & 0xF).wrapping_mul(scale));
        scale = scale.wrapping_mul(10);
        raw >>= 4;
    }
    out
}

/// One readable quantity.
///
/// Script operands (`@name`) have no variant: they fail to parse with
/// [`ParseError::InvalidScriptOperand`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Operand {
    /// Live memory.
    Address(MemRef),
    /// Memory as it was on the previous evaluation.
    Delta {
        /// The location being tracked.
        mem: MemRef,
        /// Value observed on the previous evaluation; 0 before the first one.
        previous: u32,
    },
    /// Integer literal.
    Const(u32),
    /// Floating-point literal.
    Float(f64),
}

impl Operand {
    /// Evaluates the operand.
    ///
    /// A [`Operand::Delta`] returns the value stored by the previous call and remembers the live
    /// value for the next one.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "float literals truncate toward zero and saturate"
    )]
    pub fn evaluate<P: Peek + ?Sized>(&mut self, peek: &mut P) -> u32 {
        match self {
            Self::Address(mem) => mem.read(peek),
            Self::Delta { mem, previous } => {
                let live = mem.read(peek);
                core::mem::replace(previous, live)
            }
            Self::Const(v) => *v,
            Self::Float(f) => *f as u32,
        }
    }

    /// Memory width, for memory operands.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        match self {
            Self::Address(mem) | Self::Delta { mem, .. } => Some(mem.size),
            Self::Const(_) | Self::Float(_) => None,
        }
    }
}

/// Which grammar an operand is parsed with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Context {
    /// Condition operands.
    Condition,
    /// Term operands: adds signed and floating-point constants.
    Term,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "signed constants wrap to their two's complement bits"
)]
pub(crate) fn parse(cur: &mut Cursor<'_>, context: Context) -> Result<Operand, ParseError> {
    match cur.peek() {
        Some(b'h' | b'H') => {
            cur.bump();
            let v = cur
                .read_unsigned(16)
                .ok_or(ParseError::InvalidConstOperand)?;
            Ok(Operand::Const(v))
        }
        Some(b'0') if matches!(cur.peek_at(1), Some(b'x' | b'X')) => parse_memory(cur),
        Some(b'@') => Err(ParseError::InvalidScriptOperand),
        Some(b'v' | b'V') if context == Context::Term => {
            cur.bump();
            let v = cur.read_signed().ok_or(ParseError::InvalidConstOperand)?;
            Ok(Operand::Const(v as u32))
        }
        Some(b'+' | b'-' | b'.' | b'0'..=b'9') if context == Context::Term => {
            let v = cur.read_float().ok_or(ParseError::InvalidFloatOperand)?;
            Ok(Operand::Float(v))
        }
        Some(b'0'..=b'9') => {
            let v = cur
                .read_unsigned(10)
                .ok_or(ParseError::InvalidConstOperand)?;
            Ok(Operand::Const(v))
        }
        _ => parse_memory(cur),
    }
}

fn parse_memory(cur: &mut Cursor<'_>) -> Result<Operand, ParseError> {
    let (delta, bcd) = match cur.peek() {
        Some(b'd' | b'D') => {
            cur.bump();
            (true, false)
        }
        Some(b'b' | b'B') => {
            cur.bump();
            (false, true)
        }
        _ => (false, false),
    };
    if !(cur.eat(b'0') && cur.eat_ignore_case(b'x')) {
        return Err(ParseError::InvalidMemoryOperand);
    }
    let size = match cur.peek().and_then(Size::from_char) {
        Some(size) => {
            cur.bump();
            size
        }
        None => Size::SixteenBits,
    };
    let address = cur
        .read_unsigned(16)
        .ok_or(ParseError::InvalidMemoryOperand)?;
    let mem = MemRef { address, size, bcd };
    Ok(if delta {
        Operand::Delta { mem, previous: 0 }
    } else {
        Operand::Address(mem)
    })
}
