// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arithmetic values: terms, expressions and values.
//!
//! ```text
//! value      := expression ( '$' expression )*
//! expression := term ( '_' term )*
//! term       := operand ( '*' '~'? operand )?
//! ```
//!
//! A term multiplies its first operand by its second (XORed with the invert mask), an expression
//! sums its terms and a value is the largest of its expressions. Integer factors multiply with
//! wrapping arithmetic. A decimal factor (`*2`, `*0.5`) scales through `f64`, truncating toward
//! zero and saturating at `u32::MAX`, so `0xX0*2` and `0xX0*h2` differ on overflow.

use crate::arena::{self, Arena, ArenaSize, Builder, ExpressionId, TermId};
use crate::error::ParseError;
use crate::operand::{self, Context, Operand, Peek};
use crate::scan::Cursor;

/// `operand1 * (operand2 ^ invert)`, chained to the next term of its expression.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Term {
    pub(crate) operand1: Operand,
    pub(crate) operand2: Operand,
    pub(crate) invert: u32,
    pub(crate) next: Option<TermId>,
}

impl Default for Term {
    fn default() -> Self {
        Self {
            operand1: Operand::Const(0),
            operand2: Operand::Const(1),
            invert: 0,
            next: None,
        }
    }
}

impl Term {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "scaled values truncate toward zero and saturate"
    )]
    fn evaluate<P: Peek + ?Sized>(&mut self, peek: &mut P) -> u32 {
        let value = self.operand1.evaluate(peek);
        match self.operand2 {
            Operand::Float(factor) => (f64::from(value) * factor) as u32,
            _ => value.wrapping_mul(self.operand2.evaluate(peek) ^ self.invert),
        }
    }
}

/// Head of a term chain, chained to the next expression of its value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Expression {
    pub(crate) first: Option<TermId>,
    pub(crate) next: Option<ExpressionId>,
}

/// Root of a value tree inside an arena.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ValueRoot {
    pub(crate) first: Option<ExpressionId>,
}

impl ValueRoot {
    pub(crate) fn evaluate<P: Peek + ?Sized>(self, arena: &mut Arena, peek: &mut P) -> u32 {
        let mut max = 0_u32;
        let mut next = self.first;
        while let Some(id) = next {
            max = max.max(evaluate_expression(arena, id, peek));
            next = arena.expression(id).and_then(|e| e.next);
        }
        max
    }
}

fn evaluate_expression<P: Peek + ?Sized>(arena: &mut Arena, id: ExpressionId, peek: &mut P) -> u32 {
    let mut sum = 0_u32;
    let mut next = arena.expression(id).and_then(|e| e.first);
    while let Some(tid) = next {
        let Some(term) = arena.term_mut(tid) else {
            break;
        };
        sum = sum.wrapping_add(term.evaluate(peek));
        next = term.next;
    }
    sum
}

fn parse_term(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<TermId, ParseError> {
    let operand1 = operand::parse(cur, Context::Term)?;
    let (operand2, invert) = if cur.eat(b'*') {
        let inverted = cur.eat(b'~');
        let operand2 = operand::parse(cur, Context::Term)?;
        let invert = match operand2.size() {
            Some(size) if inverted => size.mask(),
            _ => 0,
        };
        (operand2, invert)
    } else {
        (Operand::Const(1), 0)
    };
    Ok(b.alloc_term(Term {
        operand1,
        operand2,
        invert,
        next: None,
    }))
}

fn parse_expression(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<ExpressionId, ParseError> {
    let first = parse_term(b, cur)?;
    let mut last = first;
    while cur.eat(b'_') {
        let term = parse_term(b, cur)?;
        if let Some(t) = b.placed().and_then(|a| a.term_mut(last)) {
            t.next = Some(term);
        }
        last = term;
    }
    Ok(b.alloc_expression(Expression {
        first: Some(first),
        next: None,
    }))
}

pub(crate) fn parse_value(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<ValueRoot, ParseError> {
    let first = parse_expression(b, cur)?;
    let mut last = first;
    while cur.eat(b'$') {
        let expr = parse_expression(b, cur)?;
        if let Some(e) = b.placed().and_then(|a| a.expression_mut(last)) {
            e.next = Some(expr);
        }
        last = expr;
    }
    Ok(ValueRoot { first: Some(first) })
}

/// A parsed value definition (scores, progress counters, leaderboard values).
#[derive(Clone, Debug)]
pub struct Value {
    arena: Arena,
    root: ValueRoot,
}

impl Value {
    /// Measures the arena needed to parse `text`.
    pub fn size(text: &str) -> Result<ArenaSize, ParseError> {
        arena::measure(text, parse_value)
    }

    /// Parses `text` into a freshly measured arena.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::build(text, parse_value)?;
        Ok(Self { arena, root })
    }

    /// Parses `text` into a caller-provided arena, typically reserved with [`Value::size`].
    pub fn parse_in(arena: Arena, text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::place(text, arena, parse_value)?;
        Ok(Self { arena, root })
    }

    /// Evaluates the value: the maximum of its expressions.
    pub fn evaluate<P: Peek + ?Sized>(&mut self, peek: &mut P) -> u32 {
        self.root.evaluate(&mut self.arena, peek)
    }

    /// The arena holding this value.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str, ram: &[u8]) -> u32 {
        let mut v = Value::parse(text).unwrap();
        v.evaluate(&mut |addr: u32, n: u32| {
            let mut out = 0_u32;
            for i in 0..n {
                let b = ram.get((addr + i) as usize).copied().unwrap_or(0);
                out |= u32::from(b) << (8 * i);
            }
            out
        })
    }

    #[test]
    fn terms_multiply_and_expressions_sum() {
        let ram = [3_u8, 4, 0, 0];
        assert_eq!(eval("0xH0*2", &ram), 6);
        assert_eq!(eval("0xH0*2_0xH1", &ram), 10);
        assert_eq!(eval("0xH0*0xH1", &ram), 12);
        assert_eq!(eval("v-1_0xH0", &ram), 2);
    }

    #[test]
    fn value_is_max_of_expressions() {
        let ram = [3_u8, 4];
        assert_eq!(eval("0xH0$0xH1", &ram), 4);
        assert_eq!(eval("0xH1$0xH0", &ram), 4);
        assert_eq!(eval("0xH0*10$0xH1", &ram), 30);
    }

    #[test]
    fn invert_uses_operand_width() {
        let ram = [0x0F_u8];
        assert_eq!(eval("1*~0xH0", &ram), 0xF0);
        assert_eq!(eval("1*~0xL0", &ram), 0x0);
        assert_eq!(eval("1*~0xM0", &ram), 0);
        assert_eq!(eval("2*~7", &ram), 14);
    }

    #[test]
    fn float_factor_truncates() {
        let ram = [10_u8];
        assert_eq!(eval("0xH0*1.5", &ram), 15);
        assert_eq!(eval("0xH0*0.25", &ram), 2);
    }

    #[test]
    fn decimal_factor_saturates_where_hex_wraps() {
        let ram = [0xFF_u8; 4];
        assert_eq!(eval("0xX0*2", &ram), u32::MAX);
        assert_eq!(eval("0xX0*h2", &ram), 0xFFFF_FFFE);
    }

    #[test]
    fn size_matches_placed_slots() {
        let text = "0xH10*2_0x20$0xX30*~0xH1_5";
        let size = Value::size(text).unwrap();
        let v = Value::parse_in(Arena::with_size(size), text).unwrap();
        assert_eq!(v.arena().size(), size);
        assert!(!v.arena().overflowed());
        assert_eq!(size.slots(), 6);
    }

    #[test]
    fn errors_propagate() {
        assert_eq!(
            Value::parse("0xH1_@x").unwrap_err(),
            ParseError::InvalidScriptOperand
        );
        assert_eq!(Value::size("0x").unwrap_err(), ParseError::InvalidMemoryOperand);
    }
}
