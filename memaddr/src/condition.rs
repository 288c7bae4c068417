// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditions: one comparison between two operands.
//!
//! ```text
//! condition := ( role ':' )? operand operator operand hits?
//! role      := 'P' | 'R' | 'A' | 'B' | 'C'          (case-insensitive)
//! operator  := '=' | '==' | '!=' | '<' | '<=' | '>' | '>='
//! hits      := '(' decimal ')' | '.' decimal '.'
//! ```

use crate::arena::ConditionId;
use crate::error::ParseError;
use crate::operand::{self, Context, Operand, Peek};
use crate::scan::Cursor;

/// Role of a condition within its condition set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConditionType {
    /// Participates in the set's AND.
    Standard,
    /// `P:` freezes the whole set while true.
    PauseIf,
    /// `R:` resets every hit count of the trigger while true.
    ResetIf,
    /// `A:` adds operand 1 to the accumulator of the next condition.
    AddSource,
    /// `B:` subtracts operand 1 from the accumulator of the next condition.
    SubSource,
    /// `C:` adds its hit count to the next condition's hit target check.
    AddHits,
}

impl ConditionType {
    /// Returns `true` for roles that feed the next condition instead of being tested on their own.
    #[must_use]
    pub const fn is_accumulator(self) -> bool {
        matches!(self, Self::AddSource | Self::SubSource | Self::AddHits)
    }
}

/// Comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "standard comparison names")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Applies the comparison.
    #[must_use]
    #[inline]
    pub const fn compare(self, lhs: u32, rhs: u32) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

/// One test or accumulator step of a condition set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Condition {
    pub(crate) operand1: Operand,
    pub(crate) operand2: Operand,
    pub(crate) operator: Operator,
    pub(crate) kind: ConditionType,
    pub(crate) required_hits: u32,
    pub(crate) current_hits: u32,
    /// Evaluated in the pause pass of its set.
    pub(crate) pause: bool,
    pub(crate) next: Option<ConditionId>,
}

impl Condition {
    /// The condition's role.
    #[must_use]
    pub fn kind(&self) -> ConditionType {
        self.kind
    }

    /// The comparison operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Left-hand operand.
    #[must_use]
    pub fn operand1(&self) -> &Operand {
        &self.operand1
    }

    /// Right-hand operand.
    #[must_use]
    pub fn operand2(&self) -> &Operand {
        &self.operand2
    }

    /// Hit target; 0 means every true frame satisfies the condition.
    #[must_use]
    pub fn required_hits(&self) -> u32 {
        self.required_hits
    }

    /// Frames this condition has been true since the last reset.
    #[must_use]
    pub fn current_hits(&self) -> u32 {
        self.current_hits
    }

    /// Returns `true` if this condition runs in its set's pause pass.
    #[must_use]
    pub fn is_pause(&self) -> bool {
        self.pause
    }

    /// Compares `operand1 + add_buffer` against `operand2`.
    pub fn test<P: Peek + ?Sized>(&mut self, add_buffer: u32, peek: &mut P) -> bool {
        let lhs = self.operand1.evaluate(peek).wrapping_add(add_buffer);
        let rhs = self.operand2.evaluate(peek);
        self.operator.compare(lhs, rhs)
    }

    /// Counts one more true frame, never past a non-zero target.
    pub(crate) fn hit(&mut self) {
        if self.required_hits == 0 || self.current_hits < self.required_hits {
            self.current_hits = self.current_hits.saturating_add(1);
        }
    }
}

fn parse_operator(cur: &mut Cursor<'_>) -> Result<Operator, ParseError> {
    let op = match cur.peek() {
        Some(b'=') => {
            cur.bump();
            cur.eat(b'=');
            Operator::Eq
        }
        Some(b'!') => {
            cur.bump();
            if !cur.eat(b'=') {
                return Err(ParseError::InvalidOperator);
            }
            Operator::Ne
        }
        Some(b'<') => {
            cur.bump();
            if cur.eat(b'=') { Operator::Le } else { Operator::Lt }
        }
        Some(b'>') => {
            cur.bump();
            if cur.eat(b'=') { Operator::Ge } else { Operator::Gt }
        }
        _ => return Err(ParseError::InvalidOperator),
    };
    Ok(op)
}

fn parse_hits(cur: &mut Cursor<'_>) -> Result<u32, ParseError> {
    let close = match cur.peek() {
        Some(b'(') => b')',
        Some(b'.') => b'.',
        _ => return Ok(0),
    };
    cur.bump();
    let hits = cur
        .read_unsigned(10)
        .ok_or(ParseError::InvalidRequiredHits)?;
    if !cur.eat(close) {
        return Err(ParseError::InvalidRequiredHits);
    }
    Ok(hits)
}

pub(crate) fn parse(cur: &mut Cursor<'_>) -> Result<Condition, ParseError> {
    let kind = if cur.peek().is_some() && cur.peek_at(1) == Some(b':') {
        let kind = match cur.peek().map(|b| b.to_ascii_uppercase()) {
            Some(b'P') => ConditionType::PauseIf,
            Some(b'R') => ConditionType::ResetIf,
            Some(b'A') => ConditionType::AddSource,
            Some(b'B') => ConditionType::SubSource,
            Some(b'C') => ConditionType::AddHits,
            _ => return Err(ParseError::InvalidConditionType),
        };
        cur.bump();
        cur.bump();
        kind
    } else {
        ConditionType::Standard
    };

    let operand1 = operand::parse(cur, Context::Condition)?;
    let operator = parse_operator(cur)?;
    let operand2 = operand::parse(cur, Context::Condition)?;
    let required_hits = parse_hits(cur)?;

    Ok(Condition {
        operand1,
        operand2,
        operator,
        kind,
        required_hits,
        current_hits: 0,
        pause: false,
        next: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(text: &str) -> Result<Condition, ParseError> {
        parse(&mut Cursor::new(text))
    }

    #[test]
    fn roles_and_operators() {
        let c = cond("R:0xH10!=5").unwrap();
        assert_eq!(c.kind(), ConditionType::ResetIf);
        assert_eq!(c.operator(), Operator::Ne);
        assert_eq!(c.required_hits(), 0);

        assert_eq!(cond("p:0xH10=5").unwrap().kind(), ConditionType::PauseIf);
        assert_eq!(cond("0xH10==5").unwrap().operator(), Operator::Eq);
        assert_eq!(cond("0xH10<=5").unwrap().operator(), Operator::Le);
        assert_eq!(cond("0xH10>5").unwrap().operator(), Operator::Gt);
        assert_eq!(cond("Z:0xH10=5"), Err(ParseError::InvalidConditionType));
        assert_eq!(cond("0xH10!5"), Err(ParseError::InvalidOperator));
        assert_eq!(cond("0xH10"), Err(ParseError::InvalidOperator));
    }

    #[test]
    fn hit_suffixes() {
        assert_eq!(cond("0xH10=5(3)").unwrap().required_hits(), 3);
        assert_eq!(cond("0xH10=5.12.").unwrap().required_hits(), 12);
        assert_eq!(cond("0xH10=5(3"), Err(ParseError::InvalidRequiredHits));
        assert_eq!(cond("0xH10=5()"), Err(ParseError::InvalidRequiredHits));
        assert_eq!(cond("0xH10=5.3"), Err(ParseError::InvalidRequiredHits));
    }

    #[test]
    fn test_folds_accumulator_into_lhs() {
        let mut c = cond("0xH0=10").unwrap();
        let mut peek = |_: u32, _: u32| 4;
        assert!(!c.test(0, &mut peek));
        assert!(c.test(6, &mut peek));
    }

    #[test]
    fn hits_cap_at_target() {
        let mut c = cond("0xH0=1(2)").unwrap();
        for _ in 0..5 {
            c.hit();
        }
        assert_eq!(c.current_hits(), 2);

        let mut unbounded = cond("0xH0=1").unwrap();
        for _ in 0..5 {
            unbounded.hit();
        }
        assert_eq!(unbounded.current_hits(), 5);
    }
}
