// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaderboards: start/cancel/submit triggers plus value and progress values.
//!
//! ```text
//! leaderboard := field ( '::' field )*
//! field       := 'STA:' trigger | 'CAN:' trigger | 'SUB:' trigger | 'VAL:' value | 'PRO:' value
//! ```
//!
//! Tags are case-insensitive and may appear in any order, each at most once. `PRO:` is optional.

use crate::arena::{self, Arena, ArenaSize, Builder};
use crate::error::ParseError;
use crate::operand::Peek;
use crate::scan::Cursor;
use crate::trigger::{self, TriggerRoot};
use crate::value::{self, ValueRoot};

/// Result of one leaderboard evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LboardState {
    /// Not running.
    Inactive,
    /// Running; reported every frame after [`LboardState::Started`].
    Active,
    /// Started this frame.
    Started,
    /// Canceled this frame.
    Canceled,
    /// Submitted this frame.
    Triggered,
}

/// State and reported value of one leaderboard evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LboardEvaluation {
    /// Phase reported for this frame.
    pub state: LboardState,
    /// Progress (or value) while running, the value on submission, otherwise 0.
    pub value: u32,
}

#[derive(Copy, Clone, Debug)]
struct LboardRoot {
    start: TriggerRoot,
    cancel: TriggerRoot,
    submit: TriggerRoot,
    value: ValueRoot,
    progress: Option<ValueRoot>,
}

fn parse_lboard(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<LboardRoot, ParseError> {
    let mut start = None;
    let mut cancel = None;
    let mut submit = None;
    let mut value = None;
    let mut progress = None;

    loop {
        if cur.eat_tag("STA:") {
            if start.is_some() {
                return Err(ParseError::DuplicatedStart);
            }
            start = Some(trigger::parse_trigger(b, cur)?);
        } else if cur.eat_tag("CAN:") {
            if cancel.is_some() {
                return Err(ParseError::DuplicatedCancel);
            }
            cancel = Some(trigger::parse_trigger(b, cur)?);
        } else if cur.eat_tag("SUB:") {
            if submit.is_some() {
                return Err(ParseError::DuplicatedSubmit);
            }
            submit = Some(trigger::parse_trigger(b, cur)?);
        } else if cur.eat_tag("VAL:") {
            if value.is_some() {
                return Err(ParseError::DuplicatedValue);
            }
            value = Some(value::parse_value(b, cur)?);
        } else if cur.eat_tag("PRO:") {
            if progress.is_some() {
                return Err(ParseError::DuplicatedProgress);
            }
            progress = Some(value::parse_value(b, cur)?);
        } else {
            return Err(ParseError::InvalidLeaderboardField);
        }

        if !cur.eat_tag("::") {
            break;
        }
    }

    Ok(LboardRoot {
        start: start.ok_or(ParseError::MissingStart)?,
        cancel: cancel.ok_or(ParseError::MissingCancel)?,
        submit: submit.ok_or(ParseError::MissingSubmit)?,
        value: value.ok_or(ParseError::MissingValue)?,
        progress,
    })
}

/// A parsed leaderboard and its activation state.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    arena: Arena,
    root: LboardRoot,
    started: bool,
    submitted: bool,
}

impl Leaderboard {
    /// Measures the arena needed to parse `text`.
    pub fn size(text: &str) -> Result<ArenaSize, ParseError> {
        arena::measure(text, parse_lboard)
    }

    /// Parses `text` into a freshly measured arena.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::build(text, parse_lboard)?;
        Ok(Self::new(arena, root))
    }

    /// Parses `text` into a caller-provided arena, typically reserved with [`Leaderboard::size`].
    pub fn parse_in(arena: Arena, text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::place(text, arena, parse_lboard)?;
        Ok(Self::new(arena, root))
    }

    fn new(arena: Arena, root: LboardRoot) -> Self {
        Self {
            arena,
            root,
            started: false,
            submitted: false,
        }
    }

    /// Returns `true` while the leaderboard is running.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns `true` after a submission or cancellation, until the start trigger goes false.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Returns `true` if a `PRO:` value was given.
    #[must_use]
    pub fn has_progress(&self) -> bool {
        self.root.progress.is_some()
    }

    /// The arena holding this leaderboard.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Advances the leaderboard by one frame.
    pub fn evaluate<P: Peek + ?Sized>(&mut self, peek: &mut P) -> LboardEvaluation {
        let root = self.root;
        let arena = &mut self.arena;

        // All three run every frame so their deltas stay current while inactive.
        let start_ok = root.start.test(arena, peek);
        let cancel_ok = root.cancel.test(arena, peek);
        let submit_ok = root.submit.test(arena, peek);

        let mut action = None;
        if self.submitted {
            if !start_ok {
                self.submitted = false;
            }
        } else if !self.started {
            if start_ok && !cancel_ok {
                if submit_ok {
                    action = Some(LboardState::Triggered);
                    self.submitted = true;
                } else if root.start.has_content(arena) {
                    self.started = true;
                    action = Some(LboardState::Started);
                }
            }
        } else if cancel_ok {
            self.started = false;
            action = Some(LboardState::Canceled);
            self.submitted = true;
        } else if submit_ok {
            self.started = false;
            action = Some(LboardState::Triggered);
            self.submitted = true;
        }

        let state = action.unwrap_or(if self.started {
            LboardState::Active
        } else {
            LboardState::Inactive
        });

        let value = match state {
            LboardState::Active | LboardState::Started => {
                root.progress.unwrap_or(root.value).evaluate(arena, peek)
            }
            LboardState::Triggered => root.value.evaluate(arena, peek),
            LboardState::Inactive | LboardState::Canceled => 0,
        };

        LboardEvaluation { state, value }
    }

    /// Clears the activation flags and every hit count.
    pub fn reset(&mut self) {
        self.started = false;
        self.submitted = false;
        self.root.start.reset(&mut self.arena);
        self.root.submit.reset(&mut self.arena);
        self.root.cancel.reset(&mut self.arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors() {
        let err = |t: &str| Leaderboard::parse(t).unwrap_err();
        assert_eq!(
            err("STA:0xH0=1::STA:0xH0=1::CAN:0=1::SUB:0=1::VAL:0"),
            ParseError::DuplicatedStart
        );
        assert_eq!(
            err("STA:0=1::CAN:0=1::SUB:0=1::VAL:0::PRO:0::PRO:1"),
            ParseError::DuplicatedProgress
        );
        assert_eq!(err("CAN:0=1::SUB:0=1::VAL:0"), ParseError::MissingStart);
        assert_eq!(err("STA:0=1::SUB:0=1::VAL:0"), ParseError::MissingCancel);
        assert_eq!(err("STA:0=1::CAN:0=1::VAL:0"), ParseError::MissingSubmit);
        assert_eq!(err("STA:0=1::CAN:0=1::SUB:0=1"), ParseError::MissingValue);
        assert_eq!(err("STA:0=1::XYZ:1"), ParseError::InvalidLeaderboardField);
        assert_eq!(err("STA:0xH0=1::CAN:0=1::SUB:@x=1::VAL:0"), ParseError::InvalidScriptOperand);
    }

    #[test]
    fn tags_are_case_insensitive_and_unordered() {
        let lb = Leaderboard::parse("val:0xH1::sub:0xH0=2::can:0=1::sta:0xH0=1::pro:0xH2").unwrap();
        assert!(lb.has_progress());
        assert!(!lb.is_started());
    }

    #[test]
    fn size_matches_placed_slots() {
        let text = "STA:0xH0=1::CAN:0xH0=3::SUB:0xH0=2::VAL:0xH1*2_0xH2::PRO:0xH3";
        let size = Leaderboard::size(text).unwrap();
        let lb = Leaderboard::parse_in(Arena::with_size(size), text).unwrap();
        assert_eq!(lb.arena().size(), size);
        assert!(!lb.arena().overflowed());
    }

    #[test]
    fn start_then_submit() {
        let mut lb = Leaderboard::parse("STA:0xH0=1::CAN:0xH0=3::SUB:0xH0=2::VAL:0xH1").unwrap();
        let mut ram = [1_u8, 42];
        let eval = |lb: &mut Leaderboard, ram: &[u8]| {
            lb.evaluate(&mut |a: u32, _: u32| u32::from(ram[a as usize]))
        };

        assert_eq!(eval(&mut lb, &ram).state, LboardState::Started);
        assert_eq!(eval(&mut lb, &ram).state, LboardState::Active);
        ram[0] = 2;
        let done = eval(&mut lb, &ram);
        assert_eq!(done, LboardEvaluation {
            state: LboardState::Triggered,
            value: 42
        });
        assert!(lb.is_submitted());
        assert_eq!(eval(&mut lb, &ram).state, LboardState::Inactive);
        assert!(!lb.is_submitted());

        lb.reset();
        assert!(!lb.is_started());
    }
}
