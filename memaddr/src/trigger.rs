// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triggers: one requirement set ANDed with the OR of its alternative sets.
//!
//! ```text
//! trigger := condset ( 'S' condset )*
//! ```
//!
//! Text after the last condition set is ignored.

use crate::arena::{self, Arena, ArenaSize, Builder, CondsetId};
use crate::condition::Condition;
use crate::condset::{self, CondsetView};
use crate::error::ParseError;
use crate::operand::Peek;
use crate::scan::Cursor;

/// Root of a trigger inside an arena.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TriggerRoot {
    pub(crate) requirement: Option<CondsetId>,
    pub(crate) alternative: Option<CondsetId>,
}

impl TriggerRoot {
    pub(crate) fn test<P: Peek + ?Sized>(self, arena: &mut Arena, peek: &mut P) -> bool {
        let mut reset = false;
        let requirement = match self.requirement {
            Some(id) => condset::test(arena, id, &mut reset, peek),
            None => true,
        };

        // Every alternative runs each frame so their hit counts and deltas advance.
        let mut alternatives = false;
        let mut any_alternative = false;
        let mut next = self.alternative;
        while let Some(id) = next {
            any_alternative = true;
            alternatives |= condset::test(arena, id, &mut reset, peek);
            next = arena.condset(id).and_then(|s| s.next);
        }

        if reset {
            self.reset(arena);
            return false;
        }
        requirement && (!any_alternative || alternatives)
    }

    pub(crate) fn reset(self, arena: &mut Arena) {
        if let Some(id) = self.requirement {
            condset::reset(arena, id);
        }
        let mut next = self.alternative;
        while let Some(id) = next {
            condset::reset(arena, id);
            next = arena.condset(id).and_then(|s| s.next);
        }
    }

    /// Returns `true` if the trigger has any condition at all.
    pub(crate) fn has_content(self, arena: &Arena) -> bool {
        let requirement = self
            .requirement
            .and_then(|id| arena.condset(id))
            .is_some_and(|s| s.first.is_some());
        requirement || self.alternative.is_some()
    }

    pub(crate) fn condsets<'a>(self, arena: &'a Arena) -> impl Iterator<Item = CondsetView<'a>> + 'a {
        let requirement = self.requirement.and_then(|id| CondsetView::new(arena, id));
        let mut next = self.alternative;
        let alternatives = core::iter::from_fn(move || {
            let id = next?;
            next = arena.condset(id)?.next;
            CondsetView::new(arena, id)
        });
        requirement.into_iter().chain(alternatives)
    }
}

pub(crate) fn parse_trigger(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<TriggerRoot, ParseError> {
    let requirement = if matches!(cur.peek(), Some(b'S' | b's')) {
        None
    } else {
        Some(condset::parse(b, cur)?)
    };

    let mut alternative = None;
    let mut last: Option<CondsetId> = None;
    while cur.eat_ignore_case(b's') {
        let id = condset::parse(b, cur)?;
        if let Some(prev) = last
            && let Some(s) = b.placed().and_then(|a| a.condset_mut(prev))
        {
            s.next = Some(id);
        }
        alternative.get_or_insert(id);
        last = Some(id);
    }

    Ok(TriggerRoot {
        requirement,
        alternative,
    })
}

/// A parsed trigger: the truth value of an achievement or of a leaderboard phase.
#[derive(Clone, Debug)]
pub struct Trigger {
    arena: Arena,
    root: TriggerRoot,
}

impl Trigger {
    /// Measures the arena needed to parse `text`.
    pub fn size(text: &str) -> Result<ArenaSize, ParseError> {
        arena::measure(text, parse_trigger)
    }

    /// Parses `text` into a freshly measured arena.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::build(text, parse_trigger)?;
        Ok(Self { arena, root })
    }

    /// Parses `text` into a caller-provided arena, typically reserved with [`Trigger::size`].
    pub fn parse_in(arena: Arena, text: &str) -> Result<Self, ParseError> {
        let (root, arena) = arena::place(text, arena, parse_trigger)?;
        Ok(Self { arena, root })
    }

    /// Evaluates the trigger for one frame.
    ///
    /// If any `ResetIf` fired, every hit count is zeroed and the result is `false`.
    pub fn test<P: Peek + ?Sized>(&mut self, peek: &mut P) -> bool {
        self.root.test(&mut self.arena, peek)
    }

    /// Zeroes every hit count.
    pub fn reset(&mut self) {
        self.root.reset(&mut self.arena);
    }

    /// Returns `true` if the trigger has at least one condition.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.root.has_content(&self.arena)
    }

    /// Condition sets: the requirement (if any) followed by the alternatives.
    pub fn condsets(&self) -> impl Iterator<Item = CondsetView<'_>> + '_ {
        self.root.condsets(&self.arena)
    }

    /// Every condition of every set, in declaration order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> + '_ {
        self.condsets().flat_map(CondsetView::conditions)
    }

    /// The arena holding this trigger.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }
}
