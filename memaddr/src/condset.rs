// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Condition sets: `_`-joined conditions sharing an accumulator.
//!
//! A set is evaluated in up to two passes over its conditions:
//! - the pause pass runs every `PauseIf` together with the accumulator conditions chained directly
//!   before it; if any `PauseIf` holds, the set is paused for this frame and is false
//! - the main pass runs everything else, ANDing the results of standard conditions
//!
//! While paused, the main pass does not run. The pause pass counts hits only when the set was not
//! paused on the previous frame, so a set that stays paused keeps every hit count unchanged.

use crate::arena::{Arena, Builder, ConditionId, CondsetId};
use crate::condition::{self, Condition, ConditionType};
use crate::error::ParseError;
use crate::operand::Peek;
use crate::scan::Cursor;

/// A condition chain, linked to the next alternative set of its trigger.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Condset {
    pub(crate) first: Option<ConditionId>,
    pub(crate) next: Option<CondsetId>,
    pub(crate) has_pause: bool,
    pub(crate) is_paused: bool,
}

/// Read-only view of a condition set inside its arena.
#[derive(Copy, Clone, Debug)]
pub struct CondsetView<'a> {
    arena: &'a Arena,
    set: Condset,
}

impl<'a> CondsetView<'a> {
    pub(crate) fn new(arena: &'a Arena, id: CondsetId) -> Option<Self> {
        Some(Self {
            arena,
            set: *arena.condset(id)?,
        })
    }

    /// Returns `true` if the set has at least one `PauseIf` condition.
    #[must_use]
    pub fn has_pause(&self) -> bool {
        self.set.has_pause
    }

    /// Returns `true` if the last evaluation paused the set.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.set.is_paused
    }

    /// Returns `true` if the set has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.first.is_none()
    }

    /// The set's conditions in declaration order.
    pub fn conditions(self) -> impl Iterator<Item = &'a Condition> + 'a {
        let arena = self.arena;
        let mut next = self.set.first;
        core::iter::from_fn(move || {
            let c = arena.condition(next?)?;
            next = c.next;
            Some(c)
        })
    }
}

fn at_set_end(cur: &Cursor<'_>) -> bool {
    matches!(cur.peek(), None | Some(b'S' | b's' | b':'))
}

/// Marks pause-pass membership and reports whether the chain has a `PauseIf`.
fn mark_pause(arena: &mut Arena, first: Option<ConditionId>) -> bool {
    let mut has_pause = false;
    let mut run_start = first;
    let mut next = first;
    while let Some(id) = next {
        let Some(c) = arena.condition(id) else {
            break;
        };
        let kind = c.kind;
        next = c.next;
        if kind.is_accumulator() {
            continue;
        }
        if kind == ConditionType::PauseIf {
            has_pause = true;
            let mut walk = run_start;
            while let Some(member) = walk {
                let Some(m) = arena.condition_mut(member) else {
                    break;
                };
                m.pause = true;
                walk = if member == id { None } else { m.next };
            }
        }
        run_start = next;
    }
    has_pause
}

pub(crate) fn parse(b: &mut Builder, cur: &mut Cursor<'_>) -> Result<CondsetId, ParseError> {
    let mut first = None;
    let mut last: Option<ConditionId> = None;
    if !at_set_end(cur) {
        loop {
            let id = b.alloc_condition(condition::parse(cur)?);
            if let Some(prev) = last
                && let Some(c) = b.placed().and_then(|a| a.condition_mut(prev))
            {
                c.next = Some(id);
            }
            first.get_or_insert(id);
            last = Some(id);
            if !cur.eat(b'_') {
                break;
            }
        }
    }

    let mut set = Condset {
        first,
        ..Condset::default()
    };
    if let Some(arena) = b.placed() {
        set.has_pause = mark_pause(arena, first);
    }
    Ok(b.alloc_condset(set))
}

fn test_pass<P: Peek + ?Sized>(
    arena: &mut Arena,
    first: Option<ConditionId>,
    pause_pass: bool,
    count_hits: bool,
    reset: &mut bool,
    peek: &mut P,
) -> bool {
    let mut set_valid = true;
    let mut add_buffer = 0_u32;
    let mut add_hits = 0_u32;
    let mut next = first;

    while let Some(id) = next {
        let Some(c) = arena.condition_mut(id) else {
            break;
        };
        next = c.next;
        if c.pause != pause_pass {
            continue;
        }

        match c.kind {
            ConditionType::AddSource => {
                add_buffer = add_buffer.wrapping_add(c.operand1.evaluate(peek));
                continue;
            }
            ConditionType::SubSource => {
                add_buffer = add_buffer.wrapping_sub(c.operand1.evaluate(peek));
                continue;
            }
            ConditionType::AddHits => {
                if c.test(add_buffer, peek) && count_hits {
                    c.hit();
                }
                add_buffer = 0;
                add_hits = add_hits.saturating_add(c.current_hits);
                continue;
            }
            ConditionType::Standard | ConditionType::PauseIf | ConditionType::ResetIf => {}
        }

        let mut valid = c.test(add_buffer, peek);
        add_buffer = 0;
        if valid && count_hits {
            c.hit();
        }
        if c.required_hits != 0 {
            valid = c.current_hits.saturating_add(add_hits) >= c.required_hits;
        }
        add_hits = 0;

        match c.kind {
            ConditionType::PauseIf => {
                if valid {
                    return true;
                }
                set_valid = false;
            }
            ConditionType::ResetIf => {
                if valid {
                    *reset = true;
                    return false;
                }
            }
            _ => set_valid &= valid,
        }
    }
    set_valid
}

/// Evaluates one set; sets `reset` if a `ResetIf` fired.
pub(crate) fn test<P: Peek + ?Sized>(
    arena: &mut Arena,
    id: CondsetId,
    reset: &mut bool,
    peek: &mut P,
) -> bool {
    let Some(set) = arena.condset(id).copied() else {
        return true;
    };
    if set.first.is_none() {
        return true;
    }
    if set.has_pause {
        let paused = test_pass(arena, set.first, true, !set.is_paused, reset, peek);
        if let Some(s) = arena.condset_mut(id) {
            s.is_paused = paused;
        }
        if paused {
            return false;
        }
    }
    test_pass(arena, set.first, false, true, reset, peek)
}

/// Zeroes every hit count of one set.
pub(crate) fn reset(arena: &mut Arena, id: CondsetId) {
    let Some(set) = arena.condset_mut(id) else {
        return;
    };
    set.is_paused = false;
    let mut next = set.first;
    while let Some(cid) = next {
        let Some(c) = arena.condition_mut(cid) else {
            break;
        };
        c.current_hits = 0;
        next = c.next;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::arena;
    use std::vec::Vec;

    fn build(text: &str) -> (CondsetId, Arena) {
        arena::build(text, parse).unwrap()
    }

    fn kinds_and_pause(arena: &Arena, id: CondsetId) -> Vec<(ConditionType, bool)> {
        CondsetView::new(arena, id)
            .unwrap()
            .conditions()
            .map(|c| (c.kind(), c.is_pause()))
            .collect()
    }

    #[test]
    fn empty_sets_are_true() {
        for text in ["", "S0xH0=1", ":"] {
            let (id, mut arena) = build(text);
            let mut reset = false;
            assert!(test(&mut arena, id, &mut reset, &mut |_: u32, _: u32| 0));
            assert!(CondsetView::new(&arena, id).unwrap().is_empty());
        }
    }

    #[test]
    fn pause_membership_includes_preceding_accumulators() {
        let (id, arena) = build("A:0xH0=0_P:0xH1=1_A:0xH2=0_0xH3=3");
        assert_eq!(
            kinds_and_pause(&arena, id),
            [
                (ConditionType::AddSource, true),
                (ConditionType::PauseIf, true),
                (ConditionType::AddSource, false),
                (ConditionType::Standard, false),
            ]
        );
        assert!(CondsetView::new(&arena, id).unwrap().has_pause());
    }

    #[test]
    fn accumulators_feed_next_condition() {
        let (id, mut arena) = build("A:0xH0=0_B:0xH1=0_0xH2=7");
        let ram = [10_u8, 4, 1];
        let mut peek = |a: u32, _: u32| u32::from(ram[a as usize]);
        let mut reset = false;
        assert!(test(&mut arena, id, &mut reset, &mut peek));
    }

    #[test]
    fn add_hits_contribute_to_target() {
        let (id, mut arena) = build("C:0xH0=1_0xH1=1(3)");
        let mut reset = false;
        // Both true: 1 + 1 hits, then 2 + 2 reaches the target.
        assert!(!test(&mut arena, id, &mut reset, &mut |_: u32, _: u32| 1));
        assert!(test(&mut arena, id, &mut reset, &mut |_: u32, _: u32| 1));
    }

    #[test]
    fn reset_if_stops_evaluation() {
        let (id, mut arena) = build("0xH0=1(5)_R:0xH1=1");
        let mut reset = false;
        let mut first = |a: u32, _: u32| if a == 0 { 1 } else { 0 };
        assert!(!test(&mut arena, id, &mut reset, &mut first));
        assert!(!reset);

        assert!(!test(&mut arena, id, &mut reset, &mut |_: u32, _: u32| 1));
        assert!(reset);

        reset_hits(&mut arena, id);
        let hits: Vec<u32> = CondsetView::new(&arena, id)
            .unwrap()
            .conditions()
            .map(Condition::current_hits)
            .collect();
        assert_eq!(hits, [0, 0]);
    }

    #[test]
    fn held_pause_freezes_pause_pass_hits() {
        let (id, mut arena) = build("C:0xH0=1_P:0xH1=1_0xH0=1(5)");
        let hits = |arena: &Arena| -> Vec<u32> {
            CondsetView::new(arena, id)
                .unwrap()
                .conditions()
                .map(Condition::current_hits)
                .collect()
        };
        let mut reset = false;
        let mut all_set = |_: u32, _: u32| -> u32 { 1 };

        assert!(!test(&mut arena, id, &mut reset, &mut all_set));
        assert_eq!(hits(&arena), [1, 1, 0]);
        for _ in 0..3 {
            assert!(!test(&mut arena, id, &mut reset, &mut all_set));
            assert_eq!(hits(&arena), [1, 1, 0]);
        }

        // The frame that lifts the pause counts only the main pass; a new pause counts once more.
        let mut unpaused = |a: u32, _: u32| -> u32 { u32::from(a != 1) };
        assert!(!test(&mut arena, id, &mut reset, &mut unpaused));
        assert_eq!(hits(&arena), [1, 1, 1]);
        assert!(!test(&mut arena, id, &mut reset, &mut all_set));
        assert_eq!(hits(&arena), [2, 2, 1]);
    }

    fn reset_hits(arena: &mut Arena, id: CondsetId) {
        super::reset(arena, id);
    }
}
