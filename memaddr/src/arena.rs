// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-allocation arena storage for parsed definitions.
//!
//! Every parse runs the same grammar code twice through a [`Builder`]:
//! - in [`Mode::Measuring`] nothing is stored; the builder only counts the slots the grammar
//!   would place, producing an [`ArenaSize`]
//! - in [`Mode::Writing`] each node is pushed into an [`Arena`] reserved with exactly that many
//!   slots, at the same index the measuring pass handed out
//!
//! Links between nodes ("next condition", "first term", ...) are typed `u32` handles into the
//! arena. Lookups are bounds- and kind-checked, so a stale or foreign handle reads as "end of
//! chain" instead of touching the wrong node.

use alloc::vec::Vec;
use core::mem::size_of;

use crate::condition::Condition;
use crate::condset::Condset;
use crate::error::ParseError;
use crate::scan::Cursor;
use crate::value::{Expression, Term};

/// Handle to a [`Condset`] slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CondsetId(pub(crate) u32);

/// Handle to a [`Condition`] slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ConditionId(pub(crate) u32);

/// Handle to an [`Expression`] slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ExpressionId(pub(crate) u32);

/// Handle to a [`Term`] slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TermId(pub(crate) u32);

/// One arena slot.
///
/// Slots are sized (and aligned) for the largest node kind, so any slot can hold any node.
#[derive(Clone, Debug)]
pub(crate) enum Node {
    Condset(Condset),
    Condition(Condition),
    Expression(Expression),
    Term(Term),
}

/// Storage requirement of one parsed definition, as computed by the measuring pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArenaSize {
    slots: u32,
}

impl ArenaSize {
    /// Bytes occupied by a single slot.
    pub const SLOT_BYTES: usize = size_of::<Node>();

    /// Number of node slots.
    #[must_use]
    #[inline]
    pub const fn slots(self) -> usize {
        self.slots as usize
    }

    /// Number of bytes the slots occupy.
    #[must_use]
    #[inline]
    pub const fn bytes(self) -> usize {
        self.slots() * Self::SLOT_BYTES
    }
}

/// Backing store owning every node of one parsed definition.
///
/// Dropping the arena releases the whole definition at once; nodes are never freed individually.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    reserved: u32,
}

impl Arena {
    /// Creates an empty arena with room for exactly `size` slots.
    #[must_use]
    pub fn with_size(size: ArenaSize) -> Self {
        Self {
            nodes: Vec::with_capacity(size.slots()),
            reserved: size.slots,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no slot is occupied.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Size actually used by the placed nodes.
    #[must_use]
    pub fn size(&self) -> ArenaSize {
        ArenaSize {
            slots: u32::try_from(self.nodes.len()).unwrap_or(u32::MAX),
        }
    }

    /// Size the arena was reserved with.
    #[must_use]
    #[inline]
    pub fn reserved(&self) -> ArenaSize {
        ArenaSize {
            slots: self.reserved,
        }
    }

    /// Returns `true` if placement needed more slots than were reserved.
    #[must_use]
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.nodes.len() > self.reserved as usize
    }

    pub(crate) fn condset(&self, id: CondsetId) -> Option<&Condset> {
        match self.nodes.get(id.0 as usize)? {
            Node::Condset(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn condset_mut(&mut self, id: CondsetId) -> Option<&mut Condset> {
        match self.nodes.get_mut(id.0 as usize)? {
            Node::Condset(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn condition(&self, id: ConditionId) -> Option<&Condition> {
        match self.nodes.get(id.0 as usize)? {
            Node::Condition(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn condition_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        match self.nodes.get_mut(id.0 as usize)? {
            Node::Condition(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn expression(&self, id: ExpressionId) -> Option<&Expression> {
        match self.nodes.get(id.0 as usize)? {
            Node::Expression(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn expression_mut(&mut self, id: ExpressionId) -> Option<&mut Expression> {
        match self.nodes.get_mut(id.0 as usize)? {
            Node::Expression(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn term(&self, id: TermId) -> Option<&Term> {
        match self.nodes.get(id.0 as usize)? {
            Node::Term(n) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn term_mut(&mut self, id: TermId) -> Option<&mut Term> {
        match self.nodes.get_mut(id.0 as usize)? {
            Node::Term(n) => Some(n),
            _ => None,
        }
    }
}

/// Which pass a [`Builder`] is running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Count slots only.
    Measuring,
    /// Place nodes into the arena.
    Writing,
}

/// Shared allocation front-end for both parse passes.
#[derive(Debug)]
pub(crate) struct Builder {
    mode: Mode,
    arena: Arena,
    next: u32,
}

impl Builder {
    pub(crate) fn measuring() -> Self {
        Self {
            mode: Mode::Measuring,
            arena: Arena::default(),
            next: 0,
        }
    }

    pub(crate) fn writing(mut arena: Arena) -> Self {
        arena.nodes.clear();
        Self {
            mode: Mode::Writing,
            arena,
            next: 0,
        }
    }

    #[inline]
    fn place(&mut self, node: Node) -> u32 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        if self.mode == Mode::Writing {
            self.arena.nodes.push(node);
        }
        id
    }

    pub(crate) fn alloc_condset(&mut self, node: Condset) -> CondsetId {
        CondsetId(self.place(Node::Condset(node)))
    }

    pub(crate) fn alloc_condition(&mut self, node: Condition) -> ConditionId {
        ConditionId(self.place(Node::Condition(node)))
    }

    pub(crate) fn alloc_expression(&mut self, node: Expression) -> ExpressionId {
        ExpressionId(self.place(Node::Expression(node)))
    }

    pub(crate) fn alloc_term(&mut self, node: Term) -> TermId {
        TermId(self.place(Node::Term(node)))
    }

    /// Returns the arena being written, or `None` while measuring.
    ///
    /// Grammar code uses this to patch links into already-placed nodes. Patching never changes
    /// the slot count, so both passes stay in lockstep.
    #[inline]
    pub(crate) fn placed(&mut self) -> Option<&mut Arena> {
        match self.mode {
            Mode::Writing => Some(&mut self.arena),
            Mode::Measuring => None,
        }
    }

    pub(crate) fn size(&self) -> ArenaSize {
        ArenaSize { slots: self.next }
    }

    pub(crate) fn into_arena(self) -> Arena {
        self.arena
    }
}

/// Runs `parse` in measuring mode.
pub(crate) fn measure<T, F>(text: &str, parse: F) -> Result<ArenaSize, ParseError>
where
    F: FnOnce(&mut Builder, &mut Cursor<'_>) -> Result<T, ParseError>,
{
    let mut builder = Builder::measuring();
    parse(&mut builder, &mut Cursor::new(text))?;
    Ok(builder.size())
}

/// Runs `parse` in writing mode, placing nodes into `arena`.
pub(crate) fn place<T, F>(text: &str, arena: Arena, parse: F) -> Result<(T, Arena), ParseError>
where
    F: FnOnce(&mut Builder, &mut Cursor<'_>) -> Result<T, ParseError>,
{
    let mut builder = Builder::writing(arena);
    let root = parse(&mut builder, &mut Cursor::new(text))?;
    Ok((root, builder.into_arena()))
}

/// Measures `text`, then places it into an arena of exactly the measured size.
pub(crate) fn build<T, F>(text: &str, parse: F) -> Result<(T, Arena), ParseError>
where
    F: Fn(&mut Builder, &mut Cursor<'_>) -> Result<T, ParseError>,
{
    let size = measure(text, &parse)?;
    place(text, Arena::with_size(size), &parse)
}
