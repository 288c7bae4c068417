// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostic trace hooks.
//!
//! A [`TraceSink`] receives scope enter/exit notifications around a frame, the achievement sets,
//! and the leaderboards, plus human-readable [`TraceMessage`]s. Sinks declare which categories
//! they want through [`TraceSink::mask`]; the engine skips the work for everything else.

use core::fmt;
use core::ops::BitOr;

use crate::console::ConsoleId;
use crate::memory::{BlockId, MemoryRegion};

/// Categories a trace sink subscribes to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TraceMask(u8);

impl TraceMask {
    /// Nothing.
    pub const NONE: Self = Self(0);
    /// Frame scopes.
    pub const FRAME: Self = Self(1 << 0);
    /// Achievement set and achievement scopes, plus award messages.
    pub const ACHIEVEMENTS: Self = Self(1 << 1);
    /// Leaderboard scopes and messages.
    pub const LEADERBOARDS: Self = Self(1 << 2);
    /// Address resolution messages.
    pub const FIXUP: Self = Self(1 << 3);
    /// Every category.
    pub const ALL: Self = Self(0b1111);

    /// Returns `true` if every bit in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TraceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A traced region of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// One call to `do_frame`.
    Frame,
    /// Testing one achievement set.
    AchievementSet {
        /// `true` for the core set, `false` for the unofficial set.
        official: bool,
    },
    /// Testing one achievement.
    Achievement {
        /// Achievement id.
        id: u32,
    },
    /// Evaluating all leaderboards.
    Leaderboards,
    /// Evaluating one leaderboard.
    Leaderboard {
        /// Leaderboard id.
        id: u32,
    },
}

impl ScopeKind {
    /// The mask category this scope belongs to.
    #[must_use]
    pub const fn category(self) -> TraceMask {
        match self {
            Self::Frame => TraceMask::FRAME,
            Self::AchievementSet { .. } | Self::Achievement { .. } => TraceMask::ACHIEVEMENTS,
            Self::Leaderboards | Self::Leaderboard { .. } => TraceMask::LEADERBOARDS,
        }
    }
}

/// A diagnostic message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceMessage {
    /// An address in mirrored or echo RAM was folded onto the real RAM.
    Mirrored {
        /// Console whose mirror rule applied.
        console: ConsoleId,
        /// Requested address.
        from: u32,
        /// Folded address.
        to: u32,
    },
    /// A console-specific rebase applied before the descriptor search.
    Rebased {
        /// Console whose rebase rule applied.
        console: ConsoleId,
        /// Requested address.
        from: u32,
        /// Rebased address.
        to: u32,
    },
    /// An address resolved through a descriptor.
    Descriptor {
        /// Address after console adjustments.
        address: u32,
        /// Index of the matching descriptor.
        index: usize,
        /// Block the descriptor maps onto.
        block: BlockId,
        /// Offset within the block.
        offset: u32,
    },
    /// An address resolved through the named-region fallback.
    Region {
        /// Address after console adjustments.
        address: u32,
        /// Region holding the byte.
        region: MemoryRegion,
        /// Offset within the region.
        offset: u32,
    },
    /// No memory backs the address; reads return zero.
    Unmapped {
        /// Address after console adjustments.
        address: u32,
    },
    /// An achievement was awarded.
    Awarded {
        /// Achievement id.
        id: u32,
    },
    /// A running leaderboard's current value.
    LeaderboardValue {
        /// Leaderboard id.
        id: u32,
        /// Current value.
        value: u32,
    },
    /// A leaderboard submitted zero and was rejected.
    Rejected {
        /// Leaderboard id.
        id: u32,
    },
}

impl TraceMessage {
    /// The mask category this message belongs to.
    #[must_use]
    pub const fn category(&self) -> TraceMask {
        match self {
            Self::Mirrored { .. }
            | Self::Rebased { .. }
            | Self::Descriptor { .. }
            | Self::Region { .. }
            | Self::Unmapped { .. } => TraceMask::FIXUP,
            Self::Awarded { .. } => TraceMask::ACHIEVEMENTS,
            Self::LeaderboardValue { .. } | Self::Rejected { .. } => TraceMask::LEADERBOARDS,
        }
    }
}

impl fmt::Display for TraceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Mirrored { console, from, to } => write!(
                f,
                "{console} memory address in mirrored RAM {from:#06x} adjusted to {to:#06x}"
            ),
            Self::Rebased { console, from, to } => {
                write!(f, "{console} memory address {from:#x} adjusted to {to:#x}")
            }
            Self::Descriptor {
                address,
                index,
                block,
                offset,
            } => write!(
                f,
                "address {address:#010x} set to descriptor {index} (block {}) at offset {offset:#x}",
                block.0
            ),
            Self::Region {
                address,
                region,
                offset,
            } => write!(f, "address {address:#010x} set to {region:?} at offset {offset:#x}"),
            Self::Unmapped { address } => write!(f, "address {address:#010x} is not mapped"),
            Self::Awarded { id } => write!(f, "awarded achievement {id}"),
            Self::LeaderboardValue { id, value } => write!(f, "leaderboard {id} value {value}"),
            Self::Rejected { id } => write!(f, "leaderboard {id} tried to submit 0"),
        }
    }
}

/// Receiver of trace scopes and messages.
///
/// Every method except [`TraceSink::mask`] has an empty default.
pub trait TraceSink {
    /// Categories this sink wants.
    fn mask(&self) -> TraceMask;

    /// Called when a scope begins. `depth` is 0 for the frame scope.
    fn scope_enter(&mut self, kind: ScopeKind, depth: u32) {
        let _ = (kind, depth);
    }

    /// Called when a scope ends.
    fn scope_exit(&mut self, kind: ScopeKind, depth: u32) {
        let _ = (kind, depth);
    }

    /// Called with a diagnostic message.
    fn message(&mut self, message: &TraceMessage) {
        let _ = message;
    }
}

/// A sink that wants nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn mask(&self) -> TraceMask {
        TraceMask::NONE
    }
}

/// Sends `message` to `sink` if the sink subscribed to its category.
pub(crate) fn emit(sink: &mut dyn TraceSink, message: TraceMessage) {
    if sink.mask().contains(message.category()) {
        sink.message(&message);
    }
}

/// Enters `kind` on `sink` if subscribed.
pub(crate) fn enter(sink: &mut dyn TraceSink, kind: ScopeKind, depth: u32) {
    if sink.mask().contains(kind.category()) {
        sink.scope_enter(kind, depth);
    }
}

/// Exits `kind` on `sink` if subscribed.
pub(crate) fn exit(sink: &mut dyn TraceSink, kind: ScopeKind, depth: u32) {
    if sink.mask().contains(kind.category()) {
        sink.scope_exit(kind, depth);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;
    use std::vec::Vec;

    #[derive(Default)]
    struct Recorder {
        scopes: Vec<(bool, ScopeKind, u32)>,
        messages: Vec<TraceMessage>,
    }

    impl TraceSink for Recorder {
        fn mask(&self) -> TraceMask {
            TraceMask::FRAME | TraceMask::FIXUP
        }

        fn scope_enter(&mut self, kind: ScopeKind, depth: u32) {
            self.scopes.push((true, kind, depth));
        }

        fn scope_exit(&mut self, kind: ScopeKind, depth: u32) {
            self.scopes.push((false, kind, depth));
        }

        fn message(&mut self, message: &TraceMessage) {
            self.messages.push(*message);
        }
    }

    #[test]
    fn mask_filters_scopes_and_messages() {
        let mut rec = Recorder::default();
        enter(&mut rec, ScopeKind::Frame, 0);
        enter(&mut rec, ScopeKind::Leaderboards, 1);
        emit(&mut rec, TraceMessage::Unmapped { address: 4 });
        emit(&mut rec, TraceMessage::Awarded { id: 1 });
        exit(&mut rec, ScopeKind::Frame, 0);

        assert_eq!(rec.scopes, [
            (true, ScopeKind::Frame, 0),
            (false, ScopeKind::Frame, 0)
        ]);
        assert_eq!(rec.messages, [TraceMessage::Unmapped { address: 4 }]);
    }

    #[test]
    fn mask_bits() {
        let m = TraceMask::FRAME | TraceMask::LEADERBOARDS;
        assert!(m.contains(TraceMask::FRAME));
        assert!(!m.contains(TraceMask::FIXUP));
        assert!(TraceMask::ALL.contains(m));
        assert!(TraceMask::NONE.is_empty());
    }

    #[test]
    fn messages_render() {
        assert_eq!(
            TraceMessage::Mirrored {
                console: ConsoleId::NINTENDO,
                from: 0x0900,
                to: 0x0100
            }
            .to_string(),
            "NES memory address in mirrored RAM 0x0900 adjusted to 0x0100"
        );
        assert_eq!(TraceMessage::Rejected { id: 7 }.to_string(), "leaderboard 7 tried to submit 0");
    }
}
