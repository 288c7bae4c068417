// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use memaddr::FormattedValue;

use crate::engine::ActiveMode;

/// Something the host should act on after a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// An achievement's trigger fired.
    AchievementUnlocked {
        /// Achievement id.
        id: u32,
        /// Mode the unlock counts for.
        mode: ActiveMode,
    },
    /// A leaderboard attempt began.
    LeaderboardStarted {
        /// Leaderboard id.
        id: u32,
    },
    /// A running attempt was canceled.
    LeaderboardCanceled {
        /// Leaderboard id.
        id: u32,
    },
    /// An attempt finished with a value to submit.
    LeaderboardSubmitted {
        /// Leaderboard id.
        id: u32,
        /// Raw value.
        value: u32,
        /// Value rendered with the leaderboard's format.
        formatted: FormattedValue,
    },
    /// An attempt finished with a value of zero, which is never submitted.
    LeaderboardRejected {
        /// Leaderboard id.
        id: u32,
    },
}

/// Receiver of engine events.
pub trait EventSink {
    /// Called once per event, in evaluation order.
    fn event(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn event(&mut self, event: Event) {
        self.push(event);
    }
}
