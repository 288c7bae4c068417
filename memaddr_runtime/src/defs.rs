// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Already-decoded game definitions, as handed over by whatever fetched them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::console::ConsoleId;

/// One achievement definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AchievementDef {
    /// Server id.
    pub id: u32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Points awarded.
    pub points: u32,
    /// Badge name.
    pub badge: String,
    /// Trigger text.
    pub memaddr: String,
}

/// One leaderboard definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaderboardDef {
    /// Server id.
    pub id: u32,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Value format name, such as `SCORE` or `FRAMES`.
    pub format: String,
    /// Leaderboard text (`STA:...::CAN:...::SUB:...::VAL:...`).
    pub mem: String,
}

/// Everything loaded for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameDefinitions {
    /// Target console.
    pub console: ConsoleId,
    /// Core (official) achievements.
    pub core: Vec<AchievementDef>,
    /// Unofficial achievements.
    pub unofficial: Vec<AchievementDef>,
    /// Leaderboards.
    pub leaderboards: Vec<LeaderboardDef>,
}

impl GameDefinitions {
    /// Creates an empty set for `console`.
    #[must_use]
    pub fn new(console: ConsoleId) -> Self {
        Self {
            console,
            core: Vec::new(),
            unofficial: Vec::new(),
            leaderboards: Vec::new(),
        }
    }
}

/// Which list a definition came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// A core achievement.
    CoreAchievement,
    /// An unofficial achievement.
    UnofficialAchievement,
    /// A leaderboard.
    Leaderboard,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CoreAchievement => "core achievement",
            Self::UnofficialAchievement => "unofficial achievement",
            Self::Leaderboard => "leaderboard",
        })
    }
}
