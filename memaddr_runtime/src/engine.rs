// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-game engine context.
//!
//! An [`Engine`] owns everything parsed for one loaded game: the achievement sets, the
//! leaderboards, and the address [`Fixups`] cache. It is created by [`Engine::load`] and driven by
//! [`Engine::do_frame`] once per emulated frame.

use alloc::vec::Vec;
use core::fmt;
use core::ops::BitOr;

use hashbrown::HashMap;
use memaddr::{Arena, Format, LboardState, Leaderboard, ParseError, Trigger};

use crate::console::ConsoleId;
use crate::defs::{AchievementDef, DefinitionKind, GameDefinitions, LeaderboardDef};
use crate::events::{Event, EventSink};
use crate::fixup::Fixups;
use crate::memory::CoreMemory;
use crate::peek::CorePeek;
use crate::trace::{self, NoTrace, ScopeKind, TraceMessage, TraceSink};

/// User settings that change how frames are processed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    /// Hardcore mode: unlocks count for hardcore and leaderboards may run.
    pub hardcore: bool,
    /// Also test the unofficial achievement set.
    pub test_unofficial: bool,
    /// Run leaderboards (only honored in hardcore).
    pub leaderboards: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hardcore: false,
            test_unofficial: false,
            leaderboards: true,
        }
    }
}

/// Modes in which an achievement can still be unlocked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActiveMode(u8);

impl ActiveMode {
    /// No mode.
    pub const NONE: Self = Self(0);
    /// Softcore.
    pub const SOFTCORE: Self = Self(1);
    /// Hardcore.
    pub const HARDCORE: Self = Self(2);
    /// Both modes.
    pub const BOTH: Self = Self(3);

    /// Returns `true` if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `self` with the bits of `other` cleared.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ActiveMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A definition that failed to parse during [`Engine::load`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    /// Which list the definition came from.
    pub kind: DefinitionKind,
    /// The definition's id.
    pub id: u32,
    /// The parse failure.
    pub error: ParseError,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.id, self.error)
    }
}

impl core::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A loaded achievement.
#[derive(Clone, Debug)]
pub struct Achievement {
    def: AchievementDef,
    trigger: Trigger,
    active: ActiveMode,
    last: bool,
}

impl Achievement {
    fn load(def: AchievementDef, kind: DefinitionKind) -> Result<Self, LoadError> {
        let id = def.id;
        let err = move |error| LoadError { kind, id, error };
        let size = Trigger::size(&def.memaddr).map_err(err)?;
        let trigger = Trigger::parse_in(Arena::with_size(size), &def.memaddr).map_err(err)?;
        Ok(Self {
            def,
            trigger,
            active: ActiveMode::BOTH,
            // Nothing is awarded on the first frame; a trigger already true then is only re-armed.
            last: true,
        })
    }

    /// The definition this achievement was loaded from.
    #[must_use]
    pub fn def(&self) -> &AchievementDef {
        &self.def
    }

    /// The parsed trigger.
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Modes in which the achievement can still be unlocked.
    #[must_use]
    pub fn active(&self) -> ActiveMode {
        self.active
    }

    /// Whether the trigger was true on the last tested frame (or the game was just reset).
    #[must_use]
    pub fn was_true(&self) -> bool {
        self.last
    }
}

/// A loaded leaderboard.
#[derive(Clone, Debug)]
pub struct LeaderboardEntry {
    def: LeaderboardDef,
    board: Leaderboard,
    format: Format,
    last_value: u32,
}

impl LeaderboardEntry {
    fn load(def: LeaderboardDef) -> Result<Self, LoadError> {
        let id = def.id;
        let err = move |error| LoadError {
            kind: DefinitionKind::Leaderboard,
            id,
            error,
        };
        let size = Leaderboard::size(&def.mem).map_err(err)?;
        let board = Leaderboard::parse_in(Arena::with_size(size), &def.mem).map_err(err)?;
        let format = Format::parse(&def.format);
        Ok(Self {
            def,
            board,
            format,
            last_value: 0,
        })
    }

    /// The definition this leaderboard was loaded from.
    #[must_use]
    pub fn def(&self) -> &LeaderboardDef {
        &self.def
    }

    /// The parsed leaderboard.
    #[must_use]
    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    /// Value format.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Last value reported while running.
    #[must_use]
    pub fn last_value(&self) -> u32 {
        self.last_value
    }
}

/// Engine context for one loaded game.
#[derive(Debug)]
pub struct Engine {
    console: ConsoleId,
    config: EngineConfig,
    official: Vec<Achievement>,
    unofficial: Vec<Achievement>,
    leaderboards: Vec<LeaderboardEntry>,
    achievement_index: HashMap<u32, (bool, usize)>,
    leaderboard_index: HashMap<u32, usize>,
    fixups: Fixups,
    hardcore_paused: bool,
    frames: u64,
}

impl Engine {
    /// Parses every definition of `defs`.
    ///
    /// Fails on the first definition that does not parse; nothing is installed in that case.
    pub fn load(defs: GameDefinitions, config: EngineConfig) -> Result<Self, LoadError> {
        let GameDefinitions {
            console,
            core,
            unofficial,
            leaderboards,
        } = defs;

        let official = core
            .into_iter()
            .map(|def| Achievement::load(def, DefinitionKind::CoreAchievement))
            .collect::<Result<Vec<_>, _>>()?;
        let unofficial = unofficial
            .into_iter()
            .map(|def| Achievement::load(def, DefinitionKind::UnofficialAchievement))
            .collect::<Result<Vec<_>, _>>()?;
        let leaderboards = leaderboards
            .into_iter()
            .map(LeaderboardEntry::load)
            .collect::<Result<Vec<_>, _>>()?;

        let mut achievement_index = HashMap::with_capacity(official.len() + unofficial.len());
        for (i, a) in official.iter().enumerate() {
            achievement_index.insert(a.def.id, (true, i));
        }
        for (i, a) in unofficial.iter().enumerate() {
            achievement_index.insert(a.def.id, (false, i));
        }
        let leaderboard_index = leaderboards
            .iter()
            .enumerate()
            .map(|(i, l)| (l.def.id, i))
            .collect();

        Ok(Self {
            console,
            config,
            official,
            unofficial,
            leaderboards,
            achievement_index,
            leaderboard_index,
            fixups: Fixups::new(),
            hardcore_paused: false,
            frames: 0,
        })
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Replaces the settings; takes effect on the next frame.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// The loaded game's console.
    #[must_use]
    pub fn console(&self) -> ConsoleId {
        self.console
    }

    /// The mode unlocks are currently awarded in.
    #[must_use]
    pub fn mode(&self) -> ActiveMode {
        if self.config.hardcore && !self.hardcore_paused {
            ActiveMode::HARDCORE
        } else {
            ActiveMode::SOFTCORE
        }
    }

    /// Number of frames processed.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Tests every active achievement and, in hardcore, every leaderboard against `core`.
    pub fn do_frame<C: CoreMemory + ?Sized>(
        &mut self,
        core: &C,
        events: &mut dyn EventSink,
        trace: Option<&mut dyn TraceSink>,
    ) {
        match trace {
            Some(trace) => self.run_frame(core, events, trace),
            None => self.run_frame(core, events, &mut NoTrace),
        }
    }

    fn run_frame<C: CoreMemory + ?Sized>(
        &mut self,
        core: &C,
        events: &mut dyn EventSink,
        trace: &mut dyn TraceSink,
    ) {
        let mode = self.mode();
        let run_leaderboards =
            self.config.hardcore && self.config.leaderboards && !self.hardcore_paused;
        let Self {
            console,
            config,
            official,
            unofficial,
            leaderboards,
            fixups,
            frames,
            ..
        } = self;
        *frames += 1;

        trace::enter(trace, ScopeKind::Frame, 0);
        {
            let mut peek = CorePeek::new(fixups, core, *console, &mut *trace);
            test_achievements(official, true, mode, &mut peek, events);
            if config.test_unofficial {
                test_achievements(unofficial, false, mode, &mut peek, events);
            }
            if run_leaderboards {
                test_leaderboards(leaderboards, &mut peek, events);
            }
        }
        trace::exit(trace, ScopeKind::Frame, 0);
    }

    /// Clears `mode` from every listed achievement, typically with an unlock list fetched for the
    /// user. Returns how many ids matched a loaded achievement.
    pub fn deactivate_unlocks(&mut self, ids: &[u32], mode: ActiveMode) -> usize {
        let mut matched = 0;
        for id in ids {
            if let Some(a) = self.achievement_mut(*id) {
                a.active = a.active.without(mode);
                matched += 1;
            }
        }
        matched
    }

    /// Re-arms every achievement after a game reset and resets every leaderboard.
    pub fn reset_game(&mut self) {
        for a in self.official.iter_mut().chain(self.unofficial.iter_mut()) {
            a.last = true;
        }
        for l in &mut self.leaderboards {
            l.board.reset();
            l.last_value = 0;
        }
    }

    /// Pauses or resumes hardcore; while paused, unlocks count as softcore and leaderboards stop.
    pub fn set_hardcore_paused(&mut self, paused: bool) {
        self.hardcore_paused = paused;
    }

    /// Whether hardcore is paused.
    #[must_use]
    pub fn hardcore_paused(&self) -> bool {
        self.hardcore_paused
    }

    /// Drops every cached address resolution, for example after the core's memory map changed.
    pub fn invalidate_fixups(&mut self) {
        self.fixups.clear();
    }

    /// The address cache.
    #[must_use]
    pub fn fixups(&self) -> &Fixups {
        &self.fixups
    }

    /// Looks up an achievement in either set.
    #[must_use]
    pub fn achievement(&self, id: u32) -> Option<&Achievement> {
        let &(official, i) = self.achievement_index.get(&id)?;
        self.achievements(official).get(i)
    }

    fn achievement_mut(&mut self, id: u32) -> Option<&mut Achievement> {
        let &(official, i) = self.achievement_index.get(&id)?;
        let set = if official {
            &mut self.official
        } else {
            &mut self.unofficial
        };
        set.get_mut(i)
    }

    /// The core set (`official == true`) or the unofficial set.
    #[must_use]
    pub fn achievements(&self, official: bool) -> &[Achievement] {
        if official {
            &self.official
        } else {
            &self.unofficial
        }
    }

    /// Looks up a leaderboard.
    #[must_use]
    pub fn leaderboard(&self, id: u32) -> Option<&LeaderboardEntry> {
        let &i = self.leaderboard_index.get(&id)?;
        self.leaderboards.get(i)
    }

    /// Every loaded leaderboard.
    #[must_use]
    pub fn leaderboards(&self) -> &[LeaderboardEntry] {
        &self.leaderboards
    }
}

fn test_achievements<C: CoreMemory + ?Sized>(
    set: &mut [Achievement],
    official: bool,
    mode: ActiveMode,
    peek: &mut CorePeek<'_, C>,
    events: &mut dyn EventSink,
) {
    let set_scope = ScopeKind::AchievementSet { official };
    trace::enter(peek.trace(), set_scope, 1);

    for a in set {
        if !a.active.intersects(mode) {
            continue;
        }
        let id = a.def.id;
        let scope = ScopeKind::Achievement { id };
        trace::enter(peek.trace(), scope, 2);

        let valid = a.trigger.test(peek);
        if a.last {
            a.trigger.reset();
        } else if valid {
            a.active = a.active.without(mode);
            if mode == ActiveMode::HARDCORE {
                a.active = a.active.without(ActiveMode::SOFTCORE);
            }
            trace::emit(peek.trace(), TraceMessage::Awarded { id });
            events.event(Event::AchievementUnlocked { id, mode });
        }
        a.last = valid;

        trace::exit(peek.trace(), scope, 2);
    }

    trace::exit(peek.trace(), set_scope, 1);
}

fn test_leaderboards<C: CoreMemory + ?Sized>(
    boards: &mut [LeaderboardEntry],
    peek: &mut CorePeek<'_, C>,
    events: &mut dyn EventSink,
) {
    trace::enter(peek.trace(), ScopeKind::Leaderboards, 1);

    for entry in boards {
        let id = entry.def.id;
        let scope = ScopeKind::Leaderboard { id };
        trace::enter(peek.trace(), scope, 2);

        let eval = entry.board.evaluate(peek);
        match eval.state {
            LboardState::Started => {
                entry.last_value = 0;
                events.event(Event::LeaderboardStarted { id });
            }
            LboardState::Canceled => events.event(Event::LeaderboardCanceled { id }),
            LboardState::Triggered if eval.value == 0 => {
                trace::emit(peek.trace(), TraceMessage::Rejected { id });
                events.event(Event::LeaderboardRejected { id });
            }
            LboardState::Triggered => {
                entry.last_value = eval.value;
                events.event(Event::LeaderboardSubmitted {
                    id,
                    value: eval.value,
                    formatted: entry.format.render(eval.value),
                });
            }
            LboardState::Active | LboardState::Inactive => {}
        }

        if matches!(eval.state, LboardState::Started | LboardState::Active)
            && eval.value != entry.last_value
        {
            entry.last_value = eval.value;
            trace::emit(peek.trace(), TraceMessage::LeaderboardValue {
                id,
                value: eval.value,
            });
        }

        trace::exit(peek.trace(), scope, 2);
    }

    trace::exit(peek.trace(), ScopeKind::Leaderboards, 1);
}
