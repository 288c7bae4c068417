// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine context that runs parsed [`memaddr`] definitions against an emulation core.
//!
//! The runtime is the glue between decoded game definitions and the core's memory:
//! - [`Engine`] owns the parsed achievements and leaderboards of one game and processes frames.
//! - [`CoreMemory`] is the seam to the core's memory (descriptor table or named regions).
//! - [`Fixups`] resolves console addresses into core memory and caches the results.
//! - [`EventSink`] receives unlocks and leaderboard transitions; [`TraceSink`] receives diagnostics.
//!
//! ## Example
//! ```
//! use memaddr_runtime::{
//!     AchievementDef, ConsoleId, Engine, EngineConfig, Event, GameDefinitions, MemoryMap,
//!     MemoryRegion,
//! };
//!
//! let mut defs = GameDefinitions::new(ConsoleId::NINTENDO);
//! defs.core.push(AchievementDef {
//!     id: 1,
//!     memaddr: "0xH0010=3".into(),
//!     ..AchievementDef::default()
//! });
//! let mut engine = Engine::load(defs, EngineConfig::default()).unwrap();
//!
//! let mut memory = MemoryMap::new();
//! memory.set_region(MemoryRegion::SystemRam, vec![0; 0x800]);
//! let mut events: Vec<Event> = Vec::new();
//! engine.do_frame(&memory, &mut events, None);
//! assert!(events.is_empty());
//! ```
//!
//! With the `std` feature, [`EngineSlot`] adds the lock that separates loading from frame
//! processing.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod console;
mod defs;
mod engine;
mod events;
mod fixup;
mod memory;
mod peek;
#[cfg(feature = "std")]
mod slot;
mod trace;

pub use console::ConsoleId;
pub use defs::{AchievementDef, DefinitionKind, GameDefinitions, LeaderboardDef};
pub use engine::{
    Achievement, ActiveMode, Engine, EngineConfig, LeaderboardEntry, LoadError,
};
pub use events::{Event, EventSink};
pub use fixup::{FixupStats, Fixups, add_bits_down, highest_bit, reduce, resolve};
pub use memory::{
    AddressSpace, BlockId, CoreMemory, Location, MemoryDescriptor, MemoryMap, MemoryRegion,
};
pub use peek::CorePeek;
#[cfg(feature = "std")]
pub use slot::EngineSlot;
pub use trace::{NoTrace, ScopeKind, TraceMask, TraceMessage, TraceSink};
