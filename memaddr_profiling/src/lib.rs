// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Profiling adapters for `memaddr_runtime` (currently Tracy).
//!
//! This crate is `std`-only and keeps `memaddr_runtime` itself free of profiling dependencies.
//! It listens for frame, achievement and leaderboard scopes and emits matching profiling zones;
//! trace messages become Tracy messages.
//!
//! ## Backend
//! This crate currently supports the Tracy backend via `tracy-client`.
//!
//! ## Example
//! ```ignore
//! use memaddr_profiling::{DefinitionTitleResolver, ProfilingTraceSink};
//!
//! let mut sink = ProfilingTraceSink::with_resolver(DefinitionTitleResolver::new(&defs));
//! let mut engine = Engine::load(defs, EngineConfig::default())?;
//! engine.do_frame(&memory, &mut events, Some(&mut sink));
//! # Ok::<(), memaddr_runtime::LoadError>(())
//! ```

mod resolver;
mod sink;

pub use resolver::{DefaultLabelResolver, DefinitionTitleResolver, LabelResolver};
pub use sink::ProfilingTraceSink;
