// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parser and evaluator for achievement and leaderboard memory-address definitions.
//!
//! Definitions are compact text such as `0xH0010=5_d0xH0010!=5(3)S0xH0020>=h10`. Each top-level
//! entry point ([`Trigger`], [`Value`], [`Leaderboard`]) parses its text once into a single
//! [`Arena`] and is then evaluated once per emulated frame against a [`Peek`] memory reader,
//! without further allocation.
//!
//! Parsing runs the grammar twice: a measuring pass computes the exact [`ArenaSize`], then a
//! writing pass places every node into an arena reserved with that size. Callers that manage
//! their own storage can use `size` and `parse_in` separately.
//!
//! ## Example
//! ```
//! use memaddr::Trigger;
//!
//! let mut trigger = Trigger::parse("0xH0001=5_0xH0002>0xH0001").unwrap();
//! let ram = [0_u8, 5, 9];
//! let mut peek = |address: u32, _bytes: u32| u32::from(ram[address as usize]);
//! assert!(trigger.test(&mut peek));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod arena;
mod condition;
mod condset;
mod error;
mod format;
mod lboard;
mod operand;
mod scan;
mod trigger;
mod value;

pub use arena::{Arena, ArenaSize};
pub use condition::{Condition, ConditionType, Operator};
pub use condset::CondsetView;
pub use error::ParseError;
pub use format::{Format, FormattedValue};
pub use lboard::{LboardEvaluation, LboardState, Leaderboard};
pub use operand::{MemRef, Operand, Peek, Size, decode_bcd};
pub use trigger::Trigger;
pub use value::Value;
