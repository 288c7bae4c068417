// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the conformance suite in `tests/`.
//!
//! [`Ram`] is a flat byte array that implements [`Peek`] directly, for exercising definitions
//! without the runtime's address resolution.

use memaddr::Peek;

/// Flat little-endian memory for driving definitions frame by frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ram {
    bytes: Vec<u8>,
}

impl Ram {
    /// `len` zeroed bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Writes one byte; writes outside the array are ignored.
    pub fn set(&mut self, address: u32, value: u8) {
        if let Some(b) = self.bytes.get_mut(address as usize) {
            *b = value;
        }
    }

    /// Writes a little-endian 16-bit value.
    pub fn set_u16(&mut self, address: u32, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.set(address, lo);
        self.set(address.wrapping_add(1), hi);
    }

    /// The raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Peek for Ram {
    fn peek(&mut self, address: u32, num_bytes: u32) -> u32 {
        (0..num_bytes.min(4)).fold(0, |acc, i| {
            let byte = self
                .bytes
                .get(address.wrapping_add(i) as usize)
                .copied()
                .unwrap_or(0);
            acc | (u32::from(byte) << (8 * i))
        })
    }
}
