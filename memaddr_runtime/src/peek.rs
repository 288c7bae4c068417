// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use memaddr::Peek;

use crate::console::ConsoleId;
use crate::fixup::Fixups;
use crate::memory::CoreMemory;
use crate::trace::TraceSink;

/// A [`Peek`] over a core's memory, resolving addresses through a [`Fixups`] cache.
///
/// Multi-byte reads resolve each byte separately and compose them little-endian. Unmapped bytes
/// read as zero.
pub struct CorePeek<'a, C: ?Sized> {
    fixups: &'a mut Fixups,
    core: &'a C,
    console: ConsoleId,
    trace: &'a mut dyn TraceSink,
}

impl<C: ?Sized> core::fmt::Debug for CorePeek<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CorePeek")
            .field("console", &self.console)
            .field("cached", &self.fixups.len())
            .finish_non_exhaustive()
    }
}

impl<'a, C: CoreMemory + ?Sized> CorePeek<'a, C> {
    /// Creates a reader over `core` for `console`.
    pub fn new(
        fixups: &'a mut Fixups,
        core: &'a C,
        console: ConsoleId,
        trace: &'a mut dyn TraceSink,
    ) -> Self {
        Self {
            fixups,
            core,
            console,
            trace,
        }
    }

    /// The trace sink, for callers that interleave their own scopes with reads.
    pub fn trace(&mut self) -> &mut dyn TraceSink {
        &mut *self.trace
    }

    fn byte(&mut self, address: u32) -> u32 {
        let Some(location) = self
            .fixups
            .find(address, self.console, self.core, &mut *self.trace)
        else {
            return 0;
        };
        self.core
            .bytes(location.space)
            .and_then(|bytes| bytes.get(location.offset as usize))
            .map_or(0, |&b| u32::from(b))
    }
}

impl<C: CoreMemory + ?Sized> Peek for CorePeek<'_, C> {
    fn peek(&mut self, address: u32, num_bytes: u32) -> u32 {
        let mut value = 0;
        for i in 0..num_bytes.min(4) {
            value |= self.byte(address.wrapping_add(i)) << (8 * i);
        }
        value
    }
}
