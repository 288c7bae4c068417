// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::{Mutex, PoisonError};

use crate::engine::Engine;
use crate::events::EventSink;
use crate::memory::CoreMemory;
use crate::trace::TraceSink;

/// The mutual-exclusion boundary between loading and frame processing.
///
/// A loader thread parses a new [`Engine`] off the emulation thread and [`install`]s it; the
/// emulation thread calls [`do_frame`] every frame. Both take the same lock, so a frame never sees
/// a half-installed game.
///
/// [`install`]: EngineSlot::install
/// [`do_frame`]: EngineSlot::do_frame
#[derive(Debug, Default)]
pub struct EngineSlot {
    engine: Mutex<Option<Engine>>,
}

impl EngineSlot {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Engine>> {
        // A sink panicking mid-frame leaves the engine usable.
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs `engine`, returning the previously loaded one.
    pub fn install(&self, engine: Engine) -> Option<Engine> {
        self.lock().replace(engine)
    }

    /// Removes and returns the loaded engine.
    pub fn unload(&self) -> Option<Engine> {
        self.lock().take()
    }

    /// Returns `true` if an engine is installed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs `f` on the loaded engine under the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        self.lock().as_mut().map(f)
    }

    /// Processes one frame if an engine is installed. Returns `false` if none is.
    pub fn do_frame<C: CoreMemory + ?Sized>(
        &self,
        core: &C,
        events: &mut dyn EventSink,
        trace: Option<&mut dyn TraceSink>,
    ) -> bool {
        match self.lock().as_mut() {
            Some(engine) => {
                engine.do_frame(core, events, trace);
                true
            }
            None => false,
        }
    }
}
