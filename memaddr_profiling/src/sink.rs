// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::resolver::{
    DefaultLabelResolver, LabelResolver, default_achievement_label, default_leaderboard_label,
};
use memaddr_runtime::{ScopeKind, TraceMask, TraceMessage, TraceSink};
use std::string::{String, ToString};
use std::vec::Vec;

type BackendGuard = tracy_client::Span;

struct ScopeEntry {
    kind: ScopeKind,
    depth: u32,
    // Keep the label alive for backends that may borrow it.
    label: String,
    guard: Option<BackendGuard>,
}

/// A `TraceSink` that emits Tracy zones via `tracy-client`.
///
/// Frame, achievement and leaderboard scopes become zones; award and leaderboard messages become
/// Tracy messages. Address fix-up messages are not requested.
pub struct ProfilingTraceSink<R = DefaultLabelResolver> {
    resolver: R,
    stack: Vec<ScopeEntry>,
}

impl ProfilingTraceSink<DefaultLabelResolver> {
    /// Create a new sink with id-based labels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: LabelResolver> ProfilingTraceSink<R> {
    /// Create a new sink with a custom label resolver.
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            stack: Vec::new(),
        }
    }

    /// Number of zones currently open.
    #[must_use]
    pub fn open_scopes(&self) -> usize {
        self.stack.len()
    }

    fn on_scope_enter(&mut self, kind: ScopeKind, depth: u32) {
        let label = self.resolve_label(kind);
        let guard = start_scope(kind, &label);
        self.stack.push(ScopeEntry {
            kind,
            depth,
            label,
            guard,
        });
    }

    fn on_scope_exit(&mut self, kind: ScopeKind, depth: u32) {
        if let Some(top) = self.stack.last()
            && top.kind == kind
            && top.depth == depth
        {
            self.stack.pop();
            return;
        }
        // Out of sync: close everything rather than leak zones.
        self.drop_active_scopes();
    }

    fn resolve_label(&mut self, kind: ScopeKind) -> String {
        match kind {
            ScopeKind::Frame => "frame".to_string(),
            ScopeKind::AchievementSet { official: true } => "cheevos:core".to_string(),
            ScopeKind::AchievementSet { official: false } => "cheevos:unofficial".to_string(),
            ScopeKind::Leaderboards => "lboards".to_string(),
            ScopeKind::Achievement { id } => self
                .resolver
                .achievement_label(id)
                .unwrap_or_else(|| default_achievement_label(id)),
            ScopeKind::Leaderboard { id } => self
                .resolver
                .leaderboard_label(id)
                .unwrap_or_else(|| default_leaderboard_label(id)),
        }
    }

    // Drop in LIFO order so nested zones close inner-to-outer.
    fn drop_active_scopes(&mut self) {
        while let Some(entry) = self.stack.pop() {
            let ScopeEntry {
                label: _label,
                guard: _guard,
                ..
            } = entry;
        }
    }
}

fn start_scope(kind: ScopeKind, label: &str) -> Option<BackendGuard> {
    let function_name = match kind {
        ScopeKind::Frame => "memaddr.frame",
        ScopeKind::AchievementSet { .. } => "memaddr.achievement_set",
        ScopeKind::Achievement { .. } => "memaddr.achievement",
        ScopeKind::Leaderboards => "memaddr.leaderboards",
        ScopeKind::Leaderboard { .. } => "memaddr.leaderboard",
    };
    let client = tracy_client::Client::running()?;
    Some(client.span_alloc(Some(label), function_name, "memaddr_runtime", 0, 0))
}

impl<R: LabelResolver> TraceSink for ProfilingTraceSink<R> {
    fn mask(&self) -> TraceMask {
        TraceMask::FRAME | TraceMask::ACHIEVEMENTS | TraceMask::LEADERBOARDS
    }

    fn scope_enter(&mut self, kind: ScopeKind, depth: u32) {
        self.on_scope_enter(kind, depth);
    }

    fn scope_exit(&mut self, kind: ScopeKind, depth: u32) {
        self.on_scope_exit(kind, depth);
    }

    fn message(&mut self, message: &TraceMessage) {
        if let Some(client) = tracy_client::Client::running() {
            client.message(&message.to_string(), 0);
        }
    }
}

impl<R> Default for ProfilingTraceSink<R>
where
    R: LabelResolver + Default,
{
    fn default() -> Self {
        Self::with_resolver(R::default())
    }
}

impl<R> std::fmt::Debug for ProfilingTraceSink<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilingTraceSink")
            .field("stack_depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}
