// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use memaddr_runtime::GameDefinitions;
use std::collections::HashMap;
use std::string::String;

/// Optional label resolver for profiling scopes.
///
/// Return `None` to fall back to the default id-based labels.
pub trait LabelResolver {
    /// Resolve a label for an achievement scope.
    fn achievement_label(&mut self, _id: u32) -> Option<String> {
        None
    }

    /// Resolve a label for a leaderboard scope.
    fn leaderboard_label(&mut self, _id: u32) -> Option<String> {
        None
    }
}

/// Default resolver that keeps stable id-based labels.
#[derive(Default, Debug)]
pub struct DefaultLabelResolver;

impl LabelResolver for DefaultLabelResolver {}

/// Resolver that labels scopes with definition titles.
#[derive(Default, Debug)]
pub struct DefinitionTitleResolver {
    achievements: HashMap<u32, String>,
    leaderboards: HashMap<u32, String>,
}

impl DefinitionTitleResolver {
    /// Captures the titles of every definition in `defs`.
    #[must_use]
    pub fn new(defs: &GameDefinitions) -> Self {
        let achievements = defs
            .core
            .iter()
            .chain(&defs.unofficial)
            .filter(|a| !a.title.is_empty())
            .map(|a| (a.id, format!("cheevo:{} {}", a.id, a.title)))
            .collect();
        let leaderboards = defs
            .leaderboards
            .iter()
            .filter(|l| !l.title.is_empty())
            .map(|l| (l.id, format!("lboard:{} {}", l.id, l.title)))
            .collect();
        Self {
            achievements,
            leaderboards,
        }
    }
}

impl LabelResolver for DefinitionTitleResolver {
    fn achievement_label(&mut self, id: u32) -> Option<String> {
        self.achievements.get(&id).cloned()
    }

    fn leaderboard_label(&mut self, id: u32) -> Option<String> {
        self.leaderboards.get(&id).cloned()
    }
}

pub(crate) fn default_achievement_label(id: u32) -> String {
    format!("cheevo:{id}")
}

pub(crate) fn default_leaderboard_label(id: u32) -> String {
    format!("lboard:{id}")
}
