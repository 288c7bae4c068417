// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Console identifiers as used by definition servers.

use core::fmt;

/// Identifier of the console a game set targets.
///
/// Unknown ids are representable; they simply get no console-specific address fix-ups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ConsoleId(pub u32);

#[allow(missing_docs, reason = "constant names are the console names")]
impl ConsoleId {
    pub const MEGA_DRIVE: Self = Self(1);
    pub const NINTENDO_64: Self = Self(2);
    pub const SUPER_NINTENDO: Self = Self(3);
    pub const GAMEBOY: Self = Self(4);
    pub const GAMEBOY_ADVANCE: Self = Self(5);
    pub const GAMEBOY_COLOR: Self = Self(6);
    pub const NINTENDO: Self = Self(7);
    pub const PC_ENGINE: Self = Self(8);
    pub const SEGA_CD: Self = Self(9);
    pub const SEGA_32X: Self = Self(10);
    pub const MASTER_SYSTEM: Self = Self(11);
    pub const PLAYSTATION: Self = Self(12);
    pub const ATARI_LYNX: Self = Self(13);
    pub const NEOGEO_POCKET: Self = Self(14);
    pub const GAME_GEAR: Self = Self(15);
    pub const GAMECUBE: Self = Self(16);
    pub const ATARI_JAGUAR: Self = Self(17);
    pub const NINTENDO_DS: Self = Self(18);
    pub const WII: Self = Self(19);
    pub const WII_U: Self = Self(20);
    pub const PLAYSTATION_2: Self = Self(21);
    pub const XBOX: Self = Self(22);
    pub const SKYNET: Self = Self(23);
    pub const XBOX_ONE: Self = Self(24);
    pub const ATARI_2600: Self = Self(25);
    pub const MS_DOS: Self = Self(26);
    pub const ARCADE: Self = Self(27);
    pub const VIRTUAL_BOY: Self = Self(28);
    pub const MSX: Self = Self(29);
    pub const COMMODORE_64: Self = Self(30);
    pub const ZX81: Self = Self(31);
}

impl ConsoleId {
    /// Human-readable console name, if the id is known.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            1 => "Mega Drive",
            2 => "Nintendo 64",
            3 => "Super Nintendo",
            4 => "Game Boy",
            5 => "Game Boy Advance",
            6 => "Game Boy Color",
            7 => "NES",
            8 => "PC Engine",
            9 => "Sega CD",
            10 => "Sega 32X",
            11 => "Master System",
            12 => "PlayStation",
            13 => "Atari Lynx",
            14 => "Neo Geo Pocket",
            15 => "Game Gear",
            16 => "GameCube",
            17 => "Atari Jaguar",
            18 => "Nintendo DS",
            19 => "Wii",
            20 => "Wii U",
            21 => "PlayStation 2",
            22 => "Xbox",
            23 => "Skynet",
            24 => "Xbox One",
            25 => "Atari 2600",
            26 => "MS-DOS",
            27 => "Arcade",
            28 => "Virtual Boy",
            29 => "MSX",
            30 => "Commodore 64",
            31 => "ZX81",
            _ => return None,
        })
    }
}

impl fmt::Display for ConsoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "console {}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn names_cover_the_table() {
        for id in 1..=31 {
            assert!(ConsoleId(id).name().is_some(), "id {id}");
        }
        assert_eq!(ConsoleId::NINTENDO.to_string(), "NES");
        assert_eq!(ConsoleId(99).to_string(), "console 99");
    }
}
