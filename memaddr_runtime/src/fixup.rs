// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of console addresses into core memory locations.
//!
//! Definitions address memory the way the console's documentation does. [`resolve`] maps such an
//! address onto the core's memory, applying the console's mirror and rebase rules and then either
//! the core's descriptor table or the named-region fallback. [`Fixups`] caches the results.

use alloc::vec::Vec;

use crate::console::ConsoleId;
use crate::memory::{AddressSpace, CoreMemory, Location, MemoryRegion};
use crate::trace::{self, TraceMessage, TraceSink};

/// Squeezes the bits set in `mask` out of `addr`, shifting higher bits down.
#[must_use]
pub const fn reduce(mut addr: u32, mut mask: u32) -> u32 {
    while mask != 0 {
        let tmp = (mask - 1) & !mask;
        addr = (addr & tmp) | ((addr >> 1) & !tmp);
        mask = (mask & (mask - 1)) >> 1;
    }
    addr
}

/// Returns the highest set bit of `n` (0 for 0).
#[must_use]
pub const fn highest_bit(mut n: u32) -> u32 {
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n ^ (n >> 1)
}

/// Sets every bit below the highest set bit of `n`.
#[must_use]
pub const fn add_bits_down(mut n: u32) -> u32 {
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n
}

fn mirror(address: u32, console: ConsoleId) -> u32 {
    match console {
        ConsoleId::NINTENDO if (0x0800..0x2000).contains(&address) => address & 0x07FF,
        ConsoleId::GAMEBOY_COLOR if (0xE000..=0xFDFF).contains(&address) => address - 0x2000,
        _ => address,
    }
}

fn rebase(address: u32, console: ConsoleId) -> u32 {
    match console {
        ConsoleId::GAMEBOY_ADVANCE if address < 0x8000 => address.wrapping_add(0x0300_0000),
        ConsoleId::GAMEBOY_ADVANCE => address.wrapping_add(0x0200_0000 - 0x8000),
        ConsoleId::PC_ENGINE => address.wrapping_add(0x001F_0000),
        ConsoleId::SUPER_NINTENDO if address < 0x0002_0000 => address.wrapping_add(0x007E_0000),
        ConsoleId::SUPER_NINTENDO => address.wrapping_add(0x6000).wrapping_sub(0x0002_0000),
        _ => address,
    }
}

/// Resolves `address` for `console` against `core`'s memory, without caching.
///
/// Returns `None` when nothing backs the address.
pub fn resolve<C: CoreMemory + ?Sized>(
    address: u32,
    console: ConsoleId,
    core: &C,
    trace: &mut dyn TraceSink,
) -> Option<Location> {
    let mut address = address;

    let mirrored = mirror(address, console);
    if mirrored != address {
        trace::emit(trace, TraceMessage::Mirrored {
            console,
            from: address,
            to: mirrored,
        });
        address = mirrored;
    }

    let descriptors = core.descriptors();
    if !descriptors.is_empty() {
        let rebased = rebase(address, console);
        if rebased != address {
            trace::emit(trace, TraceMessage::Rebased {
                console,
                from: address,
                to: rebased,
            });
            address = rebased;
        }

        let found = descriptors
            .iter()
            .enumerate()
            .find(|(_, d)| (d.start ^ address) & d.select == 0);
        let Some((index, desc)) = found else {
            trace::emit(trace, TraceMessage::Unmapped { address });
            return None;
        };

        let mut offset = reduce(
            address.wrapping_sub(desc.start) & add_bits_down(desc.len.wrapping_sub(1)),
            desc.disconnect,
        );
        if offset >= desc.len {
            offset -= highest_bit(offset);
        }
        let offset = offset.wrapping_add(desc.offset);

        trace::emit(trace, TraceMessage::Descriptor {
            address,
            index,
            block: desc.block,
            offset,
        });
        return Some(Location {
            space: AddressSpace::Block(desc.block),
            offset,
        });
    }

    let requested = address;
    for (i, region) in MemoryRegion::FALLBACK_ORDER.into_iter().enumerate() {
        let size = core.region_size(region);
        if address < size {
            trace::emit(trace, TraceMessage::Region {
                address: requested,
                region,
                offset: address,
            });
            return Some(Location {
                space: AddressSpace::Region(region),
                offset: address,
            });
        }
        // Save RAM sits at 0x6000 on the NES bus whatever the reported RAM size.
        address = if i == 0 && console == ConsoleId::NINTENDO {
            address.wrapping_sub(0x6000)
        } else {
            address.wrapping_sub(size)
        };
    }

    trace::emit(trace, TraceMessage::Unmapped { address: requested });
    None
}

/// Counters kept by [`Fixups`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FixupStats {
    /// Calls to [`Fixups::find`].
    pub lookups: u64,
    /// Lookups that missed the cache and ran [`resolve`].
    pub resolutions: u64,
}

#[derive(Copy, Clone, Debug)]
struct Fixup {
    address: u32,
    location: Option<Location>,
}

/// Cache of resolved addresses.
///
/// New entries are appended; the table is re-sorted lazily on the next lookup. Unmapped addresses
/// are cached too.
#[derive(Clone, Debug, Default)]
pub struct Fixups {
    entries: Vec<Fixup>,
    dirty: bool,
    stats: FixupStats,
}

impl Fixups {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the location of `address`, resolving and caching it on a miss.
    ///
    /// Returns `None` for unmapped addresses, and also when the cache cannot grow.
    pub fn find<C: CoreMemory + ?Sized>(
        &mut self,
        address: u32,
        console: ConsoleId,
        core: &C,
        trace: &mut dyn TraceSink,
    ) -> Option<Location> {
        self.stats.lookups += 1;

        if self.dirty {
            self.entries.sort_unstable_by_key(|f| f.address);
            self.dirty = false;
        }

        if let Ok(i) = self.entries.binary_search_by_key(&address, |f| f.address) {
            return self.entries[i].location;
        }

        if self.entries.try_reserve(1).is_err() {
            return None;
        }

        self.stats.resolutions += 1;
        let location = resolve(address, console, core, trace);
        self.entries.push(Fixup { address, location });
        self.dirty = true;
        location
    }

    /// Drops every cached entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dirty = false;
    }

    /// Number of cached addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookup counters.
    #[must_use]
    pub fn stats(&self) -> FixupStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::memory::{MemoryDescriptor, MemoryMap};
    use crate::trace::{NoTrace, TraceMask};
    use alloc::vec;
    use std::vec::Vec;

    struct Messages(Vec<TraceMessage>);

    impl TraceSink for Messages {
        fn mask(&self) -> TraceMask {
            TraceMask::FIXUP
        }

        fn message(&mut self, message: &TraceMessage) {
            self.0.push(*message);
        }
    }

    fn nes_map() -> MemoryMap {
        let mut map = MemoryMap::new();
        map.set_region(MemoryRegion::SystemRam, vec![0; 0x800]);
        map.set_region(MemoryRegion::SaveRam, vec![0; 0x2000]);
        map
    }

    #[test]
    fn bit_helpers() {
        assert_eq!(highest_bit(0), 0);
        assert_eq!(highest_bit(0x1234), 0x1000);
        assert_eq!(add_bits_down(0x1000), 0x1FFF);
        assert_eq!(add_bits_down(0), 0);
        assert_eq!(reduce(0b1011, 0), 0b1011);
        // Bit 1 disconnected: bits above it shift down by one.
        assert_eq!(reduce(0b1101, 0b0010), 0b111);
    }

    #[test]
    fn nes_mirror_folds_onto_base_ram() {
        let map = nes_map();
        let mut msgs = Messages(Vec::new());
        let loc = resolve(0x0900, ConsoleId::NINTENDO, &map, &mut msgs).unwrap();
        assert_eq!(loc, Location {
            space: AddressSpace::Region(MemoryRegion::SystemRam),
            offset: 0x0100
        });
        assert_eq!(msgs.0[0], TraceMessage::Mirrored {
            console: ConsoleId::NINTENDO,
            from: 0x0900,
            to: 0x0100
        });
    }

    #[test]
    fn nes_save_ram_sits_at_0x6000() {
        let map = nes_map();
        let loc = resolve(0x6010, ConsoleId::NINTENDO, &map, &mut NoTrace).unwrap();
        assert_eq!(loc, Location {
            space: AddressSpace::Region(MemoryRegion::SaveRam),
            offset: 0x10
        });
        assert!(resolve(0x3000, ConsoleId::NINTENDO, &map, &mut NoTrace).is_none());
    }

    #[test]
    fn fallback_subtracts_region_sizes() {
        let mut map = MemoryMap::new();
        map.set_region(MemoryRegion::SystemRam, vec![0; 0x100]);
        map.set_region(MemoryRegion::VideoRam, vec![0; 0x100]);
        let loc = resolve(0x180, ConsoleId::MEGA_DRIVE, &map, &mut NoTrace).unwrap();
        assert_eq!(loc, Location {
            space: AddressSpace::Region(MemoryRegion::VideoRam),
            offset: 0x80
        });
        assert!(resolve(0x200, ConsoleId::MEGA_DRIVE, &map, &mut NoTrace).is_none());
    }

    #[test]
    fn gbc_echo_ram() {
        let mut map = MemoryMap::new();
        map.set_region(MemoryRegion::SystemRam, vec![0; 0x10000]);
        let loc = resolve(0xE010, ConsoleId::GAMEBOY_COLOR, &map, &mut NoTrace).unwrap();
        assert_eq!(loc.offset, 0xC010);
    }

    #[test]
    fn descriptor_match_and_offset() {
        let mut map = MemoryMap::new();
        let block = map.add_block(vec![0; 0x2000]);
        map.add_descriptor(MemoryDescriptor {
            start: 0x1000,
            select: 0xF000,
            disconnect: 0,
            len: 0x1000,
            offset: 0x10,
            block,
        });
        let loc = resolve(0x1234, ConsoleId::MEGA_DRIVE, &map, &mut NoTrace).unwrap();
        assert_eq!(loc, Location {
            space: AddressSpace::Block(block),
            offset: 0x244
        });
        assert!(resolve(0x2000, ConsoleId::MEGA_DRIVE, &map, &mut NoTrace).is_none());
    }

    #[test]
    fn descriptor_first_match_wins() {
        let mut map = MemoryMap::new();
        let a = map.add_block(vec![0; 0x100]);
        let b = map.add_block(vec![0; 0x100]);
        for block in [a, b] {
            map.add_descriptor(MemoryDescriptor {
                start: 0,
                select: 0xFF00,
                disconnect: 0,
                len: 0x100,
                offset: 0,
                block,
            });
        }
        let loc = resolve(0x42, ConsoleId::ARCADE, &map, &mut NoTrace).unwrap();
        assert_eq!(loc.space, AddressSpace::Block(a));
    }

    #[test]
    fn snes_rebases_before_descriptor_search() {
        let mut map = MemoryMap::new();
        let wram = map.add_block(vec![0; 0x20000]);
        map.add_descriptor(MemoryDescriptor {
            start: 0x7E_0000,
            select: 0xFE_0000,
            disconnect: 0,
            len: 0x20000,
            offset: 0,
            block: wram,
        });
        let mut msgs = Messages(Vec::new());
        let loc = resolve(0x0123, ConsoleId::SUPER_NINTENDO, &map, &mut msgs).unwrap();
        assert_eq!(loc, Location {
            space: AddressSpace::Block(wram),
            offset: 0x0123
        });
        assert_eq!(msgs.0[0], TraceMessage::Rebased {
            console: ConsoleId::SUPER_NINTENDO,
            from: 0x0123,
            to: 0x7E_0123
        });
    }

    #[test]
    fn cache_resolves_once_and_keeps_misses() {
        let map = nes_map();
        let mut fixups = Fixups::new();
        for addr in [0x10, 0x0810, 0x10, 0x3000, 0x3000] {
            let _ = fixups.find(addr, ConsoleId::NINTENDO, &map, &mut NoTrace);
        }
        assert_eq!(fixups.len(), 3);
        assert_eq!(fixups.stats(), FixupStats {
            lookups: 5,
            resolutions: 3
        });
        assert!(fixups.find(0x3000, ConsoleId::NINTENDO, &map, &mut NoTrace).is_none());

        fixups.clear();
        assert!(fixups.is_empty());
    }
}
