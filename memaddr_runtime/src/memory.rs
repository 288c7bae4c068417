// Copyright 2026 the Memaddr Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The emulation core's memory, as seen by the engine.
//!
//! Cores expose memory either through a descriptor table (mapping bus addresses onto blocks) or,
//! for older cores, through a fixed set of named regions. [`CoreMemory`] is the seam; [`MemoryMap`]
//! is a simple owned implementation.

use alloc::vec::Vec;

/// Handle to a memory block a descriptor maps onto.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct BlockId(pub u32);

/// Named memory regions probed when a core has no descriptor table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Main work RAM.
    SystemRam,
    /// Battery-backed cartridge RAM.
    SaveRam,
    /// Video RAM.
    VideoRam,
    /// Real-time clock registers.
    Rtc,
}

impl MemoryRegion {
    /// Probe order of the fallback path.
    pub const FALLBACK_ORDER: [Self; 4] = [Self::SystemRam, Self::SaveRam, Self::VideoRam, Self::Rtc];

    fn index(self) -> usize {
        match self {
            Self::SystemRam => 0,
            Self::SaveRam => 1,
            Self::VideoRam => 2,
            Self::Rtc => 3,
        }
    }
}

/// One entry of a core's memory map.
///
/// A bus address `a` belongs to the descriptor when `((start ^ a) & select) == 0`. Bits set in
/// `disconnect` are address lines that do not reach the memory and are squeezed out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoryDescriptor {
    /// First bus address.
    pub start: u32,
    /// Address bits that must match `start`.
    pub select: u32,
    /// Address lines that are not connected.
    pub disconnect: u32,
    /// Length of the mapped memory in bytes.
    pub len: u32,
    /// Byte offset into the block.
    pub offset: u32,
    /// Block holding the bytes.
    pub block: BlockId,
}

/// Where a resolved address lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    /// A block referenced by a descriptor.
    Block(BlockId),
    /// A named region of the fallback path.
    Region(MemoryRegion),
}

/// A concrete memory location.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// The memory holding the byte.
    pub space: AddressSpace,
    /// Byte offset within `space`.
    pub offset: u32,
}

/// Read access to an emulation core's memory.
pub trait CoreMemory {
    /// The core's descriptor table; empty if the core only exposes named regions.
    fn descriptors(&self) -> &[MemoryDescriptor];

    /// Bytes of a block or region, if present.
    fn bytes(&self, space: AddressSpace) -> Option<&[u8]>;

    /// Size of a named region in bytes (0 if absent).
    fn region_size(&self, region: MemoryRegion) -> u32 {
        self.bytes(AddressSpace::Region(region))
            .map_or(0, |b| u32::try_from(b.len()).unwrap_or(u32::MAX))
    }
}

/// Owned memory map: blocks with descriptors, plus the fallback regions.
#[derive(Clone, Debug, Default)]
pub struct MemoryMap {
    descriptors: Vec<MemoryDescriptor>,
    blocks: Vec<Vec<u8>>,
    regions: [Vec<u8>; 4],
}

impl MemoryMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block of memory and returns its handle.
    pub fn add_block(&mut self, bytes: Vec<u8>) -> BlockId {
        let id = u32::try_from(self.blocks.len()).unwrap_or(u32::MAX);
        self.blocks.push(bytes);
        BlockId(id)
    }

    /// Appends a descriptor; descriptors are matched in insertion order.
    pub fn add_descriptor(&mut self, descriptor: MemoryDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Replaces the bytes of a fallback region.
    pub fn set_region(&mut self, region: MemoryRegion, bytes: Vec<u8>) {
        self.regions[region.index()] = bytes;
    }

    /// Mutable bytes of a block or region.
    pub fn bytes_mut(&mut self, space: AddressSpace) -> Option<&mut [u8]> {
        match space {
            AddressSpace::Block(id) => self.blocks.get_mut(id.0 as usize).map(Vec::as_mut_slice),
            AddressSpace::Region(region) => {
                let bytes = &mut self.regions[region.index()];
                (!bytes.is_empty()).then_some(bytes.as_mut_slice())
            }
        }
    }
}

impl CoreMemory for MemoryMap {
    fn descriptors(&self) -> &[MemoryDescriptor] {
        &self.descriptors
    }

    fn bytes(&self, space: AddressSpace) -> Option<&[u8]> {
        match space {
            AddressSpace::Block(id) => self.blocks.get(id.0 as usize).map(Vec::as_slice),
            AddressSpace::Region(region) => {
                let bytes = &self.regions[region.index()];
                (!bytes.is_empty()).then_some(bytes.as_slice())
            }
        }
    }
}
