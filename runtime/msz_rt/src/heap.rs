//! Sparse byte-addressed heap.
//!
//! Allocations are zero-filled blocks keyed by their start address in a
//! `BTreeMap`, so any interior address resolves to its block with one range
//! lookup. Addresses are handed out by a bump pointer and never reused.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::{Addr, RtError};

/// Heap configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// First address handed out by the allocator. Must be non-null.
    pub base: Addr,
    /// Upper bound on the total number of bytes allocated.
    pub max_bytes: u64,
    /// Minimum alignment of every allocation (a power of two).
    pub min_align: u64,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            base: Addr::new(0x00c0_0000_0000),
            max_bytes: 1 << 30,
            min_align: 8,
        }
    }
}

impl HeapConfig {
    #[must_use]
    pub fn with_base(mut self, base: Addr) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_min_align(mut self, min_align: u64) -> Self {
        self.min_align = min_align;
        self
    }
}

/// The host heap.
#[derive(Debug)]
pub struct Heap {
    config: HeapConfig,
    blocks: BTreeMap<u64, Box<[u8]>>,
    next: u64,
    allocated: u64,
}

impl Heap {
    pub fn new(config: HeapConfig) -> Self {
        assert!(!config.base.is_null(), "heap base must not be null");
        assert!(
            config.min_align.is_power_of_two(),
            "minimum alignment must be a power of two"
        );
        Self {
            config,
            blocks: BTreeMap::new(),
            next: config.base.get(),
            allocated: 0,
        }
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Total bytes handed out so far.
    pub fn allocated_bytes(&self) -> u64 {
        self.allocated
    }

    /// Number of live allocations.
    pub fn allocation_count(&self) -> usize {
        self.blocks.len()
    }

    /// Allocate `size` zeroed bytes aligned to `align`.
    ///
    /// Zero-sized requests still receive a distinct address.
    pub fn alloc(&mut self, size: u64, align: u64) -> Result<Addr, RtError> {
        let align = align.max(self.config.min_align);
        debug_assert!(align.is_power_of_two());

        if self.allocated.saturating_add(size) > self.config.max_bytes {
            return Err(RtError::OutOfMemory {
                requested: size,
                limit: self.config.max_bytes,
            });
        }

        let start = (self.next + align - 1) & !(align - 1);
        let backing = size.max(1);
        let len = usize::try_from(backing).map_err(|_| RtError::OutOfMemory {
            requested: size,
            limit: self.config.max_bytes,
        })?;
        self.blocks.insert(start, vec![0; len].into_boxed_slice());
        self.next = start + backing;
        self.allocated += size;

        tracing::trace!(addr = %Addr::new(start), size, align, "alloc");
        Ok(Addr::new(start))
    }

    /// Locate `[addr, addr + len)` as a block start and a byte range
    /// within that block.
    fn locate(&self, addr: Addr, len: u64) -> Result<(u64, Range<usize>), RtError> {
        let out_of_bounds = || RtError::OutOfBounds { addr, len };
        let (&start, block) = self
            .blocks
            .range(..=addr.get())
            .next_back()
            .ok_or_else(out_of_bounds)?;
        let offset = usize::try_from(addr.get() - start).map_err(|_| out_of_bounds())?;
        let len = usize::try_from(len).map_err(|_| out_of_bounds())?;
        match offset.checked_add(len) {
            Some(end) if end <= block.len() => Ok((start, offset..end)),
            _ => Err(out_of_bounds()),
        }
    }

    /// Borrow `len` bytes at `addr`. The range must lie inside one
    /// allocation. Empty reads always succeed.
    pub fn bytes(&self, addr: Addr, len: u64) -> Result<&[u8], RtError> {
        if len == 0 {
            return Ok(&[]);
        }
        let (start, range) = self.locate(addr, len)?;
        Ok(&self.blocks[&start][range])
    }

    /// Overwrite bytes at `addr`.
    pub fn write(&mut self, addr: Addr, data: &[u8]) -> Result<(), RtError> {
        if data.is_empty() {
            return Ok(());
        }
        let (start, range) = self.locate(addr, data.len() as u64)?;
        if let Some(block) = self.blocks.get_mut(&start) {
            block[range].copy_from_slice(data);
        }
        Ok(())
    }

    /// Read one little-endian word.
    pub fn read_word(&self, addr: Addr) -> Result<u64, RtError> {
        let bytes = self.bytes(addr, 8)?;
        Ok(crate::value::read_word(bytes, 0))
    }

    /// Write one little-endian word.
    pub fn write_word(&mut self, addr: Addr, word: u64) -> Result<(), RtError> {
        self.write(addr, &word.to_le_bytes())
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}

#[cfg(test)]
mod tests;
