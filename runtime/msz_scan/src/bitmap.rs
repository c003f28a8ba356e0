//! Sparse bitmap over the 64-bit address space.
//!
//! One bit per byte. The address space is cut into 1 MiB blocks; a block's
//! bits are allocated the first time any byte in it is marked, so memory
//! use is proportional to the number of distinct megabytes touched, not to
//! the span between the lowest and highest address.

use rustc_hash::FxHashMap;

const WORD_BITS: u64 = u64::BITS as u64;

/// Bytes of address space covered by one block.
const BLOCK_RANGE: u64 = 1 << 20;

/// Words per block.
#[allow(clippy::cast_possible_truncation, reason = "constant fits in usize")]
const BLOCK_WORDS: usize = (BLOCK_RANGE / WORD_BITS) as usize;

/// Set of counted heap bytes.
#[derive(Default)]
pub struct Bitmap {
    blocks: FxHashMap<u64, Box<[u64]>>,
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `[addr, addr + len)`. Marking is idempotent.
    pub fn mark_range(&mut self, addr: u64, len: u64) {
        let end = addr.saturating_add(len);
        let mut addr = addr;
        while addr < end {
            let (index, offset) = split(addr);
            let span = (end - addr).min(BLOCK_RANGE - offset);
            let block = self
                .blocks
                .entry(index)
                .or_insert_with(|| vec![0; BLOCK_WORDS].into_boxed_slice());
            set_bits(block, offset, offset + span);
            addr += span;
        }
    }

    /// Whether the byte at `addr` is marked.
    pub fn is_marked(&self, addr: u64) -> bool {
        let (index, offset) = split(addr);
        self.blocks.get(&index).is_some_and(|block| {
            let (word, bit) = word_and_bit(offset);
            block[word] & (1 << bit) != 0
        })
    }

    /// Number of marked bytes in `[addr, addr + len)`.
    pub fn count_range(&self, addr: u64, len: u64) -> u64 {
        let end = addr.saturating_add(len);
        let mut addr = addr;
        let mut count = 0;
        while addr < end {
            let (index, offset) = split(addr);
            let span = (end - addr).min(BLOCK_RANGE - offset);
            if let Some(block) = self.blocks.get(&index) {
                count += count_bits(block, offset, offset + span);
            }
            addr += span;
        }
        count
    }

    /// Bytes of bitmap storage allocated.
    pub fn size(&self) -> u64 {
        self.blocks.len() as u64 * BLOCK_WORDS as u64 * (WORD_BITS / 8)
    }

    /// Mean fraction of set bits across allocated blocks; 0.0 when nothing
    /// has been marked.
    #[allow(clippy::cast_precision_loss, reason = "diagnostic ratio")]
    pub fn utilization(&self) -> f32 {
        if self.blocks.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .blocks
            .values()
            .map(|block| count_bits(block, 0, BLOCK_RANGE) as f64 / BLOCK_RANGE as f64)
            .sum();
        #[allow(clippy::cast_possible_truncation, reason = "ratio in 0.0..=1.0")]
        let mean = (sum / self.blocks.len() as f64) as f32;
        mean
    }
}

/// Block index and byte offset within the block.
#[inline]
fn split(addr: u64) -> (u64, u64) {
    (addr / BLOCK_RANGE, addr % BLOCK_RANGE)
}

#[inline]
#[allow(clippy::cast_possible_truncation, reason = "offsets are below BLOCK_RANGE")]
fn word_and_bit(offset: u64) -> (usize, u64) {
    ((offset / WORD_BITS) as usize, offset % WORD_BITS)
}

/// Mask of `span` bits starting at `bit` (`span` in `1..=64`).
#[inline]
fn mask(bit: u64, span: u64) -> u64 {
    if span == WORD_BITS {
        !0
    } else {
        ((1 << span) - 1) << bit
    }
}

/// Set bits `[start, end)` of a block.
fn set_bits(block: &mut [u64], mut start: u64, end: u64) {
    while start < end {
        let (word, bit) = word_and_bit(start);
        let span = (WORD_BITS - bit).min(end - start);
        block[word] |= mask(bit, span);
        start += span;
    }
}

/// Count set bits in `[start, end)` of a block.
fn count_bits(block: &[u64], mut start: u64, end: u64) -> u64 {
    let mut count = 0;
    while start < end {
        let (word, bit) = word_and_bit(start);
        let span = (WORD_BITS - bit).min(end - start);
        count += u64::from((block[word] & mask(bit, span)).count_ones());
        start += span;
    }
    count
}
