//! Value layout under the runtime's 64-bit word model.

/// Size of a machine word (pointer, length, capacity) in bytes.
pub const WORD_SIZE: u64 = 8;

/// Size and alignment of a type's static storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
}

impl Layout {
    pub const fn new(size: u64, align: u64) -> Self {
        Self { size, align }
    }

    /// `n` machine words, word aligned.
    pub const fn words(n: u64) -> Self {
        Self::new(n * WORD_SIZE, WORD_SIZE)
    }

    /// Layout of `len` consecutive values of `self`.
    pub const fn repeat(self, len: u64) -> Self {
        Self::new(self.size * len, self.align)
    }
}

/// Round `offset` up to the next multiple of `align` (a power of two).
#[inline]
pub(crate) const fn align_up(offset: u64, align: u64) -> u64 {
    (offset + align - 1) & !(align - 1)
}
