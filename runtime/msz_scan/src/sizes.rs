//! Scan results.

use rustc_hash::FxHashMap;

use msz_types::Idx;

/// Bytes billed to one type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSize {
    /// Static plus extra bytes of every billed value of the type.
    pub total: u64,
    /// Number of billed values.
    pub count: u64,
}

/// Result of one scan.
#[derive(Clone, Debug, Default)]
pub struct Sizes {
    /// Sum of every per-type total.
    pub total: u64,
    pub by_type: FxHashMap<Idx, TypeSize>,
    /// Bytes held by the scan's address tracker.
    pub bitmap_size: u64,
    /// Mean fraction of set bits over the tracker's blocks, `0.0` when no
    /// block was touched.
    pub bitmap_utilization: f32,
}

impl Sizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bill one value of type `ty` occupying `size` bytes.
    pub(crate) fn add_value(&mut self, ty: Idx, size: u64) {
        self.total += size;
        let entry = self.by_type.entry(ty).or_default();
        entry.total += size;
        entry.count += 1;
    }

    /// Record for `ty`, if any value of it was billed.
    pub fn get(&self, ty: Idx) -> Option<TypeSize> {
        self.by_type.get(&ty).copied()
    }

    /// Number of billed values across all types.
    pub fn count(&self) -> u64 {
        self.by_type.values().map(|s| s.count).sum()
    }
}
