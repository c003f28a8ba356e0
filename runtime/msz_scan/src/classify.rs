//! Per-type scan classification.
//!
//! Answers, for each concrete type, whether its values can reach storage
//! beyond their static bytes and whether the type is a single reference
//! word. Both answers depend only on the type's shape, so they are computed
//! once and memoized.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use msz_types::{Idx, Pool, Tag};

bitflags! {
    /// Classification of one type.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct TypeInfo: u8 {
        /// Values may reference further heap storage; the scanner must look
        /// inside them.
        const NEEDS_SCAN = 1 << 0;
        /// The static storage is one word holding a reference (pointer,
        /// map, channel, function).
        const POINTER = 1 << 1;
    }
}

/// Memoizing type classifier.
pub struct TypeCache<'pool> {
    pool: &'pool Pool,
    cache: FxHashMap<Idx, TypeInfo>,
}

impl<'pool> TypeCache<'pool> {
    pub fn new(pool: &'pool Pool) -> Self {
        Self {
            pool,
            cache: FxHashMap::default(),
        }
    }

    /// Whether values of `ty` can reference more storage.
    #[inline]
    pub fn needs_scan(&mut self, ty: Idx) -> bool {
        self.info(ty).contains(TypeInfo::NEEDS_SCAN)
    }

    /// Whether `ty` is a single reference word.
    #[inline]
    pub fn is_pointer(&mut self, ty: Idx) -> bool {
        self.info(ty).contains(TypeInfo::POINTER)
    }

    /// Number of types classified so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn info(&mut self, ty: Idx) -> TypeInfo {
        if let Some(&info) = self.cache.get(&ty) {
            return info;
        }

        let info = if self.pool.tag(ty).is_word_reference() {
            TypeInfo::NEEDS_SCAN | TypeInfo::POINTER
        } else if self.check_needs_scan(ty) {
            TypeInfo::NEEDS_SCAN
        } else {
            TypeInfo::empty()
        };
        self.cache.insert(ty, info);
        info
    }

    fn check_needs_scan(&mut self, ty: Idx) -> bool {
        match self.pool.tag(ty) {
            Tag::Bool
            | Tag::I8
            | Tag::I16
            | Tag::I32
            | Tag::I64
            | Tag::U8
            | Tag::U16
            | Tag::U32
            | Tag::U64
            | Tag::Usize
            | Tag::F32
            | Tag::F64 => false,

            Tag::Str
            | Tag::Slice
            | Tag::Interface
            | Tag::Ptr
            | Tag::Map
            | Tag::Chan
            | Tag::Func => true,

            Tag::Array => self.needs_scan(self.pool.elem(ty)),

            Tag::Struct => {
                // A declared-but-undefined struct has no values; be
                // conservative rather than claim it is plain data.
                if self.pool.layout(ty).is_none() {
                    return true;
                }
                let pool = self.pool;
                pool.struct_fields(ty).iter().any(|f| self.needs_scan(f.ty))
            }
        }
    }
}

#[cfg(test)]
mod tests;
