//! Type index handle.
//!
//! `Idx` names one type in a [`Pool`](crate::Pool). Primitive types are
//! pre-interned at fixed indices so they can be referenced without a pool.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-14) ===

    /// `bool` (1 byte).
    pub const BOOL: Self = Self(0);
    /// `i8`.
    pub const I8: Self = Self(1);
    /// `i16`.
    pub const I16: Self = Self(2);
    /// `i32`.
    pub const I32: Self = Self(3);
    /// `i64`.
    pub const I64: Self = Self(4);
    /// `u8`.
    pub const U8: Self = Self(5);
    /// `u16`.
    pub const U16: Self = Self(6);
    /// `u32`.
    pub const U32: Self = Self(7);
    /// `u64`.
    pub const U64: Self = Self(8);
    /// `usize` (one machine word).
    pub const USIZE: Self = Self(9);
    /// `f32`.
    pub const F32: Self = Self(10);
    /// `f64`.
    pub const F64: Self = Self(11);
    /// `str`: a (data, len) header over out-of-line UTF-8 bytes.
    pub const STR: Self = Self(12);
    /// The empty interface `any`.
    pub const ANY: Self = Self(13);
    /// The opaque function type `fn`.
    pub const FUNC: Self = Self(14);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 15;

    /// Create an index from a raw value.
    ///
    /// The caller must ensure the index exists in the pool it is used with.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a pre-interned primitive.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    /// Encode as an interface type word. Zero is reserved for nil.
    #[inline]
    pub const fn to_type_word(self) -> u64 {
        self.0 as u64 + 1
    }

    /// Decode an interface type word; `None` for a nil interface.
    #[inline]
    #[allow(clippy::cast_possible_truncation, reason = "type words are produced by to_type_word")]
    pub const fn from_type_word(word: u64) -> Option<Self> {
        if word == 0 {
            None
        } else {
            Some(Self((word - 1) as u32))
        }
    }

    /// Name of a primitive, or `None` for pool-allocated types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("bool"),
            1 => Some("i8"),
            2 => Some("i16"),
            3 => Some("i32"),
            4 => Some("i64"),
            5 => Some("u8"),
            6 => Some("u16"),
            7 => Some("u32"),
            8 => Some("u64"),
            9 => Some("usize"),
            10 => Some("f32"),
            11 => Some("f64"),
            12 => Some("str"),
            13 => Some("any"),
            14 => Some("fn"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Idx>() == 4);
