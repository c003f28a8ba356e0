//! Value kind tag for tag-driven dispatch.
//!
//! Tags are grouped into ranges:
//! - 0-15: fixed-size scalars (no references)
//! - 16-31: out-of-line text
//! - 32-63: composite and reference kinds

use std::fmt;

/// Value kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Tag {
    // === Scalars (0-15) ===
    Bool = 0,
    I8 = 1,
    I16 = 2,
    I32 = 3,
    I64 = 4,
    U8 = 5,
    U16 = 6,
    U32 = 7,
    U64 = 8,
    Usize = 9,
    F32 = 10,
    F64 = 11,

    // === Text (16-31) ===
    /// `str`: data pointer and byte length.
    Str = 16,

    // === Composite and reference kinds (32-63) ===
    /// Fixed-length inline array `[N]T`.
    Array = 32,
    /// Pointer `*T`.
    Ptr = 33,
    /// Growable sequence view `[]T`: data, len, cap.
    Slice = 34,
    /// Associative map `map[K]V`: one word referencing a map header.
    Map = 35,
    /// Bounded buffered channel `chan T`: one word referencing a channel header.
    Chan = 36,
    /// Opaque callable.
    Func = 37,
    /// Interface: type word and data word.
    Interface = 38,
    /// Struct with named fields.
    Struct = 39,
}

impl Tag {
    /// Check if values of this kind are plain fixed-size data.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        (self as u8) < 16
    }

    /// Check if the kind's own storage is a single word holding a reference.
    #[inline]
    pub const fn is_word_reference(self) -> bool {
        matches!(self, Self::Ptr | Self::Map | Self::Chan | Self::Func)
    }

    /// Get the name of this tag.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Str => "str",
            Self::Array => "array",
            Self::Ptr => "ptr",
            Self::Slice => "slice",
            Self::Map => "map",
            Self::Chan => "chan",
            Self::Func => "func",
            Self::Interface => "interface",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<Tag>() == 1);

#[cfg(test)]
mod tests;
