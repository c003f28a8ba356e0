//! Typed views over static value bytes.

use msz_types::Idx;

use crate::Addr;

/// Read the little-endian word at byte offset `off`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than `off + 8`.
#[inline]
pub(crate) fn read_word(bytes: &[u8], off: usize) -> u64 {
    let mut word = [0; 8];
    word.copy_from_slice(&bytes[off..off + 8]);
    u64::from_le_bytes(word)
}

/// Decoded `str` header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StrHeader {
    pub data: Addr,
    pub len: u64,
}

/// Decoded slice header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SliceHeader {
    pub data: Addr,
    pub len: u64,
    pub cap: u64,
}

/// A value of type `ty` whose static bytes are `bytes`.
///
/// The bytes may live in the heap, in a map's out-of-line entry storage, or
/// inside another value (an interface's data word). A `Value` carries no
/// address; callers that know one pass it alongside.
#[derive(Copy, Clone, Debug)]
pub struct Value<'a> {
    ty: Idx,
    bytes: &'a [u8],
}

impl<'a> Value<'a> {
    #[inline]
    pub fn new(ty: Idx, bytes: &'a [u8]) -> Self {
        Self { ty, bytes }
    }

    #[inline]
    pub fn ty(&self) -> Idx {
        self.ty
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The `n`th word of the value.
    #[inline]
    pub fn word(&self, n: usize) -> u64 {
        read_word(self.bytes, n * 8)
    }

    /// A sub-value of type `ty` occupying `size` bytes at `offset`.
    pub fn project(&self, ty: Idx, offset: u64, size: u64) -> Value<'a> {
        #[allow(clippy::cast_possible_truncation, reason = "bounded by the value's byte length")]
        let (start, end) = (offset as usize, (offset + size) as usize);
        Value::new(ty, &self.bytes[start..end])
    }

    /// Target of a pointer-shaped value.
    #[inline]
    pub fn pointer(&self) -> Addr {
        Addr::new(self.word(0))
    }

    pub fn string(&self) -> StrHeader {
        StrHeader {
            data: Addr::new(self.word(0)),
            len: self.word(1),
        }
    }

    pub fn slice(&self) -> SliceHeader {
        SliceHeader {
            data: Addr::new(self.word(0)),
            len: self.word(1),
            cap: self.word(2),
        }
    }

    /// Dynamic type of an interface value, `None` when nil.
    pub fn interface_type(&self) -> Option<Idx> {
        Idx::from_type_word(self.word(0))
    }

    /// The interface's data word, as raw bytes.
    pub fn interface_data(&self) -> &'a [u8] {
        &self.bytes[8..16]
    }
}
