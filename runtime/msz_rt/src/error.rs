//! Errors raised by mutator-side runtime operations.

use thiserror::Error;

use msz_types::TypeError;

use crate::Addr;

/// Runtime operation failure.
///
/// These are returned to mutator code building or changing the heap. A scan
/// never produces them; the scanner treats an unreadable heap as a broken
/// invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RtError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("heap exhausted: {requested} more bytes requested, limit is {limit}")]
    OutOfMemory { requested: u64, limit: u64 },

    #[error("{len} bytes at {addr} are not inside one allocation")]
    OutOfBounds { addr: Addr, len: u64 },

    #[error("null reference")]
    NullReference,

    #[error("type `{ty}` has no layout")]
    Unsized { ty: String },

    #[error("type `{ty}` has no field `{field}`")]
    NoSuchField { ty: String, field: String },

    #[error("value of `{ty}` is {expected} bytes, got {found}")]
    WidthMismatch { ty: String, expected: u64, found: u64 },

    #[error("slice length {len} exceeds capacity {cap}")]
    InvalidSlice { len: u64, cap: u64 },

    #[error("{0} is not a map header")]
    NotAMap(Addr),

    #[error("{0} is not a channel header")]
    NotAChannel(Addr),

    #[error("channel buffer is full (capacity {cap})")]
    ChannelFull { cap: u64 },

    #[error("send on closed channel")]
    ChannelClosed,
}
