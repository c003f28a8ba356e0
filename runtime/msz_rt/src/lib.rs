//! Host runtime for the memsize scanner.
//!
//! This crate models the program whose memory is being measured: a typed,
//! byte-addressed heap populated by mutator code, and the global pause that
//! freezes it for inspection.
//!
//! - [`Heap`]: sparse block storage over a 64-bit address space with bump
//!   allocation. Every value has a stable [`Addr`] except map entries.
//! - [`Runtime`]: the type [`Pool`](msz_types::Pool) plus the heap plus
//!   out-of-line map storage, with constructors for strings, slices, maps,
//!   channels, interfaces and functions.
//! - [`Value`]: a typed view over a value's static bytes.
//! - [`World`] / [`StoppedWorld`]: shared ownership of the runtime by
//!   mutator threads, and the scoped stop-the-world guard.
//!
//! # Encodings
//!
//! All words are little-endian `u64`.
//!
//! | Kind        | Static bytes                     |
//! |-------------|----------------------------------|
//! | `*T`        | target address                   |
//! | `str`       | data address, byte length        |
//! | `[]T`       | data address, length, capacity   |
//! | `map[K]V`   | map header address               |
//! | `chan T`    | channel header address           |
//! | `fn`        | opaque code word                 |
//! | interface   | type word (`Idx` + 1), data word |
//!
//! An interface holding a pointer-shaped value (pointer, map, channel,
//! function) stores that word directly as its data word. Any other value
//! is copied into a fresh heap allocation and the data word points at it.

mod addr;
mod chan;
mod error;
mod heap;
mod map;
mod runtime;
mod value;
mod world;

pub use addr::Addr;
pub use chan::{ChanBuffer, HCHAN_SIZE};
pub use error::RtError;
pub use heap::{Heap, HeapConfig};
pub use map::MapObject;
pub use runtime::Runtime;
pub use value::{SliceHeader, StrHeader, Value};
pub use world::{StoppedWorld, World};
