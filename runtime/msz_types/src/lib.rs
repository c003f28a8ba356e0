//! Reflective type system of the memsize host runtime.
//!
//! Every value living in the host heap has a concrete type described by
//! this crate. The scanner never sees Rust types; it walks raw heap bytes
//! and asks the [`Pool`] how to interpret them:
//!
//! - [`Idx`]: a 32-bit handle naming one type. Equality is index equality.
//! - [`Tag`]: the closed set of value kinds (scalars, strings, arrays,
//!   pointers, slices, maps, channels, functions, interfaces, structs).
//! - [`Layout`]: size and alignment under the runtime's 64-bit word model.
//!
//! Structural types (pointers, slices, arrays, maps, channels) are
//! interned, so `pool.ptr(t) == pool.ptr(t)`. Structs and named interfaces
//! are nominal: each declaration creates a fresh type. Structs are declared
//! first and defined later so self-referential shapes such as linked list
//! nodes can be expressed.

mod error;
mod idx;
mod layout;
mod pool;
mod tag;

pub use error::TypeError;
pub use idx::Idx;
pub use layout::{Layout, WORD_SIZE};
pub use pool::{Field, Pool};
pub use tag::Tag;
