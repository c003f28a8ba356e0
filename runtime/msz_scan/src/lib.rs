//! Memory accounting for object graphs in the memsize host runtime.
//!
//! [`scan`] stops the world, walks every value reachable from a root
//! pointer exactly once, and reports how many bytes each concrete type
//! accounts for:
//!
//! ```text
//! let sizes = msz_scan::scan(&world, Root::new(ptr_to_config, config_addr));
//! println!("{}", world.inspect(|rt| msz_report::report(&sizes, rt.pool())));
//! ```
//!
//! # Components
//!
//! - [`Bitmap`]: sparse record of which heap bytes have been counted, so
//!   storage reachable through several aliases is billed once.
//! - [`TypeCache`]: memoized per-type answers to "can this reach more
//!   storage?" and "is this a single reference word?".
//! - [`Visiting`]: addresses on the active recursion path and the types
//!   being scanned there, to stop on cycles.
//! - `Scanner`: the recursive, tag-dispatched walk.
//! - [`Sizes`]: per-type and total byte counts.
//!
//! # Accounting
//!
//! Every value has a static size fixed by its type. Some values also own
//! out-of-line storage (string bytes, slice backing arrays, map entries,
//! channel rings, the boxed copy behind an interface); that is their
//! *extra* size. A value reached through a pointer is billed to its own
//! type as `static + extra`. Fields, elements and map entries are not
//! billed separately: their extra size is folded into the value that
//! contains them.

mod bitmap;
mod classify;
mod scan;
mod scanner;
mod sizes;
mod visiting;

pub use bitmap::Bitmap;
pub use classify::{TypeCache, TypeInfo};
pub use scan::{scan, scan_stopped, Root};
pub use sizes::{Sizes, TypeSize};
pub use visiting::Visiting;
