//! Cycle guard for the recursive walk.
//!
//! Tracks, per address, the types currently being scanned there. A struct
//! and its first field share an address, so more than one type can be in
//! flight at one location at a time.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use msz_rt::Addr;
use msz_types::{Idx, Pool};

/// Addresses on the active recursion path.
#[derive(Default)]
pub struct Visiting {
    active: FxHashMap<Addr, SmallVec<[Idx; 2]>>,
}

impl Visiting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether scanning `ty` at `addr` would re-enter a value already in
    /// flight.
    ///
    /// Conflicts with an identical in-flight type, and with an in-flight
    /// `*ty` at the same address: a pointer slot whose referent is the slot
    /// itself. A `*T` entered first and a `T` reached through it is the
    /// self-loop; the reverse order (a struct whose first field is a
    /// pointer to its own type) is the ordinary linked-list shape and does
    /// not conflict.
    pub fn conflicts(&self, pool: &Pool, addr: Addr, ty: Idx) -> bool {
        self.active.get(&addr).is_some_and(|types| {
            types
                .iter()
                .any(|&inflight| inflight == ty || pool.is_ptr_to(inflight, ty))
        })
    }

    pub fn enter(&mut self, addr: Addr, ty: Idx) {
        self.active.entry(addr).or_default().push(ty);
    }

    /// Pop the innermost type at `addr`.
    ///
    /// # Panics
    ///
    /// Panics if nothing is in flight at `addr`.
    pub fn leave(&mut self, addr: Addr) {
        let Some(types) = self.active.get_mut(&addr) else {
            panic!("leave({addr}) without a matching enter");
        };
        types.pop();
        if types.is_empty() {
            self.active.remove(&addr);
        }
    }

    /// Whether no address is in flight.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of addresses in flight.
    pub fn depth(&self) -> usize {
        self.active.len()
    }
}
