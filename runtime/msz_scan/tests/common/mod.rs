//! Shared helpers for end-to-end scan tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use msz_rt::{Addr, Runtime};
use msz_types::Idx;

/// Install a test-writer subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Encoded pointer-shaped value.
pub fn word(addr: Addr) -> [u8; 8] {
    addr.get().to_le_bytes()
}

/// `struct Blob { a, b, c: u64 }`, 24 bytes with no references.
pub fn blob(rt: &mut Runtime) -> Idx {
    rt.pool_mut()
        .new_struct("Blob", &[("a", Idx::U64), ("b", Idx::U64), ("c", Idx::U64)])
        .unwrap()
}

/// `struct Node { next: *Node, value: i64 }` and `*Node`.
pub fn node(rt: &mut Runtime) -> (Idx, Idx) {
    let pool = rt.pool_mut();
    let node = pool.declare_struct("Node");
    let ptr = pool.ptr(node);
    pool.define_struct(node, &[("next", ptr), ("value", Idx::I64)]).unwrap();
    (node, ptr)
}

/// Encoded `str` header for `text`, with the bytes copied into the heap.
pub fn str_bytes(rt: &mut Runtime, text: &str) -> Vec<u8> {
    let slot = rt.alloc(Idx::STR).unwrap();
    rt.store_str(slot, text).unwrap();
    rt.value_at(Idx::STR, slot).unwrap().bytes().to_vec()
}

/// A linked list of `len` nodes; returns the head (`NULL` when empty).
pub fn build_list(rt: &mut Runtime, node: Idx, len: usize) -> Addr {
    let mut head = Addr::NULL;
    for i in 0..len {
        let n = rt.alloc(node).unwrap();
        rt.store_ptr(rt.field(n, node, "next").unwrap(), head).unwrap();
        let value = rt.field(n, node, "value").unwrap();
        rt.store(value, Idx::I64, &(i as i64).to_le_bytes()).unwrap();
        head = n;
    }
    head
}
