#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn allocations_are_aligned_and_distinct() {
    let mut heap = Heap::default();
    let a = heap.alloc(3, 1).unwrap();
    let b = heap.alloc(16, 16).unwrap();
    let c = heap.alloc(0, 1).unwrap();

    assert_eq!(a, heap.config().base);
    assert_eq!(a.get() % 8, 0, "minimum alignment applies");
    assert_eq!(b.get() % 16, 0);
    assert!(b.get() >= a.get() + 3);
    assert!(c.get() >= b.get() + 16);
    assert_eq!(heap.allocated_bytes(), 19);
    assert_eq!(heap.allocation_count(), 3);
}

#[test]
fn allocations_are_zeroed() {
    let mut heap = Heap::default();
    let a = heap.alloc(32, 8).unwrap();
    assert_eq!(heap.bytes(a, 32).unwrap(), &[0; 32][..]);
}

#[test]
fn interior_reads_and_writes() {
    let mut heap = Heap::default();
    let a = heap.alloc(24, 8).unwrap();
    heap.write_word(a.offset(8), 0xdead_beef).unwrap();

    assert_eq!(heap.read_word(a.offset(8)).unwrap(), 0xdead_beef);
    assert_eq!(heap.read_word(a).unwrap(), 0);
    assert_eq!(heap.bytes(a.offset(8), 2).unwrap(), &[0xef, 0xbe]);
}

#[test]
fn reads_may_not_cross_allocations() {
    let mut heap = Heap::default();
    let a = heap.alloc(8, 8).unwrap();
    let _b = heap.alloc(8, 8).unwrap();

    assert_eq!(
        heap.bytes(a.offset(4), 8),
        Err(RtError::OutOfBounds {
            addr: a.offset(4),
            len: 8
        })
    );
    assert!(heap.bytes(Addr::new(8), 1).is_err(), "below the heap base");
    assert!(heap.write(a, &[1; 9]).is_err());
}

#[test]
fn empty_reads_always_succeed() {
    let heap = Heap::default();
    assert_eq!(heap.bytes(Addr::NULL, 0).unwrap(), &[] as &[u8]);
}

#[test]
fn max_bytes_is_enforced() {
    let mut heap = Heap::new(HeapConfig::default().with_max_bytes(64));
    heap.alloc(60, 8).unwrap();
    assert_eq!(
        heap.alloc(8, 8),
        Err(RtError::OutOfMemory {
            requested: 8,
            limit: 64
        })
    );
}

#[test]
fn custom_base_and_alignment() {
    let config = HeapConfig::default()
        .with_base(Addr::new(0x1000))
        .with_min_align(64);
    let mut heap = Heap::new(config);
    let a = heap.alloc(1, 1).unwrap();
    let b = heap.alloc(1, 1).unwrap();
    assert_eq!(a, Addr::new(0x1000));
    assert_eq!(b, Addr::new(0x1040));
}

#[test]
#[should_panic(expected = "heap base must not be null")]
fn null_base_is_rejected() {
    let _ = Heap::new(HeapConfig::default().with_base(Addr::NULL));
}
