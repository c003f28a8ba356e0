#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn scalars_need_no_scan() {
    let pool = Pool::new();
    let mut tc = TypeCache::new(&pool);
    for ty in [Idx::BOOL, Idx::I8, Idx::I32, Idx::U64, Idx::USIZE, Idx::F32, Idx::F64] {
        assert_eq!(tc.info(ty), TypeInfo::empty(), "{ty}");
    }
}

#[test]
fn reference_words_are_pointers() {
    let mut pool = Pool::new();
    let ptr = pool.ptr(Idx::I64);
    let map = pool.map(Idx::STR, Idx::I64);
    let chan = pool.chan(Idx::I64);

    let mut tc = TypeCache::new(&pool);
    for ty in [ptr, map, chan, Idx::FUNC] {
        assert_eq!(tc.info(ty), TypeInfo::NEEDS_SCAN | TypeInfo::POINTER);
    }
}

#[test]
fn multi_word_headers_need_scan_but_are_not_pointers() {
    let mut pool = Pool::new();
    let slice = pool.slice(Idx::U8);

    let mut tc = TypeCache::new(&pool);
    for ty in [Idx::STR, slice, Idx::ANY] {
        assert!(tc.needs_scan(ty));
        assert!(!tc.is_pointer(ty));
    }
}

#[test]
fn arrays_follow_their_element() {
    let mut pool = Pool::new();
    let plain = pool.array(Idx::F64, 1024);
    let ptr = pool.ptr(Idx::U8);
    let refs = pool.array(ptr, 4);
    let nested = pool.array(refs, 2);

    let mut tc = TypeCache::new(&pool);
    assert!(!tc.needs_scan(plain));
    assert!(tc.needs_scan(refs));
    assert!(tc.needs_scan(nested));
    assert!(!tc.is_pointer(refs));
}

#[test]
fn structs_need_scan_when_any_field_does() {
    let mut pool = Pool::new();
    let point = pool.new_struct("Point", &[("x", Idx::F64), ("y", Idx::F64)]).unwrap();
    let named = pool.new_struct("Named", &[("at", point), ("name", Idx::STR)]).unwrap();
    let outer = pool.new_struct("Outer", &[("inner", named)]).unwrap();

    let mut tc = TypeCache::new(&pool);
    assert!(!tc.needs_scan(point));
    assert!(tc.needs_scan(named));
    assert!(tc.needs_scan(outer));
}

#[test]
fn recursive_struct_through_pointer() {
    let mut pool = Pool::new();
    let node = pool.declare_struct("Node");
    let next = pool.ptr(node);
    pool.define_struct(node, &[("next", next), ("value", Idx::I64)]).unwrap();

    let mut tc = TypeCache::new(&pool);
    assert!(tc.needs_scan(node));
    assert!(tc.is_pointer(next));
}

#[test]
fn undefined_struct_is_conservative() {
    let mut pool = Pool::new();
    let pending = pool.declare_struct("Pending");
    let mut tc = TypeCache::new(&pool);
    assert!(tc.needs_scan(pending));
}

#[test]
fn results_are_memoized() {
    let mut pool = Pool::new();
    let point = pool.new_struct("Point", &[("x", Idx::I32), ("y", Idx::I32)]).unwrap();
    let arr = pool.array(point, 8);

    let mut tc = TypeCache::new(&pool);
    assert!(tc.is_empty());
    tc.needs_scan(arr);
    // The array, the struct and its field type.
    assert_eq!(tc.len(), 3);
    tc.needs_scan(arr);
    tc.is_pointer(point);
    assert_eq!(tc.len(), 3);
}
