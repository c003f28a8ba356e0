#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use msz_rt::World;

use super::*;

#[test]
fn unaddressed_values_are_billed_but_not_marked() {
    let mut rt = Runtime::new();
    let label = rt
        .pool_mut()
        .new_struct("Label", &[("text", Idx::STR), ("id", Idx::U32)])
        .unwrap();
    let slot = rt.alloc(label).unwrap();
    rt.store_str(slot, "memsize").unwrap();
    let world = World::new(rt);

    let stopped = world.stop_the_world("test");
    let mut scanner = Scanner::new(&stopped);
    let v = stopped.value_at(label, slot).unwrap();
    assert_eq!(scanner.scan(None, v, true), 7);
    assert_eq!(scanner.scan(None, v, true), 7);

    let sizes = scanner.finish();
    assert_eq!(sizes.get(label).map(|s| (s.total, s.count)), Some((2 * (24 + 7), 2)));
    assert_eq!(sizes.bitmap_size, 0);
}

#[test]
fn addressed_values_are_counted_once() {
    let mut rt = Runtime::new();
    let slot = rt.alloc(Idx::STR).unwrap();
    rt.store_str(slot, "abc").unwrap();
    let world = World::new(rt);

    let stopped = world.stop_the_world("test");
    let mut scanner = Scanner::new(&stopped);
    let v = stopped.value_at(Idx::STR, slot).unwrap();
    assert_eq!(scanner.scan(Some(slot), v, true), 3);
    assert_eq!(scanner.scan(Some(slot), v, true), 0);

    let sizes = scanner.finish();
    assert_eq!(sizes.get(Idx::STR).map(|s| (s.total, s.count)), Some((19, 1)));
    assert!(sizes.bitmap_utilization > 0.0);
}

#[test]
fn slice_elements_report_their_out_of_line_bytes() {
    let mut rt = Runtime::new();
    let strs = rt.pool_mut().slice(Idx::STR);
    let slot = rt.alloc(strs).unwrap();
    let data = rt.store_slice(slot, Idx::STR, 2, 2).unwrap();
    rt.store_str(data, "ab").unwrap();
    rt.store_str(data.offset(16), "cde").unwrap();
    let world = World::new(rt);

    let stopped = world.stop_the_world("test");
    let mut scanner = Scanner::new(&stopped);
    let v = stopped.value_at(strs, slot).unwrap();
    assert_eq!(scanner.scan(Some(slot), v, false), 32 + 5);
    assert_eq!(scanner.scan(Some(slot), v, false), 0);
    assert_eq!(scanner.finish().total, 0);
}

#[test]
fn plain_data_is_never_dispatched() {
    let rt = Runtime::new();
    let world = World::new(rt);
    let stopped = world.stop_the_world("test");
    let mut scanner = Scanner::new(&stopped);
    let bytes = 42_u64.to_le_bytes();
    assert_eq!(scanner.scan(None, Value::new(Idx::U64, &bytes), false), 0);
    assert_eq!(scanner.finish().total, 0);
}

#[test]
#[should_panic(expected = "classifier marked as plain data")]
fn scalar_reaching_dispatch_panics() {
    let pool = Pool::new();
    unhandled_kind(&pool, Idx::F64, Tag::F64);
}
