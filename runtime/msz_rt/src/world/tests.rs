#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use msz_types::Idx;

use super::*;

#[test]
fn stop_and_resume() {
    let world = World::new(Runtime::new());
    assert!(!world.is_stopped());
    {
        let stopped = world.stop_the_world("test");
        assert!(world.is_stopped());
        assert_eq!(stopped.pool().len(), Idx::PRIMITIVE_COUNT as usize);
    }
    assert!(!world.is_stopped());
    assert_eq!(world.pause_count(), 1);
    world.mutate(|rt| rt.alloc(Idx::U8).unwrap());
}

#[test]
fn pause_is_released_when_a_stopped_section_panics() {
    let world = World::new(Runtime::new());
    let result = catch_unwind(AssertUnwindSafe(|| {
        let _stopped = world.stop_the_world("test");
        panic!("inspection failed");
    }));
    assert!(result.is_err());
    assert!(!world.is_stopped());
    let addr = world.mutate(|rt| rt.alloc(Idx::U64).unwrap());
    assert!(!addr.is_null());
}

#[test]
fn mutators_do_not_run_while_stopped() {
    let world = Arc::new(World::new(Runtime::new()));
    let slot = world.mutate(|rt| rt.alloc(Idx::U64).unwrap());

    let stopped = world.stop_the_world("test");
    let mutator = {
        let world = Arc::clone(&world);
        thread::spawn(move || world.mutate(|rt| rt.write_word(slot, 42).unwrap()))
    };
    // The mutator is blocked on the world lock for as long as we hold it.
    thread::sleep(std::time::Duration::from_millis(20));
    assert_eq!(stopped.read_word(slot).unwrap(), 0);
    drop(stopped);

    mutator.join().unwrap();
    assert_eq!(world.inspect(|rt| rt.read_word(slot).unwrap()), 42);
}
