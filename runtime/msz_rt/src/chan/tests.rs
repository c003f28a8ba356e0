#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use msz_types::Idx;

use crate::{Addr, RtError, Runtime, World};

fn chan_of_u64(rt: &mut Runtime, cap: u64) -> Addr {
    let chan_ty = rt.pool_mut().chan(Idx::U64);
    let slot = rt.alloc(chan_ty).unwrap();
    rt.store_chan(slot, Idx::U64, cap).unwrap()
}

#[test]
fn fifo_order_with_wraparound() {
    let mut rt = Runtime::new();
    let ch = chan_of_u64(&mut rt, 2);

    rt.chan_send(ch, &1u64.to_le_bytes()).unwrap();
    rt.chan_send(ch, &2u64.to_le_bytes()).unwrap();
    assert_eq!(
        rt.chan_send(ch, &3u64.to_le_bytes()),
        Err(RtError::ChannelFull { cap: 2 })
    );
    assert_eq!(rt.chan_recv(ch).unwrap(), Some(1u64.to_le_bytes().to_vec()));
    rt.chan_send(ch, &3u64.to_le_bytes()).unwrap();
    assert_eq!(rt.chan_recv(ch).unwrap(), Some(2u64.to_le_bytes().to_vec()));
    assert_eq!(rt.chan_recv(ch).unwrap(), Some(3u64.to_le_bytes().to_vec()));
    assert_eq!(rt.chan_recv(ch).unwrap(), None);
    assert_eq!(rt.chan_len(ch).unwrap(), 0);
    assert_eq!(rt.chan_cap(ch).unwrap(), 2);
}

#[test]
fn unbuffered_channel_is_always_full() {
    let mut rt = Runtime::new();
    let ch = chan_of_u64(&mut rt, 0);
    assert_eq!(
        rt.chan_send(ch, &1u64.to_le_bytes()),
        Err(RtError::ChannelFull { cap: 0 })
    );
    assert_eq!(rt.chan_recv(ch).unwrap(), None);
}

#[test]
fn closed_channel_rejects_sends() {
    let mut rt = Runtime::new();
    let ch = chan_of_u64(&mut rt, 1);
    rt.chan_close(ch).unwrap();
    assert_eq!(rt.chan_send(ch, &1u64.to_le_bytes()), Err(RtError::ChannelClosed));
}

#[test]
fn received_slots_are_cleared() {
    let mut rt = Runtime::new();
    let ch = chan_of_u64(&mut rt, 3);
    rt.chan_send(ch, &9u64.to_le_bytes()).unwrap();
    rt.chan_send(ch, &8u64.to_le_bytes()).unwrap();
    rt.chan_recv(ch).unwrap();

    let world = World::new(rt);
    let stopped = world.stop_the_world("test");
    let buffer = stopped.chan_buffer(ch).unwrap();
    assert_eq!(buffer.cap(), 3);
    assert_eq!(buffer.elem_size(), 8);
    let slots: Vec<&[u8]> = (0..buffer.cap()).map(|i| buffer.slot(i).1).collect();
    assert_eq!(slots[0], &[0; 8]);
    assert_eq!(slots[1], &8u64.to_le_bytes());
    assert_eq!(slots[2], &[0; 8]);
    assert_eq!(buffer.slot(1).0, buffer.slot(0).0.offset(8));
}

#[test]
fn chan_buffer_rejects_non_channels() {
    let mut rt = Runtime::new();
    let other = rt.alloc(Idx::U64).unwrap();
    let world = World::new(rt);
    let stopped = world.stop_the_world("test");
    assert_eq!(stopped.chan_buffer(Addr::NULL).err(), Some(RtError::NullReference));
    assert_eq!(stopped.chan_buffer(other).err(), Some(RtError::NotAChannel(other)));
}
