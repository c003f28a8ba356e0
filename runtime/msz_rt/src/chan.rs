//! Buffered channels.
//!
//! A channel value is one word pointing at a header allocation:
//!
//! | offset | field                          |
//! |--------|--------------------------------|
//! | 0      | queued element count           |
//! | 8      | capacity                       |
//! | 16     | ring buffer address            |
//! | 24     | element size                   |
//! | 32     | send index                     |
//! | 40     | receive index                  |
//! | 48     | closed flag                    |
//!
//! The ring buffer is a separate allocation of `capacity * element size`
//! bytes. Mutators go through [`Runtime::chan_send`] and friends; the only
//! read access to the raw ring from outside this module is
//! [`ChanBuffer`], obtainable solely from a [`StoppedWorld`](crate::StoppedWorld).

use msz_types::Idx;

use crate::value::read_word;
use crate::{Addr, Heap, RtError, Runtime};

/// Size of a channel header.
pub const HCHAN_SIZE: u64 = 56;

const QCOUNT: u64 = 0;
const CAP: u64 = 8;
const BUF: u64 = 16;
const ELEM_SIZE: u64 = 24;
const SENDX: u64 = 32;
const RECVX: u64 = 40;
const CLOSED: u64 = 48;

#[derive(Copy, Clone, Debug)]
struct Hchan {
    qcount: u64,
    cap: u64,
    buf: Addr,
    elem_size: u64,
    sendx: u64,
    recvx: u64,
    closed: bool,
}

impl Hchan {
    fn read(heap: &Heap, hchan: Addr) -> Result<Self, RtError> {
        let bytes = heap.bytes(hchan, HCHAN_SIZE)?;
        let word = |off: u64| read_word(bytes, off as usize);
        Ok(Self {
            qcount: word(QCOUNT),
            cap: word(CAP),
            buf: Addr::new(word(BUF)),
            elem_size: word(ELEM_SIZE),
            sendx: word(SENDX),
            recvx: word(RECVX),
            closed: word(CLOSED) != 0,
        })
    }

    fn write(&self, heap: &mut Heap, hchan: Addr) -> Result<(), RtError> {
        let words = [
            self.qcount,
            self.cap,
            self.buf.get(),
            self.elem_size,
            self.sendx,
            self.recvx,
            u64::from(self.closed),
        ];
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        heap.write(hchan, &bytes)
    }

    fn slot(&self, i: u64) -> Addr {
        self.buf.offset(i * self.elem_size)
    }
}

impl Runtime {
    /// Create a channel with a ring buffer of `cap` elements and store its
    /// header pointer at `slot`.
    pub fn store_chan(&mut self, slot: Addr, elem: Idx, cap: u64) -> Result<Addr, RtError> {
        let elem_size = self.layout_of(elem)?.size;
        let header = self.heap_mut().alloc(HCHAN_SIZE, 8)?;
        let buf = self.alloc_array(elem, cap)?;
        let hchan = Hchan {
            qcount: 0,
            cap,
            buf,
            elem_size,
            sendx: 0,
            recvx: 0,
            closed: false,
        };
        hchan.write(self.heap_mut(), header)?;
        self.chans.insert(header, elem);
        self.write_word(slot, header.get())?;
        Ok(header)
    }

    fn hchan(&self, chan: Addr) -> Result<(Idx, Hchan), RtError> {
        let elem = *self.chans.get(&chan).ok_or(RtError::NotAChannel(chan))?;
        Ok((elem, Hchan::read(self.heap(), chan)?))
    }

    /// Enqueue one element without blocking.
    pub fn chan_send(&mut self, chan: Addr, bytes: &[u8]) -> Result<(), RtError> {
        let (elem, mut hchan) = self.hchan(chan)?;
        if hchan.closed {
            return Err(RtError::ChannelClosed);
        }
        if hchan.qcount == hchan.cap {
            return Err(RtError::ChannelFull { cap: hchan.cap });
        }
        self.store(hchan.slot(hchan.sendx), elem, bytes)?;
        hchan.sendx = (hchan.sendx + 1) % hchan.cap;
        hchan.qcount += 1;
        hchan.write(self.heap_mut(), chan)
    }

    /// Dequeue one element without blocking; `None` when empty. The vacated
    /// slot is zeroed so it no longer references anything.
    pub fn chan_recv(&mut self, chan: Addr) -> Result<Option<Vec<u8>>, RtError> {
        let (_, mut hchan) = self.hchan(chan)?;
        if hchan.qcount == 0 {
            return Ok(None);
        }
        let slot = hchan.slot(hchan.recvx);
        let bytes = self.heap().bytes(slot, hchan.elem_size)?.to_vec();
        self.heap_mut().write(slot, &vec![0; bytes.len()])?;
        hchan.recvx = (hchan.recvx + 1) % hchan.cap;
        hchan.qcount -= 1;
        hchan.write(self.heap_mut(), chan)?;
        Ok(Some(bytes))
    }

    pub fn chan_close(&mut self, chan: Addr) -> Result<(), RtError> {
        let (_, mut hchan) = self.hchan(chan)?;
        hchan.closed = true;
        hchan.write(self.heap_mut(), chan)
    }

    /// Number of queued elements.
    pub fn chan_len(&self, chan: Addr) -> Result<u64, RtError> {
        Ok(self.hchan(chan)?.1.qcount)
    }

    /// Buffer capacity.
    pub fn chan_cap(&self, chan: Addr) -> Result<u64, RtError> {
        Ok(self.hchan(chan)?.1.cap)
    }
}

/// Raw view of a channel's ring buffer.
///
/// Reading the ring while a mutator sends or receives would observe a torn
/// state, so this view is only constructed through
/// [`StoppedWorld::chan_buffer`](crate::StoppedWorld::chan_buffer). It is
/// the one place where the runtime's internal channel storage is exposed.
#[derive(Copy, Clone, Debug)]
pub struct ChanBuffer<'a> {
    buf: Addr,
    cap: u64,
    elem_size: u64,
    bytes: &'a [u8],
}

impl<'a> ChanBuffer<'a> {
    pub(crate) fn new(heap: &'a Heap, chan: Addr) -> Result<Self, RtError> {
        let hchan = Hchan::read(heap, chan)?;
        Ok(Self {
            buf: hchan.buf,
            cap: hchan.cap,
            elem_size: hchan.elem_size,
            bytes: heap.bytes(hchan.buf, hchan.cap * hchan.elem_size)?,
        })
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    pub fn elem_size(&self) -> u64 {
        self.elem_size
    }

    /// Address and bytes of slot `i`, occupied or not.
    pub fn slot(&self, i: u64) -> (Addr, &'a [u8]) {
        debug_assert!(i < self.cap);
        #[allow(clippy::cast_possible_truncation, reason = "slot lies inside the borrowed ring")]
        let start = (i * self.elem_size) as usize;
        #[allow(clippy::cast_possible_truncation, reason = "slot lies inside the borrowed ring")]
        let end = start + self.elem_size as usize;
        (self.buf.offset(i * self.elem_size), &self.bytes[start..end])
    }
}

#[cfg(test)]
mod tests;
