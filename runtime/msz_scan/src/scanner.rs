//! The recursive walk.
//!
//! One `Scanner` per scan. It owns the address tracker, the cycle guard,
//! the classifier cache and the result; all of them are dropped or
//! returned when the scan finishes.

use msz_rt::{Addr, Runtime, StoppedWorld, Value};
use msz_stack::ensure_sufficient_stack;
use msz_types::{Idx, Pool, Tag};

use crate::{Bitmap, Sizes, TypeCache, Visiting};

pub(crate) struct Scanner<'s, 'w> {
    world: &'s StoppedWorld<'w>,
    rt: &'s Runtime,
    pool: &'s Pool,
    seen: Bitmap,
    visiting: Visiting,
    types: TypeCache<'s>,
    sizes: Sizes,
}

impl<'s, 'w> Scanner<'s, 'w> {
    pub(crate) fn new(world: &'s StoppedWorld<'w>) -> Self {
        let rt: &'s Runtime = world;
        Self {
            world,
            rt,
            pool: rt.pool(),
            seen: Bitmap::new(),
            visiting: Visiting::new(),
            types: TypeCache::new(rt.pool()),
            sizes: Sizes::new(),
        }
    }

    /// Scan `v` and everything reachable from it, returning its extra size.
    ///
    /// `addr` is the location of `v` when it lives in the heap; values read
    /// out of map entries or interface data words have none. When `bill` is
    /// set, `v` is recorded against its own type as `static + extra`.
    pub(crate) fn scan(&mut self, addr: Option<Addr>, v: Value<'_>, bill: bool) -> u64 {
        ensure_sufficient_stack(|| self.scan_value(addr, v, bill))
    }

    fn scan_value(&mut self, addr: Option<Addr>, v: Value<'_>, bill: bool) -> u64 {
        let ty = v.ty();
        if let Some(addr) = addr {
            if self.seen.is_marked(addr.get()) || self.visiting.conflicts(self.pool, addr, ty) {
                return 0;
            }
            self.visiting.enter(addr, ty);
        }

        let extra = if self.types.needs_scan(ty) {
            self.scan_content(addr, v)
        } else {
            0
        };

        let size = self.pool.size_of(ty);
        if let Some(addr) = addr {
            self.visiting.leave(addr);
            self.seen.mark_range(addr.get(), size);
        }
        if bill {
            self.sizes.add_value(ty, size + extra);
        }
        extra
    }

    fn scan_content(&mut self, addr: Option<Addr>, v: Value<'_>) -> u64 {
        let ty = v.ty();
        match self.pool.tag(ty) {
            Tag::Struct => self.scan_struct(addr, v),
            Tag::Array => self.scan_array(addr, v),
            Tag::Ptr => self.scan_ptr(v),
            Tag::Slice => self.scan_slice(v),
            Tag::Str => v.string().len,
            Tag::Map => self.scan_map(v),
            Tag::Interface => self.scan_interface(v),
            Tag::Chan => self.scan_chan(v),
            Tag::Func => 0,
            tag @ (Tag::Bool
            | Tag::I8
            | Tag::I16
            | Tag::I32
            | Tag::I64
            | Tag::U8
            | Tag::U16
            | Tag::U32
            | Tag::U64
            | Tag::Usize
            | Tag::F32
            | Tag::F64) => unhandled_kind(self.pool, ty, tag),
        }
    }

    fn scan_struct(&mut self, addr: Option<Addr>, v: Value<'_>) -> u64 {
        let pool = self.pool;
        let mut extra = 0;
        for field in pool.struct_fields(v.ty()) {
            let size = pool.size_of(field.ty);
            let fv = v.project(field.ty, field.offset, size);
            extra += self.scan(addr.map(|a| a.offset(field.offset)), fv, false);
        }
        extra
    }

    fn scan_array(&mut self, addr: Option<Addr>, v: Value<'_>) -> u64 {
        let pool = self.pool;
        let elem = pool.elem(v.ty());
        let size = pool.size_of(elem);
        let mut extra = 0;
        for i in 0..pool.array_len(v.ty()) {
            let offset = i * size;
            let ev = v.project(elem, offset, size);
            extra += self.scan(addr.map(|a| a.offset(offset)), ev, false);
        }
        extra
    }

    /// The target is billed to its own type; the pointer itself carries no
    /// extra size.
    fn scan_ptr(&mut self, v: Value<'_>) -> u64 {
        let target = v.pointer();
        if !target.is_null() {
            let tv = self.load(self.pool.elem(v.ty()), target);
            self.scan(Some(target), tv, true);
        }
        0
    }

    fn scan_slice(&mut self, v: Value<'_>) -> u64 {
        let header = v.slice();
        if header.data.is_null() || header.cap == 0 {
            return 0;
        }
        let elem = self.pool.elem(v.ty());
        let size = self.pool.size_of(elem);
        let span = header.cap * size;
        tracing::trace!(data = %header.data, len = header.len, cap = header.cap, "scan slice");

        let mut extra = span - self.seen.count_range(header.data.get(), span);
        if self.types.needs_scan(elem) {
            // Elements mark themselves as they are scanned and report what
            // they own out of line.
            for i in 0..header.cap {
                let at = header.data.offset(i * size);
                let ev = self.load(elem, at);
                extra += self.scan(Some(at), ev, false);
            }
        } else {
            self.seen.mark_range(header.data.get(), span);
        }
        extra
    }

    fn scan_map(&mut self, v: Value<'_>) -> u64 {
        let header = v.pointer();
        if header.is_null() {
            return 0;
        }
        let rt = self.rt;
        let Some(map) = rt.map(header) else {
            panic!("{} value at {header} does not reference a map", self.pool.name(v.ty()));
        };
        // Entries have no address of their own, so the header stands in for
        // the map on the recursion path. A map reachable from its own
        // entries contributes nothing the second time.
        if self.visiting.conflicts(self.pool, header, v.ty()) {
            return 0;
        }
        let (key, value) = (map.key_type(), map.value_type());
        let len = map.len() as u64;
        tracing::trace!(%header, len, "scan map");

        let mut extra = len * self.pool.size_of(key) + len * self.pool.size_of(value);
        if self.types.needs_scan(key) || self.types.needs_scan(value) {
            self.visiting.enter(header, v.ty());
            for (k, val) in map.iter() {
                extra += self.scan(None, k, false);
                extra += self.scan(None, val, false);
            }
            self.visiting.leave(header);
        }
        extra
    }

    fn scan_interface(&mut self, v: Value<'_>) -> u64 {
        let Some(held) = v.interface_type() else {
            return 0;
        };
        if self.types.is_pointer(held) {
            return self.scan(None, Value::new(held, v.interface_data()), false);
        }
        let boxed = Addr::new(v.word(1));
        let hv = self.load(held, boxed);
        self.scan(None, hv, false) + self.pool.size_of(held)
    }

    fn scan_chan(&mut self, v: Value<'_>) -> u64 {
        let chan = v.pointer();
        if chan.is_null() {
            return 0;
        }
        let world = self.world;
        let ring = match world.chan_buffer(chan) {
            Ok(ring) => ring,
            Err(err) => panic!("{} value at {chan}: {err}", self.pool.name(v.ty())),
        };
        tracing::trace!(%chan, cap = ring.cap(), "scan chan");

        let elem = self.pool.elem(v.ty());
        let mut extra = ring.cap() * ring.elem_size();
        if self.types.needs_scan(elem) {
            for i in 0..ring.cap() {
                let (at, bytes) = ring.slot(i);
                extra += self.scan(Some(at), Value::new(elem, bytes), false);
            }
        }
        extra
    }

    /// Read the static bytes of a `ty` at `addr`.
    ///
    /// # Panics
    ///
    /// Panics if `addr` does not hold a whole `ty`: the graph references
    /// storage the heap never handed out.
    fn load(&self, ty: Idx, addr: Addr) -> Value<'s> {
        let rt = self.rt;
        match rt.value_at(ty, addr) {
            Ok(v) => v,
            Err(err) => panic!("dangling reference to {} at {addr}: {err}", self.pool.name(ty)),
        }
    }

    pub(crate) fn finish(mut self) -> Sizes {
        debug_assert!(self.visiting.is_empty());
        self.sizes.bitmap_size = self.seen.size();
        self.sizes.bitmap_utilization = self.seen.utilization();
        tracing::trace!(classified = self.types.len(), "scan finished");
        self.sizes
    }
}

#[cold]
#[inline(never)]
fn unhandled_kind(pool: &Pool, ty: Idx, tag: Tag) -> ! {
    panic!(
        "scanner reached {tag:?} value of type {} that the classifier marked as plain data",
        pool.name(ty)
    )
}

#[cfg(test)]
mod tests;
