//! The host runtime: types, heap and container storage.

use rustc_hash::FxHashMap;

use msz_types::{Idx, Layout, Pool};

use crate::map::{MapObject, MAP_HEADER_SIZE};
use crate::{Addr, Heap, HeapConfig, RtError, Value};

/// State of the host program: its type pool and its heap.
///
/// All constructors take a `slot`: the address of already-allocated static
/// storage (a struct field, a slice element, a fresh allocation) that
/// receives the new value's header. Out-of-line storage is allocated as
/// needed.
#[derive(Debug, Default)]
pub struct Runtime {
    pool: Pool,
    heap: Heap,
    maps: FxHashMap<Addr, MapObject>,
    /// Channel header address to element type.
    pub(crate) chans: FxHashMap<Addr, Idx>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeapConfig) -> Self {
        Self::with_pool(Pool::new(), config)
    }

    pub fn with_pool(pool: Pool, config: HeapConfig) -> Self {
        Self {
            pool,
            heap: Heap::new(config),
            maps: FxHashMap::default(),
            chans: FxHashMap::default(),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub(crate) fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub(crate) fn layout_of(&self, ty: Idx) -> Result<Layout, RtError> {
        self.pool.layout(ty).ok_or_else(|| RtError::Unsized {
            ty: self.pool.name(ty),
        })
    }

    // === Raw storage ===

    /// Allocate zeroed storage for one value of `ty`.
    pub fn alloc(&mut self, ty: Idx) -> Result<Addr, RtError> {
        let layout = self.layout_of(ty)?;
        self.heap.alloc(layout.size, layout.align)
    }

    /// Allocate zeroed storage for `len` consecutive values of `elem`.
    pub fn alloc_array(&mut self, elem: Idx, len: u64) -> Result<Addr, RtError> {
        let layout = self.layout_of(elem)?.repeat(len);
        self.heap.alloc(layout.size, layout.align)
    }

    /// Address of field `name` of the struct of type `ty` at `base`.
    pub fn field(&self, base: Addr, ty: Idx, name: &str) -> Result<Addr, RtError> {
        let field = self
            .pool
            .field(ty, name)
            .ok_or_else(|| RtError::NoSuchField {
                ty: self.pool.name(ty),
                field: name.to_string(),
            })?;
        Ok(base.offset(field.offset))
    }

    /// View the value of type `ty` stored at `addr`.
    pub fn value_at(&self, ty: Idx, addr: Addr) -> Result<Value<'_>, RtError> {
        let layout = self.layout_of(ty)?;
        Ok(Value::new(ty, self.heap.bytes(addr, layout.size)?))
    }

    pub fn read_word(&self, addr: Addr) -> Result<u64, RtError> {
        self.heap.read_word(addr)
    }

    pub fn write_word(&mut self, addr: Addr, word: u64) -> Result<(), RtError> {
        self.heap.write_word(addr, word)
    }

    /// Store the encoded value `bytes` of type `ty` into `slot`.
    pub fn store(&mut self, slot: Addr, ty: Idx, bytes: &[u8]) -> Result<(), RtError> {
        self.check_width(ty, bytes)?;
        self.heap.write(slot, bytes)
    }

    fn check_width(&self, ty: Idx, bytes: &[u8]) -> Result<(), RtError> {
        let expected = self.layout_of(ty)?.size;
        if expected == bytes.len() as u64 {
            Ok(())
        } else {
            Err(RtError::WidthMismatch {
                ty: self.pool.name(ty),
                expected,
                found: bytes.len() as u64,
            })
        }
    }

    // === Pointers and functions ===

    /// Point the pointer at `slot` to `target` (`Addr::NULL` for nil).
    pub fn store_ptr(&mut self, slot: Addr, target: Addr) -> Result<(), RtError> {
        self.heap.write_word(slot, target.get())
    }

    /// Store an opaque function code word.
    pub fn store_func(&mut self, slot: Addr, code: u64) -> Result<(), RtError> {
        self.heap.write_word(slot, code)
    }

    // === Strings ===

    /// Copy `text` into fresh storage and store its header at `slot`.
    /// Returns the data address (`NULL` for the empty string).
    pub fn store_str(&mut self, slot: Addr, text: &str) -> Result<Addr, RtError> {
        let data = if text.is_empty() {
            Addr::NULL
        } else {
            let data = self.heap.alloc(text.len() as u64, 1)?;
            self.heap.write(data, text.as_bytes())?;
            data
        };
        self.write_words(slot, &[data.get(), text.len() as u64])?;
        Ok(data)
    }

    /// Read back the contents of the `str` at `slot`.
    pub fn load_str(&self, slot: Addr) -> Result<String, RtError> {
        let header = self.value_at(Idx::STR, slot)?.string();
        let bytes = self.heap.bytes(header.data, header.len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    // === Slices ===

    /// Allocate backing storage for `cap` elements and store a slice header
    /// of length `len` at `slot`. Returns the backing address.
    pub fn store_slice(&mut self, slot: Addr, elem: Idx, len: u64, cap: u64) -> Result<Addr, RtError> {
        if len > cap {
            return Err(RtError::InvalidSlice { len, cap });
        }
        let data = if cap == 0 {
            Addr::NULL
        } else {
            self.alloc_array(elem, cap)?
        };
        self.store_slice_view(slot, data, len, cap)?;
        Ok(data)
    }

    /// Store a slice header over existing storage, aliasing whatever other
    /// slices already view it.
    pub fn store_slice_view(&mut self, slot: Addr, data: Addr, len: u64, cap: u64) -> Result<(), RtError> {
        if len > cap {
            return Err(RtError::InvalidSlice { len, cap });
        }
        self.write_words(slot, &[data.get(), len, cap])
    }

    // === Maps ===

    /// Create an empty map and store its header pointer at `slot`.
    pub fn store_map(&mut self, slot: Addr, key: Idx, value: Idx) -> Result<Addr, RtError> {
        self.layout_of(key)?;
        self.layout_of(value)?;
        let header = self.heap.alloc(MAP_HEADER_SIZE, 8)?;
        self.maps.insert(header, MapObject::new(key, value));
        self.heap.write_word(slot, header.get())?;
        Ok(header)
    }

    /// Insert or replace an entry.
    pub fn map_insert(&mut self, map: Addr, key: &[u8], value: &[u8]) -> Result<(), RtError> {
        let object = self.maps.get(&map).ok_or(RtError::NotAMap(map))?;
        self.check_width(object.key_type(), key)?;
        self.check_width(object.value_type(), value)?;

        let object = self.maps.get_mut(&map).ok_or(RtError::NotAMap(map))?;
        object.insert(key, value);
        let len = object.len() as u64;
        self.heap.write_word(map, len)
    }

    /// Remove an entry. Returns whether it was present.
    pub fn map_remove(&mut self, map: Addr, key: &[u8]) -> Result<bool, RtError> {
        let object = self.maps.get_mut(&map).ok_or(RtError::NotAMap(map))?;
        let removed = object.remove(key);
        let len = object.len() as u64;
        self.heap.write_word(map, len)?;
        Ok(removed)
    }

    /// Entries of the map whose header is at `map`.
    pub fn map(&self, map: Addr) -> Option<&MapObject> {
        self.maps.get(&map)
    }

    // === Interfaces ===

    /// Store an interface holding the value `bytes` of concrete type `ty`.
    ///
    /// Pointer-shaped values go directly in the data word; anything else is
    /// copied into a fresh allocation.
    pub fn store_iface(&mut self, slot: Addr, ty: Idx, bytes: &[u8]) -> Result<(), RtError> {
        self.check_width(ty, bytes)?;
        let data = if self.pool.tag(ty).is_word_reference() {
            Value::new(ty, bytes).word(0)
        } else {
            let boxed = self.alloc(ty)?;
            self.heap.write(boxed, bytes)?;
            boxed.get()
        };
        self.write_words(slot, &[ty.to_type_word(), data])
    }

    /// Reset the interface at `slot` to nil.
    pub fn store_nil_iface(&mut self, slot: Addr) -> Result<(), RtError> {
        self.write_words(slot, &[0, 0])
    }

    pub(crate) fn write_words(&mut self, slot: Addr, words: &[u64]) -> Result<(), RtError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.heap.write(slot, &bytes)
    }
}
