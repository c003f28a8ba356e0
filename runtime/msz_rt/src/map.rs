//! Out-of-line map storage.
//!
//! A map value is one word pointing at a small header allocation in the
//! heap. Entries live here, outside the heap, so they have no stable
//! address: a scan can read them but cannot deduplicate them by location.

use msz_types::Idx;

use crate::Value;

/// Header allocation size: one word holding the entry count.
pub(crate) const MAP_HEADER_SIZE: u64 = 8;

/// Entries of one map.
#[derive(Clone, Debug)]
pub struct MapObject {
    key: Idx,
    value: Idx,
    entries: Vec<(Box<[u8]>, Box<[u8]>)>,
}

impl MapObject {
    pub(crate) fn new(key: Idx, value: Idx) -> Self {
        Self {
            key,
            value,
            entries: Vec::new(),
        }
    }

    pub fn key_type(&self) -> Idx {
        self.key
    }

    pub fn value_type(&self) -> Idx {
        self.value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace. Keys are compared by their encoded bytes, so two
    /// `str` keys are equal only when they share data address and length.
    pub(crate) fn insert(&mut self, key: &[u8], value: &[u8]) {
        match self.entries.iter_mut().find(|(k, _)| &**k == key) {
            Some((_, v)) => *v = value.into(),
            None => self.entries.push((key.into(), value.into())),
        }
    }

    pub(crate) fn remove(&mut self, key: &[u8]) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| &**k != key);
        self.entries.len() != before
    }

    pub fn get(&self, key: &[u8]) -> Option<Value<'_>> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| Value::new(self.value, v))
    }

    /// Iterate entries as typed key and value views.
    pub fn iter(&self) -> impl Iterator<Item = (Value<'_>, Value<'_>)> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (Value::new(self.key, k), Value::new(self.value, v)))
    }
}
