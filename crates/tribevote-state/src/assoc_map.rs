//! Ordered associative map stored as a singly-linked list in an arena.
//!
//! Entries live in a growable vector of optional slots and are threaded
//! from head to tail by slot index. Removed slots go on a free list and
//! are reused by later inserts, so a map that churns keys does not grow
//! without bound.
//!
//! Ordering rules:
//! - A new key is appended at the tail
//! - Overwriting an existing key replaces its value and keeps its position
//! - Iteration (both the external cursor and [`AssocMap::iter`]) follows
//!   the links, so it always yields keys in insertion order
//!
//! All arena growth goes through `try_reserve`; when it fails the
//! operation reports [`MapError::OutOfMemory`] and the map is unchanged.

use std::borrow::Borrow;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::MapError;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<usize>,
}

/// Ordered mapping from unique keys to values.
///
/// # External cursor
/// [`first`](AssocMap::first) positions a single per-map cursor on the head
/// key and [`next`](AssocMap::next) advances it. `next` returns `None` when
/// no `first` call preceded it, once the end is reached, and after any
/// mutation (`put`, `remove`, `retain`, `clear`) since mutations reset the
/// cursor.
pub struct AssocMap<K, V> {
    /// Arena of entries; `None` marks a free slot.
    slots: Vec<Option<Entry<K, V>>>,
    /// Indices of free slots, reused before the arena grows.
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    /// Slot of the key last returned by `first`/`next`.
    cursor: Option<usize>,
}

impl<K, V> AssocMap<K, V> {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            cursor: None,
        }
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position the cursor on the first key and return it.
    pub fn first(&mut self) -> Option<&K> {
        self.cursor = self.head;
        let index = self.cursor?;
        Some(&self.entry(index).key)
    }

    /// Advance the cursor and return the key it lands on.
    pub fn next(&mut self) -> Option<&K> {
        let current = self.cursor?;
        self.cursor = self.entry(current).next;
        let index = self.cursor?;
        Some(&self.entry(index).key)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.cursor = None;
    }

    /// Keep only the entries for which `keep` returns `true`.
    ///
    /// Runs a single pass in storage order and returns how many entries
    /// were removed. Head, tail and interleaved runs of removals are all
    /// relinked in place.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut removed = 0;
        let mut prev = None;
        let mut current = self.head;

        while let Some(index) = current {
            let entry = self.entry_mut(index);
            let next = entry.next;
            if keep(&entry.key, &mut entry.value) {
                prev = Some(index);
            } else {
                self.unlink(prev, index);
                removed += 1;
            }
            current = next;
        }

        self.cursor = None;
        removed
    }

    /// Visit every value mutably, in storage order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut current = self.head;
        while let Some(index) = current {
            let entry = self.entry_mut(index);
            f(&entry.key, &mut entry.value);
            current = entry.next;
        }
    }

    /// Visit every value mutably, in storage order, stopping at the first
    /// error. Entries visited before the failure keep their changes.
    pub fn try_for_each_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&K, &mut V) -> Result<(), E>,
    {
        let mut current = self.head;
        while let Some(index) = current {
            let entry = self.entry_mut(index);
            f(&entry.key, &mut entry.value)?;
            current = entry.next;
        }
        Ok(())
    }

    /// Borrowing iterator over `(key, value)` pairs in storage order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Keys in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Values in storage order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    fn entry(&self, index: usize) -> &Entry<K, V> {
        self.slots[index]
            .as_ref()
            .expect("linked slot is occupied")
    }

    fn entry_mut(&mut self, index: usize) -> &mut Entry<K, V> {
        self.slots[index]
            .as_mut()
            .expect("linked slot is occupied")
    }

    /// Detach the entry at `index`, whose predecessor is `prev`.
    fn unlink(&mut self, prev: Option<usize>, index: usize) -> Entry<K, V> {
        let entry = self.slots[index]
            .take()
            .expect("linked slot is occupied");

        match prev {
            None => self.head = entry.next,
            Some(prev) => self.entry_mut(prev).next = entry.next,
        }
        if self.tail == Some(index) {
            self.tail = prev;
        }

        // Capacity for every slot is reserved when the arena grows.
        self.free.push(index);
        self.len -= 1;
        self.cursor = None;
        entry
    }

    /// Append at the tail into a slot reserved beforehand.
    fn push_back(&mut self, key: K, value: V) {
        let entry = Entry {
            key,
            value,
            next: None,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                index
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        match self.tail {
            None => self.head = Some(index),
            Some(tail) => self.entry_mut(tail).next = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    /// Make sure one more entry fits without reallocating infallibly.
    fn reserve_slot(&mut self) -> Result<(), MapError> {
        if self.free.is_empty() {
            self.slots.try_reserve(1)?;
            let wanted = self.slots.len() + 1;
            self.free.try_reserve(wanted - self.free.len())?;
        }
        Ok(())
    }
}

impl<K: Eq, V> AssocMap<K, V> {
    /// Find `key`, returning `(predecessor, slot)`.
    fn locate<Q>(&self, key: &Q) -> Option<(Option<usize>, usize)>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut prev = None;
        let mut current = self.head;
        while let Some(index) = current {
            let entry = self.entry(index);
            if entry.key.borrow() == key {
                return Some((prev, index));
            }
            prev = Some(index);
            current = entry.next;
        }
        None
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Insert `key` or overwrite its value.
    ///
    /// An existing key keeps its position. A new key is appended at the
    /// tail.
    pub fn put(&mut self, key: K, value: V) -> Result<(), MapError> {
        self.cursor = None;
        if let Some((_, index)) = self.locate(&key) {
            self.entry_mut(index).value = value;
            return Ok(());
        }
        self.reserve_slot()?;
        self.push_back(key, value);
        Ok(())
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let (_, index) = self.locate(key)?;
        Some(&self.entry(index).value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let (_, index) = self.locate(key)?;
        Some(&mut self.entry_mut(index).value)
    }

    /// Remove `key` and return its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let (prev, index) = self.locate(key).ok_or(MapError::ItemDoesNotExist)?;
        Ok(self.unlink(prev, index).value)
    }
}

impl<K: Clone, V: Clone> AssocMap<K, V> {
    /// Deep copy every pair, in order, into a compacted arena.
    ///
    /// The copy has its own cursor, which starts unset.
    pub fn try_copy(&self) -> Result<Self, MapError> {
        let mut copy = Self::new();
        copy.slots.try_reserve_exact(self.len)?;
        copy.free.try_reserve_exact(self.len)?;
        for (key, value) in self.iter() {
            copy.push_back(key.clone(), value.clone());
        }
        Ok(copy)
    }
}

impl<K: Clone, V: Clone> Clone for AssocMap<K, V> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        copy.slots.reserve_exact(self.len);
        copy.free.reserve_exact(self.len);
        for (key, value) in self.iter() {
            copy.push_back(key.clone(), value.clone());
        }
        copy
    }
}

impl<K, V> Default for AssocMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AssocMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same pairs in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for AssocMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AssocMap<K, V> {}

/// Serialized as a map in storage order.
impl<K: Serialize, V: Serialize> Serialize for AssocMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Iterator returned by [`AssocMap::iter`].
pub struct Iter<'a, K, V> {
    map: &'a AssocMap<K, V>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let entry = self.map.entry(index);
        self.next = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a AssocMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, &str)]) -> AssocMap<String, String> {
        let mut map = AssocMap::new();
        for (key, value) in pairs {
            map.put(key.to_string(), value.to_string()).unwrap();
        }
        map
    }

    fn keys(map: &AssocMap<String, String>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_map() {
        let mut map: AssocMap<String, String> = AssocMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(map.first().is_none());
        assert!(map.next().is_none());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = map_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        map.put("a".into(), "9".into()).unwrap();
        assert_eq!(keys(&map), vec!["a", "b", "c"]);
        assert_eq!(map.get("a").map(String::as_str), Some("9"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_remove_head_relinks() {
        let mut map = map_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(map.remove("a").unwrap(), "1");
        assert_eq!(keys(&map), vec!["b", "c"]);
        map.put("d".into(), "4".into()).unwrap();
        assert_eq!(keys(&map), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_remove_tail_then_append() {
        let mut map = map_of(&[("a", "1"), ("b", "2")]);
        map.remove("b").unwrap();
        map.put("c".into(), "3".into()).unwrap();
        assert_eq!(keys(&map), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_sole_entry_then_reuse() {
        let mut map = map_of(&[("a", "1")]);
        map.remove("a").unwrap();
        assert!(map.is_empty());
        assert!(map.first().is_none());
        map.put("b".into(), "2".into()).unwrap();
        assert_eq!(keys(&map), vec!["b"]);
        // The freed slot is reused rather than growing the arena.
        assert_eq!(map.slots.len(), 1);
    }

    #[test]
    fn test_remove_missing() {
        let mut map = map_of(&[("a", "1")]);
        assert_eq!(map.remove("z"), Err(MapError::ItemDoesNotExist));
    }

    #[test]
    fn test_cursor_walks_in_order() {
        let mut map = map_of(&[("x", "1"), ("y", "2"), ("z", "3")]);
        let mut seen = Vec::new();
        let mut key = map.first().cloned();
        while let Some(k) = key {
            seen.push(k);
            key = map.next().cloned();
        }
        assert_eq!(seen, vec!["x", "y", "z"]);
        assert!(map.next().is_none());
    }

    #[test]
    fn test_next_without_first() {
        let mut map = map_of(&[("x", "1")]);
        assert!(map.next().is_none());
    }

    #[test]
    fn test_mutation_resets_cursor() {
        let mut map = map_of(&[("x", "1"), ("y", "2")]);
        map.first();
        map.put("z".into(), "3".into()).unwrap();
        assert!(map.next().is_none());
        assert_eq!(map.first().map(String::as_str), Some("x"));
    }

    #[test]
    fn test_retain_interleaved() {
        let mut map = map_of(&[
            ("1", ""),
            ("2", ""),
            ("3", ""),
            ("4", ""),
            ("5", ""),
            ("6", ""),
        ]);
        let removed = map.retain(|key, _| key == "3" || key == "4");
        assert_eq!(removed, 4);
        assert_eq!(keys(&map), vec!["3", "4"]);
        assert_eq!(map.tail, map.locate("4").map(|(_, index)| index));
    }

    #[test]
    fn test_retain_everything_removed() {
        let mut map = map_of(&[("1", ""), ("2", "")]);
        assert_eq!(map.retain(|_, _| false), 2);
        assert!(map.is_empty());
        assert!(map.head.is_none() && map.tail.is_none());
    }

    #[test]
    fn test_try_for_each_mut_stops_at_error() {
        let mut map = map_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let result = map.try_for_each_mut(|key, value| {
            if key == "b" {
                return Err(());
            }
            value.push('!');
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(map.get("a").map(String::as_str), Some("1!"));
        assert_eq!(map.get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_try_copy_is_compact() {
        let mut map = map_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        map.remove("b").unwrap();
        let copy = map.try_copy().unwrap();
        assert_eq!(copy, map);
        assert_eq!(copy.slots.len(), 2);
        assert!(copy.free.is_empty());
    }
}
