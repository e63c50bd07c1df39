use std::{fmt, mem, num::NonZeroUsize};

use conv::prelude::*;
use itertools::Itertools;
#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::*;
use sllist::SinglyLinkedList;
#[cfg(feature = "proptest-arbitrary")]
use stab_map::proptest::{apply_ops, arb_ops, arb_table};
use stab_map::{checked_capacity, KeyHasher, SumHasher, Table, ZeroCapacityError};


// collision chains per bucket, newest entry at the front; resizing is
// caller-invoked only
#[derive(Clone, Eq, PartialEq)]
pub struct ChainTable<V, H = SumHasher> {
    buckets: Vec<SinglyLinkedList<String, V>>,
    capacity: NonZeroUsize,
    len: usize,
    hasher: H,
}

impl<V, H: KeyHasher + Default> ChainTable<V, H> {
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        ChainTable::with_capacity_and_hasher(capacity, H::default())
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ZeroCapacityError> {
        Ok(ChainTable::with_capacity(checked_capacity(capacity)?))
    }
}

impl<V, H: KeyHasher> ChainTable<V, H> {
    pub fn with_capacity_and_hasher(capacity: NonZeroUsize, hasher: H) -> Self {
        let mut buckets = Vec::with_capacity(capacity.get());
        buckets.resize_with(capacity.get(), SinglyLinkedList::new);
        ChainTable {
            buckets,
            capacity,
            len: 0,
            hasher,
        }
    }

    fn bucket_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.capacity.get() as u64) as usize
    }

    // insertion with an already owned key, shared by put and the rehash path
    fn put_entry(&mut self, key: String, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = &mut self.buckets[index];
        match bucket.get_mut(key.as_str()) {
            Some(slot) => Some(mem::replace(slot, value)),
            None => {
                bucket.push_front(key, value);
                self.len += 1;
                None
            }
        }
    }

    fn invariant1(&self) -> bool {
        self.buckets.len() == self.capacity.get()
    }

    fn invariant2(&self) -> bool {
        self.len == self.buckets.iter().map(SinglyLinkedList::len).sum::<usize>()
    }

    fn invariant3(&self) -> bool {
        self.iter().map(|(key, _)| key).all_unique()
    }

    fn invariant4(&self) -> bool {
        self.buckets.iter().enumerate().all(|(index, bucket)| {
            bucket.iter().all(|(key, _)| self.bucket_index(key) == index)
        })
    }
}

impl<V, H> ChainTable<V, H> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(key, value)| (key.as_str(), value)))
    }
}

impl<V, H: KeyHasher> Table<V> for ChainTable<V, H> {
    fn invariants(&self) -> bool {
        self.invariant1() && self.invariant2() && self.invariant3() && self.invariant4()
    }

    fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    fn len(&self) -> usize {
        self.len
    }

    fn put(&mut self, key: &str, value: V) -> Option<V> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        match bucket.get_mut(key) {
            Some(slot) => Some(mem::replace(slot, value)),
            None => {
                bucket.push_front(key.to_owned(), value);
                self.len += 1;
                None
            }
        }
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_index(key)].get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets[index].get_mut(key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let (_, value) = self.buckets[index].remove(key)?;
        self.len -= 1;
        Some(value)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.buckets[self.bucket_index(key)].contains_key(key)
    }

    fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_empty()).count()
    }

    fn table_load(&self) -> f64 {
        f64::value_from(self.len).unwrap() / f64::value_from(self.capacity.get()).unwrap()
    }

    fn resize_table(&mut self, new_capacity: usize) {
        let new_capacity = match NonZeroUsize::new(new_capacity) {
            Some(capacity) => capacity,
            None => return,
        };
        // entries staged front to back; head insertion on reinsert reverses
        // them again, which keeps same-bucket entries in their original order
        let mut staging = SinglyLinkedList::new();
        for bucket in &mut self.buckets {
            for (key, value) in mem::take(bucket) {
                staging.push_front(key, value);
            }
        }
        self.capacity = new_capacity;
        self.buckets.clear();
        self.buckets.resize_with(new_capacity.get(), SinglyLinkedList::new);
        self.len = 0;
        for (key, value) in staging {
            self.put_entry(key, value);
        }
    }

    fn get_keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_owned()).collect()
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }
}

impl<V: fmt::Debug, H> fmt::Debug for ChainTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "proptest-arbitrary")]
impl<V: Arbitrary + Clone> ChainTable<V> {
    pub fn arb_table_with_capacity(capacity: NonZeroUsize) -> impl Strategy<Value = Self> {
        arb_ops::<V>().prop_map(move |ops| {
            let mut table = ChainTable::<V>::with_capacity(capacity);
            apply_ops(&mut table, ops);
            table
        })
    }

    pub fn arb_table() -> impl Strategy<Value = Self> {
        arb_table::<V, _, _>(Self::arb_table_with_capacity)
    }
}
