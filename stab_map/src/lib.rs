use std::num::NonZeroUsize;

use thiserror::Error;

#[cfg(feature = "arbitrary")]
pub mod arbitrary;
#[cfg(feature = "proptest")]
pub mod proptest;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("capacity must be at least 1")]
pub struct ZeroCapacityError;

pub fn checked_capacity(capacity: usize) -> Result<NonZeroUsize, ZeroCapacityError> {
    NonZeroUsize::new(capacity).ok_or(ZeroCapacityError)
}

// key hashing strategy, injected at construction and fixed for the table's
// lifetime; equal keys must hash identically
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F: Fn(&str) -> u64> KeyHasher for F {
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

// sum of the key's code points
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SumHasher;

impl KeyHasher for SumHasher {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().fold(0, |hash, c| hash.wrapping_add(u64::from(c)))
    }
}

// code points weighted by position, distinguishes anagrams
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WeightedHasher;

impl KeyHasher for WeightedHasher {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().zip(1u64..).fold(0, |hash, (c, position)| {
            hash.wrapping_add(position.wrapping_mul(u64::from(c)))
        })
    }
}

pub trait Table<V> {
    fn invariants(&self) -> bool;
    fn capacity(&self) -> NonZeroUsize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Inserts or updates, returning the previous value on an update.
    fn put(&mut self, key: &str, value: V) -> Option<V>;
    fn get(&self, key: &str) -> Option<&V>;
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;
    fn remove(&mut self, key: &str) -> Option<V>;
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    // the number of buckets holding no entry at all
    fn empty_buckets(&self) -> usize;
    fn table_load(&self) -> f64;
    /// Rebuilds the table at the requested capacity, rehashing every live
    /// entry; invalid requests are a silent no-op.
    fn resize_table(&mut self, new_capacity: usize);
    fn get_keys(&self) -> Vec<String>;
    fn clear(&mut self);
}
