#[cfg(feature = "debug")]
use std::collections::BTreeMap;
use std::{fmt, mem, num::NonZeroUsize};

use conv::prelude::*;
use itertools::Itertools;
#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::*;
use sllist::SinglyLinkedList;
#[cfg(feature = "proptest-arbitrary")]
use stab_map::proptest::{apply_ops, arb_ops, arb_table};
use stab_map::{checked_capacity, KeyHasher, SumHasher, Table, ZeroCapacityError};

use crate::probe::QuadraticProbe;

mod probe;

// puts double the capacity once the table is at least half full
const MAX_LOAD: f64 = 0.5;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Slot<V> {
    Empty,
    Tombstone,
    Live(String, V),
}

impl<V> Slot<V> {
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Live(_, value) => Some(value),
            _ => None,
        }
    }

    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Live(_, value) => Some(value),
            _ => None,
        }
    }

    // marks the slot deleted and hands back the live value, if any; the
    // marker keeps later probe walks running past this slot
    fn tombstone(&mut self) -> Option<V> {
        match mem::replace(self, Slot::Tombstone) {
            Slot::Live(_, value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }
}

enum ProbeOutcome {
    // a live entry holding the key
    Found(usize),
    // a never-used slot ended the walk; the index prefers the first
    // tombstone passed on the way there
    Vacant(usize),
    // the walk cycled without reaching a never-used slot
    Exhausted(Option<usize>),
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

// one entry per slot; collisions walk a quadratic probe sequence and
// deletions leave tombstones behind; only puts resize on their own
#[derive(Clone, Eq, PartialEq)]
pub struct ProbeTable<V, H = SumHasher> {
    slots: Vec<Slot<V>>,
    capacity: NonZeroUsize,
    len: usize,
    hasher: H,
    #[cfg(feature = "debug")]
    pub probe_lengths: BTreeMap<usize, usize>,
}

impl<V, H: KeyHasher + Default> ProbeTable<V, H> {
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        ProbeTable::with_capacity_and_hasher(capacity, H::default())
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ZeroCapacityError> {
        Ok(ProbeTable::with_capacity(checked_capacity(capacity)?))
    }
}

impl<V, H: KeyHasher> ProbeTable<V, H> {
    pub fn with_capacity_and_hasher(capacity: NonZeroUsize, hasher: H) -> Self {
        ProbeTable {
            slots: empty_slots(capacity.get()),
            capacity,
            len: 0,
            hasher,
            #[cfg(feature = "debug")]
            probe_lengths: BTreeMap::new(),
        }
    }

    fn initial_index(&self, key: &str) -> usize {
        (self.hasher.hash_key(key) % self.capacity.get() as u64) as usize
    }

    fn probe(&self, key: &str) -> (ProbeOutcome, usize) {
        let mut reusable = None;
        let mut probes = 0;
        for index in QuadraticProbe::new(self.initial_index(key), self.capacity.get()) {
            probes += 1;
            match &self.slots[index] {
                Slot::Empty => return (ProbeOutcome::Vacant(reusable.unwrap_or(index)), probes),
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(index);
                    }
                }
                Slot::Live(k, _) if k == key => return (ProbeOutcome::Found(index), probes),
                Slot::Live(..) => {}
            }
        }
        (ProbeOutcome::Exhausted(reusable), probes)
    }

    // insertion with an already-owned key, shared by put and the rehash path
    fn put_entry(&mut self, key: String, value: V) -> Option<V> {
        if self.table_load() >= MAX_LOAD {
            self.resize_table(
                self.capacity
                    .get()
                    .checked_mul(2)
                    .expect("multiplication by 2 overflows a usize"),
            );
        }
        loop {
            let (outcome, _probes) = self.probe(&key);
            #[cfg(feature = "debug")]
            {
                *self.probe_lengths.entry(_probes).or_default() += 1;
            }
            let index = match outcome {
                ProbeOutcome::Found(index) | ProbeOutcome::Vacant(index) => index,
                ProbeOutcome::Exhausted(Some(index)) => index,
                ProbeOutcome::Exhausted(None) => {
                    // the quadratic walk cycled without a usable slot; grow
                    // and walk again at the new capacity
                    self.resize_table(
                        self.capacity
                            .get()
                            .checked_mul(2)
                            .expect("multiplication by 2 overflows a usize"),
                    );
                    continue;
                }
            };
            return match mem::replace(&mut self.slots[index], Slot::Live(key, value)) {
                Slot::Live(_, old) => Some(old),
                _ => {
                    self.len += 1;
                    None
                }
            };
        }
    }

    // every live key must be reachable by probing for it
    fn invariant4(&self) -> bool {
        self.iter()
            .all(|(key, _)| matches!(self.probe(key), (ProbeOutcome::Found(_), _)))
    }
}

impl<V, H> ProbeTable<V, H> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Live(key, value) => Some((key.as_str(), value)),
            _ => None,
        })
    }

    fn invariant1(&self) -> bool {
        self.slots.len() == self.capacity.get()
    }

    fn invariant2(&self) -> bool {
        self.len
            == self
                .slots
                .iter()
                .filter(|slot| slot.value().is_some())
                .count()
    }

    fn invariant3(&self) -> bool {
        self.iter().map(|(key, _)| key).all_unique()
    }
}

impl<V, H: KeyHasher> Table<V> for ProbeTable<V, H> {
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
        self.put_entry(key.to_owned(), value)
    }

    fn get(&self, key: &str) -> Option<&V> {
        match self.probe(key) {
            (ProbeOutcome::Found(index), _) => self.slots[index].value(),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.probe(key) {
            (ProbeOutcome::Found(index), _) => self.slots[index].value_mut(),
            _ => None,
        }
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        match self.probe(key) {
            (ProbeOutcome::Found(index), _) => {
                let removed = self.slots[index].tombstone();
                if removed.is_some() {
                    self.len -= 1;
                }
                removed
            }
            _ => None,
        }
    }

    // tombstoned slots are occupied, not empty
    fn empty_buckets(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Empty))
            .count()
    }

    fn table_load(&self) -> f64 {
        f64::value_from(self.len).unwrap() / f64::value_from(self.capacity.get()).unwrap()
    }

    fn resize_table(&mut self, new_capacity: usize) {
        let new_capacity = match NonZeroUsize::new(new_capacity) {
            Some(capacity) if capacity.get() >= self.len => capacity,
            _ => return,
        };
        // live entries collected back to front; head insertion reverses them,
        // so reinsertion runs in ascending original slot order
        let mut staging = SinglyLinkedList::new();
        for slot in mem::take(&mut self.slots).into_iter().rev() {
            if let Slot::Live(key, value) = slot {
                staging.push_front(key, value);
            }
        }
        self.capacity = new_capacity;
        self.slots = empty_slots(new_capacity.get());
        self.len = 0;
        for (key, value) in staging {
            self.put_entry(key, value);
        }
    }

    fn get_keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_owned()).collect()
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }
}

impl<V: fmt::Debug, H> fmt::Debug for ProbeTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "proptest-arbitrary")]
impl<V: Arbitrary + Clone> ProbeTable<V> {
    pub fn arb_table_with_capacity(capacity: NonZeroUsize) -> impl Strategy<Value = Self> {
        arb_ops::<V>().prop_map(move |ops| {
            let mut table = ProbeTable::<V>::with_capacity(capacity);
            apply_ops(&mut table, ops);
            table
        })
    }

    pub fn arb_table() -> impl Strategy<Value = Self> {
        arb_table::<V, _, _>(Self::arb_table_with_capacity)
    }
}
