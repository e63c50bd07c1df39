use std::num::NonZeroUsize;

use proptest::prelude::*;

use crate::Table;

const MAX_CAPACITY: usize = 16;
const MAX_OPS: usize = 48;

// a narrow alphabet keeps collisions frequent
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-d]{0,3}"
}

#[derive(Clone, Debug)]
pub enum Op<V> {
    Put(String, V),
    Remove(String),
    Resize(usize),
    Clear,
}

pub fn arb_op<V: Arbitrary + Clone>() -> impl Strategy<Value = Op<V>> {
    prop_oneof![
        4 => (arb_key(), any::<V>()).prop_map(|(key, value)| Op::Put(key, value)),
        2 => arb_key().prop_map(Op::Remove),
        1 => (0..2 * MAX_CAPACITY).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ]
}

pub fn arb_ops<V: Arbitrary + Clone>() -> impl Strategy<Value = Vec<Op<V>>> {
    proptest::collection::vec(arb_op::<V>(), 0..MAX_OPS)
}

pub fn apply_ops<V, T: Table<V>>(table: &mut T, ops: Vec<Op<V>>) {
    for op in ops {
        match op {
            Op::Put(key, value) => {
                table.put(&key, value);
            }
            Op::Remove(key) => {
                table.remove(&key);
            }
            Op::Resize(new_capacity) => table.resize_table(new_capacity),
            Op::Clear => table.clear(),
        }
    }
}

pub fn arb_table<V, F: Fn(NonZeroUsize) -> S, S: Strategy>(
    arb_table_fixed_capacity: F,
) -> impl Strategy<Value = S::Value>
where
    S::Value: Table<V>,
{
    (1..MAX_CAPACITY).prop_flat_map(move |capacity| {
        arb_table_fixed_capacity(capacity.try_into().unwrap())
    })
}
