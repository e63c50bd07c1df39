use arbitrary::{Arbitrary, Unstructured};

use crate::Table;

// drives an already constructed table, for fuzz harnesses
pub fn arb_fill_table<'a, V: Arbitrary<'a>, T: Table<V>>(
    u: &mut Unstructured<'a>,
    table: &mut T,
) -> arbitrary::Result<()> {
    for _ in 0..u.int_in_range(0..=64)? {
        let key: String = u.arbitrary()?;
        if u.arbitrary()? {
            table.put(&key, u.arbitrary()?);
        } else {
            table.remove(&key);
        }
    }
    Ok(())
}
