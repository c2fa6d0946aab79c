use crate::tree::{ItemId, Table};
use griddle_types::format::NONE_INDEX;

/// The hash-bucket chain layout of one table: a bucket array plus a dense
/// index assignment, approximating a hash table with open chaining.
///
/// Assignment order is bucket-then-chain: buckets `0..n_buckets` in order,
/// each bucket's chain walked head-first. Indices are monotonic across the
/// whole table, not reset per bucket; this is the order item records are
/// laid out in, so one bucket's chain always occupies a contiguous index
/// range.
pub struct BucketLayout {
    bucket_heads: Vec<u32>,
    order: Vec<ItemId>,
    index_of: Vec<u32>,
}

impl BucketLayout {
    pub fn index<V>(table: &Table<V>) -> Self {
        let n = table.len();

        // One chain per bucket, built by prepending. Within-bucket order is
        // the reverse of arena order and is not a caller-visible contract.
        let mut chains: Vec<Vec<ItemId>> = vec![vec![]; n];
        for (id, item) in table.items() {
            let bucket = item.hash().bucket(n as u32) as usize;
            chains[bucket].push(id);
        }

        let mut bucket_heads = vec![NONE_INDEX; n];
        let mut order = Vec::with_capacity(n);
        let mut index_of = vec![NONE_INDEX; n];
        for (bucket, chain) in chains.iter().enumerate() {
            for &id in chain.iter().rev() {
                let assigned = order.len() as u32;
                if bucket_heads[bucket] == NONE_INDEX {
                    bucket_heads[bucket] = assigned;
                }
                index_of[*id] = assigned;
                order.push(id);
            }
        }

        Self {
            bucket_heads,
            order,
            index_of,
        }
    }

    pub fn n_buckets(&self) -> usize {
        self.bucket_heads.len()
    }

    pub fn n_items(&self) -> usize {
        self.order.len()
    }

    /// Head assigned index per bucket; `NONE_INDEX` for empty buckets.
    pub fn bucket_heads(&self) -> &[u32] {
        &self.bucket_heads
    }

    /// Item handles in assignment order.
    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    pub fn index_of(&self, id: ItemId) -> u32 {
        let assigned = self.index_of[*id];
        assert!(assigned != NONE_INDEX, "item was not indexed");
        assigned
    }

    pub fn index_of_parent(&self, parent: Option<ItemId>) -> u32 {
        match parent {
            Some(id) => self.index_of(id),
            None => NONE_INDEX,
        }
    }
}
