use derive_more::{Deref, From};

/// The djb-style multiplicative hash of an item's full key. Computed once
/// at insertion and stored verbatim in the item record.
#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct KeyHash(u32);

impl KeyHash {
    pub fn compute(key: &str) -> Self {
        let mut hash_value = 5381u32;
        for byte in key.bytes() {
            hash_value = hash_value.wrapping_mul(33).wrapping_add(u32::from(byte));
        }
        Self(hash_value)
    }

    pub fn bucket(&self, n_buckets: u32) -> u32 {
        self.0 % n_buckets
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}
