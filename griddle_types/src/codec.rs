/// The seam between the database builder and whatever typed-value encoding
/// the caller uses. The builder asks for the canonical size, allocates an
/// 8-byte-aligned region of exactly that size, and has the codec fill it.
///
/// Implementations must be deterministic and side-effect free: `store` must
/// write exactly `normalized_size(value)` bytes.
pub trait ValueCodec {
    type Value;

    fn normalized_size(&self, value: &Self::Value) -> usize;

    fn store(&self, value: &Self::Value, dest: &mut [u8]);
}

/// Values that are already canonical byte strings.
pub struct RawBytesCodec;

impl ValueCodec for RawBytesCodec {
    type Value = Vec<u8>;

    fn normalized_size(&self, value: &Vec<u8>) -> usize {
        value.len()
    }

    fn store(&self, value: &Vec<u8>, dest: &mut [u8]) {
        dest.copy_from_slice(value);
    }
}
