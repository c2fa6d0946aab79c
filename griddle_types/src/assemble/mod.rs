//! Output assembly: the concatenation of many byte fragments with minimal
//! copying, plus "reserve now, fill later" offset tables.

mod offsets;
mod vector;

pub use offsets::*;
pub use vector::*;

use owning_ref::OwningRef;
use std::sync::Arc;

/// A reference-counted, immutable byte range. The [`Assembler`] keeps the
/// owner alive for as long as it needs the bytes; no copy is ever made.
pub type SharedBytes = OwningRef<Arc<Vec<u8>>, [u8]>;

pub fn shared_bytes(bytes: Vec<u8>) -> SharedBytes {
    OwningRef::new(Arc::new(bytes)).map(|owner| &owner[..])
}

pub fn shared_bytes_from(owner: &Arc<Vec<u8>>) -> SharedBytes {
    OwningRef::new(Arc::clone(owner)).map(|owner| &owner[..])
}
