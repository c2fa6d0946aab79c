//! # Database file format
//!
//! A database file is one immutable byte stream. All multi-byte integers are
//! little-endian.
//!
//! ```text
//! struct File {
//!     signature:      [u8; 8],
//!     root:           Pointer,
//!     chunks:         [u8; ...],      // 0-7 zero bytes of alignment padding
//!                                     // may precede any chunk
//! }
//!
//! struct Pointer {
//!     start:          u32,
//!     end:            u32,
//! }
//! // (0, 0) means "absent". Byte 0 holds the signature, never content,
//! // so the null pointer is unambiguous.
//!
//! struct TableRegion {                // 4-byte aligned
//!     bloom_header:   u32,            // shift << 27 | n_bloom_words
//!     n_buckets:      u32,
//!     bloom_words:    [u32; n_bloom_words],
//!     buckets:        [u32; n_buckets],   // head assigned_index, or NONE
//!     items:          [ItemRecord; n_items],
//! }
//!
//! struct ItemRecord {
//!     hash:           u32,
//!     parent_index:   u32,            // NONE if the item has no parent
//!     key_start:      u32,            // basename bytes, unaligned
//!     key_size:       u16,
//!     type:           u8,             // b'v' | b'L' | b'H'
//!     unused:         u8,
//!     value:          Pointer,        // per type: value blob (8-byte aligned),
//!                                     // child index array (4-byte aligned),
//!                                     // or nested TableRegion
//!     options:        Pointer,        // only for b'v'; else (0, 0)
//! }
//! ```
//!
//! The full key of an item is reconstructed by walking `parent_index` links
//! to the root and concatenating basenames root-to-leaf.

mod bloom;
mod hash;
mod item_type;
mod pointer;

pub use bloom::*;
pub use hash::*;
pub use item_type::*;
pub use pointer::*;

pub const SIGNATURE: [u8; 8] = *b"griddle\0";

/// Signature + root pointer. The chunk cursor starts here.
pub const HEADER_LEN: usize = 16;

/// Bloom header + bucket count.
pub const TABLE_HEADER_LEN: usize = 8;

pub const ITEM_RECORD_LEN: usize = 32;

/// Sentinel for "no item": empty bucket heads and parentless items.
pub const NONE_INDEX: u32 = u32::MAX;
