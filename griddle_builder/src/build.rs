use crate::bucket::BucketLayout;
use crate::chunk::ChunkWriter;
use crate::tree::{Payload, Table};
use anyhow::Result;
use griddle_types::codec::ValueCodec;
use griddle_types::format::{
    BloomHeader, ItemType, ItemTypeInt, Pointer, ITEM_RECORD_LEN, TABLE_HEADER_LEN,
};
use std::io::Write;

/// Serializes a key tree into one database file: walks the tree
/// recursively (a table nested inside an item becomes a database within
/// the database), drives the bucket layout, stores values through the
/// codec, and streams the chunks out behind a fixed header.
pub struct DatabaseBuilder<'a, C: ValueCodec> {
    codec: &'a C,
    writer: ChunkWriter,
}

impl<'a, C: ValueCodec> DatabaseBuilder<'a, C> {
    pub fn new(codec: &'a C) -> Self {
        Self {
            codec,
            writer: ChunkWriter::new(),
        }
    }

    /// Serializes `root` and streams the whole file to `sink`. On I/O
    /// failure the sink holds a truncated, unusable file; there is no
    /// resume at this layer.
    pub fn write(root: &Table<C::Value>, codec: &'a C, sink: &mut impl Write) -> Result<()> {
        let mut builder = Self::new(codec);
        let root_pointer = builder.write_table(root);
        builder.writer.stream_to(sink, root_pointer)
    }

    /// Lays out one table: bloom header (always empty), bucket array, and
    /// one record per item in assignment order, plus the strings, value
    /// blobs, child-index arrays, and nested tables they point at.
    pub fn write_table(&mut self, table: &Table<C::Value>) -> Pointer {
        let layout = BucketLayout::index(table);

        let size =
            TABLE_HEADER_LEN + 4 * layout.n_buckets() + ITEM_RECORD_LEN * layout.n_items();
        let (region, pointer) = self.writer.allocate(4, size);

        let mut buf = Vec::with_capacity(size);
        buf.extend_from_slice(&BloomHeader::EMPTY.to_le_bytes());
        buf.extend_from_slice(&(layout.n_buckets() as u32).to_le_bytes());
        for head in layout.bucket_heads() {
            buf.extend_from_slice(&head.to_le_bytes());
        }

        for &id in layout.order() {
            let item = &table[id];

            buf.extend_from_slice(&item.hash().to_le_bytes());
            buf.extend_from_slice(&layout.index_of_parent(item.parent()).to_le_bytes());

            let (key_start, key_size) = self.writer.allocate_string(table.basename(id).as_bytes());
            buf.extend_from_slice(&key_start.to_le_bytes());
            buf.extend_from_slice(&key_size.to_le_bytes());

            let payload = item
                .payload()
                .unwrap_or_else(|| panic!("item {:?} has no payload", item.key()));
            let (item_type, value_ptr, options_ptr) = match payload {
                Payload::Value { data, options } => {
                    let value_ptr = self.write_value(data);
                    let options_ptr = match options {
                        Some(options) => self.write_value(options),
                        None => Pointer::NULL,
                    };
                    (ItemType::Value, value_ptr, options_ptr)
                }
                Payload::List { children } => {
                    let (chunk, list_ptr) = self.writer.allocate(4, 4 * children.len());
                    let mut indices = Vec::with_capacity(4 * children.len());
                    for &child in children {
                        // Children are kept ascending by key, and the array
                        // reads ascending forward.
                        indices.extend_from_slice(&layout.index_of(child).to_le_bytes());
                    }
                    self.writer.fill(chunk, indices);
                    (ItemType::List, list_ptr, Pointer::NULL)
                }
                Payload::Table(nested) => (ItemType::Table, self.write_table(nested), Pointer::NULL),
            };

            buf.push(*ItemTypeInt::from(item_type));
            buf.push(0u8); // unused
            buf.extend_from_slice(&value_ptr.to_le_bytes());
            buf.extend_from_slice(&options_ptr.to_le_bytes());
        }

        self.writer.fill(region, buf);
        pointer
    }

    fn write_value(&mut self, value: &C::Value) -> Pointer {
        let size = self.codec.normalized_size(value);
        let (chunk, pointer) = self.writer.allocate(8, size);
        self.codec.store(value, self.writer.chunk_mut(chunk));
        pointer
    }
}
