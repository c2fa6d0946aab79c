use anyhow::{Context, Result};
use derive_more::{Deref, From};
use griddle_types::assemble::{shared_bytes, Assembler};
use griddle_types::format::{Pointer, HEADER_LEN, SIGNATURE};
use std::io::Write;

/// Handle to a queued chunk, for filling it after allocation.
#[derive(From, Deref, Clone, Copy, Debug)]
pub struct ChunkId(usize);

struct Chunk {
    offset: u64,
    bytes: Vec<u8>,
}

/// A monotonically increasing byte-offset cursor plus a queue of finished
/// chunks. Regions are allocated at aligned offsets and filled through
/// their [`ChunkId`] (a region is still being composed while later chunks
/// are allocated), then everything is streamed out once, in offset order,
/// with zero padding over the alignment gaps.
pub struct ChunkWriter {
    cursor: u64,
    chunks: Vec<Chunk>,
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self {
            // Byte 0 belongs to the file header; content never starts there.
            cursor: HEADER_LEN as u64,
            chunks: vec![],
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Advances the cursor to the next multiple of `alignment`, queues a
    /// zero-filled chunk of `size` bytes there, and returns its handle and
    /// the `(start, end)` pointer.
    pub fn allocate(&mut self, alignment: u64, size: usize) -> (ChunkId, Pointer) {
        assert!(alignment.is_power_of_two(), "alignment {alignment}");
        self.cursor += self.cursor.wrapping_neg() & (alignment - 1);

        let start = self.cursor;
        self.cursor += size as u64;
        assert!(
            self.cursor <= u64::from(u32::MAX),
            "output exceeds the pointer range"
        );
        let pointer = Pointer::new(start as u32, self.cursor as u32);

        let id = ChunkId(self.chunks.len());
        self.chunks.push(Chunk {
            offset: start,
            bytes: vec![0u8; size],
        });
        (id, pointer)
    }

    pub fn chunk_mut(&mut self, id: ChunkId) -> &mut [u8] {
        &mut self.chunks[*id].bytes
    }

    /// Replaces the chunk's bytes wholesale; the length must match the
    /// allocation.
    pub fn fill(&mut self, id: ChunkId, bytes: Vec<u8>) {
        let chunk = &mut self.chunks[*id];
        assert_eq!(chunk.bytes.len(), bytes.len(), "chunk size mismatch");
        chunk.bytes = bytes;
    }

    /// Appends raw bytes at the cursor with no alignment; used for key
    /// basename storage.
    pub fn allocate_string(&mut self, bytes: &[u8]) -> (u32, u16) {
        assert!(
            bytes.len() <= usize::from(u16::MAX),
            "string of {} bytes does not fit u16",
            bytes.len()
        );
        let start = self.cursor;
        self.cursor += bytes.len() as u64;
        assert!(
            self.cursor <= u64::from(u32::MAX),
            "output exceeds the pointer range"
        );
        self.chunks.push(Chunk {
            offset: start,
            bytes: bytes.to_vec(),
        });
        (start as u32, bytes.len() as u16)
    }

    /// Writes the file header (signature + root pointer), then every chunk
    /// in offset order, zero-filling the alignment gaps. Gaps are smaller
    /// than the largest alignment by construction. Large chunks pass
    /// through the assembler zero-copy.
    ///
    /// Any I/O failure aborts immediately; a partially written sink is not
    /// a usable database.
    pub fn stream_to(self, sink: &mut impl Write, root: Pointer) -> Result<()> {
        let mut assembler = Assembler::new();

        let mut header = Vec::with_capacity(HEADER_LEN);
        header.extend_from_slice(&SIGNATURE);
        header.extend_from_slice(&root.to_le_bytes());
        assembler.append_copy(&header);

        let mut offset = HEADER_LEN as u64;
        for chunk in self.chunks {
            if chunk.offset != offset {
                assert!(chunk.offset > offset, "chunk queued out of offset order");
                let gap = chunk.offset - offset;
                assert!(gap < 8, "alignment gap of {gap} bytes");
                assembler.append_pad(gap as usize);
                offset = chunk.offset;
            }
            offset += chunk.bytes.len() as u64;
            assembler.append_borrowed(shared_bytes(chunk.bytes));
        }

        let (_total_len, slices) = assembler.finalize();
        for slice in slices {
            sink.write_all(slice).context("write database bytes")?;
        }
        sink.flush().context("flush database sink")?;
        Ok(())
    }
}
