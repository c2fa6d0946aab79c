use crate::assemble::offsets::OffsetTable;
use crate::assemble::{OffsetTableKey, SharedBytes};

/// Below this size, the bookkeeping cost of holding a borrowed element
/// exceeds the savings of not copying. Fixed tuning constant.
pub const BORROW_THRESHOLD: usize = 128;

const ZERO_PREFIX_LEN: usize = 8;
static ZERO_PREFIX: [u8; ZERO_PREFIX_LEN] = [0u8; ZERO_PREFIX_LEN];

enum Element {
    /// Leading pad served from the shared zero buffer, never allocated.
    /// Only ever the first element; `len <= ZERO_PREFIX_LEN`.
    ZeroPrefix { len: usize },
    /// A range within the growable inline buffer. Only the last element may
    /// grow, so an inline element always ends where the buffer ends when it
    /// is the last one.
    Inline {
        start: usize,
        len: usize,
        is_pad: bool,
    },
    /// Caller-owned immutable bytes, held alive by refcount, never copied.
    Borrowed(SharedBytes),
}

/// Accumulates an ordered sequence of byte ranges that concatenate into one
/// stream: zero-fill pads, small transient copies, and large externally
/// owned ranges. Adjacent inline elements merge. [`finalize`] yields the
/// ranges without requiring one giant contiguous buffer.
///
/// [`finalize`]: Assembler::finalize
#[derive(Default)]
pub struct Assembler {
    inline_buf: Vec<u8>,
    elements: Vec<Element>,
    offset_tables: Vec<OffsetTable>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `n` zero bytes. Returns `n` even when the pad merges into an
    /// existing element.
    pub fn append_pad(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        match self.elements.last_mut() {
            Some(Element::ZeroPrefix { len }) if *len + n <= ZERO_PREFIX_LEN => {
                *len += n;
            }
            Some(Element::Inline {
                len, is_pad: true, ..
            }) => {
                self.inline_buf.resize(self.inline_buf.len() + n, 0);
                *len += n;
            }
            None if n <= ZERO_PREFIX_LEN => {
                self.elements.push(Element::ZeroPrefix { len: n });
            }
            _ => {
                let start = self.inline_buf.len();
                self.inline_buf.resize(start + n, 0);
                self.elements.push(Element::Inline {
                    start,
                    len: n,
                    is_pad: true,
                });
            }
        }
        n
    }

    /// Copies `data` into the inline buffer, extending the previous inline
    /// element (pad or copy) contiguously when there is one.
    pub fn append_copy(&mut self, data: &[u8]) -> usize {
        match self.elements.last_mut() {
            Some(Element::Inline { len, is_pad, .. }) => {
                self.inline_buf.extend_from_slice(data);
                *len += data.len();
                *is_pad = false;
            }
            _ => {
                let start = self.inline_buf.len();
                self.inline_buf.extend_from_slice(data);
                self.elements.push(Element::Inline {
                    start,
                    len: data.len(),
                    is_pad: false,
                });
            }
        }
        data.len()
    }

    /// Takes a reference-counted range. Below [`BORROW_THRESHOLD`] the bytes
    /// are copied and the handle is dropped; at or above it, the handle is
    /// held and the bytes are emitted zero-copy at finalize time.
    pub fn append_borrowed(&mut self, bytes: SharedBytes) -> usize {
        let n = bytes.len();
        if n < BORROW_THRESHOLD {
            self.append_copy(&bytes);
        } else {
            self.elements.push(Element::Borrowed(bytes));
        }
        n
    }

    /// Allocates `count` slots of `width` bytes (`width` in {1, 2, 4, 8}) of
    /// scratch that is not yet part of the output. The table's position in
    /// the stream is fixed only at [`commit_offset_table`] time.
    ///
    /// [`commit_offset_table`]: Assembler::commit_offset_table
    pub fn reserve_offset_table(&mut self, count: usize, width: usize) -> OffsetTableKey {
        self.offset_tables.push(OffsetTable::reserve(count, width));
        OffsetTableKey(self.offset_tables.len() - 1)
    }

    /// Little-endian write of `value` into slot `index`. The value must fit
    /// the width chosen at reservation.
    pub fn write_offset(&mut self, key: OffsetTableKey, index: usize, value: u64) {
        self.offset_tables[key.0].write(index, value);
    }

    /// Appends the filled scratch into the main output through the
    /// [`append_copy`] merge rules and frees the scratch.
    ///
    /// [`append_copy`]: Assembler::append_copy
    pub fn commit_offset_table(&mut self, key: OffsetTableKey) {
        let bytes = self.offset_tables[key.0].commit();
        self.append_copy(&bytes);
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Elements that occupy allocated storage (inline or borrowed); the
    /// shared zero prefix is not one.
    pub fn materialized_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|elem| !matches!(elem, Element::ZeroPrefix { .. }))
            .count()
    }

    /// The total length and the ordered byte ranges whose concatenation is
    /// the assembled output. Every reserved offset table must have been
    /// committed.
    pub fn finalize(&self) -> (usize, Vec<&[u8]>) {
        assert!(
            self.offset_tables.iter().all(OffsetTable::is_committed),
            "finalize with uncommitted offset table"
        );
        let mut total = 0;
        let mut slices = Vec::with_capacity(self.elements.len());
        for elem in self.elements.iter() {
            let slice: &[u8] = match elem {
                Element::ZeroPrefix { len } => &ZERO_PREFIX[..*len],
                Element::Inline { start, len, .. } => &self.inline_buf[*start..*start + *len],
                Element::Borrowed(bytes) => bytes,
            };
            total += slice.len();
            slices.push(slice);
        }
        (total, slices)
    }
}
