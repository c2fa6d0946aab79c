use std::mem;

/// Handle to one reserved offset table within an [`Assembler`].
///
/// [`Assembler`]: crate::assemble::Assembler
#[derive(Clone, Copy, Debug)]
pub struct OffsetTableKey(pub(crate) usize);

type WriteFn = fn(&mut [u8], u64);

fn write_u8(dest: &mut [u8], value: u64) {
    dest.copy_from_slice(&(value as u8).to_le_bytes());
}
fn write_u16(dest: &mut [u8], value: u64) {
    dest.copy_from_slice(&(value as u16).to_le_bytes());
}
fn write_u32(dest: &mut [u8], value: u64) {
    dest.copy_from_slice(&(value as u32).to_le_bytes());
}
fn write_u64(dest: &mut [u8], value: u64) {
    dest.copy_from_slice(&value.to_le_bytes());
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum State {
    Reserved,
    Filling,
    Committed,
}

/// Scratch space for offsets whose values are only known after later
/// fragments have been appended. Reserved with a fixed slot count and slot
/// width, filled in any order, then committed into the main output once.
pub(crate) struct OffsetTable {
    width: usize,
    scratch: Vec<u8>,
    write_fn: WriteFn,
    state: State,
}

impl OffsetTable {
    pub(crate) fn reserve(count: usize, width: usize) -> Self {
        // The write routine is fixed at reservation time.
        let write_fn: WriteFn = match width {
            1 => write_u8,
            2 => write_u16,
            4 => write_u32,
            8 => write_u64,
            _ => panic!("unsupported offset width {width}"),
        };
        Self {
            width,
            scratch: vec![0u8; count * width],
            write_fn,
            state: State::Reserved,
        }
    }

    pub(crate) fn write(&mut self, index: usize, value: u64) {
        match self.state {
            State::Reserved => self.state = State::Filling,
            State::Filling => (),
            State::Committed => panic!("write into a committed offset table"),
        }
        if self.width < mem::size_of::<u64>() {
            let limit = 1u64 << (8 * self.width as u32);
            assert!(
                value < limit,
                "offset value {value} does not fit width {}",
                self.width
            );
        }
        let at = index * self.width;
        (self.write_fn)(&mut self.scratch[at..at + self.width], value);
    }

    /// Takes the filled bytes, freeing the scratch.
    pub(crate) fn commit(&mut self) -> Vec<u8> {
        assert!(
            self.state != State::Committed,
            "offset table committed twice"
        );
        self.state = State::Committed;
        mem::take(&mut self.scratch)
    }

    pub(crate) fn is_committed(&self) -> bool {
        self.state == State::Committed
    }
}
