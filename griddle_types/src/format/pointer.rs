use std::mem;

/// An absolute `[start, end)` byte range within the final file.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Pointer {
    pub start: u32,
    pub end: u32,
}

impl Pointer {
    /// `(0, 0)` means "absent". The file header occupies byte 0, so no
    /// content chunk can genuinely start there.
    pub const NULL: Pointer = Pointer { start: 0, end: 0 };

    pub fn new(start: u32, end: u32) -> Self {
        assert!(start <= end, "inverted pointer {start}..{end}");
        Self { start, end }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    pub fn size(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn to_le_bytes(self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&self.start.to_le_bytes());
        buf[4..].copy_from_slice(&self.end.to_le_bytes());
        buf
    }

    pub fn from_le_bytes(buf: [u8; 8]) -> Self {
        let start = u32::from_le_bytes(buf[..4].try_into().unwrap());
        let end = u32::from_le_bytes(buf[4..].try_into().unwrap());
        Self::new(start, end)
    }
}

const _: () = assert!(mem::size_of::<Pointer>() == 8);
