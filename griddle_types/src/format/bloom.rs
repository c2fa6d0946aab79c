const N_WORDS_BITS: u32 = 27;

/// The first word of a table region: `shift << 27 | n_words`.
///
/// The builder only ever emits the empty filter (`shift=5, n_words=0`).
/// Readers must treat the filter as an optional fast-reject and never rely
/// on it for correctness.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BloomHeader {
    shift: u32,
    n_words: u32,
}

impl BloomHeader {
    pub const EMPTY: BloomHeader = BloomHeader {
        shift: 5,
        n_words: 0,
    };

    pub fn new(shift: u32, n_words: u32) -> Self {
        assert!(n_words < (1 << N_WORDS_BITS), "bloom word count {n_words}");
        assert!(shift < (1 << (32 - N_WORDS_BITS)), "bloom shift {shift}");
        Self { shift, n_words }
    }

    pub fn n_words(&self) -> u32 {
        self.n_words
    }

    pub fn word(&self) -> u32 {
        self.shift << N_WORDS_BITS | self.n_words
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        self.word().to_le_bytes()
    }

    pub fn from_word(word: u32) -> Self {
        Self {
            shift: word >> N_WORDS_BITS,
            n_words: word & ((1 << N_WORDS_BITS) - 1),
        }
    }
}
