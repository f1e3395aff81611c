/// Replacement for a zero seed. All-zero is a fixed point of xorshift.
pub const ZERO_SEED_REPLACEMENT: u64 = 0xDEAD_BEEF;

/// Deterministic xorshift64 stream.
///
/// Each draw applies `s ^= s << 13; s ^= s >> 7; s ^= s << 17` and returns
/// the new state. The same seed always yields the same sequence, which is
/// what makes every fuzz input reproducible from a single number.
///
/// The current [`state`](Self::state) is itself a valid seed: a generator
/// created from it continues the stream exactly where this one is. The
/// harness records it before each iteration as that iteration's replay
/// seed.
///
/// Not cryptographically strong; it only needs to reach parser branches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededGenerator {
    state: u64,
}

impl SeededGenerator {
    /// Create a generator. A zero seed is replaced by
    /// [`ZERO_SEED_REPLACEMENT`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    /// Current internal state.
    #[must_use]
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance and return the next 64-bit word.
    pub fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        s
    }

    /// Draw one byte in `0..=255`.
    ///
    /// Consumes a full 64-bit draw and keeps its low eight bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_byte(&mut self) -> u8 {
        (self.next_u64() & 0xFF) as u8
    }

    /// Draw `len` bytes, one draw per byte.
    pub fn fill_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }
}

/// Endless stream of 64-bit words.
impl Iterator for SeededGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}
