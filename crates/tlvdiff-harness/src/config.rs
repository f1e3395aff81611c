use tlvdiff_decoder::DecodeLimits;

/// Seed used by the reference run.
pub const DEFAULT_SEED: u64 = 10_819;

/// Iterations in the reference run.
pub const DEFAULT_ITERATIONS: usize = 5000;

/// Size of each random input buffer.
pub const DEFAULT_BUFFER_LEN: usize = 64;

/// Configuration for a [`RoundTripHarness`](crate::RoundTripHarness) run.
///
/// ```text
/// ┌────────────────────┬──────────┬──────────────────────────────────────┐
/// │ Field              │ Default  │ Purpose                              │
/// ├────────────────────┼──────────┼──────────────────────────────────────┤
/// │ seed               │ 10819    │ Generator seed (0 is remapped)       │
/// │ iterations         │ 5000     │ Number of fuzz iterations            │
/// │ buffer_len         │ 64       │ Bytes of random input per iteration  │
/// │ max_depth          │ None     │ Decode depth limit; None = derived   │
/// │ stop_on_divergence │ false    │ End the run at the first divergence  │
/// └────────────────────┴──────────┴──────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    pub seed: u64,
    pub iterations: usize,
    pub buffer_len: usize,

    /// Override for the decoder's nesting limit. When `None` the limit is
    /// derived from `buffer_len` via [`DecodeLimits::for_buffer_len`].
    pub max_depth: Option<usize>,

    pub stop_on_divergence: bool,
}

impl Default for HarnessConfig {
    /// The reference run: seed 10819, 5000 iterations of 64 bytes.
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            iterations: DEFAULT_ITERATIONS,
            buffer_len: DEFAULT_BUFFER_LEN,
            max_depth: None,
            stop_on_divergence: false,
        }
    }
}

impl HarnessConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_buffer_len(mut self, buffer_len: usize) -> Self {
        self.buffer_len = buffer_len;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn stop_on_divergence(mut self, stop: bool) -> Self {
        self.stop_on_divergence = stop;
        self
    }

    /// Decoder limits implied by this configuration.
    #[must_use]
    pub fn decode_limits(&self) -> DecodeLimits {
        match self.max_depth {
            Some(max_depth) => DecodeLimits { max_depth },
            None => DecodeLimits::for_buffer_len(self.buffer_len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let config = HarnessConfig::default();
        assert_eq!(config.seed, 10_819);
        assert_eq!(config.iterations, 5000);
        assert_eq!(config.buffer_len, 64);
        assert!(!config.stop_on_divergence);
        assert_eq!(config.decode_limits().max_depth, 32);
    }

    #[test]
    fn builder_overrides() {
        let config = HarnessConfig::default()
            .with_seed(1)
            .with_iterations(10)
            .with_buffer_len(16)
            .stop_on_divergence(true);
        assert_eq!(config.seed, 1);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.decode_limits().max_depth, 8);
        assert!(config.stop_on_divergence);

        assert_eq!(config.with_max_depth(3).decode_limits().max_depth, 3);
    }
}
