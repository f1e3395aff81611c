use std::io::Write;

use tlvdiff_codec::{CanonicalCodec, CodecError};
use tlvdiff_decoder::TlvDecoder;
use tlvdiff_types::TlvNode;
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::generator::SeededGenerator;
use crate::record::{CodecStage, IterationRecord, Outcome};
use crate::report::RunSummary;
use crate::stop::StopSignal;

/// Differential round-trip driver.
///
/// Each iteration draws `buffer_len` random bytes, decodes them with the
/// bounded grammar and, if that yields a tree, pushes the tree through the
/// codec under test:
///
/// ```text
///   random bytes ──▶ TlvDecoder ──▶ node
///                                    │
///        first  = codec.serialize(node)
///        decoded = codec.decode(first)
///        second = codec.serialize(decoded)
///                                    │
///               first == second ? Stable : Diverged
/// ```
///
/// Iterations run strictly in order; the generator is owned by the harness
/// and every draw advances it, so a run is fully determined by its config.
pub struct RoundTripHarness<C> {
    config: HarnessConfig,
    codec: C,
    decoder: TlvDecoder,
    generator: SeededGenerator,
    next_index: usize,
}

impl<C: CanonicalCodec> RoundTripHarness<C> {
    #[must_use]
    pub fn new(config: HarnessConfig, codec: C) -> Self {
        let decoder = TlvDecoder::new(config.decode_limits());
        let generator = SeededGenerator::new(config.seed);
        Self {
            config,
            codec,
            decoder,
            generator,
            next_index: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Reproduce one iteration from its replay seed.
    ///
    /// The returned record is iteration 0 of a run seeded with
    /// `replay_seed`, which draws the same input as the original.
    pub fn replay(config: &HarnessConfig, codec: C, replay_seed: u64) -> IterationRecord {
        let config = config.clone().with_seed(replay_seed);
        Self::new(config, codec).iterate()
    }

    /// Run a single iteration.
    pub fn iterate(&mut self) -> IterationRecord {
        let index = self.next_index;
        self.next_index += 1;

        let replay_seed = self.generator.state();
        let input = self.generator.fill_bytes(self.config.buffer_len);
        let outcome = match self.decoder.decode_bytes(&input) {
            Ok((node, _)) => round_trip(&self.codec, &node),
            Err(error) => Outcome::LocalDecodeFailed(error),
        };

        match &outcome {
            Outcome::Diverged { summary, .. } => {
                warn!(index, replay_seed, %summary, "round trip diverged");
            }
            Outcome::CodecFailed { stage, error } => {
                debug!(index, %stage, %error, "codec failed");
            }
            Outcome::LocalDecodeFailed(error) => debug!(index, %error, "input rejected"),
            Outcome::Stable { summary } => debug!(index, %summary, "stable"),
        }

        IterationRecord {
            index,
            replay_seed,
            input,
            outcome,
        }
    }

    /// Run all configured iterations, writing the report to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the sink rejects a write. Decode and
    /// codec failures never end the run.
    pub fn run<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<RunSummary, HarnessError> {
        self.run_with_stop(sink, &StopSignal::new())
    }

    /// Like [`run`](Self::run), but checks `stop` between iterations and
    /// ends early once it is raised.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the sink rejects a write.
    pub fn run_with_stop<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
        stop: &StopSignal,
    ) -> Result<RunSummary, HarnessError> {
        info!(
            seed = self.config.seed,
            iterations = self.config.iterations,
            buffer_len = self.config.buffer_len,
            max_depth = self.decoder.limits().max_depth,
            "starting run"
        );

        let mut summary = RunSummary::default();
        for done in 0..self.config.iterations {
            if stop.is_raised() {
                info!(completed = done, "stop requested");
                summary.stopped_early = true;
                break;
            }

            let record = self.iterate();
            record.write_report(sink)?;
            summary.record(&record);

            let last = done + 1 == self.config.iterations;
            if self.config.stop_on_divergence && record.outcome.is_divergence() && !last {
                summary.stopped_early = true;
                break;
            }
        }

        summary.write_report(sink)?;
        sink.flush()?;

        info!(
            iterations = summary.iterations,
            stable = summary.stable,
            diverged = summary.diverged(),
            decode_failed = summary.decode_failed(),
            codec_failed = summary.codec_failures,
            "run finished"
        );
        Ok(summary)
    }
}

/// Serialize, decode and re-serialize `node`, then compare the encodings.
///
/// `summary` in the outcome describes the tree the codec decoded, which is
/// what a reader wants to see when the two encodings disagree.
pub fn round_trip<C: CanonicalCodec + ?Sized>(codec: &C, node: &TlvNode) -> Outcome {
    let failed = |stage, error: CodecError| Outcome::CodecFailed {
        stage,
        error: error.to_string(),
    };

    let first = match codec.serialize(node) {
        Ok(bytes) => bytes,
        Err(e) => return failed(CodecStage::Serialize, e),
    };
    let decoded = match codec.decode(&first) {
        Ok(decoded) => decoded,
        Err(e) => return failed(CodecStage::Decode, e),
    };
    let second = match codec.serialize(&decoded) {
        Ok(bytes) => bytes,
        Err(e) => return failed(CodecStage::Reserialize, e),
    };

    let summary = decoded.to_string();
    if first == second {
        Outcome::Stable { summary }
    } else {
        Outcome::Diverged {
            summary,
            first,
            second,
        }
    }
}
