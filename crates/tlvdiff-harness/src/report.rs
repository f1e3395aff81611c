use std::collections::BTreeMap;
use std::io::{self, Write};

use tlvdiff_decoder::DecodeErrorKind;
use tlvdiff_wire::hex::to_hex;

use crate::record::{IterationRecord, Outcome};

/// A divergent iteration, kept for the summary block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivergentCase {
    pub index: usize,
    pub replay_seed: u64,
    pub first: Vec<u8>,
    pub second: Vec<u8>,
}

/// Aggregate counts for a run.
///
/// Built up one [`IterationRecord`] at a time via [`RunSummary::record`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: usize,
    pub stable: usize,
    pub decode_failures: BTreeMap<DecodeErrorKind, usize>,
    pub codec_failures: usize,
    pub divergences: Vec<DivergentCase>,

    /// True when a stop signal or `stop_on_divergence` ended the run
    /// before the configured iteration count.
    pub stopped_early: bool,
}

impl RunSummary {
    /// Fold one iteration into the totals.
    pub fn record(&mut self, record: &IterationRecord) {
        self.iterations += 1;
        match &record.outcome {
            Outcome::Stable { .. } => self.stable += 1,
            Outcome::Diverged { first, second, .. } => self.divergences.push(DivergentCase {
                index: record.index,
                replay_seed: record.replay_seed,
                first: first.clone(),
                second: second.clone(),
            }),
            Outcome::LocalDecodeFailed(error) => {
                *self.decode_failures.entry(error.kind()).or_insert(0) += 1;
            }
            Outcome::CodecFailed { .. } => self.codec_failures += 1,
        }
    }

    #[must_use]
    pub fn diverged(&self) -> usize {
        self.divergences.len()
    }

    /// Total iterations whose buffer did not decode.
    #[must_use]
    pub fn decode_failed(&self) -> usize {
        self.decode_failures.values().sum()
    }

    /// No divergence observed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.divergences.is_empty()
    }

    /// Write the `#`-prefixed summary block that ends a report.
    ///
    /// Failure kinds that never occurred are omitted.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `sink`.
    pub fn write_report<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        writeln!(sink, "# iterations: {}", self.iterations)?;
        writeln!(sink, "# stable: {}", self.stable)?;
        writeln!(sink, "# diverged: {}", self.diverged())?;
        for kind in DecodeErrorKind::ALL {
            if let Some(count) = self.decode_failures.get(&kind) {
                writeln!(sink, "# decode failed ({}): {count}", kind.label())?;
            }
        }
        writeln!(sink, "# codec failed: {}", self.codec_failures)?;
        if self.stopped_early {
            writeln!(sink, "# stopped early")?;
        }
        for case in &self.divergences {
            writeln!(
                sink,
                "# divergence: iteration {} replay seed {:#018x} first {} second {}",
                case.index,
                case.replay_seed,
                to_hex(&case.first),
                to_hex(&case.second),
            )?;
        }
        Ok(())
    }
}
