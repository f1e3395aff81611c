/// Implementation of `tlvdiff replay`.
///
/// Rebuilds the single iteration a replay seed identifies and prints its
/// report lines, followed by the decoded tree and both encodings when the
/// input decoded.
use std::io::{self, Write};

use anyhow::{Context, Result};
use tlvdiff_codec::CanonicalCodec;
use tlvdiff_decoder::TlvDecoder;
use tlvdiff_harness::{HarnessConfig, RoundTripHarness};
use tlvdiff_wire::hex::to_hex;

use crate::{ReplayArgs, outcome_exit_code, reference_codec};

/// Run the `tlvdiff replay` command.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run(args: &ReplayArgs) -> Result<i32> {
    let config = HarnessConfig {
        buffer_len: args.buffer_len,
        max_depth: args.max_depth,
        ..HarnessConfig::default()
    };
    let limits = config.decode_limits();
    let codec = reference_codec(limits.max_depth);
    let record = RoundTripHarness::replay(&config, codec, args.seed);

    let mut out = io::stdout().lock();
    writeln!(out, "replay seed: {:#018x}", record.replay_seed)?;
    record
        .write_report(&mut out)
        .context("failed writing to stdout")?;

    if let Ok((node, used)) = TlvDecoder::new(limits).decode_bytes(&record.input) {
        writeln!(out, "consumed: {used} of {} bytes", record.input.len())?;
        writeln!(out, "tree:")?;
        write!(out, "{}", node.render_tree())?;
        if let Ok(first) = codec.serialize(&node) {
            writeln!(out, "encoding: {}", to_hex(&first))?;
        }
    }

    Ok(outcome_exit_code(&record.outcome))
}
