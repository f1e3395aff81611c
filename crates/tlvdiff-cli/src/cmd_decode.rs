/// Implementation of `tlvdiff decode`.
///
/// Parses a hex buffer with the bounded grammar, prints the resulting tree,
/// then runs it through one DER round trip.
///
/// # Example output
///
/// ```text
/// consumed: 9 of 9 bytes
/// [PRIVATE 1] (3)
///   [0] 11
///   [APPLICATION 1]
///   [2] (0)
/// encoding: e1078001114100a200
/// round trip: stable
/// ```
use std::io::{self, Write};

use anyhow::{Context, Result};
use tlvdiff_codec::CanonicalCodec;
use tlvdiff_decoder::{DecodeLimits, TlvDecoder};
use tlvdiff_harness::{Outcome, round_trip};
use tlvdiff_wire::hex::{from_hex, to_hex};

use crate::{DecodeArgs, outcome_exit_code, reference_codec};

/// Run the `tlvdiff decode` command.
///
/// # Errors
///
/// Returns an error if the argument is not valid hex, the bytes do not
/// decode, or stdout cannot be written.
pub fn run(args: &DecodeArgs) -> Result<i32> {
    let bytes = from_hex(&args.hex).context("invalid hex input")?;
    let limits = args.max_depth.map_or_else(
        || DecodeLimits::for_buffer_len(bytes.len()),
        |max_depth| DecodeLimits { max_depth },
    );

    let (node, used) = TlvDecoder::new(limits)
        .decode_bytes(&bytes)
        .with_context(|| format!("cannot decode {}", to_hex(&bytes)))?;

    let codec = reference_codec(limits.max_depth);
    let first = codec.serialize(&node).context("DER serialization failed")?;

    let mut out = io::stdout().lock();
    writeln!(out, "consumed: {used} of {} bytes", bytes.len())?;
    write!(out, "{}", node.render_tree())?;
    writeln!(out, "encoding: {}", to_hex(&first))?;

    let outcome = round_trip(&codec, &node);
    match &outcome {
        Outcome::Stable { .. } => writeln!(out, "round trip: stable")?,
        Outcome::Diverged { first, second, .. } => {
            writeln!(out, "round trip: diverged")?;
            writeln!(out, "  first:  {}", to_hex(first))?;
            writeln!(out, "  second: {}", to_hex(second))?;
        }
        Outcome::CodecFailed { stage, error } => {
            writeln!(out, "round trip: {stage} failed: {error}")?;
        }
        Outcome::LocalDecodeFailed(error) => writeln!(out, "round trip: {error}")?,
    }
    Ok(outcome_exit_code(&outcome))
}
