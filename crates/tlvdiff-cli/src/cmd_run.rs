/// Implementation of `tlvdiff run`.
///
/// Drives [`RoundTripHarness`] with the strict [`DerCodec`] and streams the
/// report to stdout or `--output`. Ctrl-C raises a [`StopSignal`]: the
/// current iteration finishes, the summary block is still written, and the
/// run reports as stopped early.
///
/// # Example output
///
/// ```text
/// d7a28fa6…10ee == [PRIVATE 23](8fa6)
/// 270737a3…adf2 insufficient data for primitive payload at offset 63 (needed 5 bytes)
/// …
/// # iterations: 5000
/// # stable: 4504
/// # diverged: 0
/// # decode failed (invalid universal tag): 353
/// # codec failed: 0
/// ```
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tlvdiff_harness::{HarnessConfig, RoundTripHarness, RunSummary, StopSignal};
use tlvdiff_wire::hex::to_hex;

use crate::{EXIT_DIVERGED, RunArgs, reference_codec};

/// Run the `tlvdiff run` command.
///
/// Returns the process exit code from [`exit_code`].
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed, or the report
/// or JSON summary cannot be written.
pub fn run(args: &RunArgs) -> Result<i32> {
    let config = HarnessConfig {
        seed: args.seed,
        iterations: args.iterations,
        buffer_len: args.buffer_len,
        max_depth: args.max_depth,
        stop_on_divergence: args.stop_on_divergence,
    };

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.raise())
        .context("cannot install Ctrl-C handler")?;

    let codec = reference_codec(config.decode_limits().max_depth);
    let mut harness = RoundTripHarness::new(config, codec);
    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut sink = BufWriter::new(file);
            harness
                .run_with_stop(&mut sink, &stop)
                .with_context(|| format!("failed writing report to {}", path.display()))?
        }
        None => {
            let mut sink = BufWriter::new(io::stdout().lock());
            harness
                .run_with_stop(&mut sink, &stop)
                .context("failed writing report to stdout")?
        }
    };

    if let Some(path) = &args.summary_json {
        write_summary_json(path, harness.config(), &summary)?;
    }

    if summary.stopped_early {
        eprintln!("stopped early after {} iterations", summary.iterations);
    }

    if !summary.is_clean() {
        eprintln!(
            "{} divergence(s) in {} iterations",
            summary.diverged(),
            summary.iterations
        );
    }
    Ok(exit_code(&summary))
}

/// 0 when the run saw no divergence, [`EXIT_DIVERGED`] otherwise.
///
/// Decode and codec failures do not change the code.
pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.is_clean() { 0 } else { EXIT_DIVERGED }
}

// ── JSON summary ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SummaryJson {
    seed: u64,
    buffer_len: usize,
    iterations: usize,
    stable: usize,
    diverged: usize,
    decode_failures: BTreeMap<&'static str, usize>,
    codec_failures: usize,
    stopped_early: bool,
    divergences: Vec<DivergenceJson>,
}

#[derive(Serialize)]
struct DivergenceJson {
    iteration: usize,
    replay_seed: u64,
    first: String,
    second: String,
}

fn summary_json(config: &HarnessConfig, summary: &RunSummary) -> SummaryJson {
    SummaryJson {
        seed: config.seed,
        buffer_len: config.buffer_len,
        iterations: summary.iterations,
        stable: summary.stable,
        diverged: summary.diverged(),
        decode_failures: summary
            .decode_failures
            .iter()
            .map(|(kind, count)| (kind.label(), *count))
            .collect(),
        codec_failures: summary.codec_failures,
        stopped_early: summary.stopped_early,
        divergences: summary
            .divergences
            .iter()
            .map(|case| DivergenceJson {
                iteration: case.index,
                replay_seed: case.replay_seed,
                first: to_hex(&case.first),
                second: to_hex(&case.second),
            })
            .collect(),
    }
}

fn write_summary_json(path: &Path, config: &HarnessConfig, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &summary_json(config, summary))
        .context("failed to serialize run summary")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
