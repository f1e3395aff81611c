/// tlvdiff: differential round-trip fuzzer for TLV codecs.
///
/// # Command overview
///
/// ```text
/// tlvdiff <COMMAND> [OPTIONS]
///
/// Commands:
///   run      Fuzz the DER codec with random grammar trees
///   replay   Re-run a single iteration from its replay seed
///   decode   Decode a hex buffer with the bounded grammar
///   help     Print help information
///
/// Global options:
///   -v, --verbose    Raise log level (-v info, -vv debug)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                        |
/// |------|------------------------------------------------|
/// | 0    | Success; no divergence observed                |
/// | 1    | Error (I/O failure, bad hex, invalid input)    |
/// | 2    | At least one round-trip divergence was found   |
///
/// The report goes to stdout (or `--output`); logs and errors go to stderr.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tlvdiff_codec::DerCodec;
use tlvdiff_codec::der::DEFAULT_MAX_DEPTH;
use tlvdiff_harness::Outcome;
use tracing_subscriber::EnvFilter;

mod cmd_decode;
mod cmd_replay;
mod cmd_run;

/// Exit code for a completed run that found a divergence.
pub const EXIT_DIVERGED: i32 = 2;

/// The DER codec every subcommand round-trips through.
///
/// Its nesting limit is never below `decode_depth`, so any tree the bounded
/// grammar accepts can be decoded again by the codec.
pub fn reference_codec(decode_depth: usize) -> DerCodec {
    DerCodec::new().with_max_depth(decode_depth.max(DEFAULT_MAX_DEPTH))
}

/// Exit code for a single round trip.
///
/// A buffer the grammar rejects is not a failure; a codec refusing a tree
/// is.
pub fn outcome_exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Stable { .. } | Outcome::LocalDecodeFailed(_) => 0,
        Outcome::Diverged { .. } => EXIT_DIVERGED,
        Outcome::CodecFailed { .. } => 1,
    }
}

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Differential round-trip fuzzer for tag/length/value codecs.
#[derive(Parser)]
#[command(name = "tlvdiff", version, about = "Differential TLV round-trip fuzzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise the log level. Repeat for more detail. `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Fuzz the DER codec with random bounded-grammar trees.
    Run(RunArgs),
    /// Re-run one iteration from its replay seed.
    Replay(ReplayArgs),
    /// Decode a hex buffer with the bounded grammar and round-trip it.
    Decode(DecodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `tlvdiff run`.
///
/// ```text
/// ┌──────────────────────┬──────────────────────────────────────────────┐
/// │ Flag                 │ Effect                                       │
/// ├──────────────────────┼──────────────────────────────────────────────┤
/// │ --seed N             │ Generator seed, decimal or 0x-hex (10819)    │
/// │ --iterations N       │ Number of iterations (5000)                  │
/// │ --buffer-len N       │ Random bytes per iteration (64)              │
/// │ --max-depth N        │ Decode nesting limit (buffer-len / 2)        │
/// │ -o / --output        │ Write the report to a file                   │
/// │ --summary-json PATH  │ Also write the run summary as JSON           │
/// │ --stop-on-divergence │ End the run at the first divergence          │
/// └──────────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct RunArgs {
    #[arg(long, default_value_t = tlvdiff_harness::config::DEFAULT_SEED, value_parser = parse_seed)]
    pub seed: u64,

    #[arg(long, default_value_t = tlvdiff_harness::config::DEFAULT_ITERATIONS)]
    pub iterations: usize,

    #[arg(long, default_value_t = tlvdiff_harness::config::DEFAULT_BUFFER_LEN)]
    pub buffer_len: usize,

    /// Override the derived decode nesting limit.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON summary of the run to this file.
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    #[arg(long)]
    pub stop_on_divergence: bool,
}

/// Arguments for `tlvdiff replay`.
///
/// The seed is the replay seed printed in a report's `# divergence` line.
/// `--buffer-len` and `--max-depth` must match the original run.
#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Replay seed, decimal or 0x-hex.
    #[arg(long, value_parser = parse_seed)]
    pub seed: u64,

    #[arg(long, default_value_t = tlvdiff_harness::config::DEFAULT_BUFFER_LEN)]
    pub buffer_len: usize,

    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for `tlvdiff decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Input bytes as hex. Whitespace and a `0x` prefix are ignored.
    pub hex: String,

    /// Override the decode nesting limit (default: input length / 2).
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Accept `10819` as well as `0x2a43`.
fn parse_seed(input: &str) -> Result<u64, String> {
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(&digits.replace('_', ""), 16),
        None => input.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid seed {input:?}: {e}"))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run::run(&args),
        Commands::Replay(args) => cmd_replay::run(&args),
        Commands::Decode(args) => cmd_decode::run(&args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
