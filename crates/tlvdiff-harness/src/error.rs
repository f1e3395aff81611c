/// Errors that abort a harness run.
///
/// Decode and codec failures are per-iteration outcomes, not errors; the
/// only thing that can stop a run is the report sink refusing writes.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
