#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod generator;
pub mod harness;
pub mod record;
pub mod report;
pub mod stop;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use generator::SeededGenerator;
pub use harness::{RoundTripHarness, round_trip};
pub use record::{CodecStage, IterationRecord, Outcome};
pub use report::{DivergentCase, RunSummary};
pub use stop::StopSignal;
