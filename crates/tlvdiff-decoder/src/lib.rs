#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;

pub use decoder::{DecodeLimits, TlvDecoder};
pub use error::{DecodeError, DecodeErrorKind};
