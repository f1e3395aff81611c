#![warn(clippy::pedantic)]

pub mod codec;
pub mod der;
pub mod error;
pub mod writer;

pub use codec::CanonicalCodec;
pub use der::DerCodec;
pub use error::CodecError;
pub use writer::TlvWriter;
