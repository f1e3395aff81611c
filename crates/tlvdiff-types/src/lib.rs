#![warn(clippy::pedantic)]

pub mod error;
pub mod node;
pub mod tag;

pub use error::TypeError;
pub use node::{Payload, TlvNode};
pub use tag::{Identifier, Tag, TagClass, UniversalTag};
