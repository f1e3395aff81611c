#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod hex;

pub use cursor::BoundedCursor;
pub use error::WireError;
