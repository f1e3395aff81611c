/// Low-level read failures shared by every crate that walks raw bytes.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A read of `needed` bytes starting at `offset` ran past the end of
    /// the buffer.
    #[error("unexpected end of input at offset {offset} (needed {needed} bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// A hex string could not be turned into bytes.
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] ::hex::FromHexError),
}

// The offset carried by UnexpectedEof is always the cursor position at
// the time of the failed read, not the buffer length. That is what you
// want when staring at a hex dump trying to find the bad byte.
