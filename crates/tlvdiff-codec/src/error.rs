use tlvdiff_types::TypeError;
use tlvdiff_wire::WireError;

/// Errors raised by a [`CanonicalCodec`](crate::CanonicalCodec).
///
/// Offsets are absolute positions in the buffer handed to `decode`.
///
/// ```text
///   CodecError
///   ├── IndefiniteLength   ← 0x80 length octet (BER only, not canonical)
///   ├── ReservedLength     ← 0xFF length octet
///   ├── NonMinimalLength   ← long form where short form fits, or leading zero
///   ├── LengthOverflow     ← length does not fit in usize
///   ├── NonMinimalTag      ← high-tag-number form where low form fits
///   ├── TagNumberTooLarge  ← tag number above 255
///   ├── TrailingData       ← bytes after the top-level element
///   ├── DepthExceeded      ← nesting deeper than the codec's limit
///   ├── Type(TypeError)    ← unknown universal tag
///   └── Wire(WireError)    ← truncated identifier, length or content
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("indefinite length at offset {offset} is not canonical")]
    IndefiniteLength { offset: usize },

    #[error("reserved length octet 0xFF at offset {offset}")]
    ReservedLength { offset: usize },

    #[error("non-minimal length encoding at offset {offset}")]
    NonMinimalLength { offset: usize },

    #[error("length at offset {offset} does not fit in memory ({octets} octets)")]
    LengthOverflow { offset: usize, octets: usize },

    #[error("non-minimal tag number encoding at offset {offset}")]
    NonMinimalTag { offset: usize },

    #[error("tag number at offset {offset} exceeds 255")]
    TagNumberTooLarge { offset: usize },

    #[error("unexpected data after top-level element ({extra_bytes} bytes)")]
    TrailingData { extra_bytes: usize },

    #[error("nesting exceeds depth limit {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Wire(#[from] WireError),
}
