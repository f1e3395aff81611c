/// Errors produced by the bounded-grammar decoder.
///
/// Every variant means "this input did not parse". None of them is fatal
/// to a fuzz run; the harness records the message and moves on.
///
/// ```text
///   DecodeError
///   ├── InsufficientTag       ← no byte left for the identifier
///   ├── InvalidUniversalTag   ← universal class, unknown number
///   ├── InsufficientLength    ← no byte left for the length
///   ├── InsufficientPayload   ← primitive payload runs past the end
///   └── DepthExceeded         ← nesting deeper than the configured limit
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("insufficient data for tag at offset {offset}")]
    InsufficientTag { offset: usize },

    #[error("invalid universal tag {code} at offset {offset}")]
    InvalidUniversalTag { code: u8, offset: usize },

    #[error("insufficient data for length at offset {offset}")]
    InsufficientLength { offset: usize },

    #[error("insufficient data for primitive payload at offset {offset} (needed {needed} bytes)")]
    InsufficientPayload { offset: usize, needed: usize },

    #[error("nesting exceeds depth limit {limit}")]
    DepthExceeded { limit: usize },
}

/// Offset-free classification of a [`DecodeError`], for counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecodeErrorKind {
    InsufficientTag,
    InvalidUniversalTag,
    InsufficientLength,
    InsufficientPayload,
    DepthExceeded,
}

impl DecodeErrorKind {
    pub const ALL: [Self; 5] = [
        Self::InsufficientTag,
        Self::InvalidUniversalTag,
        Self::InsufficientLength,
        Self::InsufficientPayload,
        Self::DepthExceeded,
    ];

    /// Short human label, as used in run summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::InsufficientTag => "insufficient data for tag",
            Self::InvalidUniversalTag => "invalid universal tag",
            Self::InsufficientLength => "insufficient data for length",
            Self::InsufficientPayload => "insufficient data for primitive payload",
            Self::DepthExceeded => "depth limit exceeded",
        }
    }
}

impl DecodeError {
    #[must_use]
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::InsufficientTag { .. } => DecodeErrorKind::InsufficientTag,
            Self::InvalidUniversalTag { .. } => DecodeErrorKind::InvalidUniversalTag,
            Self::InsufficientLength { .. } => DecodeErrorKind::InsufficientLength,
            Self::InsufficientPayload { .. } => DecodeErrorKind::InsufficientPayload,
            Self::DepthExceeded { .. } => DecodeErrorKind::DepthExceeded,
        }
    }
}
