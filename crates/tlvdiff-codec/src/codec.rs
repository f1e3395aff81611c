use tlvdiff_types::TlvNode;

use crate::error::CodecError;

/// The canonical encoder/decoder pair the harness checks against.
///
/// The harness treats the codec as opaque: it only ever calls these two
/// operations and compares the bytes that come out.
///
/// ```text
///   node ──serialize──▶ first ──decode──▶ node' ──serialize──▶ second
///                                                   first == second ?
/// ```
pub trait CanonicalCodec {
    /// Produce the canonical encoding of `node`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the codec cannot represent the node.
    fn serialize(&self, node: &TlvNode) -> Result<Vec<u8>, CodecError>;

    /// Parse exactly one node occupying all of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if `bytes` is not a canonical encoding.
    fn decode(&self, bytes: &[u8]) -> Result<TlvNode, CodecError>;
}

impl<C: CanonicalCodec + ?Sized> CanonicalCodec for &C {
    fn serialize(&self, node: &TlvNode) -> Result<Vec<u8>, CodecError> {
        (**self).serialize(node)
    }

    fn decode(&self, bytes: &[u8]) -> Result<TlvNode, CodecError> {
        (**self).decode(bytes)
    }
}

impl<C: CanonicalCodec + ?Sized> CanonicalCodec for Box<C> {
    fn serialize(&self, node: &TlvNode) -> Result<Vec<u8>, CodecError> {
        (**self).serialize(node)
    }

    fn decode(&self, bytes: &[u8]) -> Result<TlvNode, CodecError> {
        (**self).decode(bytes)
    }
}
