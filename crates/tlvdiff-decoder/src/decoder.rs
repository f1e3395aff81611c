use tlvdiff_types::{Identifier, TlvNode, TypeError};
use tlvdiff_wire::BoundedCursor;

use crate::error::DecodeError;

/// Low three bits of the length byte: primitive payload size (0..=7).
const PAYLOAD_LEN_MASK: u8 = 0b0000_0111;

/// Low two bits of the length byte: constructed child count (0..=3).
const CHILD_COUNT_MASK: u8 = 0b0000_0011;

/// Resource limits applied while decoding.
///
/// Every level of the grammar consumes at least two header bytes, so a
/// buffer of `n` bytes can never legitimately nest deeper than `n / 2`.
/// [`DecodeLimits::for_buffer_len`] derives exactly that bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum nesting depth, counting the outermost node as depth 1.
    pub max_depth: usize,
}

impl DecodeLimits {
    /// Limits sized for a buffer of `len` bytes.
    #[must_use]
    pub fn for_buffer_len(len: usize) -> Self {
        Self {
            max_depth: (len / 2).max(1),
        }
    }
}

impl Default for DecodeLimits {
    /// Sized for the default 64-byte fuzz buffer.
    fn default() -> Self {
        Self::for_buffer_len(64)
    }
}

/// Recursive-descent decoder for the bounded tag/length grammar.
///
/// This is not a BER parser. The length byte never encodes an arbitrary
/// length; only its low bits are used:
///
/// ```text
/// ┌───────────┬──────────────────────┬─────────────────────────────┐
/// │ Bit 5 (C) │ Length byte bits     │ Meaning                     │
/// ├───────────┼──────────────────────┼─────────────────────────────┤
/// │ 0         │ len & 0x07           │ primitive payload, 0..=7 B  │
/// │ 1         │ len & 0x03           │ child count, 0..=3 nodes    │
/// └───────────┴──────────────────────┴─────────────────────────────┘
/// ```
///
/// Every random 64-byte buffer therefore either terminates quickly with a
/// small well-formed tree or fails with one of the [`DecodeError`]
/// variants. All reads go through [`BoundedCursor::scan`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TlvDecoder {
    limits: DecodeLimits,
}

impl TlvDecoder {
    #[must_use]
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    #[must_use]
    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Decode one node starting at the cursor's position.
    ///
    /// On success the cursor sits just past the node. On failure no tree is
    /// returned; the cursor position is unspecified but never past the end.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] variant; see the type's docs.
    pub fn decode(&self, cursor: &mut BoundedCursor<'_>) -> Result<TlvNode, DecodeError> {
        self.decode_at_depth(cursor, 1)
    }

    /// Decode one node from the start of `bytes`.
    ///
    /// Returns the node and the number of bytes it occupied. Trailing bytes
    /// are left unread, which is normal for fuzz buffers.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] variant.
    ///
    /// ```
    /// use tlvdiff_decoder::TlvDecoder;
    ///
    /// let (node, used) = TlvDecoder::default().decode_bytes(&[0x00, 0x00, 0xFF]).unwrap();
    /// assert_eq!(used, 2);
    /// assert!(!node.is_constructed());
    /// ```
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<(TlvNode, usize), DecodeError> {
        let mut cursor = BoundedCursor::new(bytes);
        let node = self.decode(&mut cursor)?;
        Ok((node, cursor.position()))
    }

    fn decode_at_depth(
        &self,
        cursor: &mut BoundedCursor<'_>,
        depth: usize,
    ) -> Result<TlvNode, DecodeError> {
        let offset = cursor.position();
        let tag_byte = cursor
            .scan_byte()
            .ok_or(DecodeError::InsufficientTag { offset })?;

        let identifier = Identifier::parse(tag_byte).map_err(|e| match e {
            TypeError::InvalidUniversalTag { code } => {
                DecodeError::InvalidUniversalTag { code, offset }
            }
        })?;

        let offset = cursor.position();
        let length_byte = cursor
            .scan_byte()
            .ok_or(DecodeError::InsufficientLength { offset })?;

        // Checked once the header is in hand: a node that is already
        // truncated reports truncation, not depth.
        if depth > self.limits.max_depth {
            return Err(DecodeError::DepthExceeded {
                limit: self.limits.max_depth,
            });
        }

        if !identifier.constructed {
            let needed = usize::from(length_byte & PAYLOAD_LEN_MASK);
            let offset = cursor.position();
            let value = cursor
                .scan(needed)
                .ok_or(DecodeError::InsufficientPayload { offset, needed })?;
            return Ok(TlvNode::primitive(identifier.tag, value));
        }

        let count = usize::from(length_byte & CHILD_COUNT_MASK);
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(self.decode_at_depth(cursor, depth + 1)?);
        }
        Ok(TlvNode::constructed(identifier.tag, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use proptest::prelude::*;
    use tlvdiff_types::{Payload, Tag, UniversalTag};

    fn decode(bytes: &[u8]) -> Result<(TlvNode, usize), DecodeError> {
        TlvDecoder::default().decode_bytes(bytes)
    }

    #[test]
    fn empty_primitive_consumes_two_bytes() {
        let (node, used) = decode(&[0x00, 0x00]).unwrap();
        assert_eq!(used, 2);
        assert_eq!(node.tag(), Tag::Universal(UniversalTag::EndOfContent));
        assert_eq!(node.payload(), &Payload::Primitive(Vec::new()));
    }

    #[test]
    fn primitive_length_uses_low_three_bits() {
        // 0xFA & 0x07 == 2
        let (node, used) = decode(&[0x02, 0xFA, 0xAB, 0xCD, 0xEE]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(node.payload(), &Payload::Primitive(vec![0xAB, 0xCD]));
    }

    #[test]
    fn constructed_count_uses_low_two_bits() {
        // SEQUENCE, length 0xFD & 0x03 == 1 child
        let (node, used) = decode(&[0x30, 0xFD, 0x05, 0x00]).unwrap();
        assert_eq!(used, 4);
        assert_eq!(node.tag(), Tag::Universal(UniversalTag::Sequence));
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].tag(), Tag::Universal(UniversalTag::Null));
    }

    #[test]
    fn private_constructed_needs_three_children() {
        let input = [
            0xE1, 0x03, // [PRIVATE 1], constructed, 3 children
            0x80, 0x01, 0x11, // [0] 11
            0x41, 0x00, // [APPLICATION 1] empty
            0xA2, 0x00, // [2] constructed, no children
        ];
        let (node, used) = decode(&input).unwrap();
        assert_eq!(used, input.len());
        assert_eq!(node.tag(), Tag::Private(1));
        let tags: Vec<Tag> = node.children().iter().map(TlvNode::tag).collect();
        assert_eq!(
            tags,
            vec![Tag::ContextSpecific(0), Tag::Application(1), Tag::ContextSpecific(2)]
        );
    }

    #[test]
    fn truncated_private_constructed_is_an_error() {
        // Only two of the three promised children are present.
        let input = [0xE1, 0x03, 0x80, 0x01, 0x11, 0x41, 0x00];
        let err = decode(&input).unwrap_err();
        assert_eq!(err, DecodeError::InsufficientTag { offset: 7 });
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            decode(&[]).unwrap_err(),
            DecodeError::InsufficientTag { offset: 0 }
        );
    }

    #[test]
    fn missing_length_byte() {
        assert_eq!(
            decode(&[0x04]).unwrap_err(),
            DecodeError::InsufficientLength { offset: 1 }
        );
    }

    #[test]
    fn short_payload() {
        assert_eq!(
            decode(&[0x04, 0x05, 0x01, 0x02]).unwrap_err(),
            DecodeError::InsufficientPayload {
                offset: 2,
                needed: 5
            }
        );
    }

    #[test]
    fn unknown_universal_tag() {
        assert_eq!(
            decode(&[0x0E, 0x00]).unwrap_err(),
            DecodeError::InvalidUniversalTag { code: 14, offset: 0 }
        );
        // Same number is fine in any other class.
        assert!(decode(&[0x4E, 0x00]).is_ok());
    }

    #[test]
    fn nested_invalid_tag_reports_inner_offset() {
        let err = decode(&[0x30, 0x01, 0x1F, 0x00]).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUniversalTag { code: 31, offset: 2 });
    }

    #[test]
    fn depth_limit_stops_deep_nesting() {
        // A chain of single-child SEQUENCEs, four deep, with a leaf.
        let input = [0x30, 0x01, 0x30, 0x01, 0x30, 0x01, 0x30, 0x01, 0x05, 0x00];
        let shallow = TlvDecoder::new(DecodeLimits { max_depth: 3 });
        assert_eq!(
            shallow.decode_bytes(&input).unwrap_err(),
            DecodeError::DepthExceeded { limit: 3 }
        );

        let deep_enough = TlvDecoder::new(DecodeLimits { max_depth: 5 });
        let (node, _) = deep_enough.decode_bytes(&input).unwrap();
        assert_eq!(node.depth(), 5);
    }

    #[test]
    fn derived_limits() {
        assert_eq!(DecodeLimits::for_buffer_len(64).max_depth, 32);
        assert_eq!(DecodeLimits::for_buffer_len(0).max_depth, 1);
        assert_eq!(DecodeLimits::default(), DecodeLimits::for_buffer_len(64));
    }

    #[test]
    fn error_kinds() {
        assert_eq!(
            decode(&[]).unwrap_err().kind(),
            DecodeErrorKind::InsufficientTag
        );
        assert_eq!(
            decode(&[0x0F, 0x00]).unwrap_err().kind(),
            DecodeErrorKind::InvalidUniversalTag
        );
    }

    fn assert_bounded(node: &TlvNode) -> Result<(), TestCaseError> {
        let mut result = Ok(());
        node.visit(&mut |n| match n.payload() {
            Payload::Primitive(bytes) if bytes.len() > 7 => {
                result = Err(TestCaseError::fail(format!("payload of {} bytes", bytes.len())));
            }
            Payload::Constructed(children) if children.len() > 3 => {
                result = Err(TestCaseError::fail(format!("{} children", children.len())));
            }
            _ => {}
        });
        result
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 2048,
            .. ProptestConfig::default()
        })]

        #[test]
        fn decode_is_bounded(buf in proptest::collection::vec(any::<u8>(), 0..=96)) {
            let decoder = TlvDecoder::new(DecodeLimits::for_buffer_len(buf.len()));
            match decoder.decode_bytes(&buf) {
                Ok((node, used)) => {
                    prop_assert!(used <= buf.len());
                    prop_assert!(node.depth() <= (buf.len() / 2).max(1));
                    assert_bounded(&node)?;
                }
                Err(DecodeError::DepthExceeded { .. }) => {
                    prop_assert!(false, "derived limits should never trip on {} bytes", buf.len());
                }
                Err(_) => {}
            }
        }

        #[test]
        fn decode_ignores_trailing_bytes(
            buf in proptest::collection::vec(any::<u8>(), 0..=64),
            tail in proptest::collection::vec(any::<u8>(), 0..=16),
        ) {
            if let Ok((node, used)) = decode(&buf) {
                let mut extended = buf[..used].to_vec();
                extended.extend_from_slice(&tail);
                let (again, used_again) = decode(&extended).unwrap();
                prop_assert_eq!(again, node);
                prop_assert_eq!(used_again, used);
            }
        }
    }
}
