use tlvdiff_types::{Payload, Tag, TagClass, TlvNode};
use tlvdiff_wire::{BoundedCursor, WireError};

use crate::codec::CanonicalCodec;
use crate::error::CodecError;
use crate::writer::{CONSTRUCTED_BIT, HIGH_TAG_ESCAPE, LONG_FORM, TlvWriter};

/// Default nesting limit for [`DerCodec::decode`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Reference codec: DER-style definite-length TLV framing.
///
/// `serialize` always emits the shortest identifier and length forms, and
/// `decode` only accepts exactly those forms, so for any tree it can
/// represent `serialize(decode(serialize(n))) == serialize(n)` should hold.
/// Checking that it really does is the whole point of the harness.
///
/// Content octets are never interpreted. A BOOLEAN with five content
/// bytes is framed like any other primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerCodec {
    max_depth: usize,
}

impl DerCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn encode_into(node: &TlvNode, writer: &mut TlvWriter) {
        match node.payload() {
            Payload::Primitive(bytes) => writer.write_primitive(node.tag(), bytes),
            Payload::Constructed(children) => {
                let mut content = TlvWriter::new();
                for child in children {
                    Self::encode_into(child, &mut content);
                }
                writer.write_constructed(node.tag(), &content.finish());
            }
        }
    }
}

impl Default for DerCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalCodec for DerCodec {
    fn serialize(&self, node: &TlvNode) -> Result<Vec<u8>, CodecError> {
        let mut writer = TlvWriter::new();
        Self::encode_into(node, &mut writer);
        Ok(writer.finish())
    }

    fn decode(&self, bytes: &[u8]) -> Result<TlvNode, CodecError> {
        let mut reader = DerReader {
            cursor: BoundedCursor::new(bytes),
            base: 0,
            max_depth: self.max_depth,
        };
        let node = reader.read_element(1)?;

        let extra_bytes = reader.cursor.remaining().len();
        if extra_bytes > 0 {
            return Err(CodecError::TrailingData { extra_bytes });
        }
        Ok(node)
    }
}

/// Strict reader over one level of content octets.
///
/// `base` is the absolute offset of this reader's first byte, so error
/// offsets stay meaningful inside nested content.
struct DerReader<'a> {
    cursor: BoundedCursor<'a>,
    base: usize,
    max_depth: usize,
}

impl<'a> DerReader<'a> {
    fn offset(&self) -> usize {
        self.base + self.cursor.position()
    }

    /// Read `needed` bytes, reporting truncation at the absolute offset.
    fn take(&mut self, needed: usize) -> Result<&'a [u8], CodecError> {
        let offset = self.offset();
        self.cursor
            .scan(needed)
            .ok_or(CodecError::Wire(WireError::UnexpectedEof { offset, needed }))
    }

    fn byte(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn read_element(&mut self, depth: usize) -> Result<TlvNode, CodecError> {
        if depth > self.max_depth {
            return Err(CodecError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        let (tag, constructed) = self.read_identifier()?;
        let len = self.read_length()?;
        let content_base = self.offset();
        let content = self.take(len)?;

        if !constructed {
            return Ok(TlvNode::primitive(tag, content));
        }

        let mut inner = DerReader {
            cursor: BoundedCursor::new(content),
            base: content_base,
            max_depth: self.max_depth,
        };
        let mut children = Vec::new();
        while !inner.cursor.is_exhausted() {
            children.push(inner.read_element(depth + 1)?);
        }
        Ok(TlvNode::constructed(tag, children))
    }

    fn read_identifier(&mut self) -> Result<(Tag, bool), CodecError> {
        let offset = self.offset();
        let lead = self.byte()?;
        let class = TagClass::from_identifier(lead);
        let constructed = lead & CONSTRUCTED_BIT != 0;

        let number = if lead & HIGH_TAG_ESCAPE == HIGH_TAG_ESCAPE {
            self.read_high_tag_number(offset)?
        } else {
            lead & HIGH_TAG_ESCAPE
        };

        Ok((Tag::new(class, number)?, constructed))
    }

    fn read_high_tag_number(&mut self, offset: usize) -> Result<u8, CodecError> {
        let first = self.byte()?;
        if first == 0x80 {
            // Leading zero group.
            return Err(CodecError::NonMinimalTag { offset });
        }

        let mut value = u32::from(first & 0x7F);
        let mut byte = first;
        while byte & 0x80 != 0 {
            byte = self.byte()?;
            value = (value << 7) | u32::from(byte & 0x7F);
            if value > u32::from(u8::MAX) {
                return Err(CodecError::TagNumberTooLarge { offset });
            }
        }

        if value < u32::from(HIGH_TAG_ESCAPE) {
            return Err(CodecError::NonMinimalTag { offset });
        }
        u8::try_from(value).map_err(|_| CodecError::TagNumberTooLarge { offset })
    }

    fn read_length(&mut self) -> Result<usize, CodecError> {
        let offset = self.offset();
        let first = self.byte()?;
        if first & LONG_FORM == 0 {
            return Ok(usize::from(first));
        }

        let octets = usize::from(first & !LONG_FORM);
        match first {
            0x80 => return Err(CodecError::IndefiniteLength { offset }),
            0xFF => return Err(CodecError::ReservedLength { offset }),
            _ => {}
        }
        if octets > std::mem::size_of::<usize>() {
            return Err(CodecError::LengthOverflow { offset, octets });
        }

        let raw = self.take(octets)?;
        if raw[0] == 0 {
            return Err(CodecError::NonMinimalLength { offset });
        }
        let len = raw.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
        if len < usize::from(LONG_FORM) {
            return Err(CodecError::NonMinimalLength { offset });
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlvdiff_decoder::TlvDecoder;
    use tlvdiff_types::{TypeError, UniversalTag};

    fn codec() -> DerCodec {
        DerCodec::new()
    }

    fn sample() -> TlvNode {
        TlvNode::constructed(
            Tag::Private(31),
            vec![
                TlvNode::primitive(Tag::Universal(UniversalTag::Boolean), vec![1, 2, 3]),
                TlvNode::constructed(Tag::Application(4), Vec::new()),
                TlvNode::primitive(Tag::ContextSpecific(7), Vec::new()),
            ],
        )
    }

    #[test]
    fn serialize_known_bytes() {
        let bytes = codec().serialize(&sample()).unwrap();
        assert_eq!(
            bytes,
            vec![
                0xFF, 0x1F, 0x09, // [PRIVATE 31] constructed, high tag form, 9 content bytes
                0x01, 0x03, 0x01, 0x02, 0x03, // BOOLEAN 010203
                0x64, 0x00, // [APPLICATION 4] constructed, empty
                0x87, 0x00, // [7] primitive, empty
            ]
        );
    }

    #[test]
    fn decode_inverts_serialize() {
        let node = sample();
        let bytes = codec().serialize(&node).unwrap();
        assert_eq!(codec().decode(&bytes).unwrap(), node);
    }

    #[test]
    fn long_content_uses_long_form_length() {
        let node = TlvNode::primitive(Tag::Universal(UniversalTag::OctetString), vec![0xAA; 200]);
        let bytes = codec().serialize(&node).unwrap();
        assert_eq!(&bytes[..3], &[0x04, 0x81, 0xC8]);
        assert_eq!(codec().decode(&bytes).unwrap(), node);
    }

    #[test]
    fn grammar_trees_are_stable() {
        let input = [0xE1, 0x03, 0x80, 0x01, 0x11, 0x41, 0x00, 0xBF, 0x01, 0x05, 0x00];
        let (node, _) = TlvDecoder::default().decode_bytes(&input).unwrap();
        let first = codec().serialize(&node).unwrap();
        let second = codec().serialize(&codec().decode(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_indefinite_length() {
        let err = codec().decode(&[0x30, 0x80, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::IndefiniteLength { offset: 1 }));
    }

    #[test]
    fn rejects_reserved_length() {
        let err = codec().decode(&[0x04, 0xFF]).unwrap_err();
        assert!(matches!(err, CodecError::ReservedLength { offset: 1 }));
    }

    #[test]
    fn rejects_long_form_for_short_length() {
        let err = codec().decode(&[0x04, 0x81, 0x01, 0xAA]).unwrap_err();
        assert!(matches!(err, CodecError::NonMinimalLength { offset: 1 }));
    }

    #[test]
    fn rejects_leading_zero_length_octet() {
        let mut bytes = vec![0x04, 0x82, 0x00, 0x80];
        bytes.extend(std::iter::repeat_n(0u8, 0x80));
        let err = codec().decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::NonMinimalLength { .. }));
    }

    #[test]
    fn rejects_oversized_length() {
        let err = codec()
            .decode(&[0x04, 0x89, 1, 0, 0, 0, 0, 0, 0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, CodecError::LengthOverflow { octets: 9, .. }));
    }

    #[test]
    fn rejects_high_form_for_low_number() {
        let err = codec().decode(&[0x5F, 0x05, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::NonMinimalTag { offset: 0 }));
    }

    #[test]
    fn rejects_leading_zero_tag_group() {
        let err = codec().decode(&[0x5F, 0x80, 0x1F, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::NonMinimalTag { offset: 0 }));
    }

    #[test]
    fn rejects_tag_number_above_u8() {
        let err = codec().decode(&[0x5F, 0x82, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::TagNumberTooLarge { offset: 0 }));
    }

    #[test]
    fn rejects_unknown_universal() {
        let err = codec().decode(&[0x0E, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Type(TypeError::InvalidUniversalTag { code: 14 })
        ));
    }

    #[test]
    fn rejects_trailing_data() {
        let err = codec().decode(&[0x05, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::TrailingData { extra_bytes: 1 }));
    }

    #[test]
    fn truncated_content_reports_absolute_offset() {
        // SEQUENCE { OCTET STRING len 4, only 1 byte present }
        let err = codec().decode(&[0x30, 0x03, 0x04, 0x04, 0xAA]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Wire(WireError::UnexpectedEof {
                offset: 4,
                needed: 4
            })
        ));
    }

    #[test]
    fn empty_input_is_truncated() {
        let err = codec().decode(&[]).unwrap_err();
        assert!(matches!(err, CodecError::Wire(WireError::UnexpectedEof { offset: 0, .. })));
    }

    #[test]
    fn depth_limit() {
        let bytes = [0x30, 0x04, 0x30, 0x02, 0x30, 0x00];
        assert!(codec().decode(&bytes).is_ok());
        let err = codec().with_max_depth(2).decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::DepthExceeded { limit: 2 }));
    }
}
