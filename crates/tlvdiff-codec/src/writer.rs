use tlvdiff_types::Tag;

/// Identifier low bits that announce the high-tag-number form.
pub(crate) const HIGH_TAG_ESCAPE: u8 = 0x1F;

/// Identifier bit 5.
pub(crate) const CONSTRUCTED_BIT: u8 = 0x20;

/// Long-form length marker (bit 7 of the first length octet).
pub(crate) const LONG_FORM: u8 = 0x80;

/// Definite-length TLV byte builder.
///
/// `TlvWriter` accumulates identifier, length and content octets into an
/// internal buffer. It always picks the shortest form:
///
/// ```text
/// ┌────────────┬─────────────────────┬──────────────────────────────────┐
/// │ Field      │ Short form          │ Long form                        │
/// ├────────────┼─────────────────────┼──────────────────────────────────┤
/// │ identifier │ number < 31: 1 byte │ 0x1F escape + base-128 number    │
/// │ length     │ len < 128: 1 byte   │ 0x80|n + n big-endian octets     │
/// └────────────┴─────────────────────┴──────────────────────────────────┘
/// ```
pub struct TlvWriter {
    buf: Vec<u8>,
}

impl TlvWriter {
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write the identifier octets for `tag`.
    pub fn write_identifier(&mut self, tag: Tag, constructed: bool) {
        let lead = tag.class().bits() | if constructed { CONSTRUCTED_BIT } else { 0 };
        let number = tag.number();
        if number < HIGH_TAG_ESCAPE {
            self.buf.push(lead | number);
            return;
        }

        self.buf.push(lead | HIGH_TAG_ESCAPE);
        // A u8 needs at most two base-128 groups.
        if number >= 0x80 {
            self.buf.push(0x80 | (number >> 7));
        }
        self.buf.push(number & 0x7F);
    }

    /// Write a definite length in minimal form.
    pub fn write_length(&mut self, len: usize) {
        if len < usize::from(LONG_FORM) {
            // Checked above: fits in seven bits.
            #[allow(clippy::cast_possible_truncation)]
            self.buf.push(len as u8);
            return;
        }

        let octets = len.to_be_bytes();
        let skip = octets.iter().take_while(|&&b| b == 0).count();
        let significant = &octets[skip..];
        #[allow(clippy::cast_possible_truncation)]
        self.buf.push(LONG_FORM | significant.len() as u8);
        self.buf.extend_from_slice(significant);
    }

    /// Write a complete primitive element.
    pub fn write_primitive(&mut self, tag: Tag, value: &[u8]) {
        self.write_identifier(tag, false);
        self.write_length(value.len());
        self.buf.extend_from_slice(value);
    }

    /// Write a complete constructed element whose content octets were
    /// pre-encoded by the caller.
    pub fn write_constructed(&mut self, tag: Tag, content: &[u8]) {
        self.write_identifier(tag, true);
        self.write_length(content.len());
        self.buf.extend_from_slice(content);
    }

    /// Consume the writer and return the accumulated bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for TlvWriter {
    fn default() -> Self {
        Self::new()
    }
}
