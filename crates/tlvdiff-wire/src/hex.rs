use crate::error::WireError;

/// Render bytes as lowercase hex with no separators.
///
/// This is the format every diagnostic line in the report stream uses.
///
/// ```
/// assert_eq!(tlvdiff_wire::hex::to_hex(&[0x00, 0xAB, 0x7F]), "00ab7f");
/// ```
pub fn to_hex(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Parse a hex string back into bytes.
///
/// Surrounding whitespace is ignored, as is an optional `0x` prefix, so
/// lines copied out of a report can be pasted back in directly.
///
/// # Errors
///
/// Returns [`WireError::InvalidHex`] for odd-length input or non-hex digits.
pub fn from_hex(input: &str) -> Result<Vec<u8>, WireError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    Ok(::hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn parses_report_line_with_prefix_and_whitespace() {
        assert_eq!(from_hex("  0x00ff10\n").unwrap(), vec![0x00, 0xFF, 0x10]);
    }

    #[test]
    fn accepts_uppercase_digits() {
        assert_eq!(from_hex("ABCD").unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn odd_length_rejected() {
        assert!(matches!(from_hex("abc"), Err(WireError::InvalidHex(_))));
    }

    #[test]
    fn non_hex_digit_rejected() {
        assert!(matches!(from_hex("zz"), Err(WireError::InvalidHex(_))));
    }
}
