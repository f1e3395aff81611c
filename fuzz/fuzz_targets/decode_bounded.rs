#![no_main]

use libfuzzer_sys::fuzz_target;
use tlvdiff_decoder::{DecodeLimits, TlvDecoder};

// Fuzz target: bounded-grammar decoder on arbitrary bytes.
//
// With limits derived from the input length the decoder must never panic,
// never read past the end and never report a depth violation.
fuzz_target!(|data: &[u8]| {
    let decoder = TlvDecoder::new(DecodeLimits::for_buffer_len(data.len()));
    match decoder.decode_bytes(data) {
        Ok((node, used)) => {
            assert!(used <= data.len());
            assert!(node.depth() <= (data.len() / 2).max(1));
        }
        Err(e) => assert_ne!(e.kind(), tlvdiff_decoder::DecodeErrorKind::DepthExceeded),
    }
});
