#![no_main]

use libfuzzer_sys::fuzz_target;
use tlvdiff_codec::{CanonicalCodec, DerCodec};

// Fuzz target: strict DER reader on arbitrary bytes.
//
// Anything the reader accepts must already be in canonical form, so
// serializing the result reproduces the input exactly.
fuzz_target!(|data: &[u8]| {
    let codec = DerCodec::new();
    if let Ok(node) = codec.decode(data) {
        let again = codec.serialize(&node).expect("serialize accepted tree");
        assert_eq!(again, data);
    }
});
