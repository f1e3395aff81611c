//! Property tests over arbitrary byte buffers.

use proptest::prelude::*;
use tlvdiff_codec::{CanonicalCodec, DerCodec};
use tlvdiff_decoder::{DecodeLimits, TlvDecoder};
use tlvdiff_harness::{Outcome, SeededGenerator, round_trip};

fn decoder_for(buf: &[u8]) -> TlvDecoder {
    TlvDecoder::new(DecodeLimits::for_buffer_len(buf.len()))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1024,
        .. ProptestConfig::default()
    })]

    /// Any tree the bounded grammar yields is stable under the DER codec.
    #[test]
    fn der_round_trip_is_idempotent(buf in proptest::collection::vec(any::<u8>(), 0..=64)) {
        if let Ok((node, _)) = decoder_for(&buf).decode_bytes(&buf) {
            let outcome = round_trip(&DerCodec::new(), &node);
            prop_assert!(matches!(outcome, Outcome::Stable { .. }), "{outcome:?}");
        }
    }

    /// DER decoding recovers the exact tree that was serialized.
    #[test]
    fn der_decode_inverts_serialize(buf in proptest::collection::vec(any::<u8>(), 0..=64)) {
        if let Ok((node, _)) = decoder_for(&buf).decode_bytes(&buf) {
            let codec = DerCodec::new();
            let bytes = codec.serialize(&node).unwrap();
            prop_assert_eq!(codec.decode(&bytes).unwrap(), node);
        }
    }

    /// The DER reader never panics on garbage.
    #[test]
    fn der_decode_total(buf in proptest::collection::vec(any::<u8>(), 0..=64)) {
        let _ = DerCodec::new().decode(&buf);
    }

    /// A generator rebuilt from any observed state continues the same stream.
    #[test]
    fn generator_resumes_from_state(seed in any::<u64>(), skip in 0usize..256) {
        let mut original = SeededGenerator::new(seed);
        original.fill_bytes(skip);
        let mut resumed = SeededGenerator::new(original.state());
        prop_assert_eq!(original.fill_bytes(32), resumed.fill_bytes(32));
    }
}
