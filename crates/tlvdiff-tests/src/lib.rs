//! Shared fixtures for the tlvdiff integration tests and benches.
//!
//! Holds codecs with known defects, so tests can check that the harness
//! actually notices them, plus a helper that captures a run's report.

use tlvdiff_codec::{CanonicalCodec, CodecError, DerCodec};
use tlvdiff_harness::{HarnessConfig, RoundTripHarness, RunSummary};
use tlvdiff_types::{Payload, TlvNode};

/// A codec whose decoder turns every empty constructed node into an empty
/// primitive with the same tag.
///
/// Serialization is [`DerCodec`]'s. The second encoding therefore loses the
/// constructed bit wherever the tree holds an empty constructed node,
/// which is exactly the kind of asymmetry a differential round trip exists
/// to catch.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatteningCodec {
    inner: DerCodec,
}

impl FlatteningCodec {
    fn flatten(node: &TlvNode) -> TlvNode {
        match node.payload() {
            Payload::Primitive(_) => node.clone(),
            Payload::Constructed(children) if children.is_empty() => {
                TlvNode::primitive(node.tag(), Vec::new())
            }
            Payload::Constructed(children) => TlvNode::constructed(
                node.tag(),
                children.iter().map(Self::flatten).collect(),
            ),
        }
    }
}

impl CanonicalCodec for FlatteningCodec {
    fn serialize(&self, node: &TlvNode) -> Result<Vec<u8>, CodecError> {
        self.inner.serialize(node)
    }

    fn decode(&self, bytes: &[u8]) -> Result<TlvNode, CodecError> {
        self.inner.decode(bytes).map(|node| Self::flatten(&node))
    }
}

/// Run `config` against `codec` and return the report text with the
/// summary.
///
/// # Panics
///
/// Panics if writing to the in-memory sink fails, which it cannot.
pub fn run_to_string<C: CanonicalCodec>(config: HarnessConfig, codec: C) -> (String, RunSummary) {
    let mut out = Vec::new();
    let summary = RoundTripHarness::new(config, codec)
        .run(&mut out)
        .expect("in-memory sink");
    let text = String::from_utf8(out).expect("report is ASCII");
    (text, summary)
}
