#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tlvdiff_codec::der::DEFAULT_MAX_DEPTH;
use tlvdiff_codec::DerCodec;
use tlvdiff_harness::{round_trip, Outcome};
use tlvdiff_types::{Tag, TagClass, TlvNode};

#[derive(Debug, Arbitrary)]
enum FuzzNode {
    Primitive {
        class: u8,
        number: u8,
        content: Vec<u8>,
    },
    Constructed {
        class: u8,
        number: u8,
        children: Vec<FuzzNode>,
    },
}

fn tag(class: u8, number: u8) -> Option<Tag> {
    let class = TagClass::from_identifier(class);
    Tag::new(class, number).ok()
}

fn build(node: &FuzzNode) -> Option<TlvNode> {
    match node {
        FuzzNode::Primitive {
            class,
            number,
            content,
        } => Some(TlvNode::primitive(tag(*class, *number)?, content.clone())),
        FuzzNode::Constructed {
            class,
            number,
            children,
        } => {
            let children = children.iter().map(build).collect::<Option<Vec<_>>>()?;
            Some(TlvNode::constructed(tag(*class, *number)?, children))
        }
    }
}

// Fuzz target: DER round trip on arbitrary well-typed trees, including
// high tag numbers and long-form lengths the bounded grammar never reaches.
fuzz_target!(|input: FuzzNode| {
    let Some(node) = build(&input) else { return };
    if node.depth() > DEFAULT_MAX_DEPTH {
        return;
    }
    match round_trip(&DerCodec::new(), &node) {
        Outcome::Stable { .. } => {}
        other => panic!("{node}: {other:?}"),
    }
});
