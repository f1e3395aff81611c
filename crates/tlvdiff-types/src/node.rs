use std::fmt::{self, Write as _};

use tlvdiff_wire::hex::to_hex;

use crate::tag::Tag;

/// The value half of a node: raw bytes or an ordered list of children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
  Primitive(Vec<u8>),
  /// Children in the order they were decoded.
  Constructed(Vec<TlvNode>),
}

/// One decoded tag/value unit.
///
/// Nodes are built once by a decoder and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlvNode {
  tag: Tag,
  payload: Payload,
}

impl TlvNode {
  #[must_use]
  pub fn primitive(tag: Tag, bytes: impl Into<Vec<u8>>) -> Self {
    Self {
      tag,
      payload: Payload::Primitive(bytes.into()),
    }
  }

  #[must_use]
  pub fn constructed(tag: Tag, children: Vec<TlvNode>) -> Self {
    Self {
      tag,
      payload: Payload::Constructed(children),
    }
  }

  #[must_use]
  pub fn tag(&self) -> Tag {
    self.tag
  }

  #[must_use]
  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  #[must_use]
  pub fn is_constructed(&self) -> bool {
    matches!(self.payload, Payload::Constructed(_))
  }

  /// Child nodes; empty for primitives.
  #[must_use]
  pub fn children(&self) -> &[TlvNode] {
    match &self.payload {
      Payload::Primitive(_) => &[],
      Payload::Constructed(children) => children,
    }
  }

  /// Nesting depth, counting this node as 1.
  #[must_use]
  pub fn depth(&self) -> usize {
    1 + self.children().iter().map(TlvNode::depth).max().unwrap_or(0)
  }

  /// Total number of nodes in the tree, including this one.
  #[must_use]
  pub fn node_count(&self) -> usize {
    1 + self.children().iter().map(TlvNode::node_count).sum::<usize>()
  }

  /// Call `f` on this node and every descendant, parents before children.
  pub fn visit<F: FnMut(&TlvNode)>(&self, f: &mut F) {
    f(self);
    for child in self.children() {
      child.visit(f);
    }
  }

  /// Multi-line indented rendering, one node per line.
  ///
  /// ```text
  /// SEQUENCE (2)
  ///   INTEGER 0102
  ///   [PRIVATE 3] (0)
  /// ```
  #[must_use]
  pub fn render_tree(&self) -> String {
    let mut out = String::new();
    self.render_into(&mut out, 0);
    out
  }

  fn render_into(&self, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    match &self.payload {
      Payload::Primitive(bytes) if bytes.is_empty() => {
        let _ = writeln!(out, "{pad}{}", self.tag);
      }
      Payload::Primitive(bytes) => {
        let _ = writeln!(out, "{pad}{} {}", self.tag, to_hex(bytes));
      }
      Payload::Constructed(children) => {
        let _ = writeln!(out, "{pad}{} ({})", self.tag, children.len());
        for child in children {
          child.render_into(out, indent + 1);
        }
      }
    }
  }
}

/// Compact single-line form used in the report stream:
/// `TAG(hex)` for primitives and `TAG{child, child}` for constructed nodes.
impl fmt::Display for TlvNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.payload {
      Payload::Primitive(bytes) => write!(f, "{}({})", self.tag, to_hex(bytes)),
      Payload::Constructed(children) => {
        write!(f, "{}{{", self.tag)?;
        for (i, child) in children.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{child}")?;
        }
        f.write_str("}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tag::UniversalTag;

  fn sample() -> TlvNode {
    TlvNode::constructed(
      Tag::Universal(UniversalTag::Sequence),
      vec![
        TlvNode::primitive(Tag::Universal(UniversalTag::Integer), vec![0x01, 0x02]),
        TlvNode::constructed(
          Tag::Private(3),
          vec![TlvNode::primitive(Tag::ContextSpecific(0), Vec::new())],
        ),
      ],
    )
  }

  #[test]
  fn structure_queries() {
    let node = sample();
    assert!(node.is_constructed());
    assert_eq!(node.children().len(), 2);
    assert_eq!(node.depth(), 3);
    assert_eq!(node.node_count(), 4);
    assert!(node.children()[0].children().is_empty());
  }

  #[test]
  fn visit_is_preorder() {
    let mut tags = Vec::new();
    sample().visit(&mut |n| tags.push(n.tag()));
    assert_eq!(
      tags,
      vec![
        Tag::Universal(UniversalTag::Sequence),
        Tag::Universal(UniversalTag::Integer),
        Tag::Private(3),
        Tag::ContextSpecific(0),
      ]
    );
  }

  #[test]
  fn compact_display() {
    assert_eq!(
      sample().to_string(),
      "SEQUENCE{INTEGER(0102), [PRIVATE 3]{[0]()}}"
    );
  }

  #[test]
  fn tree_display() {
    assert_eq!(
      sample().render_tree(),
      "SEQUENCE (2)\n  INTEGER 0102\n  [PRIVATE 3] (1)\n    [0]\n"
    );
  }
}
