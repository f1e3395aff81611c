/// Errors raised while interpreting identifier bytes as tags.
///
/// These sit one level above [`WireError`](tlvdiff_wire::WireError): the
/// bytes were there, but they do not name a tag this crate knows about.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
  /// A universal-class tag whose number is not in the known set.
  ///
  /// Numbers 14 and 15 are reserved, and 31 is the high-tag-number escape,
  /// which never names a universal type on its own.
  #[error("invalid universal tag: {code}")]
  InvalidUniversalTag { code: u8 },
}
