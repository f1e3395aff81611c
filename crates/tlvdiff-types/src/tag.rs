use std::fmt;

use crate::error::TypeError;

// ── Macro for numbered-enum boilerplate ───────────────────────────────
//
// `UniversalTag` is a fixed set of named variants, each mapped to a tag
// number, plus a conversion pair (number / from_number). The macro keeps
// the mapping in one place so the two directions cannot drift apart.

macro_rules! numbered_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $num:literal => $label:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// Every variant, in ascending tag-number order.
      pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

      /// The tag number of this variant.
      #[must_use]
      pub fn number(self) -> u8 {
        match self {
          $( Self::$variant => $num ),+
        }
      }

      /// Look up a variant by tag number.
      ///
      /// # Errors
      ///
      /// Returns [`TypeError::InvalidUniversalTag`] if no variant carries
      /// `code`.
      pub fn from_number(code: u8) -> Result<Self, TypeError> {
        match code {
          $( $num => Ok(Self::$variant), )+
          other => Err(TypeError::InvalidUniversalTag { code: other }),
        }
      }

      /// The ASN.1 name of this type, e.g. `"SEQUENCE"`.
      #[must_use]
      pub fn name(self) -> &'static str {
        match self {
          $( Self::$variant => $label ),+
        }
      }
    }
  };
}

// ── UniversalTag ──────────────────────────────────────────────────────

numbered_enum! {
  /// Known universal-class tag numbers.
  ///
  /// ```text
  /// ┌────────┬──────────────────────┐
  /// │ Number │ Type                 │
  /// ├────────┼──────────────────────┤
  /// │ 0..=13 │ EOC .. RELATIVE-OID  │
  /// │ 14, 15 │ (reserved, invalid)  │
  /// │ 16..=30│ SEQUENCE .. BMPString│
  /// │ 31     │ (escape, invalid)    │
  /// └────────┴──────────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum UniversalTag {
    EndOfContent = 0x00 => "EOC",
    Boolean = 0x01 => "BOOLEAN",
    Integer = 0x02 => "INTEGER",
    BitString = 0x03 => "BIT STRING",
    OctetString = 0x04 => "OCTET STRING",
    Null = 0x05 => "NULL",
    ObjectIdentifier = 0x06 => "OBJECT IDENTIFIER",
    ObjectDescriptor = 0x07 => "ObjectDescriptor",
    External = 0x08 => "EXTERNAL",
    Real = 0x09 => "REAL",
    Enumerated = 0x0A => "ENUMERATED",
    EmbeddedPdv = 0x0B => "EMBEDDED PDV",
    Utf8String = 0x0C => "UTF8String",
    RelativeOid = 0x0D => "RELATIVE-OID",
    Sequence = 0x10 => "SEQUENCE",
    Set = 0x11 => "SET",
    NumericString = 0x12 => "NumericString",
    PrintableString = 0x13 => "PrintableString",
    T61String = 0x14 => "T61String",
    VideotexString = 0x15 => "VideotexString",
    Ia5String = 0x16 => "IA5String",
    UtcTime = 0x17 => "UTCTime",
    GeneralizedTime = 0x18 => "GeneralizedTime",
    GraphicString = 0x19 => "GraphicString",
    VisibleString = 0x1A => "VisibleString",
    GeneralString = 0x1B => "GeneralString",
    UniversalString = 0x1C => "UniversalString",
    CharacterString = 0x1D => "CHARACTER STRING",
    BmpString = 0x1E => "BMPString",
  }
}

// ── TagClass ──────────────────────────────────────────────────────────

/// The two class bits (7 and 6) of an identifier byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagClass {
  Universal,
  Application,
  ContextSpecific,
  Private,
}

impl TagClass {
  /// Mask covering both class bits.
  pub const MASK: u8 = 0b1100_0000;

  /// Classify an identifier byte by its top two bits.
  ///
  /// ```
  /// use tlvdiff_types::TagClass;
  ///
  /// assert_eq!(TagClass::from_identifier(0xC0), TagClass::Private);
  /// assert_eq!(TagClass::from_identifier(0x80), TagClass::ContextSpecific);
  /// assert_eq!(TagClass::from_identifier(0x40), TagClass::Application);
  /// assert_eq!(TagClass::from_identifier(0x3F), TagClass::Universal);
  /// ```
  #[must_use]
  pub fn from_identifier(byte: u8) -> Self {
    if byte & Self::MASK == Self::MASK {
      Self::Private
    } else if byte & 0x80 != 0 {
      Self::ContextSpecific
    } else if byte & 0x40 != 0 {
      Self::Application
    } else {
      Self::Universal
    }
  }

  /// The class bits in identifier-byte position.
  #[must_use]
  pub fn bits(self) -> u8 {
    match self {
      Self::Universal => 0b0000_0000,
      Self::Application => 0b0100_0000,
      Self::ContextSpecific => 0b1000_0000,
      Self::Private => 0b1100_0000,
    }
  }
}

// ── Tag ───────────────────────────────────────────────────────────────

/// A tag: class plus tag number.
///
/// Universal tags are restricted to [`UniversalTag`]; the other classes
/// carry a raw number. Whether the node is primitive or constructed is
/// not part of the tag: it follows from the node's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
  Universal(UniversalTag),
  Application(u8),
  ContextSpecific(u8),
  Private(u8),
}

impl Tag {
  /// Build a tag from a class and number.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::InvalidUniversalTag`] if `class` is universal and
  /// `number` is not a known universal tag.
  pub fn new(class: TagClass, number: u8) -> Result<Self, TypeError> {
    Ok(match class {
      TagClass::Universal => Self::Universal(UniversalTag::from_number(number)?),
      TagClass::Application => Self::Application(number),
      TagClass::ContextSpecific => Self::ContextSpecific(number),
      TagClass::Private => Self::Private(number),
    })
  }

  #[must_use]
  pub fn class(self) -> TagClass {
    match self {
      Self::Universal(_) => TagClass::Universal,
      Self::Application(_) => TagClass::Application,
      Self::ContextSpecific(_) => TagClass::ContextSpecific,
      Self::Private(_) => TagClass::Private,
    }
  }

  #[must_use]
  pub fn number(self) -> u8 {
    match self {
      Self::Universal(u) => u.number(),
      Self::Application(n) | Self::ContextSpecific(n) | Self::Private(n) => n,
    }
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Universal(u) => f.write_str(u.name()),
      Self::Application(n) => write!(f, "[APPLICATION {n}]"),
      Self::ContextSpecific(n) => write!(f, "[{n}]"),
      Self::Private(n) => write!(f, "[PRIVATE {n}]"),
    }
  }
}

// ── Identifier ────────────────────────────────────────────────────────

/// A fully classified single-byte identifier.
///
/// ```text
///   bit:  7  6 │ 5 │ 4 3 2 1 0
///        class │ C │ number
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identifier {
  pub tag: Tag,
  pub constructed: bool,
}

impl Identifier {
  /// Bit 5: constructed flag.
  pub const CONSTRUCTED: u8 = 0b0010_0000;

  /// Low five bits: tag number.
  pub const NUMBER_MASK: u8 = 0b0001_1111;

  /// Classify one identifier byte.
  ///
  /// The number is always `byte & 0x1F` and the constructed flag always
  /// `byte & 0x20`, whatever the class.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::InvalidUniversalTag`] for a universal-class byte
  /// whose number is not a known universal tag.
  pub fn parse(byte: u8) -> Result<Self, TypeError> {
    let tag = Tag::new(TagClass::from_identifier(byte), byte & Self::NUMBER_MASK)?;
    Ok(Self {
      tag,
      constructed: byte & Self::CONSTRUCTED != 0,
    })
  }

  /// Pack back into a single byte. Only valid for tag numbers below 32.
  #[must_use]
  pub fn to_byte(self) -> u8 {
    let cons = if self.constructed { Self::CONSTRUCTED } else { 0 };
    self.tag.class().bits() | cons | (self.tag.number() & Self::NUMBER_MASK)
  }
}
