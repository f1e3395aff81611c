use crate::error::WireError;

/// Position-tracked, read-only view over a borrowed byte buffer.
///
/// `BoundedCursor` is the only way the decoder touches input bytes. Every
/// read goes through [`scan`](Self::scan), which checks
/// `position + distance <= len` before handing out a slice, so nothing
/// downstream ever indexes the buffer directly.
///
/// ```text
///   buf:  [ t0 l0 p0 p1 t1 l1 ... ]
///                     ^
///                  position        (only moves forward, never past len)
/// ```
///
/// A failed read leaves the position where it was.
#[derive(Clone, Debug)]
pub struct BoundedCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BoundedCursor<'a> {
    /// Create a cursor at position 0 over `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer, read or not.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    /// True when no unread bytes remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// The unread tail of the buffer.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Read `distance` bytes and advance past them.
    ///
    /// Returns `None` and leaves the cursor untouched when fewer than
    /// `distance` bytes remain. A zero-length scan always succeeds, even at
    /// the end of the buffer.
    ///
    /// ```
    /// use tlvdiff_wire::BoundedCursor;
    ///
    /// let mut cursor = BoundedCursor::new(&[1, 2, 3]);
    /// assert_eq!(cursor.scan(2), Some(&[1u8, 2][..]));
    /// assert_eq!(cursor.scan(2), None);
    /// assert_eq!(cursor.position(), 2);
    /// ```
    pub fn scan(&mut self, distance: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(distance)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    /// Read a single byte.
    pub fn scan_byte(&mut self) -> Option<u8> {
        self.scan(1).map(|b| b[0])
    }

    /// Like [`scan`](Self::scan), but reports the failure as a
    /// [`WireError::UnexpectedEof`] carrying the offset of the failed read.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] when fewer than `distance` bytes
    /// remain.
    pub fn expect(&mut self, distance: usize) -> Result<&'a [u8], WireError> {
        let offset = self.pos;
        self.scan(distance).ok_or(WireError::UnexpectedEof {
            offset,
            needed: distance,
        })
    }
}
