#![doc = r#"
A byte cursor over MIDI data.

The [`Reader`] tracks its position within the *whole* input, even when it
only covers one chunk's payload, so every [`ReaderError`] points at the
exact byte offset where decoding failed.
"#]

mod error;
pub use error::*;

/// The longest variable-length quantity permitted by the format.
pub const MAX_VARLEN_BYTES: usize = 4;

/// A forward-only cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    /// Absolute offset of `data[0]` within the original input
    base: usize,
    cursor: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided bytes
    pub const fn from_byte_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            base: 0,
            cursor: 0,
        }
    }

    /// Create a reader over a slice that started at `base` in some larger input.
    pub(crate) const fn with_base(data: &'a [u8], base: usize) -> Self {
        Self {
            data,
            base,
            cursor: 0,
        }
    }

    /// Returns the absolute position of the cursor
    pub const fn buffer_position(&self) -> usize {
        self.base + self.cursor
    }

    /// Number of bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// True if every byte has been consumed
    pub const fn is_eof(&self) -> bool {
        self.cursor >= self.data.len()
    }

    /// Returns the next `len` bytes without consuming them
    pub fn peek(&self, len: usize) -> Option<&'a [u8]> {
        self.data.get(self.cursor..self.cursor + len)
    }

    /// Moves the cursor back by `count` bytes.
    ///
    /// Used when a byte peeked as a possible status byte turns out to be data.
    pub(crate) fn rewind(&mut self, count: usize) {
        self.cursor = self.cursor.saturating_sub(count);
    }

    /// Reads a single byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let byte = *self
            .data
            .get(self.cursor)
            .ok_or(ReaderError::oob(self.buffer_position()))?;
        self.cursor += 1;
        Ok(byte)
    }

    /// Reads exactly `N` bytes into an array
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads the next `len` bytes
    pub fn read_exact(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(ReaderError::oob(self.buffer_position()));
        }
        let slice = &self.data[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    /// Reads the next `len` bytes and returns a reader scoped to them.
    pub fn sub_reader(&mut self, len: usize) -> ReadResult<Reader<'a>> {
        let base = self.buffer_position();
        let slice = self.read_exact(len)?;
        Ok(Reader::with_base(slice, base))
    }

    /// Reads a big-endian `u16`
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `u32`
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a variable-length quantity.
    ///
    /// Seven bits per byte, most significant group first; a set top bit means
    /// another byte follows. At most [`MAX_VARLEN_BYTES`] bytes are read.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..MAX_VARLEN_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::parse_error(
            self.buffer_position(),
            ParseError::VarLenTooLong,
        ))
    }

    /// Reads a variable-length quantity followed by that many bytes.
    pub fn read_varlen_slice(&mut self) -> ReadResult<&'a [u8]> {
        let len = self.read_varlen()?;
        self.read_exact(len as usize)
    }
}

#[test]
fn read_varlen_known_values() {
    use pretty_assertions::assert_eq;
    let cases: &[(&[u8], u32)] = &[
        (&[0x00], 0),
        (&[0x40], 0x40),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 0x80),
        (&[0xC0, 0x00], 0x2000),
        (&[0xFF, 0x7F], 0x3FFF),
        (&[0x81, 0x80, 0x00], 0x4000),
        (&[0xFF, 0xFF, 0x7F], 0x1F_FFFF),
        (&[0x81, 0x80, 0x80, 0x00], 0x20_0000),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 0x0FFF_FFFF),
    ];
    for (bytes, expected) in cases {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(reader.read_varlen().unwrap(), *expected);
        assert!(reader.is_eof());
    }
}

#[test]
fn read_varlen_rejects_fifth_byte() {
    let mut reader = Reader::from_byte_slice(&[0x80, 0x80, 0x80, 0x80, 0x00]);
    let err = reader.read_varlen().unwrap_err();
    assert_eq!(err.position(), 4);
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::ParseError(ParseError::VarLenTooLong)
    ));
}

#[test]
fn read_varlen_truncated() {
    let mut reader = Reader::from_byte_slice(&[0x81]);
    assert!(reader.read_varlen().unwrap_err().is_out_of_bounds());
}

#[test]
fn sub_reader_keeps_absolute_positions() {
    let data = [1, 2, 3, 4, 5];
    let mut reader = Reader::from_byte_slice(&data);
    reader.read_u8().unwrap();
    let mut sub = reader.sub_reader(2).unwrap();
    assert_eq!(sub.buffer_position(), 1);
    sub.read_u16_be().unwrap();
    let err = sub.read_u8().unwrap_err();
    assert_eq!(err.position(), 3);
    assert_eq!(reader.buffer_position(), 3);
}
