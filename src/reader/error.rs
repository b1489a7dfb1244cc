use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading data into the midi representation
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// Reading out of bounds.
    #[error("Read out of bounds!")]
    OutOfBounds,
}

#[doc = r#"
Structural mismatches found while decoding.

Each variant reads as "expected ... but found ..." when displayed.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A chunk carried a different type tag than the one required here
    #[error("invalid chunk: expected \"{}\" but found \"{}\"", String::from_utf8_lossy(.expected), String::from_utf8_lossy(.found))]
    ChunkTag {
        /// The tag that was read
        found: [u8; 4],
        /// The tag that was required
        expected: [u8; 4],
    },
    /// The byte after `0xFF` is not an assigned meta event type
    #[error("invalid event: expected known MetaEvent type but found {0:#04X}")]
    UnknownMetaType(u8),
    /// The status high nibble is not a channel message kind
    #[error("invalid event: expected known ChannelEvent type but found {0:#03X}")]
    UnknownChannelType(u8),
    /// A data byte appeared where a status byte was needed and no status was running
    #[error("invalid event: expected a status byte but found a data byte with no running status")]
    UndefinedStatus,
    /// A status byte that starts no event a file may contain
    #[error("invalid event: expected known status type but found {0:#04X}")]
    UnknownStatus(u8),
    /// A channel event data byte had its top bit set
    #[error("invalid event: expected a data byte in 0..=127 but found {0:#04X}")]
    DataByte(u8),
    /// A tempo of zero microseconds per quarter note
    #[error("invalid meta event: expected a non-zero tempo but found 0")]
    ZeroTempo,
    /// A variable-length quantity did not terminate within four bytes
    #[error("invalid variable-length quantity: expected at most 4 bytes but found more")]
    VarLenTooLong,
    /// The header names a file type other than 0, 1 or 2
    #[error("invalid header: expected file type 0, 1 or 2 but found {0}")]
    FileType(u16),
    /// A fixed-width meta payload was shorter than its type requires
    #[error("invalid meta event {meta_type:#04X}: expected {expected} data bytes but found {found}")]
    MetaLength {
        /// The meta type byte
        meta_type: u8,
        /// Minimum number of payload bytes for this type
        expected: usize,
        /// Declared payload length
        found: usize,
    },
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if out of bounds or unexpected end of file
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the parse error, if this was not an out of bounds read
    pub fn parse_kind(&self) -> Option<&ParseError> {
        match &self.kind {
            ReaderErrorKind::ParseError(e) => Some(e),
            ReaderErrorKind::OutOfBounds => None,
        }
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

pub(crate) fn inv_data(reader: &super::Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::parse_error(reader.buffer_position(), v.into())
}

#[test]
fn chunk_tag_message() {
    let err = ReaderError::parse_error(
        14,
        ParseError::ChunkTag {
            found: *b"MTrx",
            expected: *b"MTrk",
        },
    );
    assert_eq!(
        err.to_string(),
        "Reading at Position 14, Parsing invalid chunk: expected \"MTrk\" but found \"MTrx\""
    );
}
