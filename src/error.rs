use thiserror::Error;

use crate::{reader::ReaderError, writer::EncodeError};

#[doc = r#"
Every way a MIDI file operation can fail.

Decode and encode failures abort the whole operation; nothing is skipped
or partially returned.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MidiError {
    /// The first chunk is not `MThd`; the input is not a Standard MIDI File at all.
    #[error("Not a valid MIDI file")]
    NotMidiFile,
    /// A well formed feature this crate does not implement
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
    /// Malformed data found while decoding
    #[error("Invalid MIDI file: {0}")]
    Read(#[from] ReaderError),
    /// A value that cannot be written
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// An event was built with an unknown type
    #[error(transparent)]
    InvalidEvent(#[from] InvalidEventError),
    /// An API was called with an argument it cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl MidiError {
    /// Byte offset of a decode failure, when there is one
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Read(e) => Some(e.position()),
            _ => None,
        }
    }
}

#[doc = r#"
Constructing an event with a type outside its closed set of kinds.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidEventError {
    /// Not an assigned meta event type
    #[error("Invalid MetaEvent type: {0:#04X}")]
    MetaType(u8),
    /// Not a channel message kind (0x8..=0xE)
    #[error("Invalid ChannelEvent type: {0:#03X}")]
    ChannelType(u8),
    /// Channels are numbered 0 through 15
    #[error("Invalid channel: {0} (expected 0..=15)")]
    Channel(u8),
    /// System exclusive types are the low nibble of `0xF0` or `0xF7`
    #[error("Invalid SysexEvent type: {0:#03X}")]
    SysexType(u8),
}

/// Result type for whole-file operations
pub type MidiResult<T> = Result<T, MidiError>;
