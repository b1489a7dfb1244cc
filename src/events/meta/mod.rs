#![doc = r#"
Meta events: information about the sequence that is never sent to a device.

On the wire a meta event is `0xFF <type> <length: varlen> <payload>`.
"#]

mod signature;
pub use signature::*;

mod smpte_fps;
pub use smpte_fps::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    InvalidEventError,
    reader::{ParseError, ReadResult, Reader, inv_data},
    writer::{WriteResult, write_varlen_slice},
};

/// Every meta event type this crate knows. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00 02`
    SequenceNumber = 0x00,
    /// Any text
    Text = 0x01,
    /// Copyright notice
    Copyright = 0x02,
    /// Sequence or track name
    TrackName = 0x03,
    /// Instrument name
    InstrumentName = 0x04,
    /// Lyric
    Lyric = 0x05,
    /// Marker
    Marker = 0x06,
    /// Cue point
    CuePoint = 0x07,
    /// Program name
    ProgramName = 0x08,
    /// Device name
    DeviceName = 0x09,
    /// `FF 20 01`
    ChannelPrefix = 0x20,
    /// `FF 21 01`
    Port = 0x21,
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03`
    Tempo = 0x51,
    /// `FF 54 05`
    SmpteOffset = 0x54,
    /// `FF 58 04`
    TimeSignature = 0x58,
    /// `FF 59 02`
    KeySignature = 0x59,
    /// `FF 7F len data`
    SequencerSpecific = 0x7F,
}

impl MetaType {
    /// The message this type carries when no fields are given.
    pub fn default_message(&self) -> MetaMessage {
        use MetaType as T;
        match self {
            T::SequenceNumber => MetaMessage::SequenceNumber(0),
            T::Text => MetaMessage::Text(String::new()),
            T::Copyright => MetaMessage::Copyright(String::new()),
            T::TrackName => MetaMessage::TrackName(String::new()),
            T::InstrumentName => MetaMessage::InstrumentName(String::new()),
            T::Lyric => MetaMessage::Lyric(String::new()),
            T::Marker => MetaMessage::Marker(String::new()),
            T::CuePoint => MetaMessage::CuePoint(String::new()),
            T::ProgramName => MetaMessage::ProgramName(String::new()),
            T::DeviceName => MetaMessage::DeviceName(String::new()),
            T::ChannelPrefix => MetaMessage::ChannelPrefix(0),
            T::Port => MetaMessage::Port(0),
            T::EndOfTrack => MetaMessage::EndOfTrack,
            T::Tempo => MetaMessage::Tempo(Tempo::default()),
            T::SmpteOffset => MetaMessage::SmpteOffset(SmpteOffset::default()),
            T::TimeSignature => MetaMessage::TimeSignature(TimeSignature::default()),
            T::KeySignature => MetaMessage::KeySignature(KeySignature::default()),
            T::SequencerSpecific => MetaMessage::SequencerSpecific(Vec::new()),
        }
    }
}

/// The fields of a meta event, by type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// Sequence number. Stored little-endian, unlike everything else.
    SequenceNumber(u16),
    /// Any text
    Text(String),
    /// Copyright notice
    Copyright(String),
    /// Sequence or track name
    TrackName(String),
    /// Instrument name
    InstrumentName(String),
    /// Lyric
    Lyric(String),
    /// Marker
    Marker(String),
    /// Cue point
    CuePoint(String),
    /// Program name
    ProgramName(String),
    /// Device name
    DeviceName(String),
    /// Channel that following sysex and meta events refer to
    ChannelPrefix(u8),
    /// Output port
    Port(u8),
    /// End of the track
    EndOfTrack,
    /// Tempo change
    Tempo(Tempo),
    /// Start time of the track
    SmpteOffset(SmpteOffset),
    /// Time signature
    TimeSignature(TimeSignature),
    /// Key signature
    KeySignature(KeySignature),
    /// Raw sequencer specific data
    SequencerSpecific(Vec<u8>),
}

impl MetaMessage {
    /// Returns the type of this message
    pub const fn meta_type(&self) -> MetaType {
        match self {
            Self::SequenceNumber(_) => MetaType::SequenceNumber,
            Self::Text(_) => MetaType::Text,
            Self::Copyright(_) => MetaType::Copyright,
            Self::TrackName(_) => MetaType::TrackName,
            Self::InstrumentName(_) => MetaType::InstrumentName,
            Self::Lyric(_) => MetaType::Lyric,
            Self::Marker(_) => MetaType::Marker,
            Self::CuePoint(_) => MetaType::CuePoint,
            Self::ProgramName(_) => MetaType::ProgramName,
            Self::DeviceName(_) => MetaType::DeviceName,
            Self::ChannelPrefix(_) => MetaType::ChannelPrefix,
            Self::Port(_) => MetaType::Port,
            Self::EndOfTrack => MetaType::EndOfTrack,
            Self::Tempo(_) => MetaType::Tempo,
            Self::SmpteOffset(_) => MetaType::SmpteOffset,
            Self::TimeSignature(_) => MetaType::TimeSignature,
            Self::KeySignature(_) => MetaType::KeySignature,
            Self::SequencerSpecific(_) => MetaType::SequencerSpecific,
        }
    }

    /// Returns the text of the text-like types
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s)
            | Self::Copyright(s)
            | Self::TrackName(s)
            | Self::InstrumentName(s)
            | Self::Lyric(s)
            | Self::Marker(s)
            | Self::CuePoint(s)
            | Self::ProgramName(s)
            | Self::DeviceName(s) => Some(s),
            _ => None,
        }
    }

    /// Decodes the payload of a `meta_type` event. `data` covers exactly the declared length.
    fn read(meta_type: MetaType, data: &mut Reader<'_>) -> ReadResult<Self> {
        use MetaType as T;
        let len = data.remaining();
        let text = |data: &mut Reader<'_>| -> ReadResult<String> {
            Ok(String::from_utf8_lossy(data.read_exact(len)?).into_owned())
        };

        Ok(match meta_type {
            T::SequenceNumber => Self::SequenceNumber(u16::from_le_bytes(fixed(meta_type, data)?)),
            T::Text => Self::Text(text(data)?),
            T::Copyright => Self::Copyright(text(data)?),
            T::TrackName => Self::TrackName(text(data)?),
            T::InstrumentName => Self::InstrumentName(text(data)?),
            T::Lyric => Self::Lyric(text(data)?),
            T::Marker => Self::Marker(text(data)?),
            T::CuePoint => Self::CuePoint(text(data)?),
            T::ProgramName => Self::ProgramName(text(data)?),
            T::DeviceName => Self::DeviceName(text(data)?),
            T::ChannelPrefix => Self::ChannelPrefix(fixed::<1>(meta_type, data)?[0]),
            T::Port => Self::Port(fixed::<1>(meta_type, data)?[0]),
            T::EndOfTrack => Self::EndOfTrack,
            T::Tempo => {
                let tempo = Tempo::from_bytes(fixed(meta_type, data)?);
                if tempo.micros_per_quarter_note() == 0 {
                    return Err(inv_data(data, ParseError::ZeroTempo));
                }
                Self::Tempo(tempo)
            }
            T::SmpteOffset => Self::SmpteOffset(SmpteOffset::parse(fixed(meta_type, data)?)),
            T::TimeSignature => {
                Self::TimeSignature(TimeSignature::from_bytes(fixed(meta_type, data)?))
            }
            T::KeySignature => Self::KeySignature(KeySignature::from_bytes(fixed(meta_type, data)?)),
            T::SequencerSpecific => Self::SequencerSpecific(data.read_exact(len)?.to_vec()),
        })
    }

    fn payload(&self) -> WriteResult<Vec<u8>> {
        Ok(match self {
            Self::SequenceNumber(n) => n.to_le_bytes().to_vec(),
            Self::Text(s)
            | Self::Copyright(s)
            | Self::TrackName(s)
            | Self::InstrumentName(s)
            | Self::Lyric(s)
            | Self::Marker(s)
            | Self::CuePoint(s)
            | Self::ProgramName(s)
            | Self::DeviceName(s) => s.as_bytes().to_vec(),
            Self::ChannelPrefix(v) | Self::Port(v) => vec![*v],
            Self::EndOfTrack => Vec::new(),
            Self::Tempo(t) => t.to_bytes()?.to_vec(),
            Self::SmpteOffset(o) => o.to_bytes()?.to_vec(),
            Self::TimeSignature(t) => t.to_bytes().to_vec(),
            Self::KeySignature(k) => k.to_bytes().to_vec(),
            Self::SequencerSpecific(d) => d.clone(),
        })
    }
}

/// Reads the first `N` bytes of a fixed-width payload; any surplus is ignored.
fn fixed<const N: usize>(meta_type: MetaType, data: &mut Reader<'_>) -> ReadResult<[u8; N]> {
    if data.remaining() < N {
        return Err(inv_data(
            data,
            ParseError::MetaLength {
                meta_type: meta_type.into(),
                expected: N,
                found: data.remaining(),
            },
        ));
    }
    data.read_exact_size()
}

#[doc = r#"
A meta event: delay plus one [`MetaMessage`].

# Example
```rust
# use midifile::prelude::*;
let event = MetaEvent::new(0x51, 0).unwrap();
assert_eq!(event.message, MetaMessage::Tempo(Tempo::new(500_000)));

assert_eq!(
    MetaEvent::new(0x99, 0),
    Err(InvalidEventError::MetaType(0x99))
);
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    /// Ticks since the previous event
    pub delay: u32,
    /// The message fields
    pub message: MetaMessage,
}

impl MetaEvent {
    /// Creates an event of the given type byte with every field at its default.
    pub fn new(meta_type: u8, delay: u32) -> Result<Self, InvalidEventError> {
        let meta_type =
            MetaType::try_from(meta_type).map_err(|_| InvalidEventError::MetaType(meta_type))?;
        Ok(Self::from_message(delay, meta_type.default_message()))
    }

    /// Creates an event from its fields
    pub const fn from_message(delay: u32, message: MetaMessage) -> Self {
        Self { delay, message }
    }

    /// End of track
    pub const fn end_of_track(delay: u32) -> Self {
        Self::from_message(delay, MetaMessage::EndOfTrack)
    }

    /// Tempo change
    pub const fn tempo(delay: u32, tempo: Tempo) -> Self {
        Self::from_message(delay, MetaMessage::Tempo(tempo))
    }

    /// Free text
    pub fn text(delay: u32, text: impl Into<String>) -> Self {
        Self::from_message(delay, MetaMessage::Text(text.into()))
    }

    /// Track name
    pub fn track_name(delay: u32, name: impl Into<String>) -> Self {
        Self::from_message(delay, MetaMessage::TrackName(name.into()))
    }

    /// Time signature
    pub const fn time_signature(delay: u32, signature: TimeSignature) -> Self {
        Self::from_message(delay, MetaMessage::TimeSignature(signature))
    }

    /// Returns the event's type
    pub const fn meta_type(&self) -> MetaType {
        self.message.meta_type()
    }

    /// Reads type, length and payload. The `0xFF` status has already been consumed.
    pub(crate) fn read(reader: &mut Reader<'_>, delay: u32) -> ReadResult<Self> {
        let type_byte = reader.read_u8()?;
        let len = reader.read_varlen()? as usize;
        let meta_type = MetaType::try_from(type_byte)
            .map_err(|_| inv_data(reader, ParseError::UnknownMetaType(type_byte)))?;
        let mut data = reader.sub_reader(len)?;
        let message = MetaMessage::read(meta_type, &mut data)?;
        Ok(Self { delay, message })
    }

    /// Writes status, type, length and payload.
    pub(crate) fn write(&self, out: &mut Vec<u8>) -> WriteResult<()> {
        out.push(0xFF);
        out.push(self.meta_type().into());
        write_varlen_slice(&self.message.payload()?, out)
    }
}

#[cfg(test)]
fn read_meta(bytes: &[u8]) -> ReadResult<MetaEvent> {
    let mut reader = Reader::from_byte_slice(bytes);
    MetaEvent::read(&mut reader, 0)
}

#[test]
fn tempo_is_beats_per_minute() {
    let event = read_meta(&[0x51, 0x03, 0x07, 0xA1, 0x20]).unwrap();
    let MetaMessage::Tempo(tempo) = event.message else {
        panic!("expected a tempo, got {:?}", event.message);
    };
    assert_eq!(tempo.bpm(), 120.);
}

#[test]
fn sequence_number_is_little_endian() {
    let event = read_meta(&[0x00, 0x02, 0x34, 0x12]).unwrap();
    assert_eq!(event.message, MetaMessage::SequenceNumber(0x1234));
    let mut out = Vec::new();
    event.write(&mut out).unwrap();
    assert_eq!(out, vec![0xFF, 0x00, 0x02, 0x34, 0x12]);
}

#[test]
fn text_types_decode_utf8() {
    use pretty_assertions::assert_eq;
    let mut bytes = vec![0x05, 0x06];
    bytes.extend_from_slice("héllo".as_bytes());
    let event = read_meta(&bytes).unwrap();
    assert_eq!(event.message, MetaMessage::Lyric("héllo".to_string()));
    assert_eq!(event.message.text(), Some("héllo"));
}

#[test]
fn unknown_meta_type_fails() {
    let err = read_meta(&[0x99, 0x00]).unwrap_err();
    assert_eq!(err.parse_kind(), Some(&ParseError::UnknownMetaType(0x99)));
    assert_eq!(err.position(), 2);
}

#[test]
fn short_fixed_payload_fails() {
    let err = read_meta(&[0x51, 0x02, 0x07, 0xA1]).unwrap_err();
    assert_eq!(
        err.parse_kind(),
        Some(&ParseError::MetaLength {
            meta_type: 0x51,
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn long_fixed_payload_is_consumed() {
    let mut reader = Reader::from_byte_slice(&[0x20, 0x02, 0x05, 0xAA, 0x42]);
    let event = MetaEvent::read(&mut reader, 0).unwrap();
    assert_eq!(event.message, MetaMessage::ChannelPrefix(5));
    assert_eq!(reader.read_u8().unwrap(), 0x42);
}

#[test]
fn every_type_has_defaults() {
    for byte in 0..=u8::MAX {
        match MetaEvent::new(byte, 7) {
            Ok(event) => {
                assert_eq!(u8::from(event.meta_type()), byte);
                assert_eq!(event.delay, 7);
            }
            Err(e) => assert_eq!(e, InvalidEventError::MetaType(byte)),
        }
    }
    assert!(MetaEvent::new(0x2F, 0).is_ok());
    assert_eq!(MetaEvent::new(0x99, 0), Err(InvalidEventError::MetaType(0x99)));
}

#[test]
fn zero_tempo_fails_to_decode() {
    let err = read_meta(&[0x51, 0x03, 0x00, 0x00, 0x00]).unwrap_err();
    assert_eq!(err.parse_kind(), Some(&ParseError::ZeroTempo));
    assert_eq!(err.position(), 5);
}
