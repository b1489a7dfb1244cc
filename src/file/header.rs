use log::debug;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::chunk::{HEADER_TAG, read_chunk, write_chunk};
use crate::{
    MidiError, MidiResult,
    reader::{ParseError, Reader, inv_data},
    writer::{EncodeError, WriteResult},
};

#[doc = r#"
How the tracks of a file relate to each other.

```text
0: one track holding every channel
1: several tracks played together
2: several independent single-track patterns
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FileType {
    /// Format 0
    SingleTrack = 0,
    /// Format 1
    #[default]
    SyncTracks = 1,
    /// Format 2
    AsyncTracks = 2,
}

#[doc = r#"
The contents of the `MThd` chunk.

The track count is owned by the [`MidiFile`](super::MidiFile) and follows its
track list; it cannot be set directly.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    file_type: FileType,
    track_count: u16,
    ticks_per_beat: u16,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            file_type: FileType::SyncTracks,
            track_count: 0,
            ticks_per_beat: 120,
        }
    }
}

impl Header {
    /// Number of payload bytes in the header chunk
    pub const LEN: usize = 6;

    /// Returns the file type
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns the number of tracks
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Returns the ticks per quarter note
    pub const fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Sets the file type from its numeric value (0, 1 or 2).
    pub fn set_file_type(&mut self, file_type: u16) -> MidiResult<&mut Self> {
        self.file_type = FileType::try_from(file_type).map_err(|_| {
            MidiError::InvalidArgument(format!(
                "File type \"{file_type}\" is not defined. Did you mean 0, 1 or 2?"
            ))
        })?;
        Ok(self)
    }

    /// Sets the ticks per quarter note, 1 to 65535.
    ///
    /// Values from `0x8000` up are accepted here but cannot be written: the
    /// top bit of the division field selects SMPTE timing, so
    /// [`Header::write`] fails with [`EncodeError::TicksPerBeat`].
    pub fn set_ticks_per_beat(&mut self, ticks_per_beat: u32) -> MidiResult<&mut Self> {
        self.ticks_per_beat = u16::try_from(ticks_per_beat)
            .ok()
            .filter(|&t| t >= 1)
            .ok_or_else(|| {
                MidiError::InvalidArgument(format!(
                    "Ticks per beat amount should be between 1 and 65535 (got {ticks_per_beat})"
                ))
            })?;
        Ok(self)
    }

    pub(crate) fn set_track_count(&mut self, track_count: u16) {
        self.track_count = track_count;
    }

    /// Reads the `MThd` chunk.
    ///
    /// A missing `MThd` tag means the input is not a MIDI file at all and is
    /// reported as [`MidiError::NotMidiFile`]. SMPTE time division is rejected
    /// with [`MidiError::NotSupported`].
    pub fn read(reader: &mut Reader<'_>) -> MidiResult<Self> {
        if reader.peek(HEADER_TAG.len()) != Some(&HEADER_TAG[..]) {
            return Err(MidiError::NotMidiFile);
        }
        let mut chunk = read_chunk(reader, HEADER_TAG)?;

        let file_type = chunk.read_u16_be()?;
        let track_count = chunk.read_u16_be()?;
        let division = chunk.read_u16_be()?;

        if division & 0x8000 != 0 {
            return Err(MidiError::NotSupported(
                "Expressing time in SMPTE format is not supported yet",
            ));
        }

        let file_type = FileType::try_from(file_type)
            .map_err(|_| inv_data(&chunk, ParseError::FileType(file_type)))?;

        let header = Self {
            file_type,
            track_count,
            ticks_per_beat: division & 0x7FFF,
        };
        debug!(
            "read header: {:?}, {} tracks, {} ticks per beat",
            header.file_type, header.track_count, header.ticks_per_beat
        );
        Ok(header)
    }

    /// Appends the `MThd` chunk.
    pub fn write(&self, out: &mut Vec<u8>) -> WriteResult<()> {
        if self.ticks_per_beat & 0x8000 != 0 {
            return Err(EncodeError::TicksPerBeat(self.ticks_per_beat));
        }
        let mut payload = [0u8; Self::LEN];
        payload[0..2].copy_from_slice(&u16::from(self.file_type).to_be_bytes());
        payload[2..4].copy_from_slice(&self.track_count.to_be_bytes());
        payload[4..6].copy_from_slice(&(self.ticks_per_beat & 0x7FFF).to_be_bytes());
        write_chunk(HEADER_TAG, &payload, out)
    }
}

#[test]
fn header_defaults() {
    let header = Header::default();
    assert_eq!(header.file_type(), FileType::SyncTracks);
    assert_eq!(header.track_count(), 0);
    assert_eq!(header.ticks_per_beat(), 120);
}

#[test]
fn header_setters_validate() {
    let mut header = Header::default();
    header.set_file_type(2).unwrap().set_ticks_per_beat(480).unwrap();
    assert_eq!(header.file_type(), FileType::AsyncTracks);
    assert_eq!(header.ticks_per_beat(), 480);

    assert!(matches!(
        header.set_file_type(3),
        Err(MidiError::InvalidArgument(_))
    ));
    assert!(matches!(
        header.set_ticks_per_beat(0),
        Err(MidiError::InvalidArgument(_))
    ));
    assert!(matches!(
        header.set_ticks_per_beat(65536),
        Err(MidiError::InvalidArgument(_))
    ));
    assert_eq!(header.ticks_per_beat(), 480);
}

#[test]
fn header_round_trip() {
    use pretty_assertions::assert_eq;
    let mut header = Header::default();
    header.set_ticks_per_beat(96).unwrap();
    header.set_track_count(3);

    let mut out = Vec::new();
    header.write(&mut out).unwrap();
    assert_eq!(
        out,
        b"MThd\x00\x00\x00\x06\x00\x01\x00\x03\x00\x60".to_vec()
    );

    let mut reader = Reader::from_byte_slice(&out);
    assert_eq!(Header::read(&mut reader).unwrap(), header);
}

#[test]
fn ticks_with_top_bit_cannot_be_written() {
    let mut header = Header::default();
    header.set_ticks_per_beat(0x8000).unwrap();
    assert_eq!(
        header.write(&mut Vec::new()),
        Err(EncodeError::TicksPerBeat(0x8000))
    );
}

#[test]
fn not_a_midi_file() {
    for bytes in [
        &b"RIFF\x00\x00\x00\x06\x00\x01\x00\x01\x00\x60"[..],
        &b"MT"[..],
        &b""[..],
    ] {
        let mut reader = Reader::from_byte_slice(bytes);
        assert_eq!(Header::read(&mut reader), Err(MidiError::NotMidiFile));
    }
}

#[test]
fn smpte_division_is_not_supported() {
    let bytes = b"MThd\x00\x00\x00\x06\x00\x01\x00\x01\xE7\x28";
    let mut reader = Reader::from_byte_slice(bytes);
    assert!(matches!(
        Header::read(&mut reader),
        Err(MidiError::NotSupported(_))
    ));
}

#[test]
fn unknown_file_type() {
    let bytes = b"MThd\x00\x00\x00\x06\x00\x05\x00\x01\x00\x60";
    let mut reader = Reader::from_byte_slice(bytes);
    let err = Header::read(&mut reader).unwrap_err();
    assert_eq!(err.position(), Some(14));
}
