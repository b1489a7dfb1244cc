#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

pub mod chunk;

mod header;
pub use header::*;

mod track;
pub use track::*;

use log::debug;

use crate::{
    MidiError, MidiResult,
    events::Event,
    reader::Reader,
    writer::WriteOptions,
};

#[doc = r#"
A Standard MIDI File: one [`Header`] and the tracks it announces.

The header's track count always equals the number of tracks held; the
track editing methods keep it in step.

# Example
```rust
# use midifile::prelude::*;
let mut file = MidiFile::new();
file.set_ticks_per_beat(480).unwrap();
file.push_track(vec![MetaEvent::end_of_track(0).into()])
    .unwrap()
    .push_track(vec![MetaEvent::end_of_track(0).into()])
    .unwrap();
assert_eq!(file.header().track_count(), 2);

file.pop_track();
assert_eq!(file.header().track_count(), 1);
```
"#]
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// An empty file: synchronous tracks, 120 ticks per beat, no tracks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a set of bytes into a file struct
    ///
    /// Reads the header, then exactly as many track chunks as the header
    /// announces. A single-track file keeps only its first track.
    pub fn parse(bytes: &[u8]) -> MidiResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut header = Header::read(&mut reader)?;

        let declared = header.track_count();
        let mut tracks = Vec::with_capacity(declared as usize);
        for _ in 0..declared {
            tracks.push(Track::read(&mut reader)?);
        }

        if header.file_type() == FileType::SingleTrack && tracks.len() > 1 {
            debug!(
                "single-track file declared {} tracks, keeping the first",
                tracks.len()
            );
            tracks.truncate(1);
            header.set_track_count(1);
        }

        if !reader.is_eof() {
            debug!("ignoring {} trailing bytes", reader.remaining());
        }

        Ok(Self { header, tracks })
    }

    /// Encodes the file, eliding repeated channel status bytes.
    pub fn to_bytes(&self) -> MidiResult<Vec<u8>> {
        self.to_bytes_with(WriteOptions::default())
    }

    /// Encodes the file with explicit encoder options.
    pub fn to_bytes_with(&self, options: WriteOptions) -> MidiResult<Vec<u8>> {
        let mut out = Vec::new();
        self.header.write(&mut out)?;
        for track in &self.tracks {
            track.write(options, &mut out)?;
        }
        debug!("wrote {} tracks, {} bytes", self.tracks.len(), out.len());
        Ok(out)
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Sets the file type from its numeric value (0, 1 or 2).
    pub fn set_file_type(&mut self, file_type: u16) -> MidiResult<&mut Self> {
        self.header.set_file_type(file_type)?;
        Ok(self)
    }

    /// Sets the ticks per quarter note, 1 to 65535.
    ///
    /// Encoding fails with [`EncodeError::TicksPerBeat`](crate::writer::EncodeError::TicksPerBeat)
    /// for values of `0x8000` and above, see [`Header::set_ticks_per_beat`].
    pub fn set_ticks_per_beat(&mut self, ticks_per_beat: u32) -> MidiResult<&mut Self> {
        self.header.set_ticks_per_beat(ticks_per_beat)?;
        Ok(self)
    }

    /// Returns the track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Returns the track at `index`
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Returns the track at `index` for editing its events
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Executes the provided function for all the tracks.
    pub fn for_each_track<F>(&self, func: F)
    where
        F: FnMut(&Track),
    {
        self.tracks.iter().for_each(func)
    }

    /// Appends a track made of `events`. A file holds at most 65535 tracks.
    pub fn push_track(&mut self, events: Vec<Event>) -> MidiResult<&mut Self> {
        self.insert_track(self.tracks.len(), events)
    }

    /// Inserts a track made of `events` before `index`. `index` may equal the track count.
    pub fn insert_track(&mut self, index: usize, events: Vec<Event>) -> MidiResult<&mut Self> {
        if index > self.tracks.len() {
            return Err(MidiError::InvalidArgument(format!(
                "track index {index} is past the end of a file with {} tracks",
                self.tracks.len()
            )));
        }
        if self.tracks.len() >= u16::MAX as usize {
            return Err(MidiError::InvalidArgument(
                "a MIDI file holds at most 65535 tracks".to_string(),
            ));
        }
        self.tracks.insert(index, Track::new(events));
        self.sync_track_count();
        Ok(self)
    }

    /// Removes and returns the track at `index`
    pub fn remove_track(&mut self, index: usize) -> MidiResult<Track> {
        if index >= self.tracks.len() {
            return Err(MidiError::InvalidArgument(format!(
                "no track at index {index} in a file with {} tracks",
                self.tracks.len()
            )));
        }
        let track = self.tracks.remove(index);
        self.sync_track_count();
        Ok(track)
    }

    /// Removes and returns the last track
    pub fn pop_track(&mut self) -> Option<Track> {
        let track = self.tracks.pop();
        self.sync_track_count();
        track
    }

    fn sync_track_count(&mut self) {
        // the track list never exceeds u16::MAX
        self.header.set_track_count(self.tracks.len() as u16);
    }
}

/// Decodes a complete Standard MIDI File.
pub fn decode_file(bytes: &[u8]) -> MidiResult<MidiFile> {
    MidiFile::parse(bytes)
}

/// Encodes a complete Standard MIDI File.
pub fn encode_file(file: &MidiFile) -> MidiResult<Vec<u8>> {
    file.to_bytes()
}

#[test]
fn track_list_is_capped() {
    let mut file = MidiFile::new();
    for _ in 0..u16::MAX {
        file.push_track(Vec::new()).unwrap();
    }
    assert_eq!(file.header().track_count(), u16::MAX);
    assert!(matches!(
        file.push_track(Vec::new()),
        Err(MidiError::InvalidArgument(_))
    ));
    assert!(matches!(
        file.insert_track(0, Vec::new()),
        Err(MidiError::InvalidArgument(_))
    ));
    assert_eq!(file.tracks().len(), u16::MAX as usize);
}
