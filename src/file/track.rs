use log::trace;

use super::chunk::{TRACK_TAG, read_chunk, write_chunk};
use crate::{
    MidiError, MidiResult,
    events::{Event, RunningStatus},
    reader::{ReadResult, Reader},
    writer::{WriteOptions, WriteResult},
};

#[doc = r#"
An ordered list of events.

Each event's delay counts ticks since the previous event in this track,
so the order of the list is the playing order.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<Event>,
}

impl Track {
    /// Create a track from its events
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Returns the events in order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the event at `index`
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Returns the event at `index` for editing
    pub fn event_mut(&mut self, index: usize) -> Option<&mut Event> {
        self.events.get_mut(index)
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends an event
    pub fn push_event(&mut self, event: impl Into<Event>) -> &mut Self {
        self.events.push(event.into());
        self
    }

    /// Inserts an event before `index`. `index` may equal the length.
    pub fn insert_event(&mut self, index: usize, event: impl Into<Event>) -> MidiResult<&mut Self> {
        if index > self.events.len() {
            return Err(MidiError::InvalidArgument(format!(
                "event index {index} is past the end of a track with {} events",
                self.events.len()
            )));
        }
        self.events.insert(index, event.into());
        Ok(self)
    }

    /// Removes and returns the event at `index`
    pub fn remove_event(&mut self, index: usize) -> MidiResult<Event> {
        if index >= self.events.len() {
            return Err(MidiError::InvalidArgument(format!(
                "no event at index {index} in a track with {} events",
                self.events.len()
            )));
        }
        Ok(self.events.remove(index))
    }

    /// Removes and returns the last event
    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    /// Reads one `MTrk` chunk.
    ///
    /// Events are decoded until the chunk's bytes run out; an end-of-track
    /// event is not required.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let mut chunk = read_chunk(reader, TRACK_TAG)?;
        let start = chunk.buffer_position();
        let mut running_status = RunningStatus::default();
        let mut events = Vec::new();

        while !chunk.is_eof() {
            let (event, next) = Event::read(&mut chunk, running_status)?;
            running_status = next;
            events.push(event);
        }

        trace!(
            "read track at {start}: {} events, {} bytes",
            events.len(),
            chunk.buffer_position() - start
        );
        Ok(Self { events })
    }

    /// Appends this track as an `MTrk` chunk.
    pub fn write(&self, options: WriteOptions, out: &mut Vec<u8>) -> WriteResult<()> {
        let mut data = Vec::new();
        let mut running_status = RunningStatus::default();
        for event in &self.events {
            running_status = event.write(running_status, options, &mut data)?;
        }
        trace!(
            "wrote track: {} events, {} bytes",
            self.events.len(),
            data.len()
        );
        write_chunk(TRACK_TAG, &data, out)
    }
}

impl From<Vec<Event>> for Track {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<Event> for Track {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
use crate::events::{ChannelEvent, MetaEvent};

#[test]
fn track_round_trip() {
    use pretty_assertions::assert_eq;
    let track = Track::new(vec![
        MetaEvent::track_name(0, "lead").into(),
        ChannelEvent::program_change(0, 1, 74).unwrap().into(),
        ChannelEvent::note_on(0, 1, 67, 80).unwrap().into(),
        ChannelEvent::note_on(240, 1, 67, 0).unwrap().into(),
        MetaEvent::end_of_track(0).into(),
    ]);

    let mut out = Vec::new();
    track.write(WriteOptions::default(), &mut out).unwrap();
    let mut reader = Reader::from_byte_slice(&out);
    assert_eq!(Track::read(&mut reader).unwrap(), track);
    assert!(reader.is_eof());
}

#[test]
fn running_status_does_not_cross_tracks() {
    use pretty_assertions::assert_eq;
    let track = Track::new(vec![ChannelEvent::note_on(0, 0, 60, 1).unwrap().into()]);
    let mut out = Vec::new();
    track.write(WriteOptions::default(), &mut out).unwrap();
    track.write(WriteOptions::default(), &mut out).unwrap();
    // both chunks start their first event with an explicit status
    assert_eq!(&out[8..12], &[0x00, 0x90, 60, 1]);
    assert_eq!(&out[20..24], &[0x00, 0x90, 60, 1]);
}

#[test]
fn failure_inside_track_reports_absolute_position() {
    // a note on, then 0xF4, which is not a status a file may hold
    let bytes = b"MTrk\x00\x00\x00\x06\x00\x90\x3C\x40\x00\xF4";
    let mut reader = Reader::from_byte_slice(bytes);
    let err = Track::read(&mut reader).unwrap_err();
    assert_eq!(err.position(), 14);
}

#[test]
fn event_list_editing() {
    let mut track = Track::default();
    track
        .push_event(MetaEvent::end_of_track(0))
        .insert_event(0, MetaEvent::text(0, "intro"))
        .unwrap();
    assert_eq!(track.len(), 2);
    assert!(track.event(1).unwrap().is_end_of_track());
    assert!(track.insert_event(3, MetaEvent::text(0, "late")).is_err());
    assert!(track.remove_event(2).is_err());
    assert!(track.pop_event().unwrap().is_end_of_track());
    assert_eq!(track.remove_event(0).unwrap().delay(), 0);
    assert!(track.is_empty());
}
