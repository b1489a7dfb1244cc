#![doc = r#"
Track events and the running status state machine.

# Wire layout

Every event in a track is

```text
<delta time: varlen> [<status byte>] <payload>
```

The status byte selects the event family:

| Status         | Event                 |
|----------------|-----------------------|
| `0x80..=0xEF`  | [`ChannelEvent`]      |
| `0xF0`, `0xF7` | [`SysexEvent`]        |
| `0xFF`         | [`MetaEvent`]         |

A channel event may leave out its status byte when it equals the previous
channel status ("running status"). The decoder recognises this because the
first payload byte never has its top bit set. The state is carried
explicitly in a [`RunningStatus`] value that each read or write returns
for the next call.
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

mod running_status;
pub use running_status::*;

mod sysex;
pub use sysex::*;

use crate::{
    reader::{ParseError, ReadResult, Reader, inv_data},
    writer::{WriteOptions, WriteResult, write_varlen},
};

#[doc = r#"
One delta-timed event inside a [`Track`](crate::file::Track).
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// Information about the file or track
    Meta(MetaEvent),
    /// An opaque system exclusive payload
    Sysex(SysexEvent),
    /// A performance message bound to one channel
    Channel(ChannelEvent),
}

impl Event {
    /// Ticks since the previous event in the same track
    pub const fn delay(&self) -> u32 {
        match self {
            Self::Meta(e) => e.delay,
            Self::Sysex(e) => e.delay,
            Self::Channel(e) => e.delay,
        }
    }

    /// Change the ticks since the previous event
    pub fn set_delay(&mut self, delay: u32) {
        match self {
            Self::Meta(e) => e.delay = delay,
            Self::Sysex(e) => e.delay = delay,
            Self::Channel(e) => e.delay = delay,
        }
    }

    /// Returns the channel event, if this is one
    pub const fn as_channel(&self) -> Option<&ChannelEvent> {
        match self {
            Self::Channel(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the meta event, if this is one
    pub const fn as_meta(&self) -> Option<&MetaEvent> {
        match self {
            Self::Meta(e) => Some(e),
            _ => None,
        }
    }

    /// True for the end-of-track meta event
    pub fn is_end_of_track(&self) -> bool {
        matches!(
            self,
            Self::Meta(MetaEvent {
                message: MetaMessage::EndOfTrack,
                ..
            })
        )
    }

    /// Decodes one event.
    ///
    /// `running_status` is the value returned by the previous call for this
    /// track (or [`RunningStatus::default`] for the first event). The returned
    /// running status must be handed to the next call.
    pub fn read(
        reader: &mut Reader<'_>,
        running_status: RunningStatus,
    ) -> ReadResult<(Self, RunningStatus)> {
        let delay = reader.read_varlen()?;
        let byte = reader.read_u8()?;

        let status = if byte & 0x80 != 0 {
            byte
        } else {
            let Some(status) = running_status.status() else {
                return Err(inv_data(reader, ParseError::UndefinedStatus));
            };
            // the byte just read is the first data byte
            reader.rewind(1);
            status
        };

        let event = match status {
            0xFF => Self::Meta(MetaEvent::read(reader, delay)?),
            0xF0 | 0xF7 => Self::Sysex(SysexEvent::read(reader, delay, status)?),
            0x80..=0xEF => Self::Channel(ChannelEvent::read_data(reader, delay, status)?),
            other => return Err(inv_data(reader, ParseError::UnknownStatus(other))),
        };

        Ok((event, running_status.observe(status)))
    }

    /// Encodes one event, appending to `out`.
    ///
    /// Mirrors [`Event::read`]: the returned running status must be passed to
    /// the next call for the same track.
    pub fn write(
        &self,
        running_status: RunningStatus,
        options: WriteOptions,
        out: &mut Vec<u8>,
    ) -> WriteResult<RunningStatus> {
        write_varlen(self.delay(), out)?;
        match self {
            Self::Meta(e) => {
                e.write(out)?;
                Ok(running_status)
            }
            Self::Sysex(e) => {
                e.write(out)?;
                Ok(running_status)
            }
            Self::Channel(e) => e.write(running_status, options, out),
        }
    }
}

impl From<MetaEvent> for Event {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysexEvent> for Event {
    fn from(value: SysexEvent) -> Self {
        Self::Sysex(value)
    }
}

impl From<ChannelEvent> for Event {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

#[cfg(test)]
fn read_all(bytes: &[u8]) -> ReadResult<Vec<Event>> {
    let mut reader = Reader::from_byte_slice(bytes);
    let mut running_status = RunningStatus::default();
    let mut events = Vec::new();
    while !reader.is_eof() {
        let (event, next) = Event::read(&mut reader, running_status)?;
        running_status = next;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
fn write_all(events: &[Event], options: WriteOptions) -> WriteResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut running_status = RunningStatus::default();
    for event in events {
        running_status = event.write(running_status, options, &mut out)?;
    }
    Ok(out)
}

#[test]
fn running_status_elides_repeated_note_on() {
    use pretty_assertions::assert_eq;
    let events: Vec<Event> = vec![
        ChannelEvent::note_on(0, 0, 60, 100).unwrap().into(),
        ChannelEvent::note_on(0, 0, 64, 100).unwrap().into(),
    ];
    let bytes = write_all(&events, WriteOptions::default()).unwrap();
    assert_eq!(bytes, vec![0x00, 0x90, 60, 100, 0x00, 64, 100]);
    assert_eq!(read_all(&bytes).unwrap(), events);
}

#[test]
fn explicit_status_option_keeps_status_bytes() {
    use pretty_assertions::assert_eq;
    let events: Vec<Event> = vec![
        ChannelEvent::note_on(0, 0, 60, 100).unwrap().into(),
        ChannelEvent::note_on(0, 0, 64, 100).unwrap().into(),
    ];
    let bytes = write_all(&events, WriteOptions::explicit_status()).unwrap();
    assert_eq!(bytes, vec![0x00, 0x90, 60, 100, 0x00, 0x90, 64, 100]);
    assert_eq!(read_all(&bytes).unwrap(), events);
}

#[test]
fn running_status_survives_meta_and_sysex() {
    use pretty_assertions::assert_eq;
    let events: Vec<Event> = vec![
        ChannelEvent::note_on(0, 2, 60, 90).unwrap().into(),
        MetaEvent::text(10, "verse").into(),
        SysexEvent::new(0x0, vec![0x7E, 0x7F, 0x09, 0x01, 0xF7], 0)
            .unwrap()
            .into(),
        ChannelEvent::note_on(5, 2, 62, 90).unwrap().into(),
    ];
    let bytes = write_all(&events, WriteOptions::default()).unwrap();
    // last note on has no status byte: delay 5 then 62, 90
    assert_eq!(&bytes[bytes.len() - 3..], &[0x05, 62, 90]);
    assert_eq!(read_all(&bytes).unwrap(), events);
}

#[test]
fn status_changes_are_written() {
    let events: Vec<Event> = vec![
        ChannelEvent::note_on(0, 0, 60, 100).unwrap().into(),
        ChannelEvent::note_off(0, 0, 60, 0).unwrap().into(),
        ChannelEvent::note_off(0, 1, 60, 0).unwrap().into(),
    ];
    let bytes = write_all(&events, WriteOptions::default()).unwrap();
    assert_eq!(
        bytes,
        vec![0x00, 0x90, 60, 100, 0x00, 0x80, 60, 0, 0x00, 0x81, 60, 0]
    );
}

#[test]
fn data_byte_without_status_fails() {
    let err = read_all(&[0x00, 0x3C, 0x40]).unwrap_err();
    assert_eq!(err.position(), 2);
    assert_eq!(err.parse_kind(), Some(&ParseError::UndefinedStatus));
}

#[test]
fn meta_before_data_byte_does_not_start_running_status() {
    // end of track followed by a bare data byte
    let err = read_all(&[0x00, 0xFF, 0x2F, 0x00, 0x00, 0x3C, 0x40]).unwrap_err();
    assert_eq!(err.parse_kind(), Some(&ParseError::UndefinedStatus));
}

#[test]
fn unknown_status_fails() {
    let err = read_all(&[0x00, 0xF4]).unwrap_err();
    assert_eq!(err.position(), 2);
    assert_eq!(err.parse_kind(), Some(&ParseError::UnknownStatus(0xF4)));
}

#[test]
fn truncated_event_fails() {
    let err = read_all(&[0x00, 0x90, 0x3C]).unwrap_err();
    assert!(err.is_out_of_bounds());
    assert_eq!(err.position(), 3);
}
