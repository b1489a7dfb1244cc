#![doc = r#"
Channel events: the performance messages of a track.

The status byte's high nibble is the [`ChannelType`], the low nibble is the
channel (0 to 15). One or two data bytes follow, depending on the type.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    InvalidEventError,
    reader::{ParseError, ReadResult, Reader, inv_data},
    writer::{EncodeError, WriteOptions, WriteResult, data_byte},
};

use super::RunningStatus;

/// The kind of a channel event, as found in the status byte's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelType {
    /// Release a note
    NoteOff = 0x8,
    /// Press a note
    NoteOn = 0x9,
    /// Polyphonic key pressure
    NoteAftertouch = 0xA,
    /// Control change
    Controller = 0xB,
    /// Program (instrument) change
    ProgramChange = 0xC,
    /// Pressure for the whole channel
    ChannelAftertouch = 0xD,
    /// Pitch wheel
    PitchBend = 0xE,
}

impl ChannelType {
    /// Number of data bytes following the status
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelAftertouch => 1,
            _ => 2,
        }
    }

    /// The message this type carries when no fields are given.
    pub const fn default_message(&self) -> ChannelMessage {
        match self {
            Self::NoteOff => ChannelMessage::NoteOff {
                note: 0,
                velocity: 0,
            },
            Self::NoteOn => ChannelMessage::NoteOn {
                note: 0,
                velocity: 0,
            },
            Self::NoteAftertouch => ChannelMessage::NoteAftertouch {
                note: 0,
                pressure: 0,
            },
            Self::Controller => ChannelMessage::Controller {
                controller: 0,
                value: 0,
            },
            Self::ProgramChange => ChannelMessage::ProgramChange { program: 0 },
            Self::ChannelAftertouch => ChannelMessage::ChannelAftertouch { pressure: 0 },
            Self::PitchBend => ChannelMessage::PitchBend { value: 0 },
        }
    }
}

/// The fields of a channel event, by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMessage {
    /// Release a note
    NoteOff {
        /// Key number
        note: u8,
        /// Release velocity
        velocity: u8,
    },
    /// Press a note
    NoteOn {
        /// Key number
        note: u8,
        /// Attack velocity, 0 is commonly treated as a note off
        velocity: u8,
    },
    /// Change the pressure on a single held note
    NoteAftertouch {
        /// Key number
        note: u8,
        /// New pressure
        pressure: u8,
    },
    /// Set a controller value
    Controller {
        /// Controller number
        controller: u8,
        /// New value
        value: u8,
    },
    /// Select an instrument
    ProgramChange {
        /// Program number
        program: u8,
    },
    /// Change the pressure on every held note
    ChannelAftertouch {
        /// New pressure
        pressure: u8,
    },
    /// Bend the pitch of the channel
    PitchBend {
        /// -8192 (full down) ..= 8191 (full up), 0 is centred
        value: i16,
    },
}

impl ChannelMessage {
    /// Returns the type of this message
    pub const fn channel_type(&self) -> ChannelType {
        match self {
            Self::NoteOff { .. } => ChannelType::NoteOff,
            Self::NoteOn { .. } => ChannelType::NoteOn,
            Self::NoteAftertouch { .. } => ChannelType::NoteAftertouch,
            Self::Controller { .. } => ChannelType::Controller,
            Self::ProgramChange { .. } => ChannelType::ProgramChange,
            Self::ChannelAftertouch { .. } => ChannelType::ChannelAftertouch,
            Self::PitchBend { .. } => ChannelType::PitchBend,
        }
    }

    fn read(reader: &mut Reader<'_>, channel_type: ChannelType) -> ReadResult<Self> {
        use ChannelType::*;
        Ok(match channel_type {
            NoteOff => Self::NoteOff {
                note: read_data_byte(reader)?,
                velocity: read_data_byte(reader)?,
            },
            NoteOn => Self::NoteOn {
                note: read_data_byte(reader)?,
                velocity: read_data_byte(reader)?,
            },
            NoteAftertouch => Self::NoteAftertouch {
                note: read_data_byte(reader)?,
                pressure: read_data_byte(reader)?,
            },
            Controller => Self::Controller {
                controller: read_data_byte(reader)?,
                value: read_data_byte(reader)?,
            },
            ProgramChange => Self::ProgramChange {
                program: read_data_byte(reader)?,
            },
            ChannelAftertouch => Self::ChannelAftertouch {
                pressure: read_data_byte(reader)?,
            },
            PitchBend => {
                let lsb = read_data_byte(reader)? as i16;
                let msb = read_data_byte(reader)? as i16;
                Self::PitchBend {
                    value: lsb + (msb << 7) - 8192,
                }
            }
        })
    }

    fn write_data(&self, out: &mut Vec<u8>) -> WriteResult<()> {
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                out.push(data_byte("note", note)?);
                out.push(data_byte("velocity", velocity)?);
            }
            Self::NoteAftertouch { note, pressure } => {
                out.push(data_byte("note", note)?);
                out.push(data_byte("pressure", pressure)?);
            }
            Self::Controller { controller, value } => {
                out.push(data_byte("controller", controller)?);
                out.push(data_byte("value", value)?);
            }
            Self::ProgramChange { program } => out.push(data_byte("program", program)?),
            Self::ChannelAftertouch { pressure } => out.push(data_byte("pressure", pressure)?),
            Self::PitchBend { value } => {
                if !(-8192..=8191).contains(&value) {
                    return Err(EncodeError::PitchBend(value));
                }
                let raw = (value + 8192) as u16;
                out.push((raw & 0x7F) as u8);
                out.push((raw >> 7) as u8);
            }
        }
        Ok(())
    }
}

/// Reads one 7-bit data byte.
fn read_data_byte(reader: &mut Reader<'_>) -> ReadResult<u8> {
    let byte = reader.read_u8()?;
    if byte > 0x7F {
        return Err(inv_data(reader, ParseError::DataByte(byte)));
    }
    Ok(byte)
}

#[doc = r#"
A performance event addressed to one of the sixteen MIDI channels.

# Example
```rust
# use midifile::prelude::*;
let event = ChannelEvent::new(0x9, 3, 48).unwrap();
assert_eq!(event.channel(), 3);
assert_eq!(event.message, ChannelMessage::NoteOn { note: 0, velocity: 0 });

assert!(ChannelEvent::new(0x3, 0, 0).is_err());
```
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    /// Ticks since the previous event
    pub delay: u32,
    channel: u8,
    /// The message fields
    pub message: ChannelMessage,
}

impl ChannelEvent {
    /// Creates an event of the given type byte with every field at its default.
    pub fn new(channel_type: u8, channel: u8, delay: u32) -> Result<Self, InvalidEventError> {
        let channel_type = ChannelType::try_from(channel_type)
            .map_err(|_| InvalidEventError::ChannelType(channel_type))?;
        Self::from_message(delay, channel, channel_type.default_message())
    }

    /// Creates an event from its fields.
    pub fn from_message(
        delay: u32,
        channel: u8,
        message: ChannelMessage,
    ) -> Result<Self, InvalidEventError> {
        if channel > 0x0F {
            return Err(InvalidEventError::Channel(channel));
        }
        Ok(Self {
            delay,
            channel,
            message,
        })
    }

    /// Note off
    pub fn note_off(
        delay: u32,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> Result<Self, InvalidEventError> {
        Self::from_message(delay, channel, ChannelMessage::NoteOff { note, velocity })
    }

    /// Note on
    pub fn note_on(
        delay: u32,
        channel: u8,
        note: u8,
        velocity: u8,
    ) -> Result<Self, InvalidEventError> {
        Self::from_message(delay, channel, ChannelMessage::NoteOn { note, velocity })
    }

    /// Control change
    pub fn controller(
        delay: u32,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Result<Self, InvalidEventError> {
        Self::from_message(delay, channel, ChannelMessage::Controller { controller, value })
    }

    /// Program change
    pub fn program_change(delay: u32, channel: u8, program: u8) -> Result<Self, InvalidEventError> {
        Self::from_message(delay, channel, ChannelMessage::ProgramChange { program })
    }

    /// Pitch bend, centred at 0
    pub fn pitch_bend(delay: u32, channel: u8, value: i16) -> Result<Self, InvalidEventError> {
        Self::from_message(delay, channel, ChannelMessage::PitchBend { value })
    }

    /// The channel, 0 to 15
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Moves the event to another channel
    pub fn set_channel(&mut self, channel: u8) -> Result<(), InvalidEventError> {
        if channel > 0x0F {
            return Err(InvalidEventError::Channel(channel));
        }
        self.channel = channel;
        Ok(())
    }

    /// Returns the event's type
    pub const fn channel_type(&self) -> ChannelType {
        self.message.channel_type()
    }

    /// The full status byte: type in the high nibble, channel in the low
    pub fn status(&self) -> u8 {
        (u8::from(self.channel_type()) << 4) | self.channel
    }

    /// Reads the data bytes that follow an already known `status`.
    pub(crate) fn read_data(reader: &mut Reader<'_>, delay: u32, status: u8) -> ReadResult<Self> {
        let kind = status >> 4;
        let channel_type = ChannelType::try_from(kind)
            .map_err(|_| inv_data(reader, ParseError::UnknownChannelType(kind)))?;
        let message = ChannelMessage::read(reader, channel_type)?;
        Ok(Self {
            delay,
            channel: status & 0x0F,
            message,
        })
    }

    /// Reads one fully statused message, as received from a device.
    ///
    /// There is no delta time and no running status; `delay` is supplied by
    /// the caller.
    pub fn read_message(reader: &mut Reader<'_>, delay: u32) -> ReadResult<Self> {
        let status = reader.read_u8()?;
        if !(0x80..=0xEF).contains(&status) {
            return Err(inv_data(reader, ParseError::UnknownStatus(status)));
        }
        Self::read_data(reader, delay, status)
    }

    /// Writes status (unless it can be elided) and data bytes.
    pub(crate) fn write(
        &self,
        running_status: RunningStatus,
        options: WriteOptions,
        out: &mut Vec<u8>,
    ) -> WriteResult<RunningStatus> {
        let status = self.status();
        if !(options.running_status && running_status.can_elide(status)) {
            out.push(status);
        }
        self.message.write_data(out)?;
        Ok(running_status.observe(status))
    }

    /// Encodes the event as a standalone message: status byte and data, no delta.
    pub fn to_message_bytes(&self) -> WriteResult<Vec<u8>> {
        let mut out = Vec::with_capacity(1 + self.channel_type().data_len());
        self.write(RunningStatus::NONE, WriteOptions::explicit_status(), &mut out)?;
        Ok(out)
    }
}

#[test]
fn pitch_bend_is_centred() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x00, 0x40]);
    let centre = ChannelEvent::read_data(&mut reader, 0, 0xE0).unwrap();
    assert_eq!(centre.message, ChannelMessage::PitchBend { value: 0 });

    let mut reader = Reader::from_byte_slice(&[0x00, 0x00]);
    let bottom = ChannelEvent::read_data(&mut reader, 0, 0xE0).unwrap();
    assert_eq!(bottom.message, ChannelMessage::PitchBend { value: -8192 });

    let mut reader = Reader::from_byte_slice(&[0x7F, 0x7F]);
    let top = ChannelEvent::read_data(&mut reader, 0, 0xE0).unwrap();
    assert_eq!(top.message, ChannelMessage::PitchBend { value: 8191 });
    assert_eq!(top.to_message_bytes().unwrap(), vec![0xE0, 0x7F, 0x7F]);
}

#[test]
fn pitch_bend_out_of_range() {
    let event = ChannelEvent::pitch_bend(0, 0, 8192).unwrap();
    assert_eq!(
        event.to_message_bytes(),
        Err(EncodeError::PitchBend(8192))
    );
}

#[test]
fn one_data_byte_types() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x05, 0x40]);
    let program = ChannelEvent::read_data(&mut reader, 0, 0xC9).unwrap();
    assert_eq!(program.channel(), 9);
    assert_eq!(program.message, ChannelMessage::ProgramChange { program: 5 });
    assert_eq!(reader.remaining(), 1);

    let pressure = ChannelEvent::read_data(&mut reader, 0, 0xD1).unwrap();
    assert_eq!(pressure.message, ChannelMessage::ChannelAftertouch { pressure: 0x40 });
    assert!(reader.is_eof());
}

#[test]
fn data_bytes_must_be_seven_bit() {
    let event = ChannelEvent::controller(0, 0, 7, 200).unwrap();
    assert_eq!(
        event.to_message_bytes(),
        Err(EncodeError::DataByte {
            field: "value",
            value: 200
        })
    );
}

#[test]
fn construction_validates_type_and_channel() {
    assert_eq!(
        ChannelEvent::new(0xF, 0, 0),
        Err(InvalidEventError::ChannelType(0xF))
    );
    assert_eq!(
        ChannelEvent::note_on(0, 16, 60, 100),
        Err(InvalidEventError::Channel(16))
    );
    let mut event = ChannelEvent::new(0xB, 0, 0).unwrap();
    assert!(event.set_channel(16).is_err());
    event.set_channel(15).unwrap();
    assert_eq!(event.status(), 0xBF);
}

#[test]
fn data_bytes_with_top_bit_fail_to_decode() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0xFF, 0xFF]);
    let err = ChannelEvent::read_data(&mut reader, 0, 0xE0).unwrap_err();
    assert_eq!(err.parse_kind(), Some(&ParseError::DataByte(0xFF)));
    assert_eq!(err.position(), 1);

    let mut reader = Reader::from_byte_slice(&[0x3C, 0xC8]);
    let err = ChannelEvent::read_data(&mut reader, 0, 0x90).unwrap_err();
    assert_eq!(err.parse_kind(), Some(&ParseError::DataByte(0xC8)));
    assert_eq!(err.position(), 2);
}
