use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    InvalidEventError,
    reader::{ReadResult, Reader},
    writer::{WriteResult, write_varlen_slice},
};

/// Which status byte introduced a system exclusive event.
///
/// The value is the status byte's low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SysexKind {
    /// `0xF0`: a system exclusive message
    #[default]
    Message = 0x0,
    /// `0xF7`: a continuation packet or an escaped arbitrary byte sequence
    Escape = 0x7,
}

impl SysexKind {
    /// The full status byte
    pub fn status(&self) -> u8 {
        0xF0 | u8::from(*self)
    }
}

/// System exclusive data, passed through without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysexEvent {
    /// Ticks since the previous event
    pub delay: u32,
    /// `0xF0` or `0xF7`
    pub kind: SysexKind,
    /// The payload, as stored after the length
    pub data: Vec<u8>,
}

impl SysexEvent {
    /// Creates a sysex event. `sysex_type` is `0x0` (for `0xF0`) or `0x7` (for `0xF7`).
    pub fn new(sysex_type: u8, data: Vec<u8>, delay: u32) -> Result<Self, InvalidEventError> {
        let kind =
            SysexKind::try_from(sysex_type).map_err(|_| InvalidEventError::SysexType(sysex_type))?;
        Ok(Self { delay, kind, data })
    }

    /// Reads length and payload. The status byte has already been consumed.
    pub(crate) fn read(reader: &mut Reader<'_>, delay: u32, status: u8) -> ReadResult<Self> {
        let kind = if status == 0xF7 {
            SysexKind::Escape
        } else {
            SysexKind::Message
        };
        let data = reader.read_varlen_slice()?.to_vec();
        Ok(Self { delay, kind, data })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> WriteResult<()> {
        out.push(self.kind.status());
        write_varlen_slice(&self.data, out)
    }
}

#[test]
fn sysex_payload_is_opaque() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x03, 0x43, 0x12, 0xF7, 0x00]);
    let event = SysexEvent::read(&mut reader, 12, 0xF7).unwrap();
    assert_eq!(event.kind, SysexKind::Escape);
    assert_eq!(event.data, vec![0x43, 0x12, 0xF7]);
    assert_eq!(reader.remaining(), 1);

    let mut out = Vec::new();
    event.write(&mut out).unwrap();
    assert_eq!(out, vec![0xF7, 0x03, 0x43, 0x12, 0xF7]);
}

#[test]
fn sysex_type_is_checked() {
    assert_eq!(
        SysexEvent::new(0x3, Vec::new(), 0),
        Err(InvalidEventError::SysexType(0x3))
    );
    assert_eq!(SysexEvent::new(0x0, Vec::new(), 0).unwrap().kind.status(), 0xF0);
}
