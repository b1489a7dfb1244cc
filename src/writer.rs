#![doc = r#"
Encoding primitives shared by the chunk, header, track and event encoders.
"#]

use thiserror::Error;

/// Largest value a four byte variable-length quantity can hold.
pub const MAX_VARLEN: u32 = 0x0FFF_FFFF;

/// Options that steer the encoder.
///
/// Decoding always accepts both explicit and elided status bytes, so these
/// only change the shape of the output, never its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteOptions {
    /// Omit a channel event's status byte when it repeats the last one written.
    pub running_status: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            running_status: true,
        }
    }
}

impl WriteOptions {
    /// Always emit status bytes.
    pub const fn explicit_status() -> Self {
        Self {
            running_status: false,
        }
    }
}

#[doc = r#"
Values that cannot be represented in a Standard MIDI File.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Delta times and lengths must fit in four 7-bit groups
    #[error("MIDI encoding error: expected a value up to 0xFFFFFFF but found {0:#X}")]
    VarLenOverflow(u32),
    /// Channel event data bytes are 7-bit
    #[error("MIDI encoding error: expected {field} in 0..=127 but found {value}")]
    DataByte {
        /// Name of the offending field
        field: &'static str,
        /// The value that was supplied
        value: u8,
    },
    /// Pitch bend is a signed 14-bit value
    #[error("MIDI encoding error: expected pitch bend in -8192..=8191 but found {0}")]
    PitchBend(i16),
    /// Tempo is a non-zero 24-bit microsecond count
    #[error("MIDI encoding error: expected tempo in 1..=0xFFFFFF microseconds but found {0}")]
    Tempo(u32),
    /// SMPTE offset hours share a byte with the frame rate
    #[error("MIDI encoding error: expected SMPTE hours in 0..=63 but found {0}")]
    SmpteHours(u8),
    /// The header's top division bit selects SMPTE timing
    #[error("MIDI encoding error: expected ticks per beat in 1..=0x7FFF but found {0}")]
    TicksPerBeat(u16),
    /// Chunk lengths are 32-bit
    #[error("MIDI encoding error: expected a chunk up to 4 GiB but found {0} bytes")]
    ChunkTooLarge(usize),
}

/// Result of an encode operation
pub type WriteResult<T> = Result<T, EncodeError>;

/// Appends `value` as a variable-length quantity using the fewest bytes possible.
pub fn write_varlen(value: u32, out: &mut Vec<u8>) -> WriteResult<()> {
    if value > MAX_VARLEN {
        return Err(EncodeError::VarLenOverflow(value));
    }
    let mut groups = [0u8; 4];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    // groups are least significant first
    for i in (0..len).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(groups[i] | continuation);
    }
    Ok(())
}

/// Convenience wrapper around [`write_varlen`].
pub fn encode_varlen(value: u32) -> WriteResult<Vec<u8>> {
    let mut out = Vec::with_capacity(4);
    write_varlen(value, &mut out)?;
    Ok(out)
}

/// Appends a length-prefixed byte payload.
pub(crate) fn write_varlen_slice(data: &[u8], out: &mut Vec<u8>) -> WriteResult<()> {
    let len = u32::try_from(data.len()).map_err(|_| EncodeError::ChunkTooLarge(data.len()))?;
    write_varlen(len, out)?;
    out.extend_from_slice(data);
    Ok(())
}

/// Checks that a channel data byte is 7-bit.
pub(crate) const fn data_byte(field: &'static str, value: u8) -> WriteResult<u8> {
    if value > 0x7F {
        return Err(EncodeError::DataByte { field, value });
    }
    Ok(value)
}

#[test]
fn write_varlen_minimal() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode_varlen(0).unwrap(), vec![0x00]);
    assert_eq!(encode_varlen(0x7F).unwrap(), vec![0x7F]);
    assert_eq!(encode_varlen(0x80).unwrap(), vec![0x81, 0x00]);
    assert_eq!(encode_varlen(0x2000).unwrap(), vec![0xC0, 0x00]);
    assert_eq!(encode_varlen(0x3FFF).unwrap(), vec![0xFF, 0x7F]);
    assert_eq!(encode_varlen(0x4000).unwrap(), vec![0x81, 0x80, 0x00]);
    assert_eq!(
        encode_varlen(MAX_VARLEN).unwrap(),
        vec![0xFF, 0xFF, 0xFF, 0x7F]
    );
}

#[test]
fn write_varlen_overflow() {
    assert_eq!(
        encode_varlen(MAX_VARLEN + 1),
        Err(EncodeError::VarLenOverflow(MAX_VARLEN + 1))
    );
}

#[test]
fn varlen_round_trip() {
    use crate::reader::Reader;
    let samples = [
        0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0ABC_DEF0, MAX_VARLEN,
    ];
    for value in samples {
        let bytes = encode_varlen(value).unwrap();
        let mut reader = Reader::from_byte_slice(&bytes);
        assert_eq!(reader.read_varlen().unwrap(), value);
        assert!(reader.is_eof());
    }
}

#[test]
fn non_minimal_input_reencodes_minimal() {
    use crate::reader::Reader;
    let mut reader = Reader::from_byte_slice(&[0x80, 0x80, 0x05]);
    let value = reader.read_varlen().unwrap();
    assert_eq!(value, 5);
    assert_eq!(encode_varlen(value).unwrap(), vec![0x05]);
}
