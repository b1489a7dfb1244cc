#![doc = r#"
SMPTE Offset: the time code at which a track is meant to start.

The payload is five bytes:

```text
rrhhhhhh  minutes  seconds  frames  subframes
```

where `rr` indexes the frame rate (see [`SmpteFps`]) and `hhhhhh` holds the
hours. Subframes are hundredths of a frame.
"#]

use super::SmpteFps;
use crate::writer::{EncodeError, WriteResult};

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    pub fps: SmpteFps,
    /// Hour component of the time code. Six bits on the wire.
    pub hour: u8,
    /// Minute component of the time code
    pub minute: u8,
    /// Second component of the time code
    pub second: u8,
    /// Frame number within the current second
    pub frame: u8,
    /// Hundredths of a frame
    pub subframe: u8,
}

impl SmpteOffset {
    /// Number of payload bytes
    pub const LEN: usize = 5;

    /// Convert this SMPTE offset to microseconds, using its own frame rate.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps.as_f64()
    }

    /// Decode the five payload bytes.
    ///
    /// No range checks are made on the individual fields.
    pub const fn parse(data: [u8; 5]) -> Self {
        Self {
            fps: SmpteFps::from_bits(data[0] >> 6),
            hour: data[0] & 0b0011_1111,
            minute: data[1],
            second: data[2],
            frame: data[3],
            subframe: data[4],
        }
    }

    /// Encode the five payload bytes. Fails if the hour does not fit in six bits.
    pub const fn to_bytes(&self) -> WriteResult<[u8; 5]> {
        if self.hour > 0b0011_1111 {
            return Err(EncodeError::SmpteHours(self.hour));
        }
        Ok([
            (self.fps.bits() << 6) | self.hour,
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ])
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // this are the bytes after 00 FF 54 05
    // where 54 is smpte offset, and 05 is length five.
    let bytes = [0x81, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(bytes);

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
    assert_eq!(offset.to_bytes().unwrap(), bytes);
}

#[test]
fn hours_use_six_bits() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::parse([0x3F, 0, 0, 0, 0]);
    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 63);

    let too_late = SmpteOffset {
        hour: 64,
        ..Default::default()
    };
    assert_eq!(too_late.to_bytes(), Err(EncodeError::SmpteHours(64)));
}

#[test]
fn offset_in_micros() {
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFive,
        hour: 0,
        minute: 1,
        second: 2,
        frame: 5,
        subframe: 50,
    };
    let expected = 62_000_000. + 200_000. + 20_000.;
    assert!((offset.as_micros() - expected).abs() < 1e-6);
}
