use crate::writer::{EncodeError, WriteResult};

#[doc = r#"
Tempo, stored as microseconds per quarter note.

The file stores the tempo as a 24-bit microsecond count. This type keeps that
count exactly and derives beats per minute from it, so decoding and
re-encoding never drifts.

# Example
```rust
# use midifile::prelude::*;
let tempo = Tempo::new(500_000);
assert_eq!(tempo.bpm(), 120.);
assert_eq!(Tempo::from_bpm(120.), tempo);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo {
    micros_per_quarter_note: u32,
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(500_000)
    }
}

impl Tempo {
    /// Largest value the 24-bit field can hold
    pub const MAX_MICROS: u32 = 0x00FF_FFFF;

    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self {
            micros_per_quarter_note,
        }
    }

    /// Create a tempo from beats per minute, rounded to the nearest microsecond.
    pub fn from_bpm(bpm: f64) -> Self {
        Self::new((60_000_000. / bpm).round() as u32)
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.micros_per_quarter_note
    }

    /// Beats per minute, `60,000,000 / micros_per_quarter_note`
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.micros_per_quarter_note as f64
    }

    pub(crate) const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    pub(crate) const fn to_bytes(self) -> WriteResult<[u8; 3]> {
        let us = self.micros_per_quarter_note;
        if us == 0 || us > Self::MAX_MICROS {
            return Err(EncodeError::Tempo(us));
        }
        let [_, a, b, c] = us.to_be_bytes();
        Ok([a, b, c])
    }
}

#[test]
fn tempo_from_wire_bytes() {
    let tempo = Tempo::from_bytes([0x07, 0xA1, 0x20]);
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(tempo.bpm(), 120.);
    assert_eq!(tempo.to_bytes().unwrap(), [0x07, 0xA1, 0x20]);
}

#[test]
fn tempo_must_fit_24_bits() {
    assert_eq!(Tempo::new(0).to_bytes(), Err(EncodeError::Tempo(0)));
    assert_eq!(
        Tempo::new(0x0100_0000).to_bytes(),
        Err(EncodeError::Tempo(0x0100_0000))
    );
}
