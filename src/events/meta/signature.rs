#![doc = r#"
Time and key signatures.
"#]

/// A time signature as stored in the file.
///
/// The four wire bytes are kept as is; [`TimeSignature::denominator`] and
/// [`TimeSignature::clock_signals_per_beat`] derive the musical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// The denominator as a power of two (2 means quarter notes)
    pub denominator_power: u8,
    /// MIDI clocks per metronome click
    pub metronome: u8,
    /// The fourth byte; `192 / byte` clock signals per beat
    pub clocks_divisor: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_power: 2,
            metronome: 24,
            clocks_divisor: 8,
        }
    }
}

impl TimeSignature {
    /// Number of payload bytes
    pub const LEN: usize = 4;

    /// `2^denominator_power`, or `None` if it overflows a `u32`
    pub const fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_power as u32)
    }

    /// `192 / clocks_divisor`; infinite when the divisor is zero
    pub fn clock_signals_per_beat(&self) -> f64 {
        192. / self.clocks_divisor as f64
    }

    pub(crate) const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            numerator: bytes[0],
            denominator_power: bytes[1],
            metronome: bytes[2],
            clocks_divisor: bytes[3],
        }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_power,
            self.metronome,
            self.clocks_divisor,
        ]
    }
}

/// A key signature: count of sharps (positive) or flats (negative), and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Sharps when positive, flats when negative
    pub sharps: i8,
    /// Major when true, minor otherwise
    pub major: bool,
}

impl Default for KeySignature {
    fn default() -> Self {
        Self {
            sharps: 0,
            major: true,
        }
    }
}

impl KeySignature {
    /// Number of payload bytes
    pub const LEN: usize = 2;

    pub(crate) const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            sharps: bytes[0] as i8,
            major: bytes[1] == 0,
        }
    }

    pub(crate) const fn to_bytes(self) -> [u8; 2] {
        [self.sharps as u8, if self.major { 0 } else { 1 }]
    }
}

#[test]
fn time_signature_values() {
    // 6/8, 36 clocks per click, 8 notated 32nds
    let sig = TimeSignature::from_bytes([6, 3, 36, 8]);
    assert_eq!(sig.numerator, 6);
    assert_eq!(sig.denominator(), Some(8));
    assert_eq!(sig.clock_signals_per_beat(), 24.);
    assert_eq!(sig.to_bytes(), [6, 3, 36, 8]);

    let silly = TimeSignature::from_bytes([1, 40, 0, 0]);
    assert_eq!(silly.denominator(), None);
    assert!(silly.clock_signals_per_beat().is_infinite());
}

#[test]
fn key_signature_values() {
    // three flats, minor
    let key = KeySignature::from_bytes([0xFD, 0x01]);
    assert_eq!(key.sharps, -3);
    assert!(!key.major);
    assert_eq!(key.to_bytes(), [0xFD, 0x01]);
    assert!(KeySignature::from_bytes([0x02, 0x00]).major);
}
