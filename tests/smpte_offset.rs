use midifile::prelude::*;
use pretty_assertions::assert_eq;

/// Helper function to create a minimal MIDI file with SMPTE offset
/// Returns the complete MIDI file as a byte vector
fn create_midi_with_smpte_offset(
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let mut bytes = Vec::new();

    // MIDI Header
    bytes.extend_from_slice(b"MThd"); // Header chunk type
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]); // Header length (6 bytes)
    bytes.extend_from_slice(&[0x00, 0x00]); // Format 0 (single track)
    bytes.extend_from_slice(&[0x00, 0x01]); // Number of tracks (1)
    bytes.extend_from_slice(&[0x00, 0x60]); // 96 ticks per quarter note

    // Track Header
    bytes.extend_from_slice(b"MTrk"); // Track chunk type

    // Calculate track length (we'll update this later)
    let track_length_pos = bytes.len();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // Placeholder for length

    let track_start = bytes.len();

    // SMPTE Offset Meta Event
    bytes.push(0x00); // Delta time
    bytes.push(0xFF); // Meta event
    bytes.push(0x54); // SMPTE Offset type
    bytes.push(0x05); // Length (5 bytes)

    // SMPTE data: rate in the top two bits, hours below
    bytes.push((fps.bits() << 6) | (hour & 0x3F));
    bytes.push(minute);
    bytes.push(second);
    bytes.push(frame);
    bytes.push(subframe);

    // Add a simple note to make it a valid track
    bytes.push(0x00); // Delta time
    bytes.push(0x90); // Note On, channel 0
    bytes.push(0x3C); // Middle C (60)
    bytes.push(0x64); // Velocity 100

    bytes.push(0x60); // Delta time (96 ticks)
    bytes.push(0x80); // Note Off, channel 0
    bytes.push(0x3C); // Middle C
    bytes.push(0x40); // Release velocity 64

    // End of Track
    bytes.push(0x00); // Delta time
    bytes.push(0xFF); // Meta event
    bytes.push(0x2F); // End of track
    bytes.push(0x00); // Length 0

    // Update track length
    let track_length = bytes.len() - track_start;
    bytes[track_length_pos..track_length_pos + 4]
        .copy_from_slice(&(track_length as u32).to_be_bytes());

    bytes
}

fn first_smpte_offset(file: &MidiFile) -> SmpteOffset {
    let event = file.tracks()[0].event(0).expect("track has events");
    match event.as_meta().map(|m| &m.message) {
        Some(MetaMessage::SmpteOffset(offset)) => *offset,
        other => panic!("Expected SMPTE offset meta event, got {other:?}"),
    }
}

#[test]
fn test_smpte_offset_24fps() {
    let midi_data = create_midi_with_smpte_offset(
        SmpteFps::TwentyFour,
        12, // hour (noon)
        30, // minute
        15, // second
        18, // frame
        50, // subframe
    );

    let file = MidiFile::parse(&midi_data).unwrap();
    assert_eq!(file.header().file_type(), FileType::SingleTrack);
    assert_eq!(file.header().ticks_per_beat(), 96);
    assert_eq!(file.tracks()[0].len(), 4);

    let offset = first_smpte_offset(&file);
    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 12);
    assert_eq!(offset.minute, 30);
    assert_eq!(offset.second, 15);
    assert_eq!(offset.frame, 18);
    assert_eq!(offset.subframe, 50);

    // Verify microsecond calculation
    let expected_micros = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected_micros).abs() < 0.01);
}

#[test]
fn test_smpte_offset_25fps_pal() {
    let midi_data = create_midi_with_smpte_offset(
        SmpteFps::TwentyFive,
        0,  // midnight
        0,  // minute
        1,  // second
        12, // frame (middle of second)
        75, // subframe
    );

    let offset = first_smpte_offset(&MidiFile::parse(&midi_data).unwrap());
    assert_eq!(offset.fps, SmpteFps::TwentyFive);
    assert_eq!(offset.hour, 0);
    assert_eq!(offset.minute, 0);
    assert_eq!(offset.second, 1);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 75);
}

#[test]
fn test_smpte_offset_29_97_drop_frame() {
    let midi_data = create_midi_with_smpte_offset(
        SmpteFps::TwentyNine,
        23, // 11 PM
        59, // 59 minutes
        59, // 59 seconds
        28, // frame 28 (out of 29)
        99, // maximum subframe
    );

    let offset = first_smpte_offset(&MidiFile::parse(&midi_data).unwrap());
    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.fps.as_division(), 30);
    assert_eq!(offset.hour, 23);
    assert_eq!(offset.frame, 28);
    assert_eq!(offset.subframe, 99);
}

#[test]
fn test_smpte_offset_survives_rewrite() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::Thirty, 1, 2, 3, 4, 5);
    let file = MidiFile::parse(&midi_data).unwrap();

    // the source uses explicit status bytes, so the rewrite is byte identical
    let rewritten = file.to_bytes_with(WriteOptions::explicit_status()).unwrap();
    assert_eq!(rewritten, midi_data);
    assert_eq!(MidiFile::parse(&rewritten).unwrap(), file);
}

#[test]
fn test_smpte_time_division_is_rejected() {
    let mut midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyFive, 0, 0, 0, 0, 0);
    // -25 fps, 40 ticks per frame
    midi_data[12] = 0xE7;
    midi_data[13] = 0x28;

    let err = MidiFile::parse(&midi_data).unwrap_err();
    assert!(matches!(err, MidiError::NotSupported(_)));
}
