use midifile::prelude::*;
use pretty_assertions::assert_eq;

/// Header chunk followed by the given track payloads, each wrapped in `MTrk`.
fn midi_bytes(file_type: u16, declared_tracks: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&file_type.to_be_bytes());
    bytes.extend_from_slice(&declared_tracks.to_be_bytes());
    bytes.extend_from_slice(&96u16.to_be_bytes());
    for track in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(track);
    }
    bytes
}

const END_OF_TRACK: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];

fn read_error(err: MidiError) -> ReaderError {
    match err {
        MidiError::Read(e) => e,
        other => panic!("Expected a read error, got {other:?}"),
    }
}

#[test]
fn multi_track_round_trip() {
    let mut file = MidiFile::new();
    file.set_ticks_per_beat(480).unwrap();
    file.push_track(vec![
        MetaEvent::track_name(0, "conductor").into(),
        MetaEvent::tempo(0, Tempo::from_bpm(90.0)).into(),
        MetaEvent::time_signature(0, TimeSignature::default()).into(),
        MetaEvent::end_of_track(0).into(),
    ])
    .unwrap();
    file.push_track(vec![
        ChannelEvent::program_change(0, 0, 24).unwrap().into(),
        ChannelEvent::note_on(0, 0, 60, 100).unwrap().into(),
        ChannelEvent::note_on(0, 0, 64, 100).unwrap().into(),
        ChannelEvent::controller(120, 0, 64, 127).unwrap().into(),
        ChannelEvent::pitch_bend(0, 0, -4096).unwrap().into(),
        ChannelEvent::note_on(360, 0, 60, 0).unwrap().into(),
        SysexEvent::new(0x0, vec![0x7E, 0x7F, 0x09, 0x01, 0xF7], 0)
            .unwrap()
            .into(),
        MetaEvent::end_of_track(0).into(),
    ])
    .unwrap();

    let bytes = encode_file(&file).unwrap();
    let decoded = decode_file(&bytes).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded.header().track_count(), 2);
    assert_eq!(decoded.header().ticks_per_beat(), 480);

    let explicit = file.to_bytes_with(WriteOptions::explicit_status()).unwrap();
    assert!(explicit.len() > bytes.len());
    assert_eq!(MidiFile::parse(&explicit).unwrap(), file);
}

#[test]
fn running_status_is_decoded_and_encoded() {
    let track: &[u8] = &[
        0x00, 0x90, 0x3C, 0x64, // note on, explicit status
        0x00, 0x40, 0x64, // note on, running status
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = midi_bytes(1, 1, &[track]);
    let file = MidiFile::parse(&bytes).unwrap();

    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 3);
    let second = events[1].as_channel().unwrap();
    assert_eq!(second.status(), 0x90);
    assert_eq!(
        second.message,
        ChannelMessage::NoteOn {
            note: 0x40,
            velocity: 0x64
        }
    );

    // re-encoding elides the same status byte again
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn single_track_file_keeps_first_track() {
    let first: &[u8] = &[0x00, 0xFF, 0x03, 0x01, b'a', 0x00, 0xFF, 0x2F, 0x00];
    let second: &[u8] = &[0x00, 0xFF, 0x03, 0x01, b'b', 0x00, 0xFF, 0x2F, 0x00];
    let third: &[u8] = &[0x00, 0xFF, 0x03, 0x01, b'c', 0x00, 0xFF, 0x2F, 0x00];
    let bytes = midi_bytes(0, 3, &[first, second, third]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().file_type(), FileType::SingleTrack);
    assert_eq!(file.header().track_count(), 1);
    assert_eq!(file.tracks().len(), 1);
    let name = file.tracks()[0].event(0).and_then(Event::as_meta).unwrap();
    assert_eq!(name.message.text(), Some("a"));

    // the kept track is written back as a single-track file
    let rewritten = MidiFile::parse(&file.to_bytes().unwrap()).unwrap();
    assert_eq!(rewritten.header().track_count(), 1);
    assert_eq!(rewritten, file);
}

#[test]
fn input_without_header_is_not_a_midi_file() {
    assert_eq!(MidiFile::parse(b"RIFF1234WAVE"), Err(MidiError::NotMidiFile));
    assert_eq!(MidiFile::parse(&[]), Err(MidiError::NotMidiFile));
}

#[test]
fn smpte_division_is_not_supported() {
    let mut bytes = midi_bytes(1, 1, &[END_OF_TRACK]);
    bytes[12] = 0xE8; // -24 fps
    bytes[13] = 0x04;
    assert!(matches!(
        MidiFile::parse(&bytes),
        Err(MidiError::NotSupported(_))
    ));
}

#[test]
fn tempo_meta_event_converts_to_bpm() {
    let track: &[u8] = &[
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 500000 µs per quarter note
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&midi_bytes(1, 1, &[track])).unwrap();
    let meta = file.tracks()[0].event(0).and_then(Event::as_meta).unwrap();
    let MetaMessage::Tempo(tempo) = meta.message else {
        panic!("Expected a tempo event, got {:?}", meta.message);
    };
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert!((tempo.bpm() - 120.0).abs() < 1e-9);
}

#[test]
fn pitch_bend_is_centered() {
    let track: &[u8] = &[
        0x00, 0xE0, 0x00, 0x40, // center
        0x00, 0x00, 0x00, // running status, lowest
        0x00, 0x7F, 0x7F, // running status, highest
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let bytes = midi_bytes(1, 1, &[track]);
    let file = MidiFile::parse(&bytes).unwrap();
    let values: Vec<i16> = file.tracks()[0]
        .events()
        .iter()
        .filter_map(Event::as_channel)
        .map(|e| match e.message {
            ChannelMessage::PitchBend { value } => value,
            ref other => panic!("Expected pitch bend, got {other:?}"),
        })
        .collect();
    assert_eq!(values, vec![0, -8192, 8191]);
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn unknown_meta_type_fails_with_position() {
    let track: &[u8] = &[0x00, 0xFF, 0x99, 0x00];
    let err = read_error(MidiFile::parse(&midi_bytes(1, 1, &[track])).unwrap_err());
    assert_eq!(err.parse_kind(), Some(&ParseError::UnknownMetaType(0x99)));
    // 14 byte header, 8 byte track chunk header, then delay, 0xFF, type, length
    assert_eq!(err.position(), 26);

    assert_eq!(
        MetaEvent::new(0x99, 0),
        Err(InvalidEventError::MetaType(0x99))
    );
}

#[test]
fn wrong_chunk_tag_mid_stream() {
    let mut bytes = midi_bytes(1, 2, &[END_OF_TRACK, END_OF_TRACK]);
    let second_tag = 14 + 8 + END_OF_TRACK.len();
    bytes[second_tag..second_tag + 4].copy_from_slice(b"XTrk");

    let err = read_error(MidiFile::parse(&bytes).unwrap_err());
    assert_eq!(
        err.parse_kind(),
        Some(&ParseError::ChunkTag {
            found: *b"XTrk",
            expected: *b"MTrk",
        })
    );
}

#[test]
fn missing_track_chunk_is_out_of_bounds() {
    let bytes = midi_bytes(1, 2, &[END_OF_TRACK]);
    let err = read_error(MidiFile::parse(&bytes).unwrap_err());
    assert!(err.is_out_of_bounds());
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = midi_bytes(1, 1, &[END_OF_TRACK]);
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn track_count_follows_track_list() {
    let mut file = MidiFile::new();
    assert_eq!(file.header().track_count(), 0);

    file.push_track(vec![MetaEvent::end_of_track(0).into()])
        .unwrap();
    file.insert_track(0, vec![MetaEvent::track_name(0, "first").into()])
        .unwrap();
    assert_eq!(file.header().track_count(), 2);
    assert_eq!(file.track(0).unwrap().len(), 1);

    assert!(matches!(
        file.insert_track(5, Vec::new()),
        Err(MidiError::InvalidArgument(_))
    ));
    assert!(matches!(
        file.remove_track(2),
        Err(MidiError::InvalidArgument(_))
    ));

    let removed = file.remove_track(0).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(file.header().track_count(), 1);

    file.track_mut(0)
        .unwrap()
        .push_event(ChannelEvent::note_on(0, 0, 60, 64).unwrap());
    let mut total = 0;
    file.for_each_track(|t| total += t.len());
    assert_eq!(total, 2);

    assert!(file.pop_track().is_some());
    assert!(file.pop_track().is_none());
    assert_eq!(file.header().track_count(), 0);

    let bytes = file.to_bytes().unwrap();
    assert_eq!(MidiFile::parse(&bytes).unwrap().tracks().len(), 0);
}

#[test]
fn invalid_constructor_arguments() {
    assert_eq!(
        ChannelEvent::new(0xF, 0, 0),
        Err(InvalidEventError::ChannelType(0xF))
    );
    assert_eq!(
        ChannelEvent::note_on(0, 16, 60, 64),
        Err(InvalidEventError::Channel(16))
    );
    assert_eq!(
        SysexEvent::new(0x3, Vec::new(), 0),
        Err(InvalidEventError::SysexType(0x3))
    );

    let mut file = MidiFile::new();
    assert!(file.set_file_type(3).is_err());
    assert!(file.set_ticks_per_beat(0).is_err());
    assert_eq!(file.header().ticks_per_beat(), 120);
}

#[test]
fn out_of_range_values_fail_to_encode() {
    let mut file = MidiFile::new();
    file.push_track(vec![MetaEvent::end_of_track(0x1000_0000).into()])
        .unwrap();
    assert_eq!(
        file.to_bytes(),
        Err(MidiError::Encode(EncodeError::VarLenOverflow(0x1000_0000)))
    );
}

#[test]
fn corrupt_pitch_bend_is_a_read_error() {
    let track: &[u8] = &[0x00, 0xE0, 0xFF, 0xFF];
    let err = read_error(MidiFile::parse(&midi_bytes(1, 1, &[track])).unwrap_err());
    assert_eq!(err.parse_kind(), Some(&ParseError::DataByte(0xFF)));
    // 14 byte header, 8 byte track chunk header, delay, status, first data byte
    assert_eq!(err.position(), 25);
}

#[test]
fn decoded_files_can_be_encoded() {
    let velocity_too_high: &[u8] = &[0x00, 0x90, 0x3C, 0xC8];
    let err = read_error(MidiFile::parse(&midi_bytes(1, 1, &[velocity_too_high])).unwrap_err());
    assert_eq!(err.parse_kind(), Some(&ParseError::DataByte(0xC8)));
    assert_eq!(err.position(), 26);

    let zero_tempo: &[u8] = &[0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00];
    let err = read_error(MidiFile::parse(&midi_bytes(1, 1, &[zero_tempo])).unwrap_err());
    assert_eq!(err.parse_kind(), Some(&ParseError::ZeroTempo));
}

#[test]
fn ticks_per_beat_with_top_bit_fail_to_encode() {
    let mut file = MidiFile::new();
    file.set_ticks_per_beat(0x8000).unwrap();
    assert_eq!(file.header().ticks_per_beat(), 0x8000);
    assert_eq!(
        file.to_bytes(),
        Err(MidiError::Encode(EncodeError::TicksPerBeat(0x8000)))
    );
}
