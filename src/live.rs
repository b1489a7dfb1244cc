#![doc = r#"
Hooks for a live device interface.

Messages exchanged with a device carry no delta time and never rely on
running status. Opening ports and moving bytes is left to the caller; these
functions only turn bytes into [`ChannelEvent`]s and back.
"#]

use crate::{
    MidiError, MidiResult,
    events::{ChannelEvent, Event},
    reader::Reader,
};

/// Decodes one message received from a device.
///
/// `timestamp` becomes the event's delay.
pub fn decode_message(bytes: &[u8], timestamp: u32) -> MidiResult<ChannelEvent> {
    let mut reader = Reader::from_byte_slice(bytes);
    Ok(ChannelEvent::read_message(&mut reader, timestamp)?)
}

/// Encodes an event to send to a device.
///
/// Only channel events can be sent; anything else is an invalid argument.
/// The event's delay is not part of the bytes.
pub fn encode_message(event: &Event) -> MidiResult<Vec<u8>> {
    let Event::Channel(channel_event) = event else {
        return Err(MidiError::InvalidArgument(
            "Expected a channel event to be sent".to_string(),
        ));
    };
    Ok(channel_event.to_message_bytes()?)
}

#[test]
fn decode_live_note_on() {
    use crate::events::ChannelMessage;
    let event = decode_message(&[0x93, 0x3C, 0x7F], 1234).unwrap();
    assert_eq!(event.channel(), 3);
    assert_eq!(event.delay, 1234);
    assert_eq!(
        event.message,
        ChannelMessage::NoteOn {
            note: 0x3C,
            velocity: 0x7F
        }
    );
}

#[test]
fn live_messages_need_a_status() {
    assert!(decode_message(&[0x3C, 0x7F], 0).is_err());
    assert!(decode_message(&[0xFF, 0x2F, 0x00], 0).is_err());
    assert_eq!(decode_message(&[0xC0], 0).unwrap_err().position(), Some(1));
}

#[test]
fn only_channel_events_are_sent() {
    use crate::events::MetaEvent;
    let note: Event = ChannelEvent::note_off(50, 9, 38, 64).unwrap().into();
    assert_eq!(encode_message(&note).unwrap(), vec![0x89, 38, 64]);

    let meta: Event = MetaEvent::end_of_track(0).into();
    assert!(matches!(
        encode_message(&meta),
        Err(MidiError::InvalidArgument(_))
    ));
}
