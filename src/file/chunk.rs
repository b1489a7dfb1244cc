#![doc = r#"
Chunk framing

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then the chunk data:

```text
[Header Chunk: "MThd" | len = 6 | format | tracks | division]
[Track Chunk 1: "MTrk" | len | events...]
...
[Track Chunk N: "MTrk" | len | events...]
```

The header chunk always has a fixed length of 6 bytes. Track chunks appear after the
header chunk, one per track announced in the header.
"#]

use crate::{
    reader::{ParseError, ReadResult, Reader, ReaderError},
    writer::{EncodeError, WriteResult},
};

/// Type tag of the header chunk
pub const HEADER_TAG: [u8; 4] = *b"MThd";

/// Type tag of a track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// Reads one chunk tagged `expected` and returns a reader over its payload.
///
/// The payload reader reports positions relative to the whole input. On a
/// tag mismatch the error points just past the tag and length.
pub fn read_chunk<'a>(reader: &mut Reader<'a>, expected: [u8; 4]) -> ReadResult<Reader<'a>> {
    let found: [u8; 4] = reader.read_exact_size()?;
    let len = reader.read_u32_be()?;
    if found != expected {
        return Err(ReaderError::parse_error(
            reader.buffer_position(),
            ParseError::ChunkTag { found, expected },
        ));
    }
    reader.sub_reader(len as usize)
}

/// Appends `tag`, the big-endian payload length, then the payload.
pub fn write_chunk(tag: [u8; 4], payload: &[u8], out: &mut Vec<u8>) -> WriteResult<()> {
    let len =
        u32::try_from(payload.len()).map_err(|_| EncodeError::ChunkTooLarge(payload.len()))?;
    out.reserve(8 + payload.len());
    out.extend_from_slice(&tag);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

#[test]
fn chunk_round_trip() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    write_chunk(TRACK_TAG, &[1, 2, 3], &mut out).unwrap();
    assert_eq!(out, b"MTrk\x00\x00\x00\x03\x01\x02\x03".to_vec());

    out.push(0x99);
    let mut reader = Reader::from_byte_slice(&out);
    let mut payload = read_chunk(&mut reader, TRACK_TAG).unwrap();
    assert_eq!(payload.buffer_position(), 8);
    assert_eq!(payload.read_exact(3).unwrap(), &[1, 2, 3]);
    assert!(payload.is_eof());
    assert_eq!(reader.read_u8().unwrap(), 0x99);
}

#[test]
fn chunk_tag_mismatch() {
    let bytes = b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60";
    let mut reader = Reader::from_byte_slice(bytes);
    let err = read_chunk(&mut reader, TRACK_TAG).unwrap_err();
    assert_eq!(err.position(), 8);
    assert_eq!(
        err.parse_kind(),
        Some(&ParseError::ChunkTag {
            found: HEADER_TAG,
            expected: TRACK_TAG
        })
    );
}

#[test]
fn chunk_longer_than_input() {
    let mut reader = Reader::from_byte_slice(b"MTrk\x00\x00\x00\x09\x00");
    assert!(read_chunk(&mut reader, TRACK_TAG).unwrap_err().is_out_of_bounds());
}
