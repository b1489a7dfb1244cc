#![warn(missing_docs)]
#![doc = r#"
Reading and writing Standard MIDI Files (SMF).

A MIDI file is a header chunk (`MThd`) followed by track chunks (`MTrk`).
Each track is a sequence of delta-timed events, where consecutive channel
events may omit their status byte ("running status").

# Example
```rust
use midifile::prelude::*;

let mut file = MidiFile::new();
file.push_track(vec![
    ChannelEvent::note_on(0, 0, 60, 100).unwrap().into(),
    ChannelEvent::note_on(0, 0, 64, 100).unwrap().into(),
    MetaEvent::end_of_track(96).into(),
])
.unwrap();

let bytes = file.to_bytes().unwrap();
let parsed = MidiFile::parse(&bytes).unwrap();
assert_eq!(parsed, file);
```
"#]

mod error;
pub use error::*;

pub mod events;
pub mod file;
pub mod live;
pub mod reader;
pub mod writer;

pub use file::{decode_file, encode_file};

#[doc = r#"
Common re-exports for working with MIDI files
"#]
pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::file::*;
    pub use crate::reader::{ParseError, ReadResult, Reader, ReaderError, ReaderErrorKind};
    pub use crate::writer::{EncodeError, WriteOptions};
}
