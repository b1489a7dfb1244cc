/// The last channel status byte seen while reading or writing one track.
///
/// Only channel message statuses (`0x80..=0xEF`) change it. Meta and system
/// exclusive events leave it untouched, so a channel event after them may
/// still omit its status byte.
///
/// A fresh value is used for every track; nothing carries across tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStatus(Option<u8>);

impl RunningStatus {
    /// No status has been seen yet
    pub const NONE: Self = Self(None);

    /// Returns the remembered status byte
    pub const fn status(&self) -> Option<u8> {
        self.0
    }

    /// The running status after an event with `status` was read or written.
    pub const fn observe(self, status: u8) -> Self {
        match status {
            0x80..=0xEF => Self(Some(status)),
            _ => self,
        }
    }

    /// True if a channel event with `status` may leave its status byte out.
    pub const fn can_elide(&self, status: u8) -> bool {
        matches!(self.0, Some(s) if s == status)
    }
}

#[test]
fn only_channel_statuses_are_remembered() {
    let status = RunningStatus::NONE.observe(0x93);
    assert_eq!(status.status(), Some(0x93));
    assert_eq!(status.observe(0xFF), status);
    assert_eq!(status.observe(0xF0), status);
    assert_eq!(status.observe(0xF7), status);
    assert_eq!(status.observe(0xB3).status(), Some(0xB3));
    assert_eq!(RunningStatus::NONE.observe(0xFF), RunningStatus::NONE);
}

#[test]
fn elision_needs_an_exact_match() {
    let status = RunningStatus::NONE.observe(0x90);
    assert!(status.can_elide(0x90));
    assert!(!status.can_elide(0x91));
    assert!(!RunningStatus::NONE.can_elide(0x90));
}
