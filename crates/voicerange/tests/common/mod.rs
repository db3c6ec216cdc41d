//! Hand-assembled Standard MIDI Files for tests.

#![allow(dead_code)]

/// One track's worth of events, written with a running tick cursor.
#[derive(Default)]
pub struct TrackBuilder {
    data: Vec<u8>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        let mut track = Self::new();
        track.data.extend_from_slice(&[0x00, 0xFF, 0x03]);
        write_vlq(&mut track.data, name.len() as u32);
        track.data.extend_from_slice(name.as_bytes());
        track
    }

    pub fn tempo(mut self, usec_per_beat: u32) -> Self {
        self.data.extend_from_slice(&[
            0x00,
            0xFF,
            0x51,
            0x03,
            (usec_per_beat >> 16) as u8,
            (usec_per_beat >> 8) as u8,
            usec_per_beat as u8,
        ]);
        self
    }

    /// A note held for `ticks`, starting right after the previous event.
    pub fn note(mut self, channel: u8, pitch: u8, ticks: u32) -> Self {
        self.data.extend_from_slice(&[0x00, 0x90 | channel, pitch, 100]);
        write_vlq(&mut self.data, ticks);
        self.data.extend_from_slice(&[0x80 | channel, pitch, 0]);
        self
    }

    pub fn notes(self, channel: u8, pitches: &[u8], ticks: u32) -> Self {
        pitches
            .iter()
            .fold(self, |track, &pitch| track.note(channel, pitch, ticks))
    }

    pub fn program(mut self, channel: u8, program: u8) -> Self {
        self.data.extend_from_slice(&[0x00, 0xC0 | channel, program]);
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
        self.data
    }
}

/// Assemble a format-1 file (format 0 when there is a single track).
pub fn build_smf(tracks: Vec<TrackBuilder>) -> Vec<u8> {
    let format: u16 = if tracks.len() == 1 { 0 } else { 1 };
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&format.to_be_bytes());
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&480u16.to_be_bytes());
    for track in tracks {
        let data = track.finish();
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(&data);
    }
    buf
}

/// Four-part SATB file with a conductor track.
pub fn satb() -> Vec<u8> {
    build_smf(vec![
        TrackBuilder::new().tempo(500_000),
        TrackBuilder::named("Soprano").notes(0, &[72, 74, 76, 72, 84], 480),
        TrackBuilder::named("Alto").notes(1, &[65, 67, 65, 64], 480),
        TrackBuilder::named("Tenor").notes(2, &[57, 59, 60, 57], 480),
        TrackBuilder::named("Bass").notes(3, &[48, 43, 41, 48], 480),
    ])
}

fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    buf.extend_from_slice(&bytes);
}
