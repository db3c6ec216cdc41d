use serde::{Deserialize, Serialize};

/// Index of a voice in the order the loader discovered it.
pub type VoiceId = usize;

/// A single sung note with absolute tick timing and its voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub voice: VoiceId,
    pub channel: u8,
    pub velocity: u8,
    pub start_tick: u64,
    pub duration_ticks: u64,
}

/// One vocal part as found in the file: a whole track, or one channel of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: VoiceId,
    pub name: String,
    pub track_index: usize,
    /// Set when the voice was split out of a multi-channel track.
    pub channel: Option<u8>,
}
