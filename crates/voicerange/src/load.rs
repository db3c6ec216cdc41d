//! MIDI file loading: note pairing and voice discovery.

use crate::note::{NoteEvent, Voice, VoiceId};
use crate::{Error, Result};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Ticks per quarter assumed for SMPTE-timed files.
const TIMECODE_FALLBACK_PPQ: u16 = 480;

/// How tracks and channels map onto voices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Split a track by channel only when its notes use more than one channel.
    #[default]
    Auto,
    /// One voice per track.
    Track,
    /// One voice per channel of every track.
    Channel,
}

impl std::str::FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Grouping::Auto),
            "track" => Ok(Grouping::Track),
            "channel" => Ok(Grouping::Channel),
            other => Err(format!("unknown grouping '{other}' (expected auto, track or channel)")),
        }
    }
}

/// Everything the rest of the pipeline needs from a MIDI file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedMidi {
    pub ppq: u16,
    pub format: u8,
    pub track_count: usize,
    pub voices: Vec<Voice>,
    /// Sorted by start tick, then voice, then pitch.
    pub notes: Vec<NoteEvent>,
}

impl LoadedMidi {
    pub fn notes_for(&self, voice: VoiceId) -> impl Iterator<Item = &NoteEvent> {
        self.notes.iter().filter(move |n| n.voice == voice)
    }
}

/// Read and parse a MIDI file from disk.
pub fn load(path: &Path, grouping: Grouping) -> Result<LoadedMidi> {
    let bytes = std::fs::read(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read midi file");
    load_bytes(&bytes, path, grouping)
}

/// Parse MIDI bytes; `path` is only used for error messages.
pub fn load_bytes(bytes: &[u8], path: &Path, grouping: Grouping) -> Result<LoadedMidi> {
    let smf = Smf::parse(bytes).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(extract_notes(&smf, grouping))
}

struct RawNote {
    channel: u8,
    pitch: u8,
    velocity: u8,
    onset: u64,
    offset: u64,
}

/// Pair note-on/note-off events and assign every note to a voice.
pub fn extract_notes(smf: &Smf, grouping: Grouping) -> LoadedMidi {
    let ppq = match smf.header.timing {
        midly::Timing::Metrical(ticks) => ticks.as_int(),
        midly::Timing::Timecode(_, _) => TIMECODE_FALLBACK_PPQ,
    };

    let format = match smf.header.format {
        midly::Format::SingleTrack => 0,
        midly::Format::Parallel => 1,
        midly::Format::Sequential => 2,
    };

    let mut voices = Vec::new();
    let mut notes = Vec::new();

    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut current_tick: u64 = 0;
        let mut name: Option<String> = None;
        let mut channels_used: Vec<u8> = Vec::new();
        let mut raw = Vec::new();
        // (channel, pitch) → stack of (onset_tick, velocity)
        let mut pending: BTreeMap<(u8, u8), Vec<(u64, u8)>> = BTreeMap::new();

        for event in track {
            current_tick += event.delta.as_int() as u64;

            match event.kind {
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) if name.is_none() => {
                    let text = String::from_utf8_lossy(bytes).trim().to_string();
                    if !text.is_empty() {
                        name = Some(text);
                    }
                }
                TrackEventKind::Midi { channel, message } => {
                    let ch = channel.as_int();
                    if !channels_used.contains(&ch) {
                        channels_used.push(ch);
                    }
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            pending
                                .entry((ch, key.as_int()))
                                .or_default()
                                .push((current_tick, vel.as_int()));
                        }
                        // vel=0 NoteOn is NoteOff
                        MidiMessage::NoteOff { key, .. } | MidiMessage::NoteOn { key, .. } => {
                            let key = (ch, key.as_int());
                            if let Some((onset, velocity)) =
                                pending.get_mut(&key).and_then(|stack| stack.pop())
                            {
                                raw.push(RawNote {
                                    channel: ch,
                                    pitch: key.1,
                                    velocity,
                                    onset,
                                    offset: current_tick,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let unterminated: usize = pending.values().map(Vec::len).sum();
        if unterminated > 0 {
            warn!(track_index, unterminated, "closing notes left open at end of track");
        }
        for ((channel, pitch), stack) in pending {
            for (onset, velocity) in stack {
                raw.push(RawNote {
                    channel,
                    pitch,
                    velocity,
                    onset,
                    offset: current_tick,
                });
            }
        }

        if channels_used.is_empty() {
            debug!(track_index, "skipping track without channel messages");
            continue;
        }

        let base_name = name.unwrap_or_else(|| format!("Track {track_index}"));
        let mut note_channels: Vec<u8> = Vec::new();
        for note in &raw {
            if !note_channels.contains(&note.channel) {
                note_channels.push(note.channel);
            }
        }

        let split_channels = match grouping {
            Grouping::Track => None,
            Grouping::Channel => Some(channels_used),
            Grouping::Auto if note_channels.len() > 1 => Some(note_channels),
            Grouping::Auto => None,
        };

        debug!(
            track_index,
            name = %base_name,
            notes = raw.len(),
            split = split_channels.is_some(),
            "parsed track"
        );

        match split_channels {
            None => {
                let id = voices.len();
                voices.push(Voice {
                    id,
                    name: base_name,
                    track_index,
                    channel: None,
                });
                notes.extend(raw.iter().map(|n| to_event(n, id)));
            }
            Some(mut channels) => {
                channels.sort_unstable();
                let first_id = voices.len();
                for &ch in &channels {
                    voices.push(Voice {
                        id: voices.len(),
                        name: format!("{base_name} (ch {})", ch + 1),
                        track_index,
                        channel: Some(ch),
                    });
                }
                for note in &raw {
                    if let Some(offset) = channels.iter().position(|&ch| ch == note.channel) {
                        notes.push(to_event(note, first_id + offset));
                    }
                }
            }
        }
    }

    notes.sort_by(|a, b| {
        a.start_tick
            .cmp(&b.start_tick)
            .then(a.voice.cmp(&b.voice))
            .then(a.pitch.cmp(&b.pitch))
            .then(a.channel.cmp(&b.channel))
    });

    LoadedMidi {
        ppq,
        format,
        track_count: smf.tracks.len(),
        voices,
        notes,
    }
}

fn to_event(note: &RawNote, voice: VoiceId) -> NoteEvent {
    NoteEvent {
        pitch: note.pitch,
        voice,
        channel: note.channel,
        velocity: note.velocity,
        start_tick: note.onset,
        duration_ticks: note.offset.saturating_sub(note.onset),
    }
}
