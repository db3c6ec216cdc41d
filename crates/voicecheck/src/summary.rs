//! Plain-text report of each voice against its vocal range.

use owo_colors::OwoColorize;
use std::fmt::Write;
use voicerange::{note_name, LoadedMidi, RangeCatalog, Zone};

/// What the summary says about one voice.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSummary {
    pub name: String,
    pub part: Option<String>,
    pub notes: usize,
    pub lowest: Option<u8>,
    pub highest: Option<u8>,
    /// Counts in [`Zone::ALL`] order; all zero when no part matched.
    pub zones: [usize; 5],
}

pub fn summarize(midi: &LoadedMidi, catalog: &RangeCatalog) -> Vec<VoiceSummary> {
    midi.voices
        .iter()
        .map(|voice| {
            let range = catalog.lookup(&voice.name);
            let mut summary = VoiceSummary {
                name: voice.name.clone(),
                part: range.map(|r| r.part.clone()),
                notes: 0,
                lowest: None,
                highest: None,
                zones: [0; 5],
            };

            for note in midi.notes_for(voice.id) {
                summary.notes += 1;
                summary.lowest = Some(summary.lowest.map_or(note.pitch, |p| p.min(note.pitch)));
                summary.highest = Some(summary.highest.map_or(note.pitch, |p| p.max(note.pitch)));
                if let Some(range) = range {
                    let zone = range.zone(note.pitch);
                    if let Some(i) = Zone::ALL.iter().position(|z| *z == zone) {
                        summary.zones[i] += 1;
                    }
                }
            }
            summary
        })
        .collect()
}

/// Render summaries one block per voice.
pub fn format_summary(summaries: &[VoiceSummary], color: bool) -> String {
    let mut out = String::new();
    if summaries.is_empty() {
        out.push_str("No voices found\n");
        return out;
    }

    for s in summaries {
        let name = if color {
            s.name.bold().to_string()
        } else {
            s.name.clone()
        };
        let part = match &s.part {
            Some(part) => part.clone(),
            None if color => "no matching part".dimmed().to_string(),
            None => "no matching part".to_string(),
        };
        let _ = writeln!(out, "{name} ({part})");

        let span = match (s.lowest, s.highest) {
            (Some(lo), Some(hi)) => format!("{} to {}", note_name(lo), note_name(hi)),
            _ => "-".to_string(),
        };
        let _ = writeln!(out, "  notes: {}  span: {}", s.notes, span);

        if s.part.is_some() && s.notes > 0 {
            let zones: Vec<String> = Zone::ALL
                .iter()
                .zip(s.zones)
                .map(|(zone, count)| {
                    let text = format!("{}: {}", zone.label(), count);
                    if !color || count == 0 {
                        return text;
                    }
                    match zone {
                        Zone::Comfortable => text.green().to_string(),
                        Zone::StretchLow | Zone::StretchHigh => text.yellow().to_string(),
                        Zone::BelowRange | Zone::AboveRange => text.red().to_string(),
                    }
                })
                .collect();
            let _ = writeln!(out, "  {}", zones.join("  "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicerange::{NoteEvent, Voice};

    fn midi(voices: &[&str], notes: &[(usize, u8)]) -> LoadedMidi {
        LoadedMidi {
            ppq: 480,
            format: 1,
            track_count: voices.len(),
            voices: voices
                .iter()
                .enumerate()
                .map(|(id, name)| Voice {
                    id,
                    name: name.to_string(),
                    track_index: id,
                    channel: None,
                })
                .collect(),
            notes: notes
                .iter()
                .enumerate()
                .map(|(i, &(voice, pitch))| NoteEvent {
                    pitch,
                    voice,
                    channel: 0,
                    velocity: 64,
                    start_tick: i as u64 * 480,
                    duration_ticks: 480,
                })
                .collect(),
        }
    }

    #[test]
    fn zones_are_counted_against_matched_part() {
        // Bass: 36, comfortable 45..=60, 67
        let midi = midi(&["Bass"], &[(0, 30), (0, 40), (0, 48), (0, 50), (0, 70)]);
        let summaries = summarize(&midi, &RangeCatalog::builtin());

        let bass = &summaries[0];
        assert_eq!(bass.part.as_deref(), Some("Bass"));
        assert_eq!(bass.notes, 5);
        assert_eq!(bass.lowest, Some(30));
        assert_eq!(bass.highest, Some(70));
        assert_eq!(bass.zones, [1, 1, 2, 0, 1]);
    }

    #[test]
    fn unmatched_voice_has_no_zones() {
        let midi = midi(&["Piano"], &[(0, 60), (0, 64)]);
        let summaries = summarize(&midi, &RangeCatalog::builtin());
        assert_eq!(summaries[0].part, None);
        assert_eq!(summaries[0].zones, [0; 5]);

        let text = format_summary(&summaries, false);
        assert!(text.contains("Piano (no matching part)"));
        assert!(text.contains("notes: 2  span: C4 to E4"));
        assert!(!text.contains("comfortable"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let midi = midi(&["Alto", "Tenor"], &[(0, 60), (1, 55)]);
        let text = format_summary(&summarize(&midi, &RangeCatalog::builtin()), false);

        assert!(!text.contains('\x1b'));
        assert!(text.starts_with("Alto (Alto)\n"));
        assert!(text.contains("Tenor (Tenor)"));
        assert!(text.contains("comfortable: 1"));
    }

    #[test]
    fn empty_voice_shows_dash() {
        let midi = midi(&["Soprano"], &[]);
        let text = format_summary(&summarize(&midi, &RangeCatalog::builtin()), false);
        assert!(text.contains("notes: 0  span: -"));
    }

    #[test]
    fn no_voices() {
        assert_eq!(format_summary(&[], false), "No voices found\n");
    }
}
