//! Renderer-independent histogram layout.
//!
//! A [`Figure`] holds everything a backend needs to draw: one [`Panel`] per
//! voice with bar geometry, axis bounds, tick labels and range bands, all in
//! pitch units. Backends only map these numbers onto their own surface.

use crate::histogram::{Bucketing, FrequencyTable};
use crate::note::{Voice, VoiceId};
use crate::pitch::{note_name, pitch_class_name};
use crate::ranges::{RangeCatalog, VoiceRange, Zone};
use serde::{Deserialize, Serialize};

/// Width of a bar in pitch units; bars start at their pitch.
pub const BAR_WIDTH: f64 = 0.8;

/// Space left on either side of the data, in semitones.
const AXIS_PADDING: f64 = 2.0;

/// Axis span used for an empty voice with no known range.
const EMPTY_SPAN: (u8, u8) = (48, 72);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Panels per row. Zero is treated as one.
    pub columns: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { columns: 2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Comfortable,
    Stretch,
}

/// Shaded vertical span `[start, end)` in pitch units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub kind: BandKind,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub bucket: u8,
    pub x: f64,
    pub width: f64,
    pub count: usize,
    /// Zone of the bar's pitch; `None` without a range or in pitch-class mode.
    pub zone: Option<Zone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub voice: VoiceId,
    pub title: String,
    pub range: Option<VoiceRange>,
    pub x_min: f64,
    pub x_max: f64,
    pub y_max: usize,
    pub bars: Vec<Bar>,
    pub bands: Vec<Band>,
    pub ticks: Vec<Tick>,
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    fn build(voice: &Voice, table: &FrequencyTable, range: Option<&VoiceRange>) -> Self {
        match table.bucketing {
            Bucketing::Pitch => Self::pitch_panel(voice, table, range),
            Bucketing::PitchClass => Self::pitch_class_panel(voice, table),
        }
    }

    fn pitch_panel(voice: &Voice, table: &FrequencyTable, range: Option<&VoiceRange>) -> Self {
        let data_span = table.min_bucket().zip(table.max_bucket());
        let (min_note, max_note) = match (data_span, range) {
            (Some((lo, hi)), Some(r)) => (lo.min(r.lowest), hi.max(r.highest)),
            (Some(span), None) => span,
            (None, Some(r)) => (r.lowest, r.highest),
            (None, None) => EMPTY_SPAN,
        };

        let bars = table
            .iter()
            .map(|(pitch, count)| Bar {
                bucket: pitch,
                x: f64::from(pitch),
                width: BAR_WIDTH,
                count,
                zone: range.map(|r| r.zone(pitch)),
            })
            .collect();

        let bands = range
            .map(|r| {
                r.spans()
                    .into_iter()
                    .map(|(zone, lo, hi)| Band {
                        kind: if zone == Zone::Comfortable {
                            BandKind::Comfortable
                        } else {
                            BandKind::Stretch
                        },
                        start: f64::from(lo),
                        end: f64::from(hi) + 1.0,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut tick_pitches: Vec<u8> = (min_note..=max_note).filter(|p| p % 12 == 0).collect();
        if tick_pitches.is_empty() {
            tick_pitches = vec![min_note, max_note];
            tick_pitches.dedup();
        }
        let ticks = tick_pitches
            .into_iter()
            .map(|p| Tick {
                x: f64::from(p),
                label: note_name(p),
            })
            .collect();

        Self {
            voice: voice.id,
            title: voice.name.clone(),
            range: range.cloned(),
            x_min: f64::from(min_note) - AXIS_PADDING,
            x_max: f64::from(max_note) + AXIS_PADDING,
            y_max: table.max_count(),
            bars,
            bands,
            ticks,
        }
    }

    fn pitch_class_panel(voice: &Voice, table: &FrequencyTable) -> Self {
        let bars = table
            .iter()
            .map(|(pc, count)| Bar {
                bucket: pc,
                x: f64::from(pc),
                width: BAR_WIDTH,
                count,
                zone: None,
            })
            .collect();

        let ticks = (0..12u8)
            .map(|pc| Tick {
                x: f64::from(pc) + BAR_WIDTH / 2.0,
                label: pitch_class_name(pc).to_string(),
            })
            .collect();

        Self {
            voice: voice.id,
            title: voice.name.clone(),
            range: None,
            x_min: -0.5,
            x_max: 12.0,
            y_max: table.max_count(),
            bars,
            bands: Vec::new(),
            ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub columns: usize,
    pub rows: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Lay out one panel per voice, in voice order.
    ///
    /// Voices without a table get an empty panel.
    pub fn build(
        title: &str,
        voices: &[Voice],
        tables: &[FrequencyTable],
        catalog: &RangeCatalog,
        options: &LayoutOptions,
    ) -> Self {
        let columns = options.columns.max(1);
        let panels: Vec<Panel> = voices
            .iter()
            .map(|voice| {
                let range = catalog.lookup(&voice.name);
                match tables.iter().find(|t| t.voice == voice.id) {
                    Some(table) => Panel::build(voice, table, range),
                    None => Panel::build(voice, &FrequencyTable::new(voice.id, Bucketing::Pitch), range),
                }
            })
            .collect();
        let rows = panels.len().div_ceil(columns);

        Self {
            title: title.to_string(),
            columns,
            rows,
            panels,
        }
    }

    /// Grid position `(row, column)` of the panel at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::aggregate;
    use crate::note::NoteEvent;
    use pretty_assertions::assert_eq;

    fn voice(id: VoiceId, name: &str) -> Voice {
        Voice {
            id,
            name: name.to_string(),
            track_index: id,
            channel: None,
        }
    }

    fn notes(voice: VoiceId, pitches: &[u8]) -> Vec<NoteEvent> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &pitch)| NoteEvent {
                pitch,
                voice,
                channel: 0,
                velocity: 80,
                start_tick: i as u64 * 480,
                duration_ticks: 480,
            })
            .collect()
    }

    fn figure(voices: &[Voice], events: &[NoteEvent], bucketing: Bucketing) -> Figure {
        let tables = aggregate(events, voices, bucketing);
        Figure::build(
            "test",
            voices,
            &tables,
            &RangeCatalog::builtin(),
            &LayoutOptions::default(),
        )
    }

    #[test]
    fn one_panel_per_voice_in_grid() {
        let voices: Vec<_> = ["Soprano", "Alto", "Tenor"]
            .iter()
            .enumerate()
            .map(|(i, n)| voice(i, n))
            .collect();
        let fig = figure(&voices, &notes(0, &[67]), Bucketing::Pitch);
        assert_eq!(fig.panels.len(), 3);
        assert_eq!(fig.columns, 2);
        assert_eq!(fig.rows, 2);
        assert_eq!(fig.cell(2), (1, 0));
    }

    #[test]
    fn axis_covers_data_and_range() {
        // Soprano range is 55..=81; a 50 sits below it
        let voices = [voice(0, "Soprano")];
        let fig = figure(&voices, &notes(0, &[50, 67, 67]), Bucketing::Pitch);
        let panel = &fig.panels[0];

        assert_eq!(panel.x_min, 48.0);
        assert_eq!(panel.x_max, 83.0);
        assert_eq!(panel.y_max, 2);
        let labels: Vec<_> = panel.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["C4", "C5"]);
    }

    #[test]
    fn out_of_range_notes_are_still_drawn() {
        let voices = [voice(0, "Bass")];
        let fig = figure(&voices, &notes(0, &[30, 50]), Bucketing::Pitch);
        let bars = &fig.panels[0].bars;

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].bucket, 30);
        assert_eq!(bars[0].zone, Some(Zone::BelowRange));
        assert_eq!(bars[1].zone, Some(Zone::Comfortable));
    }

    #[test]
    fn bands_cover_inclusive_range() {
        let voices = [voice(0, "Tenor")];
        let fig = figure(&voices, &[], Bucketing::Pitch);
        let panel = &fig.panels[0];

        assert!(panel.is_empty());
        assert_eq!(
            panel.bands,
            vec![
                Band { kind: BandKind::Stretch, start: 45.0, end: 49.0 },
                Band { kind: BandKind::Comfortable, start: 49.0, end: 67.0 },
                Band { kind: BandKind::Stretch, start: 67.0, end: 73.0 },
            ]
        );
        assert_eq!(panel.x_min, 43.0);
        assert_eq!(panel.x_max, 74.0);
    }

    #[test]
    fn unknown_voice_without_notes_has_default_axis() {
        let voices = [voice(0, "Organ")];
        let fig = figure(&voices, &[], Bucketing::Pitch);
        let panel = &fig.panels[0];
        assert!(panel.bands.is_empty());
        assert_eq!(panel.range, None);
        assert_eq!((panel.x_min, panel.x_max), (46.0, 74.0));
    }

    #[test]
    fn ticks_fall_back_to_bounds_without_a_c() {
        let voices = [voice(0, "Whistle")];
        let fig = figure(&voices, &notes(0, &[62, 65]), Bucketing::Pitch);
        let labels: Vec<_> = fig.panels[0].ticks.iter().map(|t| t.label.clone()).collect();
        assert_eq!(labels, vec!["D4".to_string(), "F4".to_string()]);
    }

    #[test]
    fn pitch_class_panels_have_no_overlay() {
        let voices = [voice(0, "Alto")];
        let fig = figure(&voices, &notes(0, &[57, 69, 60]), Bucketing::PitchClass);
        let panel = &fig.panels[0];

        assert!(panel.bands.is_empty());
        assert_eq!(panel.ticks.len(), 12);
        assert_eq!(panel.ticks[9].label, "A");
        assert_eq!(panel.bars.iter().map(|b| (b.bucket, b.count)).collect::<Vec<_>>(), vec![(0, 1), (9, 2)]);
    }
}
