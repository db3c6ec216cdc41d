//! Per-voice note occurrence counting.

use crate::note::{NoteEvent, Voice, VoiceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Granularity of histogram buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucketing {
    /// One bucket per MIDI note number.
    #[default]
    Pitch,
    /// Octaves folded together: 0 = C … 11 = B.
    PitchClass,
}

impl Bucketing {
    pub fn bucket(self, pitch: u8) -> u8 {
        match self {
            Bucketing::Pitch => pitch,
            Bucketing::PitchClass => pitch % 12,
        }
    }
}

impl std::str::FromStr for Bucketing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "pitch" => Ok(Bucketing::Pitch),
            "pitch_class" => Ok(Bucketing::PitchClass),
            other => Err(format!("unknown bucketing '{other}' (expected pitch or pitch_class)")),
        }
    }
}

/// Occurrence counts for one voice, keyed by bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub voice: VoiceId,
    pub bucketing: Bucketing,
    counts: BTreeMap<u8, usize>,
}

impl FrequencyTable {
    pub fn new(voice: VoiceId, bucketing: Bucketing) -> Self {
        Self {
            voice,
            bucketing,
            counts: BTreeMap::new(),
        }
    }

    /// Count one occurrence of `pitch`, bucketed by this table's granularity.
    pub fn record(&mut self, pitch: u8) {
        *self.counts.entry(self.bucketing.bucket(pitch)).or_insert(0) += 1;
    }

    pub fn count(&self, bucket: u8) -> usize {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(bucket, count)` pairs in ascending bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&bucket, &count)| (bucket, count))
    }

    pub fn min_bucket(&self) -> Option<u8> {
        self.counts.keys().next().copied()
    }

    pub fn max_bucket(&self) -> Option<u8> {
        self.counts.keys().next_back().copied()
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

/// Build one table per voice, in voice order. Notes for unknown voices are dropped.
pub fn aggregate(notes: &[NoteEvent], voices: &[Voice], bucketing: Bucketing) -> Vec<FrequencyTable> {
    let mut tables: Vec<FrequencyTable> = voices
        .iter()
        .map(|v| FrequencyTable::new(v.id, bucketing))
        .collect();

    for note in notes {
        if let Some(table) = tables.iter_mut().find(|t| t.voice == note.voice) {
            table.record(note.pitch);
        }
    }

    tables
}
