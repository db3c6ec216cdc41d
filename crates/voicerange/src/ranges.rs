//! Vocal part ranges and voice-name matching.

use serde::{Deserialize, Serialize};

/// Acceptable pitch range of a vocal part, inclusive MIDI numbers.
///
/// `lowest..=highest` is everything the part can sing. The comfortable band
/// sits inside it; what lies between the band and either bound is a stretch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRange {
    pub part: String,
    pub lowest: u8,
    pub comfortable_low: u8,
    pub comfortable_high: u8,
    pub highest: u8,
}

/// Where a pitch falls relative to a [`VoiceRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    BelowRange,
    StretchLow,
    Comfortable,
    StretchHigh,
    AboveRange,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::BelowRange,
        Zone::StretchLow,
        Zone::Comfortable,
        Zone::StretchHigh,
        Zone::AboveRange,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Zone::BelowRange => "below",
            Zone::StretchLow => "low stretch",
            Zone::Comfortable => "comfortable",
            Zone::StretchHigh => "high stretch",
            Zone::AboveRange => "above",
        }
    }
}

impl VoiceRange {
    pub fn new(part: &str, lowest: u8, comfortable: (u8, u8), highest: u8) -> Self {
        Self {
            part: part.to_string(),
            lowest,
            comfortable_low: comfortable.0,
            comfortable_high: comfortable.1,
            highest,
        }
    }

    /// Bounds must be ordered and within 0..=127.
    pub fn validate(&self) -> Result<(), String> {
        if self.highest > 127 {
            return Err(format!("{}: highest note {} is above 127", self.part, self.highest));
        }
        if !(self.lowest <= self.comfortable_low
            && self.comfortable_low <= self.comfortable_high
            && self.comfortable_high <= self.highest)
        {
            return Err(format!(
                "{}: expected lowest <= comfortable low <= comfortable high <= highest, got {} / {}-{} / {}",
                self.part, self.lowest, self.comfortable_low, self.comfortable_high, self.highest
            ));
        }
        Ok(())
    }

    pub fn zone(&self, pitch: u8) -> Zone {
        if pitch < self.lowest {
            Zone::BelowRange
        } else if pitch < self.comfortable_low {
            Zone::StretchLow
        } else if pitch <= self.comfortable_high {
            Zone::Comfortable
        } else if pitch <= self.highest {
            Zone::StretchHigh
        } else {
            Zone::AboveRange
        }
    }

    /// Non-empty zones inside the range as inclusive `(zone, low, high)` spans, low to high.
    pub fn spans(&self) -> Vec<(Zone, u8, u8)> {
        let mut spans = Vec::with_capacity(3);
        if self.lowest < self.comfortable_low {
            spans.push((Zone::StretchLow, self.lowest, self.comfortable_low - 1));
        }
        spans.push((Zone::Comfortable, self.comfortable_low, self.comfortable_high));
        if self.comfortable_high < self.highest {
            spans.push((Zone::StretchHigh, self.comfortable_high + 1, self.highest));
        }
        spans
    }
}

/// Lookup table from voice names to vocal part ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCatalog {
    parts: Vec<VoiceRange>,
    /// `(lowercase alias, part name)`
    aliases: Vec<(String, String)>,
}

impl RangeCatalog {
    /// Choral parts with their usual ranges, plus German spellings of the split parts.
    pub fn builtin() -> Self {
        let parts = vec![
            VoiceRange::new("Soprano", 55, (62, 77), 81),
            VoiceRange::new("Soprano 1", 60, (62, 79), 81),
            VoiceRange::new("Soprano 2", 55, (58, 77), 79),
            VoiceRange::new("Mezzo-soprano", 55, (58, 77), 81),
            VoiceRange::new("Alto", 52, (57, 74), 79),
            VoiceRange::new("Alto 1", 55, (57, 76), 79),
            VoiceRange::new("Alto 2", 52, (54, 74), 77),
            VoiceRange::new("Tenor", 45, (49, 66), 72),
            VoiceRange::new("Tenor 1", 47, (49, 67), 72),
            VoiceRange::new("Tenor 2", 45, (48, 66), 69),
            VoiceRange::new("Baritone", 41, (45, 64), 67),
            VoiceRange::new("Bass", 36, (45, 60), 67),
            VoiceRange::new("Bass 1", 41, (45, 64), 67),
            VoiceRange::new("Bass 2", 36, (40, 60), 64),
        ];

        let mut catalog = Self {
            parts,
            aliases: Vec::new(),
        };
        catalog.add_alias("alt 1", "Alto 1");
        catalog.add_alias("alt 2", "Alto 2");
        catalog.add_alias("sopran 1", "Soprano 1");
        catalog.add_alias("sopran 2", "Soprano 2");
        catalog
    }

    /// Add a part, replacing any part with the same (case-insensitive) name.
    pub fn insert(&mut self, range: VoiceRange) {
        match self
            .parts
            .iter_mut()
            .find(|p| p.part.eq_ignore_ascii_case(&range.part))
        {
            Some(existing) => *existing = range,
            None => self.parts.push(range),
        }
    }

    pub fn add_alias(&mut self, alias: &str, part: &str) {
        let alias = alias.to_lowercase();
        self.aliases.retain(|(a, _)| *a != alias);
        self.aliases.push((alias, part.to_string()));
    }

    pub fn part(&self, name: &str) -> Option<&VoiceRange> {
        self.parts.iter().find(|p| p.part.eq_ignore_ascii_case(name))
    }

    pub fn parts(&self) -> &[VoiceRange] {
        &self.parts
    }

    /// Find the range for a voice (track) name.
    ///
    /// Part names are matched as case-insensitive substrings, longest first,
    /// so "Soprano 1" beats "Soprano". Aliases are only consulted when no
    /// part name matches.
    pub fn lookup(&self, voice_name: &str) -> Option<&VoiceRange> {
        let name = voice_name.to_lowercase();

        let by_part = self
            .parts
            .iter()
            .filter(|p| name.contains(&p.part.to_lowercase()))
            .max_by_key(|p| p.part.chars().count());
        if by_part.is_some() {
            return by_part;
        }

        self.aliases
            .iter()
            .filter(|(alias, _)| name.contains(alias.as_str()))
            .max_by_key(|(alias, _)| alias.chars().count())
            .and_then(|(_, part)| self.part(part))
    }
}
