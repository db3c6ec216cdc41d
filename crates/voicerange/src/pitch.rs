//! Pitch naming.

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C♯/D♭", "D", "D♯/E♭", "E", "F", "F♯/G♭", "G", "G♯/A♭", "A", "A♯/B♭", "B",
];

/// Name of a pitch class (0 = C … 11 = B). Values above 11 wrap.
pub fn pitch_class_name(pitch_class: u8) -> &'static str {
    PITCH_CLASS_NAMES[(pitch_class % 12) as usize]
}

/// Scientific pitch name of a MIDI note, with middle C (60) as `C4`.
pub fn note_name(pitch: u8) -> String {
    let octave = i32::from(pitch) / 12 - 1;
    format!("{}{}", pitch_class_name(pitch), octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c() {
        assert_eq!(note_name(60), "C4");
    }

    #[test]
    fn accidentals_and_extremes() {
        assert_eq!(note_name(61), "C♯/D♭4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(127), "G9");
        assert_eq!(note_name(69), "A4");
    }

    #[test]
    fn pitch_class_wraps() {
        assert_eq!(pitch_class_name(11), "B");
        assert_eq!(pitch_class_name(14), "D");
    }
}
