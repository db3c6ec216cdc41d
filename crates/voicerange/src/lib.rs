//! Per-voice note histograms with vocal range overlays.
//!
//! The pipeline is load → aggregate → annotate → render:
//!
//! ```no_run
//! use voicerange::{aggregate, load, Bucketing, Figure, Grouping, LayoutOptions, RangeCatalog};
//! use std::path::Path;
//!
//! let path = Path::new("choir.mid");
//! let midi = load(path, Grouping::Auto)?;
//! let tables = aggregate(&midi.notes, &midi.voices, Bucketing::Pitch);
//! let catalog = RangeCatalog::builtin();
//! let figure = Figure::build(
//!     &format!("Note Occurrence Histograms for '{}'", path.display()),
//!     &midi.voices,
//!     &tables,
//!     &catalog,
//!     &LayoutOptions::default(),
//! );
//! let svg = voicerange::render_svg(&figure, &voicerange::SvgStyle::default());
//! # Ok::<(), voicerange::Error>(())
//! ```

pub mod figure;
pub mod histogram;
pub mod load;
pub mod note;
pub mod pitch;
pub mod ranges;
pub mod svg;

pub use figure::{Band, BandKind, Bar, Figure, LayoutOptions, Panel, Tick};
pub use histogram::{aggregate, Bucketing, FrequencyTable};
pub use load::{extract_notes, load, load_bytes, Grouping, LoadedMidi};
pub use note::{NoteEvent, Voice, VoiceId};
pub use pitch::{note_name, pitch_class_name};
pub use ranges::{RangeCatalog, VoiceRange, Zone};
pub use self::svg::{render_svg, write_svg, SvgStyle};

use std::path::PathBuf;

/// Errors from loading MIDI files and writing rendered output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not a valid MIDI file: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
