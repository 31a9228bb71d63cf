//! Twelve-tone rows turned into melodies.
//!
//! A random chromatic row is generated, expanded with its retrograde,
//! inversion and retrograde inversion, and then given random rhythms and
//! rests. Results are written as MIDI, LilyPond or MusicXML, and CSV.

pub mod config;
pub mod error;
pub mod generator;
pub mod midi;
pub mod pipeline;
pub mod pitch;
pub mod rhythm;
pub mod score;
pub mod sequence;
pub mod table;
pub mod transform;

pub use config::Config;
pub use error::{Error, Result};
pub use pitch::Pitch;
pub use rhythm::MusicalEvent;
pub use sequence::{Note, NoteSequence};
