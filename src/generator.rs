use log::{debug, info};
use rand::{seq::SliceRandom, Rng};

use crate::{
    pitch::{Pitch, CHROMATIC_OCTAVE},
    sequence::{Note, NoteSequence},
};

/// Shuffles the twelve semitones of the chromatic octave into a row.
pub fn chromatic_row<R: Rng + ?Sized>(rng: &mut R) -> NoteSequence {
    let mut pitches: Vec<Pitch> = CHROMATIC_OCTAVE.filter_map(Pitch::new).collect();
    pitches.shuffle(rng);
    for (i, pitch) in pitches.iter().enumerate() {
        debug!("  {}. {pitch} (MIDI note {})", i + 1, pitch.key());
    }
    let row = NoteSequence(pitches.into_iter().map(Note::from).collect());
    info!("Random chromatic sequence: {row}");
    row
}
