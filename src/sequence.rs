use std::{collections::HashSet, fmt::Display, ops::Deref};

use crate::{
    error::{Error, Result},
    pitch::{Pitch, CHROMATIC_OCTAVE},
};

/// Number of pitches in a chromatic row.
pub const ROW_LENGTH: usize = 12;
/// Velocity for notes that were not read from a file.
pub const DEFAULT_VELOCITY: u8 = 80;

/// A pitch together with how hard it is played.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Note {
    pub pitch: Pitch,
    pub velocity: u8,
}
impl Note {
    pub fn new(pitch: Pitch, velocity: u8) -> Self {
        Note { pitch, velocity }
    }
}
impl From<Pitch> for Note {
    fn from(pitch: Pitch) -> Self {
        Note::new(pitch, DEFAULT_VELOCITY)
    }
}
impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pitch)
    }
}

/// A non-empty, ordered list of notes in playback order.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NoteSequence(pub(crate) Vec<Note>);
impl NoteSequence {
    pub fn new(notes: Vec<Note>) -> Result<Self> {
        if notes.is_empty() {
            return Err(Error::InvalidInput("empty pitch sequence".into()));
        }
        Ok(Self(notes))
    }
    /// Builds a sequence from raw key numbers, rejecting anything that is not a MIDI key.
    pub fn from_keys(keys: &[i32]) -> Result<Self> {
        let notes = keys
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Pitch::new(value)
                    .map(Note::from)
                    .ok_or(Error::OutOfRange { index, value })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(notes)
    }
    /// Takes exactly the first `len` notes, failing if there are fewer.
    pub fn leading(notes: &[Note], len: usize) -> Result<Self> {
        if notes.len() < len {
            return Err(Error::InvalidInput(format!(
                "expected {len} notes, found {}",
                notes.len()
            )));
        }
        Self::new(notes[..len].to_vec())
    }
    /// Plays every note at `velocity`.
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        for note in &mut self.0 {
            note.velocity = velocity;
        }
        self
    }
    /// Whether this is a permutation of the chromatic octave.
    pub fn is_chromatic_row(&self) -> bool {
        let seen: HashSet<_> = self.keys().into_iter().collect();
        self.0.len() == ROW_LENGTH
            && seen.len() == ROW_LENGTH
            && seen.iter().all(|key| CHROMATIC_OCTAVE.contains(key))
    }
    pub fn keys(&self) -> Vec<i32> {
        self.0.iter().map(|n| n.pitch.key() as i32).collect()
    }
    pub fn velocities(&self) -> Vec<u8> {
        self.0.iter().map(|n| n.velocity).collect()
    }
}
impl Deref for NoteSequence {
    type Target = [Note];
    fn deref(&self) -> &[Note] {
        &self.0
    }
}
impl Display for NoteSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, note) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        assert!(matches!(NoteSequence::new(vec![]), Err(Error::InvalidInput(_))));
        assert!(matches!(NoteSequence::from_keys(&[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn bad_key_reports_position() {
        match NoteSequence::from_keys(&[24, 200]) {
            Err(Error::OutOfRange { index, value }) => assert_eq!((index, value), (1, 200)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leading_needs_enough_notes() {
        let notes: Vec<_> = (24..30).filter_map(Pitch::new).map(Note::from).collect();
        assert!(NoteSequence::leading(&notes, ROW_LENGTH).is_err());
        assert_eq!(NoteSequence::leading(&notes, 3).unwrap().keys(), [24, 25, 26]);
    }

    #[test]
    fn chromatic_row_detection() {
        let row = NoteSequence::from_keys(&(24..36).rev().collect::<Vec<_>>()).unwrap();
        assert!(row.is_chromatic_row());
        let doubled = NoteSequence::from_keys(&[24; 12]).unwrap();
        assert!(!doubled.is_chromatic_row());
        assert_eq!(row.to_string().split(' ').next(), Some("B1"));
    }

    #[test]
    fn velocity_follows_the_note() {
        let row = NoteSequence::from_keys(&[24, 30]).unwrap();
        assert_eq!(row.velocities(), [DEFAULT_VELOCITY; 2]);
        let loud = row.with_velocity(110);
        assert_eq!(loud.velocities(), [110, 110]);
        assert_eq!(loud.keys(), [24, 30]);
    }
}
