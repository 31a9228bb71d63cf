use std::{
    fmt::{Display, Write},
    ops::RangeInclusive,
};

/// The octave the generated row lives in: C1 through B1.
pub const CHROMATIC_OCTAVE: RangeInclusive<i32> = 24..=35;
/// Every key a MIDI note message can carry.
pub const MIDI_KEYS: RangeInclusive<i32> = 0..=127;

const ENGLISH: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const SPANISH: [&str; 12] = [
    "Do", "Do#", "Re", "Re#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];
const LILYPOND: [&str; 12] = [
    "c", "cis", "d", "dis", "e", "f", "fis", "g", "gis", "a", "ais", "b",
];

/// A MIDI key number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pitch(u8);
impl Pitch {
    /// Returns `None` when `key` is not a valid MIDI key.
    pub fn new(key: i32) -> Option<Self> {
        if MIDI_KEYS.contains(&key) {
            Some(Self(key as u8))
        } else {
            None
        }
    }
    pub fn key(&self) -> u8 {
        self.0
    }
    fn note(&self) -> usize {
        (self.0 % 12) as usize
    }
    /// Scientific pitch notation octave, so key 60 is octave 4.
    pub fn octave(&self) -> i32 {
        self.0 as i32 / 12 - 1
    }
    /// Semitone offset within the octave, 0 for C.
    pub fn pitch_class(&self) -> u8 {
        self.0 % 12
    }
    /// `C#1` style name.
    pub fn english_name(&self) -> String {
        format!("{}{}", ENGLISH[self.note()], self.octave())
    }
    /// `Do#1` style name.
    pub fn spanish_name(&self) -> String {
        format!("{}{}", SPANISH[self.note()], self.octave())
    }
    /// The note letter without accidental, as MusicXML wants it.
    pub fn step(&self) -> char {
        ENGLISH[self.note()].as_bytes()[0] as char
    }
    /// 1 for sharpened notes, 0 otherwise.
    pub fn alter(&self) -> u8 {
        ENGLISH[self.note()].len() as u8 - 1
    }
    /// Absolute LilyPond pitch, where `c` is key 48.
    pub fn lilypond(&self) -> Lily {
        Lily(*self)
    }
}
impl Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.english_name())
    }
}

pub struct Lily(Pitch);
impl Display for Lily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(LILYPOND[self.0.note()])?;
        let octave = self.0 .0 as i32 / 12 - 4;
        let adjust_c = if octave >= 0 { '\'' } else { ',' };
        for _ in 0..octave.abs() {
            f.write_char(adjust_c)?;
        }
        Ok(())
    }
}
