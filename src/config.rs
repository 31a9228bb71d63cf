use crate::{
    error::{Error, Result},
    rhythm::check_resolution,
    score::ScoreFormat,
    transform::RangePolicy,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// MIDI ticks per quarter note; must be a multiple of 16.
    pub ticks_per_quarter: u16,
    /// The number of beats per minute.
    pub tempo: u32,
    /// Note-on velocity of a generated row. Later stages keep the velocities
    /// they read.
    pub velocity: u8,
    /// How inverted pitches that leave C1..B1 are handled.
    pub range_policy: RangePolicy,
    /// How many pitches the transform stage reads from its input.
    pub row_length: usize,
    /// How many melodies the melody stage writes per input.
    pub variations: u32,
    /// Which notation format the melody stage writes.
    pub score: ScoreFormat,
}

pub const DEFAULT: Config = Config {
    ticks_per_quarter: 480,
    tempo: 120,
    velocity: 80,
    range_policy: RangePolicy::Wrap,
    row_length: 12,
    variations: 3,
    score: ScoreFormat::Lilypond,
};
pub const MUSESCORE: Config = Config {
    score: ScoreFormat::Musicxml,
    ..DEFAULT
};
/// Keeps the inversion wherever the mirror puts it, like a plain MIDI transposer.
pub const OPEN: Config = Config {
    range_policy: RangePolicy::Extend,
    ..DEFAULT
};

impl Config {
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "1" => Ok(DEFAULT),
            "musescore" => Ok(MUSESCORE),
            "open" => Ok(OPEN),
            _ => Err(Error::UnknownPreset(name.to_string())),
        }
    }
    pub fn validate(&self) -> Result<()> {
        check_resolution(self.ticks_per_quarter)?;
        if self.ticks_per_quarter > 0x7fff {
            return Err(Error::Config(format!(
                "{} ticks per quarter does not fit a MIDI header",
                self.ticks_per_quarter
            )));
        }
        if !(4..=1000).contains(&self.tempo) {
            return Err(Error::Config(format!("tempo {} is out of range", self.tempo)));
        }
        if self.velocity == 0 || self.velocity > 127 {
            return Err(Error::Config(format!(
                "velocity {} must be between 1 and 127",
                self.velocity
            )));
        }
        if self.row_length == 0 {
            return Err(Error::Config("row length must be at least 1".into()));
        }
        if self.variations == 0 {
            return Err(Error::Config("at least one variation is needed".into()));
        }
        Ok(())
    }
}
