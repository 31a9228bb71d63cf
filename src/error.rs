use thiserror::Error;

/// Everything that can go wrong while building or exporting a row.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("pitch {value} at position {index} is outside the allowed range")]
    OutOfRange { index: usize, value: i32 },

    #[error("{0} ticks per quarter note is not a positive multiple of 16")]
    Resolution(u16),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("MIDI error: {0}")]
    Midi(#[from] midly::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
