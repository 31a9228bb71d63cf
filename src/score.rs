//! Notated scores for notation software, as LilyPond or MusicXML.
//!
//! Events are laid out in 4/4 bars measured in 64th notes. Anything that
//! crosses a barline is split, and lengths that are not a single (dotted)
//! value are broken into tied binary pieces.

use std::{
    fmt::{self, Display},
    fs,
    path::Path,
};

use clap::ValueEnum;
use log::info;

use crate::{
    config::Config,
    error::{Error, Result},
    pitch::Pitch,
    rhythm::MusicalEvent,
};

/// 64th notes per 4/4 bar.
const BAR: u32 = 64;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum ScoreFormat {
    Lilypond,
    Musicxml,
}
impl ScoreFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ScoreFormat::Lilypond => "ly",
            ScoreFormat::Musicxml => "musicxml",
        }
    }
}

/// A single notated value: `2^magnitude` 64ths plus `dots` dots.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub magnitude: u32,
    pub dots: u32,
}
impl Piece {
    /// Length in 64th notes.
    pub fn units(&self) -> u32 {
        (0..=self.dots).map(|d| 1 << (self.magnitude - d)).sum()
    }
}

/// Splits `units` 64ths into the fewest dotted binary values, longest first.
pub fn pieces(units: u32) -> Vec<Piece> {
    let mut out = Vec::new();
    if units == 0 {
        return out;
    }
    let mut magnitude = units.ilog2() as i32;
    loop {
        if units & (1 << magnitude) != 0 {
            let start = magnitude as u32;
            let mut dots = 0;
            magnitude -= 1;
            while magnitude >= 0 && units & (1 << magnitude) != 0 {
                dots += 1;
                magnitude -= 1;
            }
            out.push(Piece {
                magnitude: start,
                dots,
            });
        } else {
            magnitude -= 1;
        }
        if magnitude < 0 {
            break;
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    /// `None` for a rest.
    pub pitch: Option<Pitch>,
    pub piece: Piece,
    /// Tied to the following glyph.
    pub tie_start: bool,
    /// Tied from the preceding glyph.
    pub tie_stop: bool,
}

pub struct Score {
    pub bars: Vec<Vec<Glyph>>,
    ticks_per_quarter: u16,
    tempo: u32,
}
impl Score {
    pub fn new(events: &[MusicalEvent], config: &Config) -> Result<Self> {
        let unit = config.ticks_per_quarter as u32 / 16;
        let mut bars = vec![Vec::new()];
        let mut position = 0;
        for event in events {
            let ticks = event.ticks();
            if unit == 0 || ticks % unit != 0 {
                return Err(Error::InvalidInput(format!(
                    "{ticks} ticks is not a whole number of 64th notes"
                )));
            }
            let mut glyphs = Vec::new();
            let mut left = ticks / unit;
            while left > 0 {
                let take = left.min(BAR - position % BAR);
                for piece in pieces(take) {
                    glyphs.push((position / BAR, piece));
                }
                position += take;
                left -= take;
            }
            let last = glyphs.len().saturating_sub(1);
            let tied = event.pitch().is_some();
            for (i, (bar, piece)) in glyphs.into_iter().enumerate() {
                let bar = bar as usize;
                if bars.len() <= bar {
                    bars.resize_with(bar + 1, Vec::new);
                }
                bars[bar].push(Glyph {
                    pitch: event.pitch(),
                    piece,
                    tie_start: tied && i < last,
                    tie_stop: tied && i > 0,
                });
            }
        }
        if position % BAR != 0 {
            let bar = (position / BAR) as usize;
            for piece in pieces(BAR - position % BAR) {
                bars[bar].push(Glyph {
                    pitch: None,
                    piece,
                    tie_start: false,
                    tie_stop: false,
                });
            }
        }
        if bars.last().is_some_and(Vec::is_empty) {
            bars.pop();
        }
        Ok(Score {
            bars,
            ticks_per_quarter: config.ticks_per_quarter,
            tempo: config.tempo,
        })
    }
    pub fn lilypond(&self) -> Lilypond<'_> {
        Lilypond(self)
    }
    pub fn musicxml(&self) -> MusicXml<'_> {
        MusicXml(self)
    }
    pub fn render(&self, format: ScoreFormat) -> String {
        match format {
            ScoreFormat::Lilypond => self.lilypond().to_string(),
            ScoreFormat::Musicxml => self.musicxml().to_string(),
        }
    }
}

pub struct Lilypond<'a>(&'a Score);
impl Display for Lilypond<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tempo = self.0.tempo;
        write!(
            f,
            r#"\version "2.24.1"
\score {{
\new Staff {{
\tempo 4 = {tempo}
\clef bass
\key c \major
\time 4/4
{{ "#
        )?;
        for bar in &self.0.bars {
            for glyph in bar {
                match glyph.pitch {
                    Some(pitch) => write!(f, "{}", pitch.lilypond())?,
                    None => f.write_str("r")?,
                }
                f.write_str(match glyph.piece.magnitude {
                    0 => "64",
                    1 => "32",
                    2 => "16",
                    3 => "8",
                    4 => "4",
                    5 => "2",
                    6 => "1",
                    _ => unreachable!(),
                })?;
                for _ in 0..glyph.piece.dots {
                    f.write_str(".")?;
                }
                if glyph.tie_start {
                    f.write_str("~")?;
                }
                f.write_str(" ")?;
            }
            f.write_str("|\n")?;
        }
        f.write_str(
            r#"}
\fine
}
\layout {}
\midi {}
}
"#,
        )
    }
}

fn note_type(magnitude: u32) -> &'static str {
    match magnitude {
        0 => "64th",
        1 => "32nd",
        2 => "16th",
        3 => "eighth",
        4 => "quarter",
        5 => "half",
        6 => "whole",
        _ => unreachable!(),
    }
}

pub struct MusicXml<'a>(&'a Score);
impl Display for MusicXml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Score {
            bars,
            ticks_per_quarter,
            tempo,
        } = self.0;
        let unit = *ticks_per_quarter as u32 / 16;
        f.write_str(concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
            "<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" ",
            "\"http://www.musicxml.org/dtds/partwise.dtd\">\n",
            "<score-partwise version=\"3.1\">\n",
            "  <part-list>\n",
            "    <score-part id=\"P1\"><part-name>Piano</part-name></score-part>\n",
            "  </part-list>\n",
            "  <part id=\"P1\">\n",
        ))?;
        for (number, bar) in bars.iter().enumerate() {
            writeln!(f, "    <measure number=\"{}\">", number + 1)?;
            if number == 0 {
                writeln!(
                    f,
                    "      <attributes><divisions>{ticks_per_quarter}</divisions>\
                     <key><fifths>0</fifths></key>\
                     <time><beats>4</beats><beat-type>4</beat-type></time>\
                     <clef><sign>F</sign><line>4</line></clef></attributes>"
                )?;
                writeln!(
                    f,
                    "      <direction placement=\"above\"><direction-type><metronome>\
                     <beat-unit>quarter</beat-unit><per-minute>{tempo}</per-minute>\
                     </metronome></direction-type><sound tempo=\"{tempo}\"/></direction>"
                )?;
            }
            for glyph in bar {
                f.write_str("      <note>")?;
                match glyph.pitch {
                    Some(pitch) => {
                        write!(f, "<pitch><step>{}</step>", pitch.step())?;
                        if pitch.alter() != 0 {
                            write!(f, "<alter>{}</alter>", pitch.alter())?;
                        }
                        write!(f, "<octave>{}</octave></pitch>", pitch.octave())?;
                    }
                    None => f.write_str("<rest/>")?,
                }
                write!(f, "<duration>{}</duration>", glyph.piece.units() * unit)?;
                if glyph.tie_stop {
                    f.write_str("<tie type=\"stop\"/>")?;
                }
                if glyph.tie_start {
                    f.write_str("<tie type=\"start\"/>")?;
                }
                write!(
                    f,
                    "<voice>1</voice><type>{}</type>",
                    note_type(glyph.piece.magnitude)
                )?;
                for _ in 0..glyph.piece.dots {
                    f.write_str("<dot/>")?;
                }
                if glyph.tie_stop || glyph.tie_start {
                    f.write_str("<notations>")?;
                    if glyph.tie_stop {
                        f.write_str("<tied type=\"stop\"/>")?;
                    }
                    if glyph.tie_start {
                        f.write_str("<tied type=\"start\"/>")?;
                    }
                    f.write_str("</notations>")?;
                }
                f.write_str("</note>\n")?;
            }
            f.write_str("    </measure>\n")?;
        }
        f.write_str("  </part>\n</score-partwise>\n")
    }
}

pub fn write_score(
    events: &[MusicalEvent],
    config: &Config,
    format: ScoreFormat,
    path: &Path,
) -> Result<()> {
    let score = Score::new(events, config)?;
    fs::write(path, score.render(format))?;
    info!("Score saved to: {}", path.display());
    Ok(())
}
