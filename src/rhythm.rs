//! Random durations and rests for a pitch sequence.
//!
//! Every pitch draws a duration class and a modifier. A silenced pitch turns
//! into a rest and is held: it sounds at the next event with a fresh draw of
//! its own, so every input pitch is eventually played exactly once.

use log::debug;
use rand::Rng;

use crate::{
    error::{Error, Result},
    pitch::Pitch,
    sequence::Note,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DurationClass {
    ThirtySecond,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}
impl DurationClass {
    pub const ALL: [DurationClass; 6] = [
        DurationClass::ThirtySecond,
        DurationClass::Sixteenth,
        DurationClass::Eighth,
        DurationClass::Quarter,
        DurationClass::Half,
        DurationClass::Whole,
    ];
    pub fn base_ticks(self, ticks_per_quarter: u16) -> u32 {
        let tpq = ticks_per_quarter as u32;
        match self {
            DurationClass::ThirtySecond => tpq / 8,
            DurationClass::Sixteenth => tpq / 4,
            DurationClass::Eighth => tpq / 2,
            DurationClass::Quarter => tpq,
            DurationClass::Half => tpq * 2,
            DurationClass::Whole => tpq * 4,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            DurationClass::ThirtySecond => "1/32",
            DurationClass::Sixteenth => "1/16",
            DurationClass::Eighth => "1/8",
            DurationClass::Quarter => "1/4",
            DurationClass::Half => "1/2",
            DurationClass::Whole => "whole",
        }
    }
    pub fn spanish_name(self) -> &'static str {
        match self {
            DurationClass::ThirtySecond => "fusa",
            DurationClass::Sixteenth => "semicorchea",
            DurationClass::Eighth => "corchea",
            DurationClass::Quarter => "negra",
            DurationClass::Half => "blanca",
            DurationClass::Whole => "redonda",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Modifier {
    Normal,
    Dotted,
    Silence,
}
impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::Normal, Modifier::Dotted, Modifier::Silence];
}

/// One roll of the dice for a single event.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Draw {
    pub class: DurationClass,
    pub modifier: Modifier,
}
impl Draw {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let class = DurationClass::ALL[rng.gen_range(0..DurationClass::ALL.len())];
        let modifier = Modifier::ALL[rng.gen_range(0..Modifier::ALL.len())];
        Draw { class, modifier }
    }
    /// Length in ticks, including the dot.
    pub fn ticks(&self, ticks_per_quarter: u16) -> u32 {
        let base = self.class.base_ticks(ticks_per_quarter);
        match self.modifier {
            Modifier::Dotted => base + base / 2,
            Modifier::Normal | Modifier::Silence => base,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MusicalEvent {
    Note { pitch: Pitch, velocity: u8, ticks: u32 },
    Rest { ticks: u32 },
}
impl MusicalEvent {
    pub fn ticks(&self) -> u32 {
        match *self {
            MusicalEvent::Note { ticks, .. } | MusicalEvent::Rest { ticks } => ticks,
        }
    }
    pub fn pitch(&self) -> Option<Pitch> {
        match *self {
            MusicalEvent::Note { pitch, .. } => Some(pitch),
            MusicalEvent::Rest { .. } => None,
        }
    }
    pub fn velocity(&self) -> Option<u8> {
        match *self {
            MusicalEvent::Note { velocity, .. } => Some(velocity),
            MusicalEvent::Rest { .. } => None,
        }
    }
}

/// Durations only come out whole when the quarter splits into dotted 32nds.
pub fn check_resolution(ticks_per_quarter: u16) -> Result<()> {
    if ticks_per_quarter == 0 || ticks_per_quarter % 16 != 0 {
        return Err(Error::Resolution(ticks_per_quarter));
    }
    Ok(())
}

/// Turns the note about to sound into an event. A silenced note comes back
/// as the held note.
pub fn place(note: Note, draw: Draw, ticks_per_quarter: u16) -> (MusicalEvent, Option<Note>) {
    let ticks = draw.ticks(ticks_per_quarter);
    match draw.modifier {
        Modifier::Silence => (MusicalEvent::Rest { ticks }, Some(note)),
        Modifier::Normal | Modifier::Dotted => (
            MusicalEvent::Note {
                pitch: note.pitch,
                velocity: note.velocity,
                ticks,
            },
            None,
        ),
    }
}

/// The fold state: the note waiting out a rest and everything emitted so far.
#[derive(Default)]
struct Hold {
    pending: Option<Note>,
    events: Vec<MusicalEvent>,
}
impl Hold {
    fn play(mut self, note: Note, draw: Draw, ticks_per_quarter: u16) -> Self {
        let (event, held) = place(note, draw, ticks_per_quarter);
        debug!(
            "Event {}: {event:?} ({} {:?})",
            self.events.len() + 1,
            draw.class.name(),
            draw.modifier
        );
        self.events.push(event);
        self.pending = held;
        self
    }
}

/// Assigns a random rhythm to every note of `sequence`.
///
/// The returned events contain each input note exactly once and in
/// order, with any rests in between, so the event count is the input length
/// plus the number of rests.
pub fn assign<R: Rng + ?Sized>(
    sequence: &[Note],
    rng: &mut R,
    ticks_per_quarter: u16,
) -> Result<Vec<MusicalEvent>> {
    if sequence.is_empty() {
        return Err(Error::InvalidInput("no notes to assign a rhythm to".into()));
    }
    check_resolution(ticks_per_quarter)?;
    let mut upcoming = sequence.iter().copied();
    let mut hold = Hold::default();
    while let Some(note) = hold.pending.or_else(|| upcoming.next()) {
        hold = hold.play(note, Draw::sample(rng), ticks_per_quarter);
    }
    Ok(hold.events)
}
