//! Standard MIDI File input and output.
//!
//! Rows are written as plain quarter notes so the next stage can read them
//! back; melodies are written as a single-track format 1 file with the meta
//! events notation software expects (tempo, 4/4, C major, piano).
//! Every note keeps the velocity it was read with.

use std::{fs, path::Path};

use log::info;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::{
    config::Config,
    error::Result,
    pitch::Pitch,
    rhythm::MusicalEvent,
    sequence::Note,
};

const CHANNEL: u8 = 0;
/// Acoustic Grand Piano.
const PROGRAM: u8 = 0;

/// Every sounding note-on, across all tracks, in file order.
pub fn read_notes(path: &Path) -> Result<Vec<Note>> {
    let bytes = fs::read(path)?;
    let smf = Smf::parse(&bytes)?;
    let notes: Vec<Note> = smf
        .tracks
        .iter()
        .flatten()
        .filter_map(|event| match event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } if vel.as_int() > 0 => {
                Pitch::new(key.as_int() as i32).map(|pitch| Note::new(pitch, vel.as_int()))
            }
            _ => None,
        })
        .collect();
    info!("Read {} notes from {}", notes.len(), path.display());
    Ok(notes)
}

fn meta(delta: u32, message: MetaMessage<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Meta(message),
    }
}

fn midi(delta: u32, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(delta),
        kind: TrackEventKind::Midi {
            channel: u4::new(CHANNEL),
            message,
        },
    }
}

fn note_on(delta: u32, pitch: Pitch, velocity: u8) -> TrackEvent<'static> {
    midi(
        delta,
        MidiMessage::NoteOn {
            key: u7::new(pitch.key()),
            vel: u7::new(velocity),
        },
    )
}

fn note_off(delta: u32, pitch: Pitch) -> TrackEvent<'static> {
    midi(
        delta,
        MidiMessage::NoteOff {
            key: u7::new(pitch.key()),
            vel: u7::new(0),
        },
    )
}

fn tempo(config: &Config) -> MetaMessage<'static> {
    MetaMessage::Tempo(u24::new(60_000_000 / config.tempo))
}

fn header(format: Format, config: &Config) -> Header {
    Header::new(format, Timing::Metrical(u15::new(config.ticks_per_quarter)))
}

/// Each note as a quarter note, back to back.
pub fn row_to_smf(notes: &[Note], config: &Config) -> Smf<'static> {
    let mut smf = Smf::new(header(Format::SingleTrack, config));
    let mut track: Track<'static> = vec![meta(0, tempo(config))];
    let quarter = config.ticks_per_quarter as u32;
    for note in notes {
        track.push(note_on(0, note.pitch, note.velocity));
        track.push(note_off(quarter, note.pitch));
    }
    track.push(meta(0, MetaMessage::EndOfTrack));
    smf.tracks.push(track);
    smf
}

/// Rests become silence before the next note-on.
pub fn melody_to_smf(events: &[MusicalEvent], config: &Config) -> Smf<'static> {
    let mut smf = Smf::new(header(Format::Parallel, config));
    let mut track: Track<'static> = vec![
        meta(0, MetaMessage::TrackName(b"Melody")),
        meta(0, tempo(config)),
        meta(0, MetaMessage::TimeSignature(4, 2, 24, 8)),
        meta(0, MetaMessage::KeySignature(0, false)),
        midi(
            0,
            MidiMessage::ProgramChange {
                program: u7::new(PROGRAM),
            },
        ),
    ];
    let mut silence = 0;
    for event in events {
        match *event {
            MusicalEvent::Note {
                pitch,
                velocity,
                ticks,
            } => {
                track.push(note_on(silence, pitch, velocity));
                track.push(note_off(ticks, pitch));
                silence = 0;
            }
            MusicalEvent::Rest { ticks } => silence += ticks,
        }
    }
    track.push(meta(silence, MetaMessage::EndOfTrack));
    smf.tracks.push(track);
    smf
}

fn save(smf: &Smf, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    fs::write(path, &buf)?;
    info!("MIDI file saved to: {}", path.display());
    Ok(())
}

pub fn write_row(notes: &[Note], config: &Config, path: &Path) -> Result<()> {
    save(&row_to_smf(notes, config), path)
}

pub fn write_melody(events: &[MusicalEvent], config: &Config, path: &Path) -> Result<()> {
    let total: u32 = events.iter().map(MusicalEvent::ticks).sum();
    let measure = config.ticks_per_quarter as u32 * 4;
    info!(
        "Total duration: {total} ticks ({:.2} measures of 4/4)",
        total as f32 / measure as f32
    );
    save(&melody_to_smf(events, config), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT;

    fn p(key: i32) -> Pitch {
        Pitch::new(key).unwrap()
    }

    #[test]
    fn row_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("row.mid");
        let row = [Note::new(p(31), 80), Note::new(p(24), 110), Note::new(p(35), 1)];
        write_row(&row, &DEFAULT, &path).unwrap();
        assert_eq!(read_notes(&path).unwrap(), row);
    }

    fn note_on_velocities(smf: &Smf) -> Vec<u8> {
        smf.tracks[0]
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } => Some(vel.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn melody_keeps_each_velocity() {
        let events = [
            MusicalEvent::Note { pitch: p(24), velocity: 110, ticks: 480 },
            MusicalEvent::Rest { ticks: 120 },
            MusicalEvent::Note { pitch: p(26), velocity: 37, ticks: 240 },
        ];
        let config = Config { velocity: 64, ..DEFAULT };
        assert_eq!(note_on_velocities(&melody_to_smf(&events, &config)), [110, 37]);
    }

    #[test]
    fn rests_delay_the_next_note() {
        let events = [
            MusicalEvent::Rest { ticks: 240 },
            MusicalEvent::Rest { ticks: 60 },
            MusicalEvent::Note { pitch: p(24), velocity: 80, ticks: 480 },
            MusicalEvent::Note { pitch: p(26), velocity: 80, ticks: 90 },
        ];
        let smf = melody_to_smf(&events, &DEFAULT);
        assert_eq!(smf.tracks.len(), 1);
        let notes: Vec<_> = smf.tracks[0]
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { .. } | MidiMessage::NoteOff { .. },
                        ..
                    }
                )
            })
            .map(|e| e.delta.as_int())
            .collect();
        assert_eq!(notes, [300, 480, 0, 90]);
    }

    #[test]
    fn velocity_zero_note_on_is_not_a_note() {
        let mut smf = row_to_smf(&[Note::from(p(24))], &DEFAULT);
        smf.tracks[0].insert(1, note_on(0, p(30), 0));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiet.mid");
        save(&smf, &path).unwrap();
        assert_eq!(read_notes(&path).unwrap(), [Note::from(p(24))]);
    }

    #[test]
    fn garbage_is_a_midi_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.mid");
        fs::write(&path, b"not a midi file").unwrap();
        assert!(matches!(read_notes(&path), Err(crate::Error::Midi(_))));
    }
}
