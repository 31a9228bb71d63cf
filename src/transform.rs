use clap::ValueEnum;
use log::{debug, info};

use crate::{
    error::{Error, Result},
    pitch::{Pitch, CHROMATIC_OCTAVE, MIDI_KEYS},
    sequence::{Note, NoteSequence},
};

/// What to do with an inverted pitch that leaves the chromatic octave.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum RangePolicy {
    /// Fail the whole transformation.
    Reject,
    /// Saturate at C1 or B1.
    Clamp,
    /// Fold by octaves back into C1..B1, keeping the pitch class.
    Wrap,
    /// Keep the mirrored pitch in any octave, saturating at the MIDI key range.
    Extend,
}
impl RangePolicy {
    fn apply(self, index: usize, value: i32) -> Result<Pitch> {
        let (low, high) = (*CHROMATIC_OCTAVE.start(), *CHROMATIC_OCTAVE.end());
        let key = match self {
            RangePolicy::Reject if !CHROMATIC_OCTAVE.contains(&value) => {
                return Err(Error::OutOfRange { index, value })
            }
            RangePolicy::Reject => value,
            RangePolicy::Clamp => value.clamp(low, high),
            RangePolicy::Extend => value.clamp(*MIDI_KEYS.start(), *MIDI_KEYS.end()),
            RangePolicy::Wrap => low + (value - low).rem_euclid(12),
        };
        Pitch::new(key).ok_or(Error::OutOfRange { index, value })
    }
}

/// Mirrors every pitch around the first one: `2 * s[0] - s[i]`. Velocities
/// stay with their position.
pub fn invert(sequence: &NoteSequence, policy: RangePolicy) -> Result<NoteSequence> {
    let anchor = sequence[0].pitch.key() as i32;
    let inverted = sequence
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let pitch = policy.apply(i, 2 * anchor - note.pitch.key() as i32)?;
            Ok(Note::new(pitch, note.velocity))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(NoteSequence(inverted))
}

pub fn reverse(sequence: &NoteSequence) -> NoteSequence {
    NoteSequence(sequence.iter().rev().copied().collect())
}

/// Concatenates the sequence, its retrograde, its inversion and the
/// retrograde of the inversion.
pub fn transform(sequence: &NoteSequence, policy: RangePolicy) -> Result<NoteSequence> {
    let retrograde = reverse(sequence);
    let inversion = invert(sequence, policy)?;
    let retrograde_inversion = reverse(&inversion);
    let parts = [
        ("Same notes", sequence),
        ("Reversed", &retrograde),
        ("Intervallic inversion", &inversion),
        ("Reversed inversion", &retrograde_inversion),
    ];
    let mut combined = Vec::with_capacity(sequence.len() * parts.len());
    for (name, part) in parts {
        debug!("{name}: {part}");
        combined.extend_from_slice(part);
    }
    info!("Combined sequence of {} notes", combined.len());
    Ok(NoteSequence(combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::chromatic_row;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const ROW: [i32; 12] = [24, 26, 25, 27, 29, 28, 30, 32, 31, 33, 35, 34];

    fn row() -> NoteSequence {
        NoteSequence::from_keys(&ROW).unwrap()
    }

    #[test]
    fn four_parts() {
        let s = row();
        let out = transform(&s, RangePolicy::Wrap).unwrap();
        assert_eq!(out.len(), 48);
        assert_eq!(&out[..12], &s[..]);
        assert_eq!(
            out[12..24].iter().map(|n| n.pitch.key()).collect::<Vec<_>>(),
            [34, 35, 33, 31, 32, 30, 28, 29, 27, 25, 26, 24]
        );
        let part3: Vec<_> = out[24..36].to_vec();
        let mut part4: Vec<_> = out[36..].to_vec();
        part4.reverse();
        assert_eq!(part3, part4);
        assert_eq!(part3[0].pitch.key(), 24);
    }

    #[test]
    fn below_the_octave_per_policy() {
        let s = row();
        assert!(matches!(
            invert(&s, RangePolicy::Reject),
            Err(Error::OutOfRange { index: 1, value: 22 })
        ));
        assert_eq!(invert(&s, RangePolicy::Clamp).unwrap()[1].pitch.key(), 24);
        assert_eq!(invert(&s, RangePolicy::Wrap).unwrap()[1].pitch.key(), 34);
        assert_eq!(invert(&s, RangePolicy::Extend).unwrap()[1].pitch.key(), 22);
        assert!(transform(&s, RangePolicy::Reject).is_err());
    }

    #[test]
    fn above_the_octave_per_policy() {
        let s = NoteSequence::from_keys(&[35, 24]).unwrap();
        assert_eq!(invert(&s, RangePolicy::Extend).unwrap().keys(), [35, 46]);
        assert_eq!(invert(&s, RangePolicy::Clamp).unwrap().keys(), [35, 35]);
        assert_eq!(invert(&s, RangePolicy::Wrap).unwrap().keys(), [35, 34]);
    }

    #[test]
    fn extend_saturates_at_the_midi_range() {
        let high = NoteSequence::from_keys(&[100, 20, 90]).unwrap();
        assert_eq!(invert(&high, RangePolicy::Extend).unwrap().keys(), [100, 127, 110]);
        let low = NoteSequence::from_keys(&[10, 30, 5]).unwrap();
        assert_eq!(invert(&low, RangePolicy::Extend).unwrap().keys(), [10, 0, 15]);
    }

    #[test]
    fn velocities_follow_their_position() {
        let mut s = row();
        for (i, note) in s.0.iter_mut().enumerate() {
            note.velocity = 60 + i as u8;
        }
        let out = transform(&s, RangePolicy::Wrap).unwrap();
        let velocities = out.velocities();
        let forward: Vec<u8> = (60..72).collect();
        let backward: Vec<u8> = forward.iter().rev().copied().collect();
        assert_eq!(&velocities[..12], &forward[..]);
        assert_eq!(&velocities[12..24], &backward[..]);
        assert_eq!(&velocities[24..36], &forward[..]);
        assert_eq!(&velocities[36..], &backward[..]);
    }

    #[test]
    fn inversion_is_self_inverse() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(12);
        for _ in 0..300 {
            let s = chromatic_row(&mut rng);
            for policy in [RangePolicy::Wrap, RangePolicy::Extend] {
                let twice = invert(&invert(&s, policy).unwrap(), policy).unwrap();
                assert_eq!(twice, s, "{policy:?} on {s}");
            }
        }
        let inside = NoteSequence::from_keys(&[30, 28, 32, 29, 31]).unwrap();
        for policy in [RangePolicy::Reject, RangePolicy::Clamp] {
            let twice = invert(&invert(&inside, policy).unwrap(), policy).unwrap();
            assert_eq!(twice, inside);
        }
    }

    #[test]
    fn deterministic() {
        let s = row();
        assert_eq!(
            transform(&s, RangePolicy::Wrap).unwrap(),
            transform(&s, RangePolicy::Wrap).unwrap()
        );
    }
}
