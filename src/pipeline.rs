//! The three stages as file-to-file steps. Each stage only reads the file the
//! previous one wrote.

use std::path::{Path, PathBuf};

use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    config::Config,
    error::Result,
    generator::chromatic_row,
    midi::{read_notes, write_melody, write_row},
    rhythm::assign,
    score::write_score,
    sequence::NoteSequence,
    table::save_table,
    transform::transform,
};

/// Seeded when asked to, otherwise from the operating system.
pub fn rng(seed: Option<u64>) -> Xoshiro256PlusPlus {
    match seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_entropy(),
    }
}

/// `dir/stem_suffix.extension`, next to `input`.
pub fn sibling(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

pub fn generate(config: &Config, seed: Option<u64>, output: &Path) -> Result<NoteSequence> {
    let row = chromatic_row(&mut rng(seed)).with_velocity(config.velocity);
    write_row(&row, config, output)?;
    Ok(row)
}

pub fn transform_file(config: &Config, input: &Path, output: &Path) -> Result<NoteSequence> {
    let notes = read_notes(input)?;
    let row = NoteSequence::leading(&notes, config.row_length)?;
    let transformed = transform(&row, config.range_policy)?;
    write_row(&transformed, config, output)?;
    Ok(transformed)
}

/// Writes every variation's MIDI, score and table, returning the paths written.
pub fn melody(config: &Config, input: &Path, seed: Option<u64>) -> Result<Vec<PathBuf>> {
    let notes = NoteSequence::new(read_notes(input)?)?;
    let mut written = Vec::new();
    for variation in 1..=config.variations {
        info!("Generating variation {variation}");
        let seed = seed.map(|seed| seed.wrapping_add(variation as u64 - 1));
        let events = assign(&notes, &mut rng(seed), config.ticks_per_quarter)?;
        let rests = events.len() - notes.len();
        info!("{} notes became {} events ({rests} rests)", notes.len(), events.len());

        let suffix = format!("_melody_v{variation}");
        let midi = sibling(input, &suffix, "mid");
        write_melody(&events, config, &midi)?;
        let score = sibling(input, &suffix, config.score.extension());
        write_score(&events, config, config.score, &score)?;
        let table = sibling(input, &suffix, "csv");
        save_table(&events, config, &table)?;
        written.extend([midi, score, table]);
    }
    Ok(written)
}

/// All three stages in a row, inside `dir`.
pub fn run_all(config: &Config, dir: &Path, seed: Option<u64>) -> Result<Vec<PathBuf>> {
    let row_path = dir.join("chromatic_random.mid");
    generate(config, seed, &row_path)?;
    let transformed_path = sibling(&row_path, "_transformed", "mid");
    transform_file(config, &row_path, &transformed_path)?;
    let mut written = vec![row_path, transformed_path.clone()];
    written.extend(melody(config, &transformed_path, seed)?);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_names() {
        let path = Path::new("/tmp/out/chromatic_random.mid");
        assert_eq!(
            sibling(path, "_transformed", "mid"),
            Path::new("/tmp/out/chromatic_random_transformed.mid")
        );
        assert_eq!(
            sibling(Path::new("row.mid"), "_melody_v2", "csv"),
            Path::new("row_melody_v2.csv")
        );
    }
}
