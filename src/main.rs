use std::{path::PathBuf, process::exit};

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use tonerow::{
    pipeline::{self, sibling},
    score::ScoreFormat,
    transform::RangePolicy,
    Config, Result,
};

/// Turns a random twelve-tone row into melodies as MIDI, score and CSV files.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand)]
enum Command {
    /// Write the twelve chromatic notes C1..B1 in random order.
    Generate {
        /// Path to the MIDI output
        #[arg(short, long, default_value = "chromatic_random.mid")]
        output: PathBuf,
        /// Seed for a reproducible row.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Append the reversed, inverted and reversed-inverted row to a row.
    Transform {
        /// A MIDI file whose first notes form the row
        input: PathBuf,
        /// Path to the MIDI output. Defaults to `<input>_transformed.mid`.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Give every note of a MIDI file random durations and rests.
    Melody {
        /// The MIDI file to take the notes from
        input: PathBuf,
        /// Seed for the first variation; later ones count up from it.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run generate, transform and melody one after another.
    Pipeline {
        /// Directory for every file written
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Seed for the row and the first variation; later ones count up from it.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct Overrides {
    /// Which default values to use
    /// Options: "1", "musescore", "open"
    #[arg(long, global = true, default_value_t = String::from("1"))]
    preset: String,
    /// MIDI ticks per quarter note, a multiple of 16.
    #[arg(long, global = true)]
    ticks_per_quarter: Option<u16>,
    /// The number of beats per minute.
    #[arg(long, global = true)]
    tempo: Option<u32>,
    /// Velocity of the generated row.
    #[arg(long, global = true)]
    velocity: Option<u8>,
    /// What to do with inverted notes outside C1..B1.
    #[arg(long, global = true, value_enum)]
    range_policy: Option<RangePolicy>,
    /// How many notes of the input form the row.
    #[arg(long, global = true)]
    row_length: Option<usize>,
    /// How many melodies to write.
    #[arg(long, global = true)]
    variations: Option<u32>,
    /// Notation format for the score.
    #[arg(long, global = true, value_enum)]
    score: Option<ScoreFormat>,
}

impl Overrides {
    fn config(self) -> Result<Config> {
        let Overrides {
            preset,
            ticks_per_quarter,
            tempo,
            velocity,
            range_policy,
            row_length,
            variations,
            score,
        } = self;
        let mut config = Config::preset(&preset)?;
        macro_rules! default {
            ($($field:ident),*) => {
                $(if let Some($field) = $field {
                    config.$field = $field;
                })*
            };
        }
        default!(
            ticks_per_quarter,
            tempo,
            velocity,
            range_policy,
            row_length,
            variations,
            score
        );
        config.validate()?;
        Ok(config)
    }
}

fn run(Cli { command, overrides }: Cli) -> Result<()> {
    let config = overrides.config()?;
    match command {
        Command::Generate { output, seed } => {
            pipeline::generate(&config, seed, &output)?;
        }
        Command::Transform { input, output } => {
            let output = output.unwrap_or_else(|| sibling(&input, "_transformed", "mid"));
            pipeline::transform_file(&config, &input, &output)?;
        }
        Command::Melody { input, seed } => {
            let written = pipeline::melody(&config, &input, seed)?;
            info!("{} variations written ({} files)", config.variations, written.len());
        }
        Command::Pipeline { dir, seed } => {
            std::fs::create_dir_all(&dir)?;
            let written = pipeline::run_all(&config, &dir, seed)?;
            info!("Pipeline finished, {} files written", written.len());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run(Cli::parse()) {
        error!("{err}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_argument_has_help() {
        let cli = Cli::command();
        for command in cli.get_subcommands() {
            for arg in command.get_arguments() {
                if arg.is_global_set() || arg.get_id() == "help" {
                    continue;
                }
                assert!(
                    arg.get_help().is_some(),
                    "{} {} has no help",
                    command.get_name(),
                    arg.get_id()
                );
            }
        }
    }
}
