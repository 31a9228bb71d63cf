use std::{io, path::Path};

use log::info;

use crate::{config::Config, error::Result, rhythm::DurationClass, rhythm::MusicalEvent};

const HEADER: [&str; 9] = [
    "Event_Number",
    "Type",
    "Note_Number",
    "Note_Name",
    "Note_Name_Es",
    "Velocity",
    "Duration_Ticks",
    "Duration_Name",
    "Duration_Spanish",
];

/// English and Spanish names for a tick count, e.g. `1/4 dotted` and
/// `negra con puntillo`.
pub fn duration_names(ticks: u32, ticks_per_quarter: u16) -> (String, String) {
    for class in DurationClass::ALL {
        let base = class.base_ticks(ticks_per_quarter);
        if ticks == base {
            return (class.name().to_string(), class.spanish_name().to_string());
        }
        if ticks == base + base / 2 {
            return (
                format!("{} dotted", class.name()),
                format!("{} con puntillo", class.spanish_name()),
            );
        }
    }
    let fallback = format!("{ticks} ticks");
    (fallback.clone(), fallback)
}

/// One row per event, rests with empty note columns.
pub fn write_table<W: io::Write>(events: &[MusicalEvent], config: &Config, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for (i, event) in events.iter().enumerate() {
        let (name, spanish) = duration_names(event.ticks(), config.ticks_per_quarter);
        let number = (i + 1).to_string();
        let ticks = event.ticks().to_string();
        let record = match *event {
            MusicalEvent::Note { pitch, velocity, .. } => [
                number,
                "note".to_string(),
                pitch.key().to_string(),
                pitch.english_name(),
                pitch.spanish_name(),
                velocity.to_string(),
                ticks,
                name,
                spanish,
            ],
            MusicalEvent::Rest { .. } => [
                number,
                "rest".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                ticks,
                name,
                spanish,
            ],
        };
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_table(events: &[MusicalEvent], config: &Config, path: &Path) -> Result<()> {
    write_table(events, config, std::fs::File::create(path)?)?;
    info!("CSV file saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT, pitch::Pitch};

    #[test]
    fn names() {
        assert_eq!(duration_names(60, 480), ("1/32".into(), "fusa".into()));
        assert_eq!(
            duration_names(720, 480),
            ("1/4 dotted".into(), "negra con puntillo".into())
        );
        assert_eq!(duration_names(2880, 480).1, "redonda con puntillo");
        assert_eq!(duration_names(100, 480).0, "100 ticks");
        assert_eq!(duration_names(96, 96).0, "1/4");
    }

    #[test]
    fn rows() {
        let events = [
            MusicalEvent::Rest { ticks: 960 },
            MusicalEvent::Note { pitch: Pitch::new(27).unwrap(), velocity: 80, ticks: 180 },
            MusicalEvent::Note { pitch: Pitch::new(35).unwrap(), velocity: 110, ticks: 1920 },
        ];
        let mut out = Vec::new();
        write_table(&events, &DEFAULT, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Event_Number,Type,Note_Number"));
        assert_eq!(lines[1], "1,rest,,,,,960,1/2,blanca");
        assert_eq!(lines[2], "2,note,27,D#1,Re#1,80,180,1/16 dotted,semicorchea con puntillo");
        assert_eq!(lines[3], "3,note,35,B1,Si1,110,1920,whole,redonda");
    }
}
