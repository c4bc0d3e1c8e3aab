use crate::geo::Coordinate;
use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use ratatui::crossterm::style::Stylize;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(about = "Windowed terminal table for geocoded city datasets")]
pub struct Args {
    /// Dataset file: .csv or .json, optionally .gz-compressed
    pub file: Option<PathBuf>,

    /// Fixed viewer location as LAT,LNG, skipping the network lookup
    #[arg(short = 'l', long, value_name = "LAT,LNG")]
    pub location: Option<String>,

    /// Run without a viewer location; the distance column stays disabled
    #[arg(long)]
    pub no_location: bool,

    /// Append debug logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// How the session acquires the viewer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationMode {
    /// One-shot network lookup after startup
    Lookup,
    Fixed(Coordinate),
    Disabled,
}

impl Args {
    pub fn resolve(&self) -> Result<(PathBuf, LocationMode)> {
        if self.location.is_some() && self.no_location {
            bail!(
                "{} {}",
                "[PROHIBITED]".red().bold(),
                "--location cannot be used together with --no-location. Choose one."
            );
        }

        let Some(file) = &self.file else {
            println!("{} No dataset file given", "[ERROR]".red().bold());
            let mut cmd = Args::command();
            cmd.print_help().expect("Failed to print help message");
            println!();
            std::process::exit(1);
        };

        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();
        let stem = name.strip_suffix(".gz").unwrap_or(&name);
        if !(stem.ends_with(".csv") || stem.ends_with(".json")) {
            bail!(
                "{} The dataset must be a .csv or .json file, optionally .gz-compressed (got {})",
                "[ERROR]".red().bold(),
                file.display()
            );
        }

        let mode = if self.no_location {
            LocationMode::Disabled
        } else if let Some(raw) = &self.location {
            LocationMode::Fixed(parse_location(raw)?)
        } else {
            LocationMode::Lookup
        };

        Ok((file.clone(), mode))
    }
}

fn parse_location(raw: &str) -> Result<Coordinate> {
    let Some((lat, lng)) = raw.split_once(',') else {
        bail!(
            "{} --location expects LAT,LNG (got {raw:?})",
            "[ERROR]".red().bold()
        );
    };
    let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) else {
        bail!(
            "{} --location expects numeric LAT,LNG (got {raw:?})",
            "[ERROR]".red().bold()
        );
    };
    let coord = Coordinate::new(lat, lng);
    if !coord.is_valid() {
        bail!(
            "{} --location out of range: latitude -90..90, longitude -180..180",
            "[ERROR]".red().bold()
        );
    }
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: &str) -> Args {
        Args {
            file: Some(PathBuf::from(file)),
            location: None,
            no_location: false,
            log_file: None,
        }
    }

    #[test]
    fn accepts_csv_json_and_gz_variants() {
        for file in ["nl.csv", "nl.json", "nl.csv.gz", "NL.JSON.GZ"] {
            let (path, mode) = args(file).resolve().unwrap();
            assert_eq!(path, PathBuf::from(file));
            assert_eq!(mode, LocationMode::Lookup);
        }
    }

    #[test]
    fn rejects_other_extensions() {
        for file in ["nl.txt", "nl.gz", "nl.csv.zip", "nl"] {
            assert!(args(file).resolve().is_err(), "{file} should be rejected");
        }
    }

    #[test]
    fn location_and_no_location_conflict() {
        let mut a = args("nl.csv");
        a.location = Some("52.0,5.0".into());
        a.no_location = true;
        let err = a.resolve().unwrap_err().to_string();
        assert!(err.contains("--no-location"));
    }

    #[test]
    fn fixed_location_is_parsed() {
        let mut a = args("nl.csv");
        a.location = Some(" 52.3676 , 4.9041 ".into());
        let (_, mode) = a.resolve().unwrap();
        assert_eq!(mode, LocationMode::Fixed(Coordinate::new(52.3676, 4.9041)));
    }

    #[test]
    fn no_location_disables_the_lookup() {
        let mut a = args("nl.csv");
        a.no_location = true;
        let (_, mode) = a.resolve().unwrap();
        assert_eq!(mode, LocationMode::Disabled);
    }

    #[test]
    fn bad_locations_are_rejected() {
        for raw in ["52.0", "a,b", "91,0", "0,-181", ""] {
            assert!(parse_location(raw).is_err(), "{raw:?} should be rejected");
        }
        assert!(parse_location("-90,-180").is_ok());
    }
}
