use clap::{Parser, Subcommand};
use config::Config;
use scoretally::{
    annotate_accidentals, count_beats, count_measures, read_score, BeatMode, NoteDuration,
    ScoreError, ScoreSummary,
};
use std::io;
use std::path::{Path, PathBuf};

mod config;

fn main() {
    let result = main_result();
    std::process::exit(match result {
        Ok(()) => 0,
        Err(err) => {
            // use Display instead of Debug for user friendly error messages
            log::error!("{err}");
            1
        }
    });
}

pub fn main_result() -> Result<(), AppError> {
    // setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("scoretally=info"))
        .init();

    // args
    let args = CliArgs::parse();

    match args.command {
        Command::Measures { file } => {
            let xml = read_score_file(&file)?;
            println!("{}", count_measures(&xml)?);
        }
        Command::Beats {
            file,
            reference,
            all,
        } => {
            let xml = read_score_file(&file)?;
            let reference = resolve_reference(reference)?;
            let mode = if all {
                BeatMode::All
            } else {
                BeatMode::PlayedOnly
            };
            log::info!("Counting {mode:?} beats in {reference} notes");
            println!("{}", count_beats(&xml, reference, mode)?);
        }
        Command::Annotate { file, output } => {
            let xml = read_score_file(&file)?;
            let annotated = annotate_accidentals(&xml)?;
            match output {
                Some(output) => {
                    std::fs::write(&output, annotated)?;
                    log::info!("Annotated score written to {output:?}");
                }
                None => print!("{annotated}"),
            }
        }
        Command::Summary {
            file,
            reference,
            json,
        } => {
            let xml = read_score_file(&file)?;
            let reference = resolve_reference(reference)?;
            let summary = ScoreSummary::from_xml(&xml, reference)?;
            if json {
                let json = serde_json::to_string_pretty(&summary)
                    .map_err(|err| AppError::OtherError(err.to_string()))?;
                println!("{json}");
            } else {
                println!("{summary}");
            }
        }
        Command::Config { reference } => {
            let mut local_config = Config::read_config()?;
            if let Some(reference) = reference {
                local_config.set_reference_note(reference)?;
                log::info!("Default reference note set to {reference}");
            }
            println!("reference note: {}", local_config.get_reference_note());
        }
    }
    Ok(())
}

fn read_score_file(file: &Path) -> Result<String, AppError> {
    log::info!("Reading score file {file:?}");
    Ok(read_score(file)?)
}

/// Explicit reference wins, the local config is only read as a fallback.
fn resolve_reference(reference: Option<NoteDuration>) -> Result<NoteDuration, AppError> {
    match reference {
        Some(reference) => Ok(reference),
        None => Ok(Config::read_config()?.get_reference_note()),
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count the measures of all parts.
    Measures {
        /// Path to a MusicXML file.
        file: PathBuf,
    },
    /// Count beats in units of a reference note.
    Beats {
        /// Path to a MusicXML file.
        file: PathBuf,
        /// Reference note (whole, half, quarter, eighth, 16th, 32nd, 64th).
        #[arg(long)]
        reference: Option<NoteDuration>,
        /// Include rests.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Add the accidentals implied by the key signature.
    Annotate {
        /// Path to a MusicXML file.
        file: PathBuf,
        /// Optional output path, stdout otherwise.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print measures and beat totals.
    Summary {
        /// Path to a MusicXML file.
        file: PathBuf,
        /// Reference note (whole, half, quarter, eighth, 16th, 32nd, 64th).
        #[arg(long)]
        reference: Option<NoteDuration>,
        /// Print as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show or change the stored defaults.
    Config {
        /// New default reference note.
        #[arg(long)]
        reference: Option<NoteDuration>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("parsing error: {0}")]
    ParsingError(String),
    #[error("other error: {0}")]
    OtherError(String),
}

impl From<ScoreError> for AppError {
    fn from(error: ScoreError) -> Self {
        match error {
            ScoreError::ConfigError(s) => Self::ConfigError(s),
            ScoreError::UnknownNoteDuration(_) => Self::ConfigError(error.to_string()),
            ScoreError::FileNotFound(_)
            | ScoreError::InvalidEncoding(_)
            | ScoreError::MalformedDocument(_)
            | ScoreError::NoMeasuresFound => Self::ParsingError(error.to_string()),
            ScoreError::IoError(s) => Self::OtherError(s),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::OtherError(error.to_string())
    }
}
