use std::{
    fs::{create_dir_all, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use home::home_dir;
use scoretally::{NoteDuration, ScoreError};
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    reference_note: Option<NoteDuration>,
}

impl Config {
    // folder placed in $HOME directory
    const FOLDER: &'static str = ".scoretally";

    pub fn get_reference_note(&self) -> NoteDuration {
        self.reference_note.unwrap_or_default()
    }

    pub fn set_reference_note(&mut self, reference_note: NoteDuration) -> Result<(), ScoreError> {
        if self.reference_note == Some(reference_note) {
            // no op
            Ok(())
        } else {
            self.reference_note = Some(reference_note);
            self.save_config()
        }
    }

    fn get_base_path() -> Result<PathBuf, ScoreError> {
        let home = home_dir()
            .ok_or_else(|| ScoreError::ConfigError("Could not find home directory".to_string()))?;
        Ok(home.join(Self::FOLDER))
    }

    fn get_path() -> Result<PathBuf, ScoreError> {
        let base = Self::get_base_path()?;
        Ok(base.join("config.json"))
    }

    /// Creates config if it does not exist
    pub fn read_config() -> Result<Self, ScoreError> {
        let base_path = Self::get_base_path()?;
        if !base_path.exists() {
            create_dir_all(base_path)?;
        }
        let config_path = Self::get_path()?;
        if !config_path.exists() {
            // create empty config
            Config::default().save_config()?;
        }
        Self::read_from(&config_path)
    }

    fn read_from(config_path: &Path) -> Result<Self, ScoreError> {
        let file = File::open(config_path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|err| {
            ScoreError::ConfigError(format!("Could not read local configuration {err:}"))
        })
    }

    /// Assumes the config folder exists
    pub fn save_config(&self) -> Result<(), ScoreError> {
        self.save_to(&Self::get_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<(), ScoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            ScoreError::ConfigError(format!("Could not save local configuration {err:}"))
        })?;
        let mut file = File::create(config_path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reference_is_quarter() {
        assert_eq!(Config::default().get_reference_note(), NoteDuration::Quarter);
    }

    #[test]
    fn test_save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            reference_note: Some(NoteDuration::Sixteenth),
        };
        config.save_to(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"16th\""));
        assert_eq!(Config::read_from(&path).unwrap(), config);
    }

    #[test]
    fn test_empty_config_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(Config::read_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_corrupted_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"reference_note\": \"breve\"}").unwrap();
        assert!(matches!(
            Config::read_from(&path).unwrap_err(),
            ScoreError::ConfigError(_)
        ));
    }
}
