use crate::parser::beat_counter::{count_beats, BeatMode};
use crate::parser::duration::NoteDuration;
use crate::parser::measure_counter::count_measures;
use crate::parser::score_reader::read_score;
use crate::ScoreError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Measure and beat totals of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub measures: usize,
    pub played_beats: f64,
    pub all_beats: f64,
    pub reference: NoteDuration,
}

impl ScoreSummary {
    pub fn from_xml(xml: &str, reference: NoteDuration) -> Result<Self, ScoreError> {
        Ok(ScoreSummary {
            measures: count_measures(xml)?,
            played_beats: count_beats(xml, reference, BeatMode::PlayedOnly)?,
            all_beats: count_beats(xml, reference, BeatMode::All)?,
            reference,
        })
    }

    pub fn from_file(path: &Path, reference: NoteDuration) -> Result<Self, ScoreError> {
        let xml = read_score(path)?;
        Self::from_xml(&xml, reference)
    }

    /// Beats taken by rests
    pub fn silent_beats(&self) -> f64 {
        self.all_beats - self.played_beats
    }
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measures: {}", self.measures)?;
        writeln!(f, "Played beats: {:.2} ({} notes)", self.played_beats, self.reference)?;
        write!(f, "All beats: {:.2} ({} notes)", self.all_beats, self.reference)
    }
}
