use crate::parser::duration::NoteDuration;
use crate::parser::score_reader::{read_score, ScoreEvent, ScoreReader};
use crate::ScoreError;
use std::path::Path;

const NOTE: &str = "note";
const REST: &str = "rest";
const TYPE: &str = "type";
const ACTUAL_NOTES: &str = "actual-notes";
const NORMAL_NOTES: &str = "normal-notes";

/// Which note events contribute to a beat total.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BeatMode {
    /// Sounding notes only, rests are skipped
    PlayedOnly,
    /// Notes and rests
    All,
}

/// State of the `<note>` currently being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    pub duration_label: Option<String>,
    pub is_rest: bool,
    pub actual_notes: u32,
    pub normal_notes: u32,
}

impl Default for NoteEvent {
    fn default() -> Self {
        NoteEvent {
            duration_label: None,
            is_rest: false,
            actual_notes: 1,
            normal_notes: 1,
        }
    }
}

impl NoteEvent {
    pub fn mark_rest(&mut self) {
        self.is_rest = true;
    }

    pub fn set_duration_label(&mut self, label: &str) {
        if !label.is_empty() {
            self.duration_label = Some(label.to_string());
        }
    }

    pub fn set_actual_notes(&mut self, text: &str) {
        if !text.is_empty() {
            self.actual_notes = parse_tuplet_count(text);
        }
    }

    pub fn set_normal_notes(&mut self, text: &str) {
        if !text.is_empty() {
            self.normal_notes = parse_tuplet_count(text);
        }
    }

    /// Tuplet scaling factor applied to the nominal duration.
    pub fn time_modification(&self) -> f64 {
        f64::from(self.normal_notes) / f64::from(self.actual_notes)
    }

    /// Contribution of the completed note to the total, in `reference` units.
    pub fn beats(&self, reference: NoteDuration, mode: BeatMode) -> f64 {
        if mode == BeatMode::PlayedOnly && self.is_rest {
            return 0.0;
        }
        let Some(label) = &self.duration_label else {
            return 0.0;
        };
        match NoteDuration::from_label(label) {
            Some(duration) => duration.in_units_of(reference) * self.time_modification(),
            None => {
                log::debug!("Ignoring note with unknown type {label:?}");
                0.0
            }
        }
    }
}

/// Tuplet counts default to 1 when not a positive integer.
fn parse_tuplet_count(text: &str) -> u32 {
    match text.parse::<u32>() {
        Ok(count) if count > 0 => count,
        _ => {
            log::warn!("Invalid tuplet count {text:?}, using 1");
            1
        }
    }
}

/// Sum note durations expressed in `reference` units.
///
/// Notes without a recognized `<type>` contribute nothing. Tuplets scale a note by
/// `normal-notes / actual-notes`.
pub fn count_beats(xml: &str, reference: NoteDuration, mode: BeatMode) -> Result<f64, ScoreError> {
    let mut total_beats = 0.0;
    let mut current_note: Option<NoteEvent> = None;
    let mut current_element: Option<String> = None;

    for event in ScoreReader::new(xml) {
        match event? {
            ScoreEvent::Open(name) => {
                if name == NOTE {
                    current_note = Some(NoteEvent::default());
                } else if name == REST {
                    if let Some(note) = current_note.as_mut() {
                        note.mark_rest();
                    }
                }
                current_element = Some(name);
            }
            ScoreEvent::Text(text) => {
                let (Some(note), Some(element)) = (current_note.as_mut(), &current_element) else {
                    continue;
                };
                match element.as_str() {
                    TYPE => note.set_duration_label(&text),
                    ACTUAL_NOTES => note.set_actual_notes(&text),
                    NORMAL_NOTES => note.set_normal_notes(&text),
                    _ => {}
                }
            }
            ScoreEvent::Close(name) => {
                if name == NOTE {
                    if let Some(note) = current_note.take() {
                        let beats = note.beats(reference, mode);
                        log::debug!("{note:?} -> {beats} {reference} beats");
                        total_beats += beats;
                    }
                }
                current_element = None;
            }
        }
    }

    log::debug!("Counted {total_beats} {reference} beats ({mode:?})");
    Ok(total_beats)
}

pub fn count_played_beats(xml: &str, reference: NoteDuration) -> Result<f64, ScoreError> {
    count_beats(xml, reference, BeatMode::PlayedOnly)
}

pub fn count_all_beats(xml: &str, reference: NoteDuration) -> Result<f64, ScoreError> {
    count_beats(xml, reference, BeatMode::All)
}

pub fn count_beats_in_file(
    path: &Path,
    reference: NoteDuration,
    mode: BeatMode,
) -> Result<f64, ScoreError> {
    let xml = read_score(path)?;
    count_beats(&xml, reference, mode)
}
