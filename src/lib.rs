//! Scoretally - MusicXML score analysis
//!
//! This library provides:
//! - Counting of measures across all parts of a score
//! - Beat totals relative to a reference note duration, with or without rests
//! - Explicit accidentals derived from the active key signature
//!
//! # Example
//!
//! ```no_run
//! use scoretally::{annotate_accidentals, count_measures, count_played_beats, read_score, NoteDuration};
//! use std::path::Path;
//!
//! let xml = read_score(Path::new("score.musicxml")).unwrap();
//! let measures = count_measures(&xml).unwrap();
//! let beats = count_played_beats(&xml, NoteDuration::Quarter).unwrap();
//! let annotated = annotate_accidentals(&xml).unwrap();
//! ```

pub mod error;
pub mod parser;
pub mod summary;

// Re-export main types for convenience
pub use error::ScoreError;
pub use parser::accidentals::{annotate_accidentals, annotate_accidentals_in_file};
pub use parser::beat_counter::{
    count_all_beats, count_beats, count_beats_in_file, count_played_beats, BeatMode, NoteEvent,
};
pub use parser::duration::NoteDuration;
pub use parser::key_signature::{Accidental, KeySignature, Step};
pub use parser::measure_counter::{count_measures, count_measures_in_file};
pub use parser::score_reader::{decode_score, read_score};
pub use summary::ScoreSummary;
