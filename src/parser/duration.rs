use crate::ScoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic note length as written in a MusicXML `<type>` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteDuration {
    #[serde(rename = "whole")]
    Whole,
    #[serde(rename = "half")]
    Half,
    #[default]
    #[serde(rename = "quarter")]
    Quarter,
    #[serde(rename = "eighth")]
    Eighth,
    #[serde(rename = "16th", alias = "sixteenth")]
    Sixteenth,
    #[serde(rename = "32nd", alias = "thirty-second")]
    ThirtySecond,
    #[serde(rename = "64th", alias = "sixty-fourth")]
    SixtyFourth,
}

impl NoteDuration {
    pub const ALL: [NoteDuration; 7] = [
        NoteDuration::Whole,
        NoteDuration::Half,
        NoteDuration::Quarter,
        NoteDuration::Eighth,
        NoteDuration::Sixteenth,
        NoteDuration::ThirtySecond,
        NoteDuration::SixtyFourth,
    ];

    /// Fraction of a whole note.
    pub const fn value(self) -> f64 {
        match self {
            NoteDuration::Whole => 1.0,
            NoteDuration::Half => 0.5,
            NoteDuration::Quarter => 0.25,
            NoteDuration::Eighth => 0.125,
            NoteDuration::Sixteenth => 0.0625,
            NoteDuration::ThirtySecond => 0.031_25,
            NoteDuration::SixtyFourth => 0.015_625,
        }
    }

    /// MusicXML label
    pub const fn label(self) -> &'static str {
        match self {
            NoteDuration::Whole => "whole",
            NoteDuration::Half => "half",
            NoteDuration::Quarter => "quarter",
            NoteDuration::Eighth => "eighth",
            NoteDuration::Sixteenth => "16th",
            NoteDuration::ThirtySecond => "32nd",
            NoteDuration::SixtyFourth => "64th",
        }
    }

    /// Lookup by label, accepting the spelled-out forms of the short labels.
    pub fn from_label(label: &str) -> Option<NoteDuration> {
        match label {
            "whole" => Some(NoteDuration::Whole),
            "half" => Some(NoteDuration::Half),
            "quarter" => Some(NoteDuration::Quarter),
            "eighth" => Some(NoteDuration::Eighth),
            "16th" | "sixteenth" => Some(NoteDuration::Sixteenth),
            "32nd" | "thirty-second" => Some(NoteDuration::ThirtySecond),
            "64th" | "sixty-fourth" => Some(NoteDuration::SixtyFourth),
            _ => None,
        }
    }

    /// How many `reference` notes fit in this duration.
    pub fn in_units_of(self, reference: NoteDuration) -> f64 {
        self.value() / reference.value()
    }
}

impl fmt::Display for NoteDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for NoteDuration {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        NoteDuration::from_label(&label).ok_or(ScoreError::UnknownNoteDuration(label))
    }
}
