use std::fmt;

/// Diatonic note letter from a `<step>` element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    pub fn from_letter(letter: &str) -> Option<Step> {
        match letter {
            "C" => Some(Step::C),
            "D" => Some(Step::D),
            "E" => Some(Step::E),
            "F" => Some(Step::F),
            "G" => Some(Step::G),
            "A" => Some(Step::A),
            "B" => Some(Step::B),
            _ => None,
        }
    }
}

/// Order in which sharps are added to a key signature.
pub static SHARP_ORDER: [Step; 7] = [
    Step::F,
    Step::C,
    Step::G,
    Step::D,
    Step::A,
    Step::E,
    Step::B,
];

/// Order in which flats are added to a key signature.
pub static FLAT_ORDER: [Step; 7] = [
    Step::B,
    Step::E,
    Step::A,
    Step::D,
    Step::G,
    Step::C,
    Step::F,
];

pub const MAJOR_KEYS: [&str; 15] = [
    "C♭ major", "G♭ major", "D♭ major", "A♭ major", "E♭ major", "B♭ major", "F major", "C major",
    "G major", "D major", "A major", "E major", "B major", "F# major", "C# major",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    /// MusicXML `<accidental>` value
    pub const fn as_str(self) -> &'static str {
        match self {
            Accidental::Sharp => "sharp",
            Accidental::Flat => "flat",
        }
    }
}

impl fmt::Display for Accidental {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key signature as a count of fifths: sharps when positive, flats when negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct KeySignature {
    pub fifths: i32,
}

impl KeySignature {
    pub const fn new(fifths: i32) -> Self {
        KeySignature { fifths }
    }

    /// Parse the text of a `<fifths>` element, `None` if it is not an integer.
    pub fn parse_fifths(text: &str) -> Option<Self> {
        text.trim().parse::<i32>().ok().map(KeySignature::new)
    }

    /// Letters altered by this signature. Magnitudes beyond seven use the full table.
    pub fn altered_steps(&self) -> &'static [Step] {
        let count = (self.fifths.unsigned_abs() as usize).min(SHARP_ORDER.len());
        if self.fifths > 0 {
            &SHARP_ORDER[..count]
        } else {
            &FLAT_ORDER[..count]
        }
    }

    /// Accidental implied by this signature for a given letter.
    pub fn accidental_for(&self, step: Step) -> Option<Accidental> {
        if !self.altered_steps().contains(&step) {
            return None;
        }
        if self.fifths > 0 {
            Some(Accidental::Sharp)
        } else {
            Some(Accidental::Flat)
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = self
            .fifths
            .checked_add(7)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| MAJOR_KEYS.get(i));
        match name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{} fifths", self.fifths),
        }
    }
}
