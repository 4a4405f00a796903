//! Scale construction: the four supported modes and their interval tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Letter, Note};

/// Number of notes in a built scale (degrees 1..=8, degree 8 is the octave).
pub const SCALE_LENGTH: usize = 8;

/// Largest accidental run a scale degree may be spelled with.
pub const MAX_ALTERATION: i32 = 2;

/// A diatonic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
}

// Semitones above the root for degrees 1..=8.
const MAJOR_STEPS: [i32; SCALE_LENGTH] = [0, 2, 4, 5, 7, 9, 11, 12];
const NATURAL_MINOR_STEPS: [i32; SCALE_LENGTH] = [0, 2, 3, 5, 7, 8, 10, 12];
const HARMONIC_MINOR_STEPS: [i32; SCALE_LENGTH] = [0, 2, 3, 5, 7, 8, 11, 12];
const MELODIC_MINOR_STEPS: [i32; SCALE_LENGTH] = [0, 2, 3, 5, 7, 9, 11, 12];

impl Mode {
    /// Modes in page order.
    pub const ALL: [Mode; 4] = [
        Mode::Major,
        Mode::NaturalMinor,
        Mode::HarmonicMinor,
        Mode::MelodicMinor,
    ];

    /// Internal name, also used as the output directory.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::NaturalMinor => "natural_minor",
            Mode::HarmonicMinor => "harmonic_minor",
            Mode::MelodicMinor => "melodic_minor",
        }
    }

    pub fn steps(self) -> &'static [i32; SCALE_LENGTH] {
        match self {
            Mode::Major => &MAJOR_STEPS,
            Mode::NaturalMinor => &NATURAL_MINOR_STEPS,
            Mode::HarmonicMinor => &HARMONIC_MINOR_STEPS,
            Mode::MelodicMinor => &MELODIC_MINOR_STEPS,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    /// Accepts the internal name or its slug (`minor`, `harmonic-minor`, …).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Mode::Major),
            "natural_minor" | "natural-minor" | "minor" => Ok(Mode::NaturalMinor),
            "harmonic_minor" | "harmonic-minor" => Ok(Mode::HarmonicMinor),
            "melodic_minor" | "melodic-minor" => Ok(Mode::MelodicMinor),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("{root} {mode} is unsupported: degree {degree} needs more than a double accidental")]
    Unsupported { root: Note, mode: Mode, degree: usize },
    #[error("{root} {mode} is unsupported: no fingering chart entry for {spelling}")]
    NoFingering { root: Note, mode: Mode, spelling: String },
}

/// An ascending scale of [`SCALE_LENGTH`] spelled notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub root: Note,
    pub mode: Mode,
    pub notes: Vec<Note>,
}

/// Spell the scale of `mode` starting on `root`.
///
/// Degree `k` always uses the letter `k` steps above the root's letter; its
/// accidental is whatever reaches the mode's interval. A degree that would
/// need a triple accidental makes the whole scale unsupported.
pub fn build_scale(root: Note, mode: Mode) -> Result<Scale, ScaleError> {
    let root_key = root.key_number();
    let mut notes = Vec::with_capacity(SCALE_LENGTH);

    for (degree, step) in mode.steps().iter().enumerate() {
        let diatonic = root.letter.index() + degree as i32;
        let letter = Letter::from_index(diatonic);
        let octave = root.octave + diatonic.div_euclid(7);
        let natural = Note::new(letter, 0, octave);
        let alter = root_key + step - natural.key_number();
        if alter.abs() > MAX_ALTERATION {
            return Err(ScaleError::Unsupported {
                root,
                mode,
                degree: degree + 1,
            });
        }
        notes.push(Note::new(letter, alter, octave));
    }

    Ok(Scale { root, mode, notes })
}

impl Scale {
    pub fn key_numbers(&self) -> Vec<i32> {
        self.notes.iter().map(Note::key_number).collect()
    }
}
