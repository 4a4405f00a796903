//! Pitch model: letters, accidentals and spelled notes.
//!
//! A [`Note`] keeps its spelling (letter, accidental run, octave) and derives
//! a linear key number from it, so enharmonic spellings such as `C#4` and
//! `Db4` stay distinct values while landing on the same physical key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semitones per octave.
pub const OCTAVE: i32 = 12;

/// One of the seven note letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Letters in ascending order within an octave.
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position among the white keys of an octave (C=0 … B=6).
    pub fn index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Pitch class of the unaltered letter.
    pub fn pitch_class(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Letter at a (possibly out of range) diatonic index, wrapping around.
    pub fn from_index(index: i32) -> Letter {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Errors from parsing scientific pitch notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("empty note name")]
    Empty,
    #[error("unknown note letter '{0}'")]
    UnknownLetter(char),
    #[error("note '{0}' mixes sharps and flats")]
    MixedAccidentals(String),
    #[error("note '{0}' has no octave")]
    MissingOctave(String),
    #[error("note '{0}' has an invalid octave")]
    InvalidOctave(String),
}

/// A spelled note: letter, chromatic alteration and octave.
///
/// `alter` counts sharps when positive and flats when negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Note {
    pub letter: Letter,
    pub alter: i32,
    pub octave: i32,
}

impl Note {
    pub fn new(letter: Letter, alter: i32, octave: i32) -> Self {
        Self {
            letter,
            alter,
            octave,
        }
    }

    /// Absolute chromatic position. C4 = 48, monotonic across octaves.
    pub fn key_number(&self) -> i32 {
        OCTAVE * self.octave + self.letter.pitch_class() + self.alter
    }

    /// MIDI note number (middle C = 60).
    pub fn midi_note(&self) -> i32 {
        self.key_number() + OCTAVE
    }

    /// Pitch class 0..12 of the sounding key.
    pub fn pitch_class(&self) -> i32 {
        self.key_number().rem_euclid(OCTAVE)
    }

    /// ASCII accidental run: `#`, `##`, `b`, `bb`, or empty.
    pub fn accidental(&self) -> String {
        let symbol = if self.alter > 0 { "#" } else { "b" };
        symbol.repeat(self.alter.unsigned_abs() as usize)
    }

    /// Every note from `min_octave` to `max_octave` inclusive, spelled with
    /// at most one accidental, in octave → letter → (flat, natural, sharp)
    /// order.
    pub fn all(min_octave: i32, max_octave: i32) -> Vec<Note> {
        let mut notes = Vec::new();
        for octave in min_octave..=max_octave {
            for letter in Letter::ALL {
                for alter in [-1, 0, 1] {
                    notes.push(Note::new(letter, alter, octave));
                }
            }
        }
        notes
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter.as_char(), self.accidental(), self.octave)
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

impl TryFrom<String> for Note {
    type Error = NoteParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    /// Parse scientific pitch notation such as `C4`, `F#3`, `Ebb5` or `B-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(NoteParseError::Empty)?;
        let letter = Letter::from_char(first).ok_or(NoteParseError::UnknownLetter(first))?;

        let rest = chars.as_str();
        let accidental_len = rest
            .find(|c: char| c != '#' && c != 'b')
            .unwrap_or(rest.len());
        let (accidental, octave) = rest.split_at(accidental_len);

        let sharps = accidental.matches('#').count() as i32;
        let flats = accidental.matches('b').count() as i32;
        if sharps > 0 && flats > 0 {
            return Err(NoteParseError::MixedAccidentals(s.to_string()));
        }
        if octave.is_empty() {
            return Err(NoteParseError::MissingOctave(s.to_string()));
        }
        let octave: i32 = octave
            .parse()
            .map_err(|_| NoteParseError::InvalidOctave(s.to_string()))?;

        Ok(Note::new(letter, sharps - flats, octave))
    }
}
