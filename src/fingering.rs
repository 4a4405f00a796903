//! Scale fingering chart.
//!
//! Fingerings follow the chart at
//! <http://robertkelleyphd.com/home/teaching/keyboard/keyboard-scale-fingering-chart/>.
//! The chart is keyed by the exact root spelling; roots spelled differently
//! are first sent through the enharmonic redirect table.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::model::Note;
use crate::scale::{build_scale, Mode, Scale, ScaleError, SCALE_LENGTH};

/// One hand's finger numbers for degrees 1..=8 (thumb = 1).
pub type FingerRow = [u8; SCALE_LENGTH];

/// Right-hand and left-hand fingers for one ascending scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fingering {
    pub right: FingerRow,
    pub left: FingerRow,
}

/// A note with up to two display labels, one per hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledNote {
    pub note: Note,
    pub upper: Option<String>,
    pub lower: Option<String>,
}

impl LabeledNote {
    pub fn new(note: Note, upper: Option<String>, lower: Option<String>) -> Self {
        Self { note, upper, lower }
    }

    pub fn unlabeled(note: Note) -> Self {
        Self::new(note, None, None)
    }
}

impl Fingering {
    /// Zip a scale with this fingering: right hand above, left hand below.
    pub fn labeled_notes(&self, scale: &Scale) -> Vec<LabeledNote> {
        scale
            .notes
            .iter()
            .zip(self.right.iter().zip(self.left.iter()))
            .map(|(note, (right, left))| {
                LabeledNote::new(*note, Some(right.to_string()), Some(left.to_string()))
            })
            .collect()
    }
}

// ── Reference data ──────────────────────────────────────────────────

/// Root spellings absent from the chart and the spelling that replaces them.
pub const ENHARMONIC_REDIRECTS: [(&str, &str); 7] = [
    ("A#4", "Bb4"),
    ("B#4", "C4"),
    ("Cb4", "B4"),
    ("D#4", "Eb4"),
    ("Db4", "C#4"),
    ("G#4", "Ab4"),
    ("Gb4", "F#4"),
];

pub type ChartRow = (&'static str, Mode, FingerRow, FingerRow);

/// (root, mode, right hand, left hand)
#[rustfmt::skip]
pub const FINGERING_CHART: [ChartRow; 48] = [
    ("C4", Mode::Major,         [1,2,3,1,2,3,4,1], [1,4,3,2,1,3,2,1]),
    ("C4", Mode::NaturalMinor,  [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),
    ("C4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),
    ("C4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [2,1,4,3,2,1,3,2]),

    ("A4", Mode::Major,         [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),
    ("A4", Mode::NaturalMinor,  [1,2,3,1,2,3,4,1], [1,4,3,2,1,3,2,1]),
    ("A4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [3,2,1,3,2,1,4,3]),
    ("A4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),

    ("G4", Mode::Major,         [1,2,3,1,2,3,4,1], [3,2,1,3,2,1,4,3]),
    ("G4", Mode::NaturalMinor,  [2,3,4,1,2,3,1,2], [2,1,3,2,1,4,3,2]),
    ("G4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),
    ("G4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [2,1,4,3,2,1,3,2]),

    ("D4", Mode::Major,         [1,2,3,1,2,3,4,1], [2,1,4,3,2,1,3,2]),
    ("D4", Mode::NaturalMinor,  [2,3,1,2,3,4,1,2], [2,1,3,2,1,4,3,2]),
    ("D4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [2,1,3,2,1,4,3,2]),
    ("D4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [3,2,1,3,2,1,4,3]),

    ("E4", Mode::Major,         [1,2,3,1,2,3,4,1], [1,4,3,2,1,3,2,1]),
    ("E4", Mode::NaturalMinor,  [3,4,1,2,3,1,2,3], [1,4,3,2,1,3,2,1]),
    ("E4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [1,4,3,2,1,3,2,1]),
    ("E4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [1,4,3,2,1,3,2,1]),

    ("B4", Mode::Major,         [1,2,3,1,2,3,4,1], [1,3,2,1,4,3,2,1]),
    ("B4", Mode::NaturalMinor,  [3,4,1,2,3,1,2,3], [1,3,2,1,4,3,2,1]),
    ("B4", Mode::HarmonicMinor, [1,2,3,1,2,3,4,1], [1,3,2,1,4,3,2,1]),
    ("B4", Mode::MelodicMinor,  [1,2,3,1,2,3,4,1], [1,3,2,1,4,3,2,1]),

    ("F#4", Mode::Major,         [2,3,4,1,2,3,1,2], [4,3,2,1,3,2,1,4]),
    ("F#4", Mode::NaturalMinor,  [3,4,1,2,3,1,2,3], [4,3,2,1,3,2,1,4]),
    ("F#4", Mode::HarmonicMinor, [3,4,1,2,3,1,2,3], [4,3,2,1,3,2,1,4]),
    ("F#4", Mode::MelodicMinor,  [2,3,1,2,3,4,1,2], [4,3,2,1,3,2,1,4]),

    ("C#4", Mode::Major,         [2,3,1,2,3,4,1,2], [3,2,1,4,3,2,1,3]),
    ("C#4", Mode::NaturalMinor,  [3,4,1,2,3,1,2,3], [3,2,1,4,3,2,1,3]),
    ("C#4", Mode::HarmonicMinor, [3,4,1,2,3,1,2,3], [3,2,1,4,3,2,1,3]),
    ("C#4", Mode::MelodicMinor,  [2,3,1,2,3,4,1,2], [3,2,1,4,3,2,1,3]),

    ("Ab4", Mode::Major,         [3,4,1,2,3,1,2,3], [3,2,1,4,3,2,1,3]),
    ("Ab4", Mode::NaturalMinor,  [3,4,1,2,3,1,2,3], [3,2,1,3,2,1,4,3]),
    ("Ab4", Mode::HarmonicMinor, [3,4,1,2,3,1,2,3], [3,2,1,4,3,2,1,3]),
    ("Ab4", Mode::MelodicMinor,  [3,4,1,2,3,1,2,3], [3,2,1,4,3,2,1,3]),

    ("Eb4", Mode::Major,         [3,1,2,3,4,1,2,3], [3,2,1,4,3,2,1,3]),
    ("Eb4", Mode::NaturalMinor,  [3,1,2,3,4,1,2,3], [2,1,4,3,2,1,3,2]),
    ("Eb4", Mode::HarmonicMinor, [3,1,2,3,4,1,2,3], [2,1,4,3,2,1,3,2]),
    ("Eb4", Mode::MelodicMinor,  [3,1,2,3,4,1,2,3], [2,1,4,3,2,1,3,2]),

    ("Bb4", Mode::Major,         [4,1,2,3,1,2,3,4], [3,2,1,4,3,2,1,3]),
    ("Bb4", Mode::NaturalMinor,  [4,1,2,3,1,2,3,4], [2,1,3,2,1,4,3,2]),
    ("Bb4", Mode::HarmonicMinor, [4,1,2,3,1,2,3,4], [2,1,3,2,1,4,3,2]),
    ("Bb4", Mode::MelodicMinor,  [4,1,2,3,1,2,3,4], [2,1,4,3,2,1,3,2]),

    ("F4", Mode::Major,         [1,2,3,4,1,2,3,1], [3,2,1,4,3,2,1,3]),
    ("F4", Mode::NaturalMinor,  [1,2,3,4,1,2,3,1], [2,1,3,2,1,4,3,2]),
    ("F4", Mode::HarmonicMinor, [1,2,3,4,1,2,3,1], [2,1,3,2,1,4,3,2]),
    ("F4", Mode::MelodicMinor,  [1,2,3,4,1,2,3,1], [2,1,4,3,2,1,3,2]),
];

/// Number of distinct roots the chart covers.
pub const CHART_ROOTS: usize = 12;

const MIN_FINGER: u8 = 1;
const MAX_FINGER: u8 = 4;

/// Malformed fixed reference data. Fatal: detected before any output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    #[error("fingering chart root '{0}' is not a valid note")]
    InvalidRoot(String),
    #[error("finger {finger} for {root} {mode} is outside 1..=4")]
    FingerOutOfRange { root: String, mode: Mode, finger: u8 },
    #[error("fingering chart has two rows for {root} {mode}")]
    DuplicateEntry { root: String, mode: Mode },
    #[error("fingering chart covers {roots} roots and {entries} entries, expected 12 roots x 4 modes")]
    IncompleteChart { roots: usize, entries: usize },
    #[error("enharmonic redirect {from} -> {to} does not land on a chart root")]
    DanglingRedirect { from: String, to: String },
    #[error("enharmonic redirect source {0} shadows a chart root")]
    ShadowedRoot(String),
}

/// Validated fingering chart plus redirect table.
#[derive(Debug, Clone)]
pub struct FingeringTable {
    entries: HashMap<(String, Mode), Fingering>,
    redirects: HashMap<String, String>,
}

static STANDARD: Lazy<Result<FingeringTable, ReferenceDataError>> =
    Lazy::new(|| FingeringTable::from_rows(&FINGERING_CHART, &ENHARMONIC_REDIRECTS));

impl FingeringTable {
    /// The built-in chart, validated on first use and shared for the rest of
    /// the process.
    pub fn standard() -> Result<&'static FingeringTable, ReferenceDataError> {
        STANDARD.as_ref().map_err(Clone::clone)
    }

    /// Build and validate a table from literal rows.
    pub fn from_rows(
        rows: &[ChartRow],
        redirects: &[(&str, &str)],
    ) -> Result<Self, ReferenceDataError> {
        let mut entries = HashMap::new();
        for (root, mode, right, left) in rows {
            root.parse::<Note>()
                .map_err(|_| ReferenceDataError::InvalidRoot(root.to_string()))?;
            if let Some(&finger) = right
                .iter()
                .chain(left.iter())
                .find(|f| !(MIN_FINGER..=MAX_FINGER).contains(*f))
            {
                return Err(ReferenceDataError::FingerOutOfRange {
                    root: root.to_string(),
                    mode: *mode,
                    finger,
                });
            }
            let fingering = Fingering {
                right: *right,
                left: *left,
            };
            if entries.insert((root.to_string(), *mode), fingering).is_some() {
                return Err(ReferenceDataError::DuplicateEntry {
                    root: root.to_string(),
                    mode: *mode,
                });
            }
        }

        let mut roots: Vec<&str> = rows.iter().map(|row| row.0).collect();
        roots.sort_unstable();
        roots.dedup();
        if roots.len() != CHART_ROOTS || entries.len() != CHART_ROOTS * Mode::ALL.len() {
            return Err(ReferenceDataError::IncompleteChart {
                roots: roots.len(),
                entries: entries.len(),
            });
        }

        let mut redirect_map = HashMap::new();
        for (from, to) in redirects {
            if roots.contains(from) {
                return Err(ReferenceDataError::ShadowedRoot(from.to_string()));
            }
            if !roots.contains(to) {
                return Err(ReferenceDataError::DanglingRedirect {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            redirect_map.insert(from.to_string(), to.to_string());
        }

        Ok(Self {
            entries,
            redirects: redirect_map,
        })
    }

    /// The spelling the chart indexes for `root`. Chart roots and spellings
    /// without a redirect come back unchanged.
    pub fn canonical_spelling(&self, root: &Note) -> String {
        let spelling = root.to_string();
        match self.redirects.get(&spelling) {
            Some(target) => target.clone(),
            None => spelling,
        }
    }

    /// Fingering for a scale, or `None` when the chart has no entry even
    /// after the enharmonic redirect.
    pub fn lookup(&self, root: &Note, mode: Mode) -> Option<Fingering> {
        let spelling = self.canonical_spelling(root);
        self.entries.get(&(spelling, mode)).copied()
    }

    /// Spell a scale and fetch its fingering.
    ///
    /// A root the chart does not cover, even after the redirect, makes the
    /// scale unsupported just like an unspellable one.
    pub fn fingered_scale(&self, root: Note, mode: Mode) -> Result<(Scale, Fingering), ScaleError> {
        let scale = build_scale(root, mode)?;
        match self.lookup(&root, mode) {
            Some(fingering) => Ok((scale, fingering)),
            None => Err(ScaleError::NoFingering {
                root,
                mode,
                spelling: self.canonical_spelling(&root),
            }),
        }
    }
}
