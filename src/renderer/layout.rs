//! Keyboard geometry — enumerates the keys of an octave span and computes
//! every key's rectangle, z-order group, selection and label anchor.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::fingering::LabeledNote;
use crate::model::{Note, OCTAVE};
use super::constants::*;

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("a keyboard needs at least one octave")]
    InvalidSpan,
    #[error("keyboard template: {0}")]
    InvalidTemplate(String),
}

/// Which octaves to draw and where the top-left corner goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardSpec {
    pub first_octave: i32,
    pub octaves: u32,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl KeyboardSpec {
    pub fn new(first_octave: i32, octaves: u32) -> Self {
        Self {
            first_octave,
            octaves,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    /// Key numbers covered by the span, half open.
    pub fn key_range(&self) -> std::ops::Range<i32> {
        let low = self.first_octave * OCTAVE;
        low..low + self.octaves as i32 * OCTAVE
    }

    pub fn width(&self) -> f64 {
        self.octaves as f64 * OCTAVE_WIDTH
    }

    /// The smallest whole-octave span holding this one and every key in
    /// `keys`.
    pub fn covering(&self, keys: &[i32]) -> Self {
        let (Some(&low), Some(&high)) = (keys.iter().min(), keys.iter().max()) else {
            return *self;
        };
        let first_octave = self.first_octave.min(low.div_euclid(OCTAVE));
        let last_octave = (self.first_octave + self.octaves as i32 - 1).max(high.div_euclid(OCTAVE));
        Self {
            first_octave,
            octaves: (last_octave - first_octave + 1) as u32,
            ..*self
        }
    }
}

impl Default for KeyboardSpec {
    fn default() -> Self {
        Self::new(4, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyColor {
    White,
    Black,
}

impl KeyColor {
    pub fn class(self) -> &'static str {
        match self {
            KeyColor::White => "white",
            KeyColor::Black => "black",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// One laid-out key. Immutable once the layout is built.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyShape {
    pub note: Note,
    pub color: KeyColor,
    pub rect: Rect,
    pub selected: bool,
    pub upper_label: Option<String>,
    pub lower_label: Option<String>,
    /// Shared centre point of both labels. The upper label sits above it,
    /// the lower label below it.
    pub label_anchor: (f64, f64),
}

impl KeyShape {
    pub fn is_white(&self) -> bool {
        self.color == KeyColor::White
    }

    pub fn key_number(&self) -> i32 {
        self.note.key_number()
    }
}

/// A fully laid-out keyboard: white keys first, black keys drawn over them.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardLayout {
    pub white_keys: Vec<KeyShape>,
    pub black_keys: Vec<KeyShape>,
    pub width: f64,
    pub height: f64,
}

impl KeyboardLayout {
    /// All keys in paint order.
    pub fn keys(&self) -> impl Iterator<Item = &KeyShape> {
        self.white_keys.iter().chain(self.black_keys.iter())
    }

    pub fn selected(&self) -> impl Iterator<Item = &KeyShape> {
        self.keys().filter(|k| k.selected)
    }

    pub fn len(&self) -> usize {
        self.white_keys.len() + self.black_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Geometry
// ═══════════════════════════════════════════════════════════════════════

fn slot(key_number: i32) -> KeySlot {
    KEY_TEMPLATE[key_number.rem_euclid(OCTAVE) as usize]
}

pub fn key_color(key_number: i32) -> KeyColor {
    match slot(key_number) {
        KeySlot::White(_) => KeyColor::White,
        KeySlot::Black(_) => KeyColor::Black,
    }
}

/// x of a key measured from the left edge of `first_octave`.
///
/// Equivalent to placing the key at its absolute octave and shifting by the
/// lowest key of the span, without the rounding of a large subtraction.
fn key_x(key_number: i32, first_octave: i32) -> f64 {
    let octave_index = key_number.div_euclid(OCTAVE) - first_octave;
    let octave_x = (WHITE_KEYS_PER_OCTAVE * octave_index) as f64 * WHITE_KEY_WIDTH;
    match slot(key_number) {
        KeySlot::White(index) => octave_x + index as f64 * WHITE_KEY_WIDTH,
        KeySlot::Black(offset) => octave_x + offset,
    }
}

/// One note per physical key in the span.
///
/// Several spellings land on the same key. A natural beats a sharp and a
/// sharp beats a flat, so `C4` is kept over `B#3` and `C#4` over `Db4`.
fn span_notes(spec: &KeyboardSpec) -> BTreeMap<i32, Note> {
    let rank = |note: &Note| match note.alter {
        0 => 0,
        1 => 1,
        _ => 2,
    };
    let range = spec.key_range();
    let last_octave = spec.first_octave + spec.octaves as i32 - 1;
    let mut keys: BTreeMap<i32, Note> = BTreeMap::new();
    for note in Note::all(spec.first_octave, last_octave) {
        if !range.contains(&note.key_number()) {
            continue;
        }
        keys.entry(note.key_number())
            .and_modify(|kept| {
                if rank(&note) < rank(kept) {
                    *kept = note;
                }
            })
            .or_insert(note);
    }
    keys
}

/// Lay out an annotated keyboard.
///
/// Labeled notes outside the span are ignored. When two labeled notes share
/// a key the later one wins.
pub fn layout_keyboard(
    spec: &KeyboardSpec,
    labeled: &[LabeledNote],
) -> Result<KeyboardLayout, LayoutError> {
    if spec.octaves == 0 {
        return Err(LayoutError::InvalidSpan);
    }

    let notes = span_notes(spec);
    let labels: HashMap<i32, &LabeledNote> =
        labeled.iter().map(|l| (l.note.key_number(), l)).collect();

    let y = spec.origin_y;

    let mut white_keys = Vec::new();
    let mut black_keys = Vec::new();

    for (&key_number, &note) in &notes {
        let color = key_color(key_number);
        let x = spec.origin_x + key_x(key_number, spec.first_octave);
        let (rect, label_anchor) = match color {
            KeyColor::White => (
                Rect { x, y, width: WHITE_KEY_WIDTH, height: WHITE_KEY_HEIGHT },
                (
                    x + WHITE_KEY_WIDTH / 2.0,
                    y + BLACK_KEY_HEIGHT + (WHITE_KEY_HEIGHT - BLACK_KEY_HEIGHT) / 2.0,
                ),
            ),
            KeyColor::Black => (
                Rect { x, y, width: BLACK_KEY_WIDTH, height: BLACK_KEY_HEIGHT },
                (x + BLACK_KEY_WIDTH / 2.0, y + BLACK_KEY_HEIGHT / 2.0),
            ),
        };

        let shape = match labels.get(&key_number) {
            Some(label) => KeyShape {
                note: label.note,
                color,
                rect,
                selected: true,
                upper_label: label.upper.clone(),
                lower_label: label.lower.clone(),
                label_anchor,
            },
            None => KeyShape {
                note,
                color,
                rect,
                selected: false,
                upper_label: None,
                lower_label: None,
                label_anchor,
            },
        };

        match color {
            KeyColor::White => white_keys.push(shape),
            KeyColor::Black => black_keys.push(shape),
        }
    }

    Ok(KeyboardLayout {
        white_keys,
        black_keys,
        width: spec.width(),
        height: WHITE_KEY_HEIGHT,
    })
}

/// Check the chromatic template: seven white keys indexed 0..7 in order,
/// five black keys each sitting inside the octave between two white keys.
pub fn validate_key_template() -> Result<(), LayoutError> {
    let invalid = |msg: String| Err(LayoutError::InvalidTemplate(msg));

    let mut next_white = 0;
    let mut blacks = 0;
    let mut last_x = f64::NEG_INFINITY;
    for (pitch_class, slot) in KEY_TEMPLATE.iter().enumerate() {
        let x = match *slot {
            KeySlot::White(index) => {
                if index != next_white {
                    return invalid(format!(
                        "pitch class {pitch_class} has white index {index}, expected {next_white}"
                    ));
                }
                next_white += 1;
                index as f64 * WHITE_KEY_WIDTH
            }
            KeySlot::Black(offset) => {
                blacks += 1;
                let edge = next_white as f64 * WHITE_KEY_WIDTH;
                if !(offset < edge && edge < offset + BLACK_KEY_WIDTH) {
                    return invalid(format!(
                        "black key at pitch class {pitch_class} does not straddle a white key edge"
                    ));
                }
                offset
            }
        };
        if x <= last_x {
            return invalid(format!("pitch class {pitch_class} is not right of its neighbour"));
        }
        last_x = x;
    }

    if next_white != WHITE_KEYS_PER_OCTAVE || blacks != BLACK_KEYS_PER_OCTAVE {
        return invalid(format!("{next_white} white and {blacks} black keys per octave"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingering::FingeringTable;
    use crate::scale::{build_scale, Mode};
    use pretty_assertions::assert_eq;

    fn note(s: &str) -> Note {
        s.parse().unwrap()
    }

    fn c_major_labels() -> Vec<LabeledNote> {
        let scale = build_scale(note("C4"), Mode::Major).unwrap();
        FingeringTable::standard()
            .unwrap()
            .lookup(&scale.root, scale.mode)
            .unwrap()
            .labeled_notes(&scale)
    }

    #[test]
    fn template_is_valid() {
        assert_eq!(validate_key_template(), Ok(()));
    }

    #[test]
    fn key_counts_per_span() {
        for octaves in 1..=4 {
            let layout = layout_keyboard(&KeyboardSpec::new(3, octaves), &[]).unwrap();
            let n = octaves as usize;
            assert_eq!(layout.len(), 12 * n);
            assert_eq!(layout.white_keys.len(), 7 * n);
            assert_eq!(layout.black_keys.len(), 5 * n);
            assert_eq!(layout.width, 161.0 * octaves as f64);
        }
    }

    #[test]
    fn covering_widens_to_whole_octaves() {
        let spec = KeyboardSpec::new(4, 2);
        assert_eq!(spec.covering(&[]), spec);
        assert_eq!(spec.covering(&[50, 70]), spec);

        // Cb4 sits on B3.
        let low = spec.covering(&[note("Cb4").key_number(), note("Cb5").key_number()]);
        assert_eq!((low.first_octave, low.octaves), (3, 3));

        // B#5 sits on C6.
        let high = spec.covering(&[note("B#4").key_number(), note("B#5").key_number()]);
        assert_eq!((high.first_octave, high.octaves), (4, 3));
        assert_eq!(high.key_range(), 48..84);
    }

    #[test]
    fn zero_octaves_is_rejected() {
        assert_eq!(
            layout_keyboard(&KeyboardSpec::new(4, 0), &[]),
            Err(LayoutError::InvalidSpan)
        );
    }

    #[test]
    fn same_color_keys_never_overlap() {
        let layout = layout_keyboard(&KeyboardSpec::new(4, 3), &[]).unwrap();
        for group in [&layout.white_keys, &layout.black_keys] {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.note, b.note);
                }
            }
        }
    }

    #[test]
    fn leftmost_key_starts_at_origin() {
        let spec = KeyboardSpec {
            first_octave: 5,
            octaves: 1,
            origin_x: 10.0,
            origin_y: 7.0,
        };
        let layout = layout_keyboard(&spec, &[]).unwrap();
        let first = &layout.white_keys[0];
        assert_eq!(first.key_number(), note("C5").key_number());
        assert_eq!(first.rect.x, 10.0);
        assert!(layout.keys().all(|k| k.rect.y == 7.0));
        assert!(layout.keys().all(|k| k.rect.x >= 10.0));
    }

    #[test]
    fn black_keys_use_measured_offsets() {
        let layout = layout_keyboard(&KeyboardSpec::new(4, 2), &[]).unwrap();
        let xs: Vec<f64> = layout.black_keys.iter().map(|k| k.rect.x).collect();
        assert_eq!(xs[0], 43.0 / 3.0);
        assert_eq!(xs[1], 125.0 / 3.0);
        assert_eq!(xs[2], 82.25);
        assert_eq!(xs[3], 108.25);
        assert_eq!(xs[4], 134.75);
        assert_eq!(xs[5], 161.0 + 43.0 / 3.0);
        assert!(layout.black_keys.iter().all(|k| k.rect.height == BLACK_KEY_HEIGHT));
        assert!(layout.white_keys.iter().all(|k| k.rect.height == WHITE_KEY_HEIGHT));
    }

    #[test]
    fn c_major_over_two_octaves() {
        let layout = layout_keyboard(&KeyboardSpec::new(4, 2), &c_major_labels()).unwrap();
        assert_eq!(layout.len(), 24);
        assert_eq!(layout.white_keys.len(), 14);
        assert_eq!(layout.black_keys.len(), 10);

        let selected: Vec<String> = layout.selected().map(|k| k.note.to_string()).collect();
        assert_eq!(selected, ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]);

        let d4 = layout.white_keys.iter().find(|k| k.note == note("D4")).unwrap();
        assert_eq!(d4.upper_label.as_deref(), Some("2"));
        assert_eq!(d4.lower_label.as_deref(), Some("4"));
        assert_eq!(d4.label_anchor, (23.0 + 11.5, 100.0));

        assert!(layout.black_keys.iter().all(|k| !k.selected && k.upper_label.is_none()));
    }

    #[test]
    fn selection_matches_key_numbers_not_spelling() {
        let labels = vec![LabeledNote::new(note("Db4"), Some("3".into()), None)];
        let layout = layout_keyboard(&KeyboardSpec::new(4, 1), &labels).unwrap();
        let selected: Vec<&KeyShape> = layout.selected().collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key_number(), note("C#4").key_number());
        assert_eq!(selected[0].color, KeyColor::Black);
        assert_eq!(selected[0].note, note("Db4"));
        assert_eq!(selected[0].upper_label.as_deref(), Some("3"));
        assert_eq!(selected[0].lower_label, None);
        assert_eq!(selected[0].label_anchor.1, 40.0);
    }

    #[test]
    fn labels_outside_span_are_ignored() {
        let labels = vec![
            LabeledNote::unlabeled(note("C4")),
            LabeledNote::new(note("G6"), Some("1".into()), Some("2".into())),
            LabeledNote::unlabeled(note("B3")),
        ];
        let layout = layout_keyboard(&KeyboardSpec::new(4, 1), &labels).unwrap();
        assert_eq!(layout.len(), 12);
        assert_eq!(layout.selected().count(), 1);
    }

    #[test]
    fn unselected_keys_prefer_naturals_then_sharps() {
        let layout = layout_keyboard(&KeyboardSpec::new(4, 1), &[]).unwrap();
        let names: Vec<String> = layout.white_keys.iter().map(|k| k.note.to_string()).collect();
        assert_eq!(names, ["C4", "D4", "E4", "F4", "G4", "A4", "B4"]);
        let names: Vec<String> = layout.black_keys.iter().map(|k| k.note.to_string()).collect();
        assert_eq!(names, ["C#4", "D#4", "F#4", "G#4", "A#4"]);
    }

    #[test]
    fn every_key_number_in_span_appears_once() {
        let spec = KeyboardSpec::new(4, 2);
        let layout = layout_keyboard(&spec, &[]).unwrap();
        let mut numbers: Vec<i32> = layout.keys().map(KeyShape::key_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, spec.key_range().collect::<Vec<_>>());
        for key in layout.keys() {
            assert_eq!(key.is_white(), key_color(key.key_number()) == KeyColor::White);
        }
    }
}
