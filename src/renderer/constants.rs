//! Shared constants for the keyboard renderer (all in SVG user units).
//!
//! Key dimensions follow
//! <https://upload.wikimedia.org/wikipedia/commons/1/15/PianoKeyboard.svg>,
//! see also <http://www.mathpages.com/home/kmath043.htm>.

// ── Key dimensions ──────────────────────────────────────────────────
pub const WHITE_KEY_WIDTH: f64 = 23.0;
pub const WHITE_KEY_HEIGHT: f64 = 120.0;
pub const BLACK_KEY_WIDTH: f64 = 13.0;
pub const BLACK_KEY_HEIGHT: f64 = 80.0;

pub const WHITE_KEYS_PER_OCTAVE: i32 = 7;
pub const BLACK_KEYS_PER_OCTAVE: i32 = 5;
pub const OCTAVE_WIDTH: f64 = WHITE_KEYS_PER_OCTAVE as f64 * WHITE_KEY_WIDTH;

// ── Chromatic template ──────────────────────────────────────────────

/// Placement of one pitch class inside an octave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeySlot {
    /// Index among the white keys (C=0 … B=6).
    White(i32),
    /// Measured x offset from the octave's left edge.
    Black(f64),
}

/// Pitch classes 0..12 of a standard keyboard. Black offsets are measured,
/// not evenly spaced.
pub const KEY_TEMPLATE: [KeySlot; 12] = [
    KeySlot::White(0),
    KeySlot::Black(43.0 / 3.0),
    KeySlot::White(1),
    KeySlot::Black(125.0 / 3.0),
    KeySlot::White(2),
    KeySlot::White(3),
    KeySlot::Black(82.25),
    KeySlot::White(4),
    KeySlot::Black(108.25),
    KeySlot::White(5),
    KeySlot::Black(134.75),
    KeySlot::White(6),
];

// ── Caption ─────────────────────────────────────────────────────────
pub const CAPTION_HEIGHT: f64 = 30.0;
pub const CAPTION_SEPARATOR: &str = " • ";

// ── Stylesheet ──────────────────────────────────────────────────────
pub const STYLESHEET: &str = r#"
.key {
    stroke-width: 1.5px;
}

.white.key .box {
    fill: white;
    stroke: black;
}

.white.key .label {
    fill: black;
    font-size: 15px;
}

.black.key .box {
    fill: black;
    stroke: black;
}

.black.key .label {
    fill: white;
    font-size: 15px;
}

.key.selected .box {
    fill: #FEC47F;
}

.label {
    font-family: "Helvetica", "Nimbus Sans", sans-serif;
    font-weight: bold;
    text-anchor: middle;
}

.key .label.lower {
    fill: black;
    dominant-baseline: text-before-edge;
}

.key .label.upper {
    fill: white;
    dominant-baseline: text-after-edge;
}

text.notes {
    font-family: "Helvetica", "Nimbus Sans", sans-serif;
    font-size: 15px;
    font-weight: bold;
    text-anchor: middle;
    dominant-baseline: text-before-edge;
    transform: translate(0, 5px);
}
"#;
