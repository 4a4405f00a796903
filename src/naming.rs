//! Display names, slugs and paths derived from notes and scales.
//!
//! Display names use typographic ♭/♯ glyphs. Slugs are lower-case and
//! filesystem/URL safe; note that `natural_minor` slugs to plain `minor`.

use crate::model::Note;
use crate::scale::Mode;

/// `C♯4`, `E♭4`, `B♭♭3`.
pub fn pretty_note(note: &Note) -> String {
    let glyph = if note.alter > 0 { "♯" } else { "♭" };
    format!(
        "{}{}{}",
        note.letter.as_char(),
        glyph.repeat(note.alter.unsigned_abs() as usize),
        note.octave
    )
}

pub fn pretty_mode(mode: Mode) -> &'static str {
    match mode {
        Mode::Major => "Major",
        Mode::NaturalMinor => "Minor",
        Mode::HarmonicMinor => "Harmonic Minor",
        Mode::MelodicMinor => "Melodic Minor",
    }
}

/// `C♯4 Harmonic Minor`.
pub fn pretty_scale(root: &Note, mode: Mode) -> String {
    format!("{} {}", pretty_note(root), pretty_mode(mode))
}

/// `natural`, `sharp`, `sharp-sharp`, `flat`, `flat-flat`, …
pub fn slug_accidental(alter: i32) -> String {
    let word = match alter {
        0 => return "natural".to_string(),
        a if a > 0 => "sharp",
        _ => "flat",
    };
    vec![word; alter.unsigned_abs() as usize].join("-")
}

/// `c-natural-4`, `d-sharp-4`, `e-flat-flat-4`.
pub fn slug_note(note: &Note) -> String {
    format!(
        "{}-{}-{}",
        note.letter.as_char().to_ascii_lowercase(),
        slug_accidental(note.alter),
        note.octave
    )
}

pub fn slug_mode(mode: Mode) -> &'static str {
    match mode {
        Mode::Major => "major",
        Mode::NaturalMinor => "minor",
        Mode::HarmonicMinor => "harmonic-minor",
        Mode::MelodicMinor => "melodic-minor",
    }
}

/// `c-natural-4-major`, used as the scale's anchor id.
pub fn slug_scale(root: &Note, mode: Mode) -> String {
    format!("{}-{}", slug_note(root), slug_mode(mode))
}

/// Diagram location relative to the output directory: `<mode>/<root>.svg`.
pub fn diagram_path(mode: Mode, root: &Note) -> String {
    format!("{}/{}.svg", mode.name(), root)
}

/// Percent-encode a relative path for use in `href`/`src`. Unreserved
/// characters and `/` pass through; `#` becomes `%23`.
pub fn url_quote(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
