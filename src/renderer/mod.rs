//! Keyboard renderer — turns a laid-out keyboard into a standalone SVG.
//!
//! Keys are emitted as two groups, every white key first and every black
//! key second, so black keys paint over the tops of their white neighbours.
//! Styling lives in an embedded stylesheet; elements only carry classes.

pub mod constants;
mod layout;
mod svg_builder;

use crate::fingering::LabeledNote;
use crate::model::Note;
use crate::naming::pretty_note;
use constants::*;
use svg_builder::SvgBuilder;

pub use layout::{
    key_color, layout_keyboard, validate_key_template, KeyColor, KeyShape, KeyboardLayout,
    KeyboardSpec, LayoutError, Rect,
};
pub(crate) use svg_builder::escape_xml;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a laid-out keyboard into a complete SVG string.
pub fn render_keyboard_to_svg(layout: &KeyboardLayout) -> String {
    let mut svg = SvgBuilder::new(layout.width, layout.height);
    svg.embed_stylesheet(STYLESHEET);
    render_keys(&mut svg, layout);
    svg.build()
}

/// Lay out and render a keyboard with the given notes selected.
///
/// With `caption` the scale's notes are also written under the keyboard,
/// separated by bullets.
pub fn render_scale_diagram(
    spec: &KeyboardSpec,
    labeled: &[LabeledNote],
    caption: bool,
) -> Result<String, LayoutError> {
    let layout = layout_keyboard(spec, labeled)?;
    if !caption {
        return Ok(render_keyboard_to_svg(&layout));
    }

    let mut svg = SvgBuilder::new(layout.width, layout.height + CAPTION_HEIGHT);
    svg.embed_stylesheet(STYLESHEET);
    render_keys(&mut svg, &layout);
    let notes: Vec<Note> = labeled.iter().map(|l| l.note).collect();
    render_notes_caption(
        &mut svg,
        &notes,
        spec.origin_x + layout.width / 2.0,
        spec.origin_y + layout.height,
    );
    Ok(svg.build())
}

// ═══════════════════════════════════════════════════════════════════════
// Drawing
// ═══════════════════════════════════════════════════════════════════════

fn render_keys(svg: &mut SvgBuilder, layout: &KeyboardLayout) {
    svg.begin_group(Some("scale"));

    svg.begin_group(None);
    for key in &layout.white_keys {
        render_key(svg, key);
    }
    svg.end_group();

    svg.begin_group(None);
    for key in &layout.black_keys {
        render_key(svg, key);
    }
    svg.end_group();

    svg.end_group();
}

fn render_key(svg: &mut SvgBuilder, key: &KeyShape) {
    let class = if key.selected {
        format!("{} key selected", key.color.class())
    } else {
        format!("{} key", key.color.class())
    };
    svg.begin_group(Some(&class));
    svg.rect(key.rect.x, key.rect.y, key.rect.width, key.rect.height, "box");

    // Both labels share one anchor; their baselines push them apart.
    let (lx, ly) = key.label_anchor;
    if let Some(ref lower) = key.lower_label {
        svg.text(lx, ly, lower, "label lower");
    }
    if let Some(ref upper) = key.upper_label {
        svg.text(lx, ly, upper, "label upper");
    }
    svg.end_group();
}

fn render_notes_caption(svg: &mut SvgBuilder, notes: &[Note], x: f64, y: f64) {
    let names: Vec<String> = notes.iter().map(pretty_note).collect();
    let mut runs: Vec<(&str, &str)> = Vec::with_capacity(names.len() * 2);
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            runs.push((CAPTION_SEPARATOR, "separator"));
        }
        runs.push((name.as_str(), "note"));
    }
    svg.spans(x, y, &runs, "notes");
}
