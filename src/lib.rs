//! scalelib — piano scale fingering diagrams.
//!
//! For every (root, mode) pair the generator draws a two-octave keyboard as
//! SVG with the scale's keys highlighted and labelled with right-hand
//! (above) and left-hand (below) finger numbers, then writes an HTML index
//! linking all diagrams.
//!
//! # Example
//! ```no_run
//! use scalelib::{build_scale, layout_keyboard, FingeringTable, KeyboardSpec, Mode};
//!
//! let table = FingeringTable::standard().unwrap();
//! let scale = build_scale("C4".parse().unwrap(), Mode::Major).unwrap();
//! let fingering = table.lookup(&scale.root, scale.mode).unwrap();
//! let layout = layout_keyboard(&KeyboardSpec::new(4, 2), &fingering.labeled_notes(&scale)).unwrap();
//! println!("{} keys, {} selected", layout.len(), layout.selected().count());
//! ```

pub mod config;
pub mod fingering;
pub mod generator;
pub mod model;
pub mod naming;
pub mod page;
pub mod renderer;
pub mod scale;

pub use config::{ConfigError, GeneratorConfig, PageConfig};
pub use fingering::{Fingering, FingeringTable, LabeledNote, ReferenceDataError};
pub use generator::{build_catalog, generate, keyboard_for, Catalog, DiagramEntry, GenerateError, GenerationReport};
pub use model::{Letter, Note, NoteParseError};
pub use renderer::{
    layout_keyboard, render_keyboard_to_svg, render_scale_diagram, KeyboardLayout, KeyboardSpec,
    KeyShape, LayoutError,
};
pub use scale::{build_scale, Mode, Scale, ScaleError};

/// Render the diagram for one scale the way the batch generator does.
///
/// The keyboard is widened by whole octaves when the scale reaches past
/// `spec`. An unsupported scale gives a bare keyboard over `spec`.
pub fn render_scale_to_svg(root: Note, mode: Mode, spec: &KeyboardSpec) -> Result<String, GenerateError> {
    let table = generator::validate_reference_data()?;
    let (spec, labeled) = match table.fingered_scale(root, mode) {
        Ok((scale, fingering)) => (spec.covering(&scale.key_numbers()), fingering.labeled_notes(&scale)),
        Err(_) => (*spec, Vec::new()),
    };
    Ok(render_scale_diagram(&spec, &labeled, false)?)
}

/// Serialize a catalog as pretty JSON.
pub fn catalog_to_json(catalog: &Catalog) -> Result<String, GenerateError> {
    Ok(serde_json::to_string_pretty(catalog)?)
}
