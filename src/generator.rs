//! Batch generation: one keyboard diagram per (mode, root), an index page
//! and a JSON manifest.
//!
//! Reference data is validated before anything is written. An unsupported
//! scale (unspellable, or absent from the fingering chart) only degrades its
//! own diagram to a bare keyboard; an I/O failure aborts the run and leaves
//! already written files in place.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GeneratorConfig};
use crate::fingering::{Fingering, FingeringTable, LabeledNote, ReferenceDataError};
use crate::model::Note;
use crate::naming::{diagram_path, pretty_scale, slug_scale};
use crate::page::render_index;
use crate::renderer::{render_scale_diagram, validate_key_template, KeyboardSpec, LayoutError};
use crate::scale::{Mode, Scale};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid reference data: {0}")]
    ReferenceData(#[from] ReferenceDataError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Everything needed to draw one diagram and list it on the index page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramEntry {
    pub mode: Mode,
    pub root: Note,
    /// `None` when the scale is unsupported; the diagram is a bare keyboard.
    pub scale: Option<Scale>,
    /// Present exactly when `scale` is.
    pub fingering: Option<Fingering>,
    /// Relative to the output directory.
    pub path: String,
    pub slug: String,
    pub title: String,
}

impl DiagramEntry {
    /// Notes to select on the keyboard with their finger labels. Empty for
    /// an unsupported scale.
    pub fn labeled_notes(&self) -> Vec<LabeledNote> {
        match (&self.scale, &self.fingering) {
            (Some(scale), Some(fingering)) => fingering.labeled_notes(scale),
            _ => Vec::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.scale.is_some()
    }
}

/// All diagrams of a run, in mode order then root order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub entries: Vec<DiagramEntry>,
}

impl Catalog {
    /// Entries of one mode, in root order.
    pub fn for_mode(&self, mode: Mode) -> impl Iterator<Item = &DiagramEntry> {
        self.entries.iter().filter(move |e| e.mode == mode)
    }

    /// Modes present in the catalog, in first-seen order.
    pub fn modes(&self) -> Vec<Mode> {
        let mut modes = Vec::new();
        for entry in &self.entries {
            if !modes.contains(&entry.mode) {
                modes.push(entry.mode);
            }
        }
        modes
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub diagrams: usize,
    pub labeled: usize,
    pub unsupported: usize,
    pub index: PathBuf,
    pub manifest: Option<PathBuf>,
}

/// Validate all fixed reference data. Called once before any output.
pub fn validate_reference_data() -> Result<&'static FingeringTable, GenerateError> {
    validate_key_template()?;
    Ok(FingeringTable::standard()?)
}

/// Resolve every (mode, root) pair of the run without touching the disk.
pub fn build_catalog(config: &GeneratorConfig) -> Result<Catalog, GenerateError> {
    config.validate()?;
    let table = validate_reference_data()?;
    let roots = Note::all(config.root_octave, config.root_octave);

    let mut entries = Vec::with_capacity(config.modes.len() * roots.len());
    for &mode in &config.modes {
        for &root in &roots {
            let (scale, fingering) = match table.fingered_scale(root, mode) {
                Ok((scale, fingering)) => (Some(scale), Some(fingering)),
                Err(e) => {
                    warn!("{e}; drawing a bare keyboard");
                    (None, None)
                }
            };
            entries.push(DiagramEntry {
                mode,
                root,
                scale,
                fingering,
                path: diagram_path(mode, &root),
                slug: slug_scale(&root, mode),
                title: pretty_scale(&root, mode),
            });
        }
    }

    Ok(Catalog { entries })
}

/// The configured keyboard, widened by whole octaves when the entry's scale
/// reaches past either end.
pub fn keyboard_for(entry: &DiagramEntry, config: &GeneratorConfig) -> KeyboardSpec {
    match entry.scale {
        Some(ref scale) => config.keyboard().covering(&scale.key_numbers()),
        None => config.keyboard(),
    }
}

/// Render one entry's keyboard to SVG.
pub fn render_diagram(entry: &DiagramEntry, config: &GeneratorConfig) -> Result<String, GenerateError> {
    let labeled = entry.labeled_notes();
    let caption = config.caption && entry.is_supported();
    Ok(render_scale_diagram(&keyboard_for(entry, config), &labeled, caption)?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every diagram, the index page and (optionally) the manifest.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport, GenerateError> {
    let catalog = build_catalog(config)?;
    info!(
        diagrams = catalog.entries.len(),
        output = %config.output_dir.display(),
        "generating scale diagrams"
    );

    let mut report = GenerationReport::default();
    for entry in &catalog.entries {
        let svg = render_diagram(entry, config)?;
        let path = config.output_dir.join(&entry.path);
        write_file(&path, &svg)?;
        debug!(path = %path.display(), "wrote {}", entry.title);

        report.diagrams += 1;
        if entry.is_supported() {
            report.labeled += 1;
        } else {
            report.unsupported += 1;
        }
    }

    let index_path = config.index_path();
    write_file(&index_path, &render_index(&catalog, &config.page))?;
    info!(path = %index_path.display(), "wrote index page");
    report.index = index_path;

    if config.manifest {
        let manifest_path = config.manifest_path();
        let json = crate::catalog_to_json(&catalog)?;
        write_file(&manifest_path, &json)?;
        debug!(path = %manifest_path.display(), "wrote manifest");
        report.manifest = Some(manifest_path);
    }

    info!(
        labeled = report.labeled,
        unsupported = report.unsupported,
        "done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::layout_keyboard;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_follows_mode_then_root_order() {
        let catalog = build_catalog(&GeneratorConfig::default()).unwrap();
        assert_eq!(catalog.entries.len(), 4 * 21);
        assert_eq!(catalog.modes(), Mode::ALL.to_vec());
        assert_eq!(catalog.entries[0].path, "major/Cb4.svg");
        assert_eq!(catalog.entries[1].path, "major/C4.svg");
        assert_eq!(catalog.entries[21].path, "natural_minor/Cb4.svg");
        let roots: Vec<String> = catalog
            .for_mode(Mode::HarmonicMinor)
            .map(|e| e.root.to_string())
            .collect();
        assert_eq!(roots.len(), 21);
        assert_eq!(roots[2], "C#4");
    }

    #[test]
    fn redirected_roots_get_fingering() {
        let catalog = build_catalog(&GeneratorConfig::default()).unwrap();
        let d_sharp = catalog
            .entries
            .iter()
            .find(|e| e.mode == Mode::Major && e.root.to_string() == "D#4")
            .unwrap();
        let e_flat = catalog
            .entries
            .iter()
            .find(|e| e.mode == Mode::Major && e.root.to_string() == "Eb4")
            .unwrap();
        assert!(d_sharp.fingering.is_some());
        assert_eq!(d_sharp.fingering, e_flat.fingering);
        assert_eq!(d_sharp.slug, "d-sharp-4-major");
    }

    #[test]
    fn chart_misses_are_unsupported() {
        let catalog = build_catalog(&GeneratorConfig::default()).unwrap();
        let unsupported: Vec<String> = catalog
            .for_mode(Mode::Major)
            .filter(|e| !e.is_supported())
            .map(|e| e.root.to_string())
            .collect();
        assert_eq!(unsupported, ["E#4", "Fb4"]);
        assert_eq!(catalog.entries.iter().filter(|e| !e.is_supported()).count(), 8);
        for entry in catalog.entries.iter().filter(|e| !e.is_supported()) {
            assert_eq!(entry.fingering, None);
            assert!(entry.labeled_notes().is_empty());
        }
    }

    #[test]
    fn every_supported_scale_fits_its_keyboard() {
        let config = GeneratorConfig::default();
        let catalog = build_catalog(&config).unwrap();
        for entry in catalog.entries.iter().filter(|e| e.is_supported()) {
            let layout = layout_keyboard(&keyboard_for(entry, &config), &entry.labeled_notes()).unwrap();
            assert_eq!(layout.selected().count(), 8, "{}", entry.title);
            assert!(layout.selected().all(|k| k.upper_label.is_some() && k.lower_label.is_some()));
        }
    }

    #[test]
    fn edge_roots_widen_the_keyboard() {
        let config = GeneratorConfig::default();
        let catalog = build_catalog(&config).unwrap();
        let spec_of = |root: &str| {
            let entry = catalog
                .entries
                .iter()
                .find(|e| e.mode == Mode::Major && e.root.to_string() == root)
                .unwrap();
            keyboard_for(entry, &config)
        };
        assert_eq!(spec_of("C4"), config.keyboard());
        assert_eq!((spec_of("Cb4").first_octave, spec_of("Cb4").octaves), (3, 3));
        assert_eq!((spec_of("B#4").first_octave, spec_of("B#4").octaves), (4, 3));
        assert_eq!(spec_of("E#4"), config.keyboard());
    }

    #[test]
    fn unsupported_scale_renders_bare_keyboard() {
        let entry = DiagramEntry {
            mode: Mode::Major,
            root: "G##4".parse().unwrap(),
            scale: None,
            fingering: None,
            path: "major/G##4.svg".into(),
            slug: "g-sharp-sharp-4-major".into(),
            title: "G♯♯4 Major".into(),
        };
        let svg = render_diagram(&entry, &GeneratorConfig::default()).unwrap();
        assert_eq!(svg.matches("<rect").count(), 24);
        assert!(!svg.contains("key selected"));
    }

    #[test]
    fn invalid_config_is_rejected_before_rendering() {
        let config = GeneratorConfig {
            modes: Vec::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(build_catalog(&config), Err(GenerateError::Config(_))));
    }
}
