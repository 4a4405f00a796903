//! End-to-end generator runs into a temporary directory.

use pretty_assertions::assert_eq;
use scalelib::{generate, GeneratorConfig, Mode};

fn config_in(dir: &std::path::Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: dir.to_path_buf(),
        ..GeneratorConfig::default()
    }
}

#[test]
fn writes_every_diagram_index_and_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_in(tmp.path());
    let report = generate(&config).unwrap();

    assert_eq!(report.diagrams, 84);
    // E#4 and Fb4 have no chart entry and no redirect.
    assert_eq!(report.unsupported, 8);
    assert_eq!(report.labeled, 76);

    for mode in Mode::ALL {
        let dir = tmp.path().join(mode.name());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 21, "{}", dir.display());
    }
    let svg = std::fs::read_to_string(tmp.path().join("major/C#4.svg")).unwrap();
    assert!(svg.starts_with("<svg"));

    let index = std::fs::read_to_string(&report.index).unwrap();
    assert!(index.contains("src=\"major/C%234.svg\""));
    assert!(!index.contains("e-sharp-4-major"));
    assert!(!index.contains("major/Fb4.svg"));
    assert!(tmp.path().join("major/E#4.svg").exists());

    let manifest = report.manifest.unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(manifest).unwrap()).unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 84);
    let c_major = entries
        .iter()
        .find(|e| e["path"] == "major/C4.svg")
        .unwrap();
    assert_eq!(c_major["root"], "C4");
    assert_eq!(c_major["scale"]["notes"][7], "C5");
    assert_eq!(c_major["fingering"]["right"], serde_json::json!([1, 2, 3, 1, 2, 3, 4, 1]));
    assert_eq!(c_major["fingering"]["left"], serde_json::json!([1, 4, 3, 2, 1, 3, 2, 1]));
}

#[test]
fn index_is_well_formed_and_ordered() {
    let tmp = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        manifest: false,
        ..config_in(tmp.path())
    };
    let report = generate(&config).unwrap();
    assert_eq!(report.manifest, None);
    assert!(!tmp.path().join("scales.json").exists());

    let index = std::fs::read_to_string(&report.index).unwrap();
    let body = index.trim_start_matches("<!DOCTYPE html>").trim_start();
    let doc = roxmltree::Document::parse(body).expect("index should be well-formed");

    let mode_sections: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("section") && n.attribute("class").is_none())
        .filter_map(|n| n.attribute("id"))
        .collect();
    assert_eq!(mode_sections, ["major", "minor", "harmonic-minor", "melodic-minor"]);

    let major: Vec<&str> = doc
        .descendants()
        .find(|n| n.attribute("id") == Some("major"))
        .unwrap()
        .children()
        .filter(|n| n.has_tag_name("section"))
        .filter_map(|n| n.attribute("id"))
        .collect();
    // Every root except the unsupported E#4 and Fb4.
    assert_eq!(major.len(), 19);
    assert_eq!(major[0], "c-flat-4-major");
    assert_eq!(major[1], "c-natural-4-major");
    assert_eq!(major[2], "c-sharp-4-major");

    // Every image points at a file that exists.
    for img in doc.descendants().filter(|n| n.has_tag_name("img")) {
        let src = img.attribute("src").unwrap().replace("%23", "#");
        assert!(tmp.path().join(&src).exists(), "{src}");
    }
}

#[test]
fn mode_subset_and_octaves_are_honoured() {
    let tmp = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        modes: vec![Mode::HarmonicMinor],
        octaves: 3,
        ..config_in(tmp.path())
    };
    let report = generate(&config).unwrap();
    assert_eq!(report.diagrams, 21);
    assert!(!tmp.path().join("major").exists());

    let svg = std::fs::read_to_string(tmp.path().join("harmonic_minor/A4.svg")).unwrap();
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert_eq!(doc.root_element().attribute("width"), Some("483"));
    assert_eq!(doc.descendants().filter(|n| n.has_tag_name("rect")).count(), 36);
}

#[test]
fn edge_root_diagrams_show_the_whole_scale() {
    let tmp = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        modes: vec![Mode::Major, Mode::MelodicMinor],
        ..config_in(tmp.path())
    };
    generate(&config).unwrap();

    for path in ["major/Cb4.svg", "major/B#4.svg", "melodic_minor/Cb4.svg", "melodic_minor/B#4.svg"] {
        let svg = std::fs::read_to_string(tmp.path().join(path)).unwrap();
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let selected = doc
            .descendants()
            .filter(|n| n.attribute("class").is_some_and(|c| c.ends_with("key selected")))
            .count();
        assert_eq!(selected, 8, "{path}");
        assert_eq!(doc.descendants().filter(|n| n.has_tag_name("text")).count(), 16, "{path}");
    }
}

#[test]
fn unwritable_output_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = generate(&config_in(&blocker)).unwrap_err();
    assert!(matches!(err, scalelib::GenerateError::Write { .. }), "{err}");
}
