use super::*;
use crate::render::colormap::ScaleMode;
use crate::snapshot::set::Component;

const MINIMAL: &str = r#"{
  "inputs": [
    { "label": "orig", "path": "flow.bin", "kind": "real" },
    { "label": "dmd", "path": "/abs/dmd.bin", "kind": "complex" }
  ],
  "output": { "path": "out/cmp.gif" }
}"#;

#[test]
fn minimal_config_gets_defaults() {
    let cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.style, RenderStyle::default());
    assert_eq!(cfg.output.fps, Fps::default());
    assert!(!cfg.output.overwrite);
    assert_eq!(cfg.output.resolved_format().unwrap(), OutputFormat::Gif);
    assert_eq!(cfg.inputs[1].kind, ValueKind::Complex);

    let layout = cfg.layout();
    assert_eq!(layout.columns, 2);
    assert_eq!(layout.panels.len(), 4);
    assert_eq!(layout.panels[3].set, "dmd");
    assert_eq!(layout.panels[3].component, Component::V);
}

#[test]
fn from_path_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    std::fs::write(&path, MINIMAL).unwrap();

    let cfg = RunConfig::from_path(&path).unwrap();
    assert_eq!(cfg.inputs[0].path, dir.path().join("flow.bin"));
    assert_eq!(cfg.inputs[1].path, PathBuf::from("/abs/dmd.bin"));
    assert_eq!(cfg.output.path, dir.path().join("out/cmp.gif"));
}

#[test]
fn explicit_style_and_layout_are_read() {
    let json = r#"{
      "inputs": [{ "label": "a", "path": "a.bin", "kind": "real" }],
      "layout": { "columns": 1, "panels": [{ "set": "a", "component": "v" }] },
      "style": { "cell_px": 3, "scale_mode": "min_max" },
      "output": { "path": "x.out", "format": "png", "fps": { "num": 24, "den": 1 } }
    }"#;
    let cfg = RunConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.style.cell_px, 3);
    assert_eq!(cfg.style.scale_mode, ScaleMode::MinMax);
    assert_eq!(cfg.style.bg_rgba, RenderStyle::default().bg_rgba);
    assert_eq!(cfg.layout().panels.len(), 1);
    assert_eq!(cfg.output.resolved_format().unwrap(), OutputFormat::Png);
}

#[test]
fn validation_failures() {
    let mut cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.inputs[1].label = "orig".into();
    assert!(matches!(cfg.validate(), Err(ModevizError::Validation(_))));

    let mut cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.inputs.clear();
    assert!(matches!(cfg.validate(), Err(ModevizError::EmptySeries(_))));

    let mut cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.output.path = PathBuf::from("out/cmp.avi");
    assert!(matches!(cfg.validate(), Err(ModevizError::Validation(_))));

    let mut cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.layout = Some(PanelLayout::velocity_comparison(&["orig", "ghost"]));
    assert!(matches!(cfg.validate(), Err(ModevizError::Validation(_))));

    let mut cfg = RunConfig::from_reader(MINIMAL.as_bytes()).unwrap();
    cfg.output.fps = Fps { num: 0, den: 1 };
    assert!(matches!(cfg.validate(), Err(ModevizError::Validation(_))));
}

#[test]
fn unknown_fields_and_bad_json_are_rejected() {
    let json = r#"{ "inputs": [], "output": { "path": "a.png" }, "extra": 1 }"#;
    assert!(matches!(
        RunConfig::from_reader(json.as_bytes()),
        Err(ModevizError::Validation(_))
    ));
    assert!(RunConfig::from_reader("{".as_bytes()).is_err());
}

#[test]
fn format_from_extension_is_case_insensitive() {
    assert_eq!(
        OutputFormat::from_path(Path::new("A.MP4")),
        Some(OutputFormat::Mp4)
    );
    assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    assert!(OutputFormat::Gif.is_animated());
    assert!(!OutputFormat::Png.is_animated());
}
