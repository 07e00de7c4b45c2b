//! Unit tests for configuration parsing
//!
//! Parses documents from disk and checks the override rule, diagnostic
//! aggregation and the pass/fail decision across the whole document.

use mapconf::config::{ConfigParseError, ConfigParser, ValidationMap, ValidationSeverity};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a configuration using every section kind
fn create_full_config_toml() -> String {
    r#"
output_dir = "output"

[global.world]
input_dir = "worlds/default"

[global.map]
texture_size = 16
rendermode = "daylight"
render_leaves_transparent = "yes"

[world.survival]
input_dir = "worlds/survival"

[world.creative]

[map.survival_day]
name = "Survival (day)"
world = "survival"
rotations = "top-left, bottom-right"

[map.survival_night]
name = "Survival (night)"
world = "survival"
rendermode = "nightlight"
texture_size = 12

[map.creative]
world = "creative"
rotations = "0-270"
render_biomes = true
"#
    .to_string()
}

/// Create a configuration where the global map tier supplies nothing
fn create_minimal_config_toml() -> String {
    r#"
output_dir = "/var/www/maps"

[world.main]
input_dir = "/srv/minecraft/world"

[map.main]
world = "main"
"#
    .to_string()
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("render.toml");
    fs::write(&path, content).unwrap();
    path
}

fn parse_file(content: &str) -> (TempDir, ConfigParser, ValidationMap, bool) {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, content);
    let mut parser = ConfigParser::new();
    let mut validation = ValidationMap::new();
    let ok = parser.parse(&path, &mut validation).unwrap();
    (dir, parser, validation, ok)
}

#[test]
fn test_parse_full_config() {
    let (dir, parser, validation, ok) = parse_file(&create_full_config_toml());

    assert!(ok, "unexpected diagnostics: {:?}", validation);
    assert_eq!(parser.output_dir(), dir.path().join("output"));

    // Worlds
    assert_eq!(parser.worlds().len(), 2);
    assert_eq!(
        parser.world("survival").unwrap().input_dir(),
        Some(dir.path().join("worlds/survival").as_path())
    );
    assert_eq!(
        parser.world("creative").unwrap().input_dir(),
        Some(dir.path().join("worlds/default").as_path())
    );

    // Maps keep document order
    let names: Vec<&str> = parser.maps().iter().map(|m| m.short_name()).collect();
    assert_eq!(names, vec!["survival_day", "survival_night", "creative"]);

    let day = parser.map("survival_day").unwrap();
    assert_eq!(day.long_name(), "Survival (day)");
    assert_eq!(day.rendermode(), Some("daylight"));
    assert_eq!(day.texture_size(), Some(16));
    assert_eq!(day.rotations().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    assert!(day.render_leaves_transparent());
    assert!(!day.render_biomes());

    let night = parser.map("survival_night").unwrap();
    assert_eq!(night.rendermode(), Some("nightlight"));
    assert_eq!(night.texture_size(), Some(12));

    let creative = parser.map("creative").unwrap();
    assert_eq!(creative.long_name(), "creative");
    assert_eq!(
        creative.rotations().iter().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert!(creative.render_biomes());
}

#[test]
fn test_parse_minimal_config_uses_builtin_defaults() {
    let (_dir, parser, validation, ok) = parse_file(&create_minimal_config_toml());

    assert!(ok);
    assert_eq!(validation.error_count(), 0);
    assert_eq!(parser.output_dir(), Path::new("/var/www/maps"));

    let map = parser.map("main").unwrap();
    assert_eq!(map.texture_size(), Some(12));
    assert_eq!(map.rendermode(), Some("normal"));
    assert_eq!(map.rotations().iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(map.texture_dir(), None);
}

#[test]
fn test_global_texture_size_fallback() {
    let (_dir, parser, _, ok) = parse_file(
        r#"
output_dir = "out"

[global.map]
texture_size = 12

[world.w]
input_dir = "w"

[map.m]
world = "w"
"#,
    );

    assert!(ok);
    assert_eq!(parser.map("m").unwrap().texture_size(), Some(12));
}

#[test]
fn test_zero_texture_size_fails_parse() {
    let (_dir, parser, validation, ok) = parse_file(
        r#"
output_dir = "out"

[global.map]
texture_size = 12

[world.w]
input_dir = "w"

[map.m]
world = "w"
texture_size = 0
"#,
    );

    assert!(!ok);
    let list = validation.get("map:m").unwrap();
    assert_eq!(list.error_count(), 1);
    assert_eq!(
        list.iter().next().unwrap().severity(),
        ValidationSeverity::Error
    );
    assert!(!validation.get("global:maps").unwrap().has_errors());
    assert!(parser.has_map("m"));
}

#[test]
fn test_out_of_range_rotation_is_reported() {
    let (_dir, parser, validation, ok) = parse_file(
        r#"
output_dir = "out"

[world.w]
input_dir = "w"

[map.m]
world = "w"
rotations = "0,90,450"
"#,
    );

    assert!(!ok);
    assert!(validation
        .get("map:m")
        .unwrap()
        .iter()
        .any(|m| m.is_error() && m.message().contains("450")));
    assert_eq!(
        parser.map("m").unwrap().rotations().iter().copied().collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn test_all_errors_collected_across_sections() {
    let (_dir, _parser, validation, ok) = parse_file(
        r#"
[global.map]
texture_size = "large"

[world.a]

[map.one]
world = "a"
rendermode = "sepia"

[map.two]
world = "missing"
"#,
    );

    assert!(!ok);
    // output_dir
    assert!(validation.get("global").unwrap().has_errors());
    // unconvertible global texture_size
    assert!(validation.get("global:maps").unwrap().has_errors());
    // input_dir
    assert!(validation.get("world:a").unwrap().has_errors());
    // render mode and the inherited texture size
    assert_eq!(validation.get("map:one").unwrap().error_count(), 2);
    // unknown world and the inherited texture size
    assert_eq!(validation.get("map:two").unwrap().error_count(), 2);
}

#[test]
fn test_bad_global_values_fail_without_maps() {
    let (_dir, parser, validation, ok) = parse_file(
        r#"
output_dir = "out"

[global.map]
texture_size = 0
rendermode = "sepia"
rotations = "450"
"#,
    );

    assert!(!ok);
    assert!(parser.maps().is_empty());
    let list = validation.get("global:maps").unwrap();
    assert_eq!(list.error_count(), 3);
    assert!(list.iter().any(|m| m.message().contains("positive")));
    assert!(list.iter().any(|m| m.message().contains("sepia")));
    assert!(list.iter().any(|m| m.message().contains("450")));
}

#[test]
fn test_bad_global_value_overridden_by_every_map_still_fails() {
    let (_dir, _parser, validation, ok) = parse_file(
        r#"
output_dir = "out"

[global.map]
rendermode = "sepia"

[world.w]
input_dir = "w"

[map.m]
world = "w"
rendermode = "cave"
"#,
    );

    assert!(!ok);
    assert_eq!(validation.get("global:maps").unwrap().error_count(), 1);
    assert!(!validation.get("map:m").unwrap().has_errors());
}

#[test]
fn test_warnings_only_config_is_valid() {
    let (_dir, _parser, validation, ok) = parse_file(
        r#"
output_dir = "out"
theme = "dark"

[world.w]
input_dir = "w"
seed = 42

[map.m]
world = "w"
zoom = 3

[markers]
enabled = true
"#,
    );

    assert!(ok);
    assert!(!validation.has_errors());
    assert_eq!(validation.warning_count(), 4);
}

#[test]
fn test_string_values_are_coerced() {
    let (_dir, parser, _, ok) = parse_file(
        r#"
output_dir = "out"

[world.w]
input_dir = "w"

[map.m]
world = "w"
texture_size = "24"
render_unknown_blocks = "on"
"#,
    );

    assert!(ok);
    let map = parser.map("m").unwrap();
    assert_eq!(map.texture_size(), Some(24));
    assert!(map.render_unknown_blocks());
}

#[test]
fn test_invalid_toml_is_structural_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[map.m\nworld = \"w\"");
    let mut parser = ConfigParser::new();
    let mut validation = ValidationMap::new();

    let result = parser.parse(&path, &mut validation);
    assert!(matches!(result, Err(ConfigParseError::TomlError(_))));
    assert!(validation.is_empty());
}

#[test]
fn test_missing_file_is_structural_error() {
    let dir = TempDir::new().unwrap();
    let mut parser = ConfigParser::new();
    let mut validation = ValidationMap::new();

    let result = parser.parse(dir.path().join("absent.toml"), &mut validation);
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigParseError::IoError { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
