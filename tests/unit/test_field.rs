//! Unit tests for typed configuration fields
//!
//! Covers the at-most-once loading rule, default handling and the override
//! precedence used when a section inherits from the global tier.

use mapconf::config::{resolve, ConfigDocument, ConfigSection, Field, FieldState, ValidationList};
use std::path::PathBuf;

fn sections(content: &str) -> ConfigDocument {
    ConfigDocument::parse(content).unwrap()
}

#[test]
fn test_repeated_load_keeps_value() {
    let document = sections("[map.day]\ntexture_size = 16\n");
    let section = &document.maps()[0];
    let mut field: Field<i64> = Field::unset();

    assert!(field.load(section, "texture_size"));
    let first = field.clone();
    assert!(field.load(section, "texture_size"));
    assert_eq!(field, first);
    assert_eq!(field.value(), Some(&16));
}

#[test]
fn test_default_applies_when_key_absent() {
    let section = ConfigSection::empty("day");

    let mut size: Field<i64> = Field::unset();
    assert!(size.load_or(&section, "texture_size", 12));
    assert_eq!(size.value(), Some(&12));
    assert!(size.is_valid());

    let mut biomes: Field<bool> = Field::unset();
    assert!(biomes.load_or(&section, "render_biomes", false));
    assert_eq!(biomes.value(), Some(&false));
}

#[test]
fn test_global_value_overrides_builtin_default() {
    let document = sections(
        r#"
[global.map]
texture_size = 32

[map.day]
world = "survival"
"#,
    );

    let global: Field<i64> = Field::read(document.map_defaults(), "texture_size");
    let local: Field<i64> = Field::read(&document.maps()[0], "texture_size");
    assert_eq!(local.state(), &FieldState::Unset);

    let resolved = resolve(local, &global, Some(12));
    assert_eq!(resolved.value(), Some(&32));
}

#[test]
fn test_local_value_overrides_global() {
    let document = sections(
        r#"
[global.map]
rendermode = "daylight"

[map.day]
rendermode = "cave"
"#,
    );

    let global: Field<String> = Field::read(document.map_defaults(), "rendermode");
    let local: Field<String> = Field::read(&document.maps()[0], "rendermode");

    let resolved = resolve(local, &global, Some("normal".to_string()));
    assert_eq!(resolved.value().map(String::as_str), Some("cave"));
}

#[test]
fn test_require_reports_exactly_once() {
    let mut validation = ValidationList::new();
    let world: Field<String> = Field::unset();

    assert!(!world.require(&mut validation, "You have to specify a world ('world')"));
    assert_eq!(validation.len(), 1);
    assert_eq!(validation.error_count(), 1);
}

#[test]
fn test_validate_one_of_leaves_validation_untouched() {
    let mut validation = ValidationList::new();
    let allowed = ["normal", "daylight", "nightlight", "cave"];

    let unset: Field<String> = Field::unset();
    assert!(!unset.validate_one_of(&mut validation, "invalid render mode", &allowed));

    let wrong = Field::loaded("sepia".to_string());
    assert!(!wrong.validate_one_of(&mut validation, "invalid render mode", &allowed));

    assert!(validation.is_empty());
}

#[test]
fn test_path_fields() {
    let document = sections("[world.w]\ninput_dir = \"saves/w\"\n");
    let dir: Field<PathBuf> = Field::read(&document.worlds()[0], "input_dir");
    assert_eq!(dir.value(), Some(&PathBuf::from("saves/w")));
}
