//! Map sections: how and from which world a map is rendered

use crate::config::field::{resolve, Field};
use crate::config::section::{ConfigSection, FromConfigValue};
use crate::config::validator::ValidationList;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Render modes the renderer knows about
pub const RENDER_MODES: &[&str] = &["normal", "daylight", "nightlight", "cave"];

/// View names, indexed by rotation
pub const ROTATION_NAMES: &[&str] = &["top-left", "top-right", "bottom-right", "bottom-left"];

pub const DEFAULT_ROTATIONS: &str = "top-left";
pub const DEFAULT_RENDERMODE: &str = "normal";
pub const DEFAULT_TEXTURE_SIZE: i64 = 12;

const MAP_DEFAULT_KEYS: &[&str] = &[
    "texture_dir",
    "rotations",
    "rendermode",
    "texture_size",
    "render_unknown_blocks",
    "render_leaves_transparent",
    "render_biomes",
];

const MAP_KEYS: &[&str] = &[
    "name",
    "world",
    "texture_dir",
    "rotations",
    "rendermode",
    "texture_size",
    "render_unknown_blocks",
    "render_leaves_transparent",
    "render_biomes",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error("No rotations specified")]
    Empty,
    #[error("Unknown rotation '{0}'")]
    Unknown(String),
    #[error("Rotation {0} is out of range (0 to 270 in steps of 90)")]
    OutOfRange(i64),
    #[error("Invalid rotation range '{0}'")]
    InvalidRange(String),
}

/// Parse a rotation list into a set of rotation indices (0 to 3).
///
/// Tokens are separated by commas or whitespace. A token is a view name
/// (`top-left`, `top-right`, `bottom-right`, `bottom-left`), a degree value
/// (`0`, `90`, `180`, `270`) or an inclusive degree range such as `90-270`.
/// Bad tokens are reported and skipped, the valid ones are still returned.
pub fn parse_rotations(value: &str) -> (BTreeSet<i64>, Vec<RotationError>) {
    let mut rotations = BTreeSet::new();
    let mut errors = Vec::new();

    let tokens: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        errors.push(RotationError::Empty);
    }

    for token in tokens {
        match parse_rotation_token(token) {
            Ok(indices) => rotations.extend(indices),
            Err(err) => errors.push(err),
        }
    }

    (rotations, errors)
}

fn parse_rotation_token(token: &str) -> Result<Vec<i64>, RotationError> {
    if let Some(index) = ROTATION_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
    {
        return Ok(vec![index as i64]);
    }

    if let Ok(degrees) = token.parse::<i64>() {
        return degrees_to_index(degrees).map(|index| vec![index]);
    }

    let (start, end) = token
        .split_once('-')
        .ok_or_else(|| RotationError::Unknown(token.to_string()))?;
    let (start, end) = match (start.parse::<i64>(), end.parse::<i64>()) {
        (Ok(start), Ok(end)) => (start, end),
        _ => return Err(RotationError::Unknown(token.to_string())),
    };

    let first = degrees_to_index(start)?;
    let last = degrees_to_index(end)?;
    if first > last {
        return Err(RotationError::InvalidRange(token.to_string()));
    }
    Ok((first..=last).collect())
}

fn degrees_to_index(degrees: i64) -> Result<i64, RotationError> {
    if (0..360).contains(&degrees) && degrees % 90 == 0 {
        Ok(degrees / 90)
    } else {
        Err(RotationError::OutOfRange(degrees))
    }
}

/// Map options set explicitly in `[global.map]`.
///
/// Only records what the global tier sets; built-in defaults are applied
/// when a concrete map is resolved.
#[derive(Debug, Clone, Default)]
pub struct MapDefaults {
    texture_dir: Field<PathBuf>,
    rotations: Field<String>,
    rendermode: Field<String>,
    texture_size: Field<i64>,
    render_unknown_blocks: Field<bool>,
    render_leaves_transparent: Field<bool>,
    render_biomes: Field<bool>,
}

impl MapDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, section: &ConfigSection, validation: &mut ValidationList) -> bool {
        let errors = validation.error_count();

        load_reported(&mut self.texture_dir, section, "texture_dir", validation);
        load_reported(&mut self.rotations, section, "rotations", validation);
        load_reported(&mut self.rendermode, section, "rendermode", validation);
        load_reported(&mut self.texture_size, section, "texture_size", validation);
        load_reported(
            &mut self.render_unknown_blocks,
            section,
            "render_unknown_blocks",
            validation,
        );
        load_reported(
            &mut self.render_leaves_transparent,
            section,
            "render_leaves_transparent",
            validation,
        );
        load_reported(&mut self.render_biomes, section, "render_biomes", validation);

        check_rotations(&self.rotations, validation);
        check_rendermode(&self.rendermode, validation);
        check_texture_size(&self.texture_size, validation);

        for key in section.unknown_keys(MAP_DEFAULT_KEYS) {
            if key == "world" || key == "name" {
                validation.warning(format!(
                    "'{}' can only be set in a map section and is ignored here",
                    key
                ));
            } else {
                validation.warning(format!("Unknown configuration option '{}'", key));
            }
        }

        validation.error_count() == errors
    }

    pub fn texture_dir(&self) -> &Field<PathBuf> {
        &self.texture_dir
    }

    pub fn rotations(&self) -> &Field<String> {
        &self.rotations
    }

    pub fn rendermode(&self) -> &Field<String> {
        &self.rendermode
    }

    pub fn texture_size(&self) -> &Field<i64> {
        &self.texture_size
    }
}

fn load_reported<T: FromConfigValue>(
    field: &mut Field<T>,
    section: &ConfigSection,
    key: &str,
    validation: &mut ValidationList,
) {
    field.load(section, key);
    field.report_invalid(validation, key);
}

/// Load `key` from the section, then fall back to the global tier and `default`.
///
/// A value that cannot be converted is reported, naming `[global.map]` when
/// it was inherited.
fn inherit<T: FromConfigValue + Clone>(
    field: &mut Field<T>,
    section: &ConfigSection,
    key: &str,
    global: &Field<T>,
    default: Option<T>,
    validation: &mut ValidationList,
) {
    field.load(section, key);
    let inherited = !field.is_loaded();
    *field = resolve(std::mem::take(field), global, default);
    if inherited {
        field.report_inherited_invalid(validation, key, "global.map");
    } else {
        field.report_invalid(validation, key);
    }
}

/// Parse the rotation list of `field`, appending one error per bad token.
fn check_rotations(field: &Field<String>, validation: &mut ValidationList) -> BTreeSet<i64> {
    let Some(value) = field.value() else {
        return BTreeSet::new();
    };
    let (rotations, errors) = parse_rotations(value);
    for err in errors {
        validation.error(err.to_string());
    }
    rotations
}

fn check_rendermode(field: &Field<String>, validation: &mut ValidationList) {
    if let Some(mode) = field.value() {
        if !field.validate_one_of(validation, "rendermode", RENDER_MODES) {
            validation.error(format!(
                "Invalid render mode '{}', expected one of: {}",
                mode,
                RENDER_MODES.join(", ")
            ));
        }
    }
}

fn check_texture_size(field: &Field<i64>, validation: &mut ValidationList) {
    if let Some(&size) = field.value() {
        if size <= 0 {
            validation.error(format!(
                "Texture size must be a positive number, not {}",
                size
            ));
        }
    }
}

/// A concrete `[map.<name>]` section with the global tier applied
#[derive(Debug, Clone, Serialize)]
pub struct MapSection {
    name_short: String,
    name_long: String,
    world: Field<String>,
    texture_dir: Field<PathBuf>,
    #[serde(skip)]
    rotations: Field<String>,
    #[serde(rename = "rotations")]
    rotations_set: BTreeSet<i64>,
    rendermode: Field<String>,
    texture_size: Field<i64>,
    render_unknown_blocks: Field<bool>,
    render_leaves_transparent: Field<bool>,
    render_biomes: Field<bool>,
}

impl MapSection {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name_long: name.clone(),
            name_short: name,
            world: Field::unset(),
            texture_dir: Field::unset(),
            rotations: Field::unset(),
            rotations_set: BTreeSet::new(),
            rendermode: Field::unset(),
            texture_size: Field::unset(),
            render_unknown_blocks: Field::unset(),
            render_leaves_transparent: Field::unset(),
            render_biomes: Field::unset(),
        }
    }

    /// Load this map from `section`, inheriting unset options from `defaults`.
    ///
    /// Every field is checked even after a failure so all problems end up in
    /// `validation`. Returns `false` iff an error was appended.
    pub fn parse(
        &mut self,
        section: &ConfigSection,
        defaults: &MapDefaults,
        config_dir: &Path,
        validation: &mut ValidationList,
    ) -> bool {
        let errors = validation.error_count();

        let name: Field<String> = Field::read(section, "name");
        name.report_invalid(validation, "name");
        if let Some(name) = name.into_value() {
            self.name_long = name;
        }

        self.world.load(section, "world");
        inherit(
            &mut self.texture_dir,
            section,
            "texture_dir",
            &defaults.texture_dir,
            None,
            validation,
        );
        inherit(
            &mut self.rotations,
            section,
            "rotations",
            &defaults.rotations,
            Some(DEFAULT_ROTATIONS.to_string()),
            validation,
        );
        inherit(
            &mut self.rendermode,
            section,
            "rendermode",
            &defaults.rendermode,
            Some(DEFAULT_RENDERMODE.to_string()),
            validation,
        );
        inherit(
            &mut self.texture_size,
            section,
            "texture_size",
            &defaults.texture_size,
            Some(DEFAULT_TEXTURE_SIZE),
            validation,
        );
        inherit(
            &mut self.render_unknown_blocks,
            section,
            "render_unknown_blocks",
            &defaults.render_unknown_blocks,
            Some(false),
            validation,
        );
        inherit(
            &mut self.render_leaves_transparent,
            section,
            "render_leaves_transparent",
            &defaults.render_leaves_transparent,
            Some(false),
            validation,
        );
        inherit(
            &mut self.render_biomes,
            section,
            "render_biomes",
            &defaults.render_biomes,
            Some(false),
            validation,
        );
        self.texture_dir = std::mem::take(&mut self.texture_dir).map(|dir| config_dir.join(dir));

        if self
            .world
            .require(validation, "You have to specify a world ('world')")
        {
            self.world.report_invalid(validation, "world");
        }
        self.rotations_set = check_rotations(&self.rotations, validation);
        check_rendermode(&self.rendermode, validation);
        check_texture_size(&self.texture_size, validation);

        for key in section.unknown_keys(MAP_KEYS) {
            validation.warning(format!("Unknown configuration option '{}'", key));
        }

        validation.error_count() == errors
    }

    pub fn short_name(&self) -> &str {
        &self.name_short
    }

    pub fn long_name(&self) -> &str {
        &self.name_long
    }

    pub fn world(&self) -> Option<&str> {
        self.world.value().map(String::as_str)
    }

    pub fn texture_dir(&self) -> Option<&Path> {
        self.texture_dir.value().map(PathBuf::as_path)
    }

    /// Rotation indices to render, 0 being the `top-left` view
    pub fn rotations(&self) -> &BTreeSet<i64> {
        &self.rotations_set
    }

    pub fn rendermode(&self) -> Option<&str> {
        self.rendermode.value().map(String::as_str)
    }

    pub fn texture_size(&self) -> Option<i64> {
        self.texture_size.value().copied()
    }

    pub fn render_unknown_blocks(&self) -> bool {
        self.render_unknown_blocks.value().copied().unwrap_or(false)
    }

    pub fn render_leaves_transparent(&self) -> bool {
        self.render_leaves_transparent
            .value()
            .copied()
            .unwrap_or(false)
    }

    pub fn render_biomes(&self) -> bool {
        self.render_biomes.value().copied().unwrap_or(false)
    }
}
