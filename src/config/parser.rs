//! Configuration parser: splits a render document into sections and validates them

use crate::config::field::Field;
use crate::config::map::{MapDefaults, MapSection};
use crate::config::section::ConfigDocument;
use crate::config::validator::{ValidationList, ValidationMap};
use crate::config::world::{WorldDefaults, WorldSection};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const ROOT_KEYS: &[&str] = &["output_dir"];

/// Structural failures that stop a document from being parsed at all
#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("Unable to read {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid section '{section}': {message}")]
    InvalidSection { section: String, message: String },
}

/// Parsed render configuration.
///
/// Filled by [`ConfigParser::parse`]; parsing again replaces the previous contents.
#[derive(Debug, Default)]
pub struct ConfigParser {
    world_global: WorldDefaults,
    map_global: MapDefaults,
    output_dir: PathBuf,
    worlds: BTreeMap<String, WorldSection>,
    maps: Vec<MapSection>,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the document at `path`.
    ///
    /// Every section is parsed and its diagnostics appended to `validation`.
    /// Returns `Ok(false)` if any of them is an error; warnings alone still
    /// yield `Ok(true)`. `Err` means the document could not be split into
    /// sections and nothing was parsed.
    pub fn parse<P: AsRef<Path>>(
        &mut self,
        path: P,
        validation: &mut ValidationMap,
    ) -> Result<bool, ConfigParseError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigParseError::IoError {
                path: path.to_path_buf(),
                source,
            })?;
        let config_dir = path.parent().unwrap_or_else(|| Path::new(""));

        debug!("Parsing configuration file {}", path.display());
        self.parse_str(&content, config_dir, validation)
    }

    /// Parse an in-memory document; relative paths resolve against `config_dir`.
    pub fn parse_str(
        &mut self,
        content: &str,
        config_dir: &Path,
        validation: &mut ValidationMap,
    ) -> Result<bool, ConfigParseError> {
        let document = ConfigDocument::parse(content).map_err(|err| {
            warn!("Configuration document is malformed: {}", err);
            err
        })?;
        Ok(self.parse_document(&document, config_dir, validation))
    }

    /// Parse an already split document.
    ///
    /// Anything left over from an earlier parse is discarded first.
    pub fn parse_document(
        &mut self,
        document: &ConfigDocument,
        config_dir: &Path,
        validation: &mut ValidationMap,
    ) -> bool {
        *self = Self::default();

        let mut root_validation = ValidationList::new();
        let output_dir: Field<PathBuf> = Field::read(document.root(), "output_dir");
        if output_dir.require(
            &mut root_validation,
            "You have to specify an output directory ('output_dir')",
        ) {
            output_dir.report_invalid(&mut root_validation, "output_dir");
        }
        if let Some(dir) = output_dir.into_value() {
            self.output_dir = config_dir.join(dir);
        }
        for key in document.root().unknown_keys(ROOT_KEYS) {
            root_validation.warning(format!("Unknown configuration option '{}'", key));
        }
        for section in document.unknown_sections() {
            root_validation.warning(format!("Unknown section '{}'", section));
        }
        if document.maps().is_empty() {
            root_validation.warning("No maps defined, nothing will be rendered");
        }
        validation.insert("global", root_validation);

        let mut world_validation = ValidationList::new();
        self.world_global
            .parse(document.world_defaults(), &mut world_validation);
        validation.insert("global:worlds", world_validation);

        let mut map_validation = ValidationList::new();
        self.map_global
            .parse(document.map_defaults(), &mut map_validation);
        validation.insert("global:maps", map_validation);

        for section in document.worlds() {
            let mut world_validation = ValidationList::new();
            let mut world = WorldSection::new(section.name());
            let ok = world.parse(section, &self.world_global, config_dir, &mut world_validation);
            debug!(world = section.name(), ok, "Parsed world section");

            validation.insert(format!("world:{}", section.name()), world_validation);
            self.worlds.insert(section.name().to_string(), world);
        }

        for section in document.maps() {
            let mut map_validation = ValidationList::new();
            let mut map = MapSection::new(section.name());
            let ok = map.parse(section, &self.map_global, config_dir, &mut map_validation);

            if let Some(world) = map.world() {
                if !self.worlds.contains_key(world) {
                    map_validation.error(format!("World '{}' does not exist", world));
                }
            }
            debug!(map = section.name(), ok, "Parsed map section");

            validation.insert(format!("map:{}", section.name()), map_validation);
            self.maps.push(map);
        }

        info!(
            worlds = self.worlds.len(),
            maps = self.maps.len(),
            errors = validation.error_count(),
            warnings = validation.warning_count(),
            "Configuration parsed"
        );

        !validation.has_errors()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn has_world(&self, world: &str) -> bool {
        self.worlds.contains_key(world)
    }

    pub fn world(&self, world: &str) -> Option<&WorldSection> {
        self.worlds.get(world)
    }

    pub fn worlds(&self) -> &BTreeMap<String, WorldSection> {
        &self.worlds
    }

    pub fn has_map(&self, map: &str) -> bool {
        self.maps.iter().any(|m| m.short_name() == map)
    }

    pub fn map(&self, map: &str) -> Option<&MapSection> {
        self.maps.iter().find(|m| m.short_name() == map)
    }

    /// Maps in document order
    pub fn maps(&self) -> &[MapSection] {
        &self.maps
    }

    pub fn world_defaults(&self) -> &WorldDefaults {
        &self.world_global
    }

    pub fn map_defaults(&self) -> &MapDefaults {
        &self.map_global
    }
}
