//! World sections: which save directory a map is rendered from

use crate::config::field::{resolve, Field};
use crate::config::section::ConfigSection;
use crate::config::validator::ValidationList;
use serde::Serialize;
use std::path::{Path, PathBuf};

const WORLD_KEYS: &[&str] = &["input_dir"];

/// World options set explicitly in `[global.world]`
#[derive(Debug, Clone, Default)]
pub struct WorldDefaults {
    input_dir: Field<PathBuf>,
}

impl WorldDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, section: &ConfigSection, validation: &mut ValidationList) -> bool {
        let errors = validation.error_count();

        self.input_dir.load(section, "input_dir");
        self.input_dir.report_invalid(validation, "input_dir");

        for key in section.unknown_keys(WORLD_KEYS) {
            validation.warning(format!("Unknown configuration option '{}'", key));
        }

        validation.error_count() == errors
    }

    pub fn input_dir(&self) -> &Field<PathBuf> {
        &self.input_dir
    }
}

/// A concrete `[world.<name>]` section with the global tier applied
#[derive(Debug, Clone, Serialize)]
pub struct WorldSection {
    name: String,
    input_dir: Field<PathBuf>,
}

impl WorldSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input_dir: Field::unset(),
        }
    }

    /// Load this world from `section`, inheriting unset options from `defaults`.
    ///
    /// Relative paths are taken relative to `config_dir`. Returns `false` iff
    /// an error was appended to `validation`.
    pub fn parse(
        &mut self,
        section: &ConfigSection,
        defaults: &WorldDefaults,
        config_dir: &Path,
        validation: &mut ValidationList,
    ) -> bool {
        let errors = validation.error_count();

        self.input_dir.load(section, "input_dir");
        let inherited = !self.input_dir.is_loaded();
        self.input_dir = resolve(std::mem::take(&mut self.input_dir), &defaults.input_dir, None)
            .map(|dir| config_dir.join(dir));

        if self.input_dir.require(
            validation,
            "You have to specify an input directory ('input_dir')",
        ) {
            if inherited {
                self.input_dir
                    .report_inherited_invalid(validation, "input_dir", "global.world");
            } else {
                self.input_dir.report_invalid(validation, "input_dir");
            }
        }

        for key in section.unknown_keys(WORLD_KEYS) {
            validation.warning(format!("Unknown configuration option '{}'", key));
        }

        validation.error_count() == errors
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_dir(&self) -> Option<&Path> {
        self.input_dir.value().map(PathBuf::as_path)
    }
}
