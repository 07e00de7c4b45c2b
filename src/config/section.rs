//! Read-only views over the raw configuration document
//!
//! The document is tokenized by the `toml` crate. This module only splits the
//! resulting table into the blocks the schemas care about and offers typed
//! lookups on each of them.

use crate::config::parser::ConfigParseError;
use std::path::PathBuf;
use thiserror::Error;
use toml::{Table, Value};

/// Failure to convert a present value into the requested type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("key '{0}' is not set")]
    Missing(String),
}

/// Scalar types a configuration value can be read as.
///
/// String values are coerced the way an INI store would read them, so
/// `texture_size = "16"` and `texture_size = 16` are equivalent.
pub trait FromConfigValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_config_value(value: &Value) -> Result<Self, ValueError>;
}

fn mismatch<T: FromConfigValue>(value: &Value) -> ValueError {
    ValueError::TypeMismatch {
        expected: T::TYPE_NAME,
        found: describe(value),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(d) => d.to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Table(_) => "a table".to_string(),
    }
}

impl FromConfigValue for String {
    const TYPE_NAME: &'static str = "a string";

    fn from_config_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromConfigValue for i64 {
    const TYPE_NAME: &'static str = "an integer";

    fn from_config_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Integer(i) => Ok(*i),
            Value::String(s) => s.trim().parse().map_err(|_| mismatch::<Self>(value)),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromConfigValue for bool {
    const TYPE_NAME: &'static str = "a boolean";

    fn from_config_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(mismatch::<Self>(value)),
            },
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

impl FromConfigValue for PathBuf {
    const TYPE_NAME: &'static str = "a path";

    fn from_config_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Ok(PathBuf::from(s.trim())),
            _ => Err(mismatch::<Self>(value)),
        }
    }
}

/// One named block of string-keyed values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSection {
    name: String,
    table: Table,
}

impl ConfigSection {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Table::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T, ValueError> {
        match self.table.get(key) {
            Some(value) => T::from_config_value(value),
            None => Err(ValueError::Missing(key.to_string())),
        }
    }

    /// Read `key`, falling back to `default` when the key is absent.
    ///
    /// A present but unconvertible value is still an error.
    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> Result<T, ValueError> {
        match self.table.get(key) {
            Some(value) => T::from_config_value(value),
            None => Ok(default),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Keys of this section that are not in `known`, in document order
    pub fn unknown_keys<'a>(&'a self, known: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.keys().filter(move |key| !known.contains(key))
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A document split into the blocks the parser walks.
///
/// Layout:
///
/// ```toml
/// output_dir = "out"
///
/// [global.world]
/// [global.map]
///
/// [world.<name>]
/// [map.<name>]
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    root: ConfigSection,
    world_defaults: ConfigSection,
    map_defaults: ConfigSection,
    worlds: Vec<ConfigSection>,
    maps: Vec<ConfigSection>,
    unknown_sections: Vec<String>,
}

impl ConfigDocument {
    /// Tokenize `content` and split it into sections.
    ///
    /// Syntax errors and blocks of the wrong shape are structural: nothing
    /// else in the document can be trusted, so the whole parse is rejected.
    pub fn parse(content: &str) -> Result<Self, ConfigParseError> {
        let table: Table = toml::from_str(content)?;
        Self::from_table(table)
    }

    pub fn from_table(table: Table) -> Result<Self, ConfigParseError> {
        let mut document = Self {
            root: ConfigSection::empty("global"),
            world_defaults: ConfigSection::empty("global:world"),
            map_defaults: ConfigSection::empty("global:map"),
            ..Self::default()
        };
        let mut root = Table::new();

        for (key, value) in table {
            let reserved = matches!(key.as_str(), "global" | "world" | "map");
            match value {
                Value::Table(global) if key == "global" => document.split_global(global)?,
                Value::Table(worlds) if key == "world" => {
                    document.worlds = named_sections("world", worlds)?;
                }
                Value::Table(maps) if key == "map" => {
                    document.maps = named_sections("map", maps)?;
                }
                Value::Table(_) => document.unknown_sections.push(key),
                other if reserved => {
                    return Err(ConfigParseError::InvalidSection {
                        section: key,
                        message: format!("expected a table, found {}", describe(&other)),
                    });
                }
                other => {
                    root.insert(key, other);
                }
            }
        }

        document.root = ConfigSection::new("global", root);
        Ok(document)
    }

    fn split_global(&mut self, global: Table) -> Result<(), ConfigParseError> {
        for (key, value) in global {
            match value {
                Value::Table(table) if key == "world" => {
                    self.world_defaults = ConfigSection::new("global:world", table);
                }
                Value::Table(table) if key == "map" => {
                    self.map_defaults = ConfigSection::new("global:map", table);
                }
                Value::Table(_) => self.unknown_sections.push(format!("global.{}", key)),
                other => {
                    return Err(ConfigParseError::InvalidSection {
                        section: format!("global.{}", key),
                        message: format!(
                            "expected a [global.world] or [global.map] table, found {}",
                            describe(&other)
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Top-level keys such as `output_dir`
    pub fn root(&self) -> &ConfigSection {
        &self.root
    }

    pub fn world_defaults(&self) -> &ConfigSection {
        &self.world_defaults
    }

    pub fn map_defaults(&self) -> &ConfigSection {
        &self.map_defaults
    }

    pub fn worlds(&self) -> &[ConfigSection] {
        &self.worlds
    }

    /// Map sections in document order
    pub fn maps(&self) -> &[ConfigSection] {
        &self.maps
    }

    /// Tables the parser does not recognise, e.g. `[marker]`
    pub fn unknown_sections(&self) -> &[String] {
        &self.unknown_sections
    }
}

fn named_sections(kind: &str, table: Table) -> Result<Vec<ConfigSection>, ConfigParseError> {
    table
        .into_iter()
        .map(|(name, value)| match value {
            Value::Table(entries) => Ok(ConfigSection::new(name, entries)),
            other => Err(ConfigParseError::InvalidSection {
                section: format!("{}.{}", kind, name),
                message: format!("expected a table, found {}", describe(&other)),
            }),
        })
        .collect()
}
