//! Typed configuration fields with at-most-once loading

use crate::config::section::{ConfigSection, FromConfigValue};
use crate::config::validator::ValidationList;
use serde::{Serialize, Serializer};

/// Where a field stands after its section has been read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState<T> {
    /// No attempt found a value
    Unset,
    /// A value was read and converted
    Loaded(T),
    /// The key was present but its value could not be converted
    Invalid(String),
}

/// A scalar configuration value.
///
/// A field is populated at most once: the first load that finds a value
/// (convertible or not) wins and later loads are no-ops. `Invalid` counts as
/// loaded, so a malformed local value is reported instead of silently
/// falling back to an inherited one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    state: FieldState<T>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Field<T> {
    pub const fn unset() -> Self {
        Self {
            state: FieldState::Unset,
        }
    }

    pub fn loaded(value: T) -> Self {
        Self {
            state: FieldState::Loaded(value),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            state: FieldState::Invalid(reason.into()),
        }
    }

    pub fn state(&self) -> &FieldState<T> {
        &self.state
    }

    /// The held value, if the field is valid
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            FieldState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self.state {
            FieldState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self.state, FieldState::Unset)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, FieldState::Loaded(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        let state = match self.state {
            FieldState::Unset => FieldState::Unset,
            FieldState::Loaded(value) => FieldState::Loaded(f(value)),
            FieldState::Invalid(reason) => FieldState::Invalid(reason),
        };
        Field { state }
    }

    /// Append an error with `message` if no value was ever loaded.
    pub fn require(&self, validation: &mut ValidationList, message: impl Into<String>) -> bool {
        if !self.is_loaded() {
            validation.error(message);
            return false;
        }
        true
    }

    /// Append an error naming `key` if the loaded value could not be converted.
    pub fn report_invalid(&self, validation: &mut ValidationList, key: &str) -> bool {
        if let FieldState::Invalid(reason) = &self.state {
            validation.error(format!("Invalid value for '{}': {}", key, reason));
            return false;
        }
        true
    }

    /// Like [`Field::report_invalid`], for a value taken from the `[origin]` section.
    pub fn report_inherited_invalid(
        &self,
        validation: &mut ValidationList,
        key: &str,
        origin: &str,
    ) -> bool {
        if let FieldState::Invalid(reason) = &self.state {
            validation.error(format!(
                "Invalid value for '{}': {} (inherited from [{}])",
                key, reason, origin
            ));
            return false;
        }
        true
    }
}

impl<T: FromConfigValue> Field<T> {
    /// Read `key` from `section` without touching any existing field.
    pub fn read(section: &ConfigSection, key: &str) -> Self {
        if !section.has(key) {
            return Self::unset();
        }
        match section.get::<T>(key) {
            Ok(value) => Self::loaded(value),
            Err(err) => Self::invalid(err.to_string()),
        }
    }

    /// Load `key` from `section` unless this field was loaded before.
    ///
    /// Returns whether the field is loaded afterwards; an absent key leaves
    /// the field unset so a later fallback can still populate it.
    pub fn load(&mut self, section: &ConfigSection, key: &str) -> bool {
        if self.is_loaded() {
            return true;
        }
        *self = Self::read(section, key);
        self.is_loaded()
    }

    /// Load `key` from `section`, using `default` when the key is absent.
    ///
    /// Never leaves the field unset.
    pub fn load_or(&mut self, section: &ConfigSection, key: &str, default: T) -> bool {
        if self.is_loaded() {
            return true;
        }
        *self = match section.get_or(key, default) {
            Ok(value) => Self::loaded(value),
            Err(err) => Self::invalid(err.to_string()),
        };
        true
    }
}

impl<T: PartialEq> Field<T> {
    /// Whether the loaded value is one of `values`.
    ///
    /// Unlike [`Field::require`] this never appends to `validation`: an unset
    /// field or a mismatch both just return `false`, and the caller reports the
    /// problem with its own wording.
    pub fn validate_one_of<U>(
        &self,
        _validation: &mut ValidationList,
        _message: &str,
        values: &[U],
    ) -> bool
    where
        T: PartialEq<U>,
    {
        match &self.state {
            FieldState::Loaded(value) => values.iter().any(|allowed| value == allowed),
            _ => false,
        }
    }
}

/// Resolve a field against the global tier.
///
/// The section's own value wins, then the global value, then the built-in
/// default. Without a default an unresolved field stays unset.
pub fn resolve<T: Clone>(local: Field<T>, global: &Field<T>, default: Option<T>) -> Field<T> {
    if local.is_loaded() {
        return local;
    }
    if global.is_loaded() {
        return global.clone();
    }
    match default {
        Some(value) => Field::loaded(value),
        None => Field::unset(),
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}
