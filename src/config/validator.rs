//! Validation diagnostics collected while parsing a configuration document

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationSeverity::Error => write!(f, "Error"),
            ValidationSeverity::Warning => write!(f, "Warning"),
        }
    }
}

/// A single diagnostic produced while validating a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    severity: ValidationSeverity,
    message: String,
}

impl ValidationMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ValidationSeverity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered, append-only list of diagnostics owned by one section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationList {
    messages: Vec<ValidationMessage>,
}

impl ValidationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ValidationMessage::error(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ValidationMessage::warning(message));
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(ValidationMessage::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationList {
    type Item = &'a ValidationMessage;
    type IntoIter = std::slice::Iter<'a, ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Diagnostics for a whole document, keyed by section identifier in parse order.
///
/// Identifiers are `global`, `global:worlds`, `global:maps`, `world:<name>` and
/// `map:<name>`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationMap {
    sections: Vec<(String, ValidationList)>,
}

impl ValidationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the list for `section`, merging into an existing entry of the same name.
    pub fn insert(&mut self, section: impl Into<String>, list: ValidationList) {
        let section = section.into();
        match self.sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, existing)) => existing.messages.extend(list.messages),
            None => self.sections.push((section, list)),
        }
    }

    pub fn get(&self, section: &str) -> Option<&ValidationList> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, list)| list)
    }

    /// True if any section holds an error-severity diagnostic. Warnings never count.
    pub fn has_errors(&self) -> bool {
        self.sections.iter().any(|(_, list)| list.has_errors())
    }

    pub fn error_count(&self) -> usize {
        self.sections.iter().map(|(_, list)| list.error_count()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.sections
            .iter()
            .map(|(_, list)| list.len() - list.error_count())
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationList)> {
        self.sections.iter().map(|(name, list)| (name.as_str(), list))
    }

    /// Sections that produced at least one diagnostic
    pub fn problems(&self) -> impl Iterator<Item = (&str, &ValidationList)> {
        self.iter().filter(|(_, list)| !list.is_empty())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
