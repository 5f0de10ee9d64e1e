//! Phone directory
//!
//! Immutable mapping from a phone number or display name to its entry.
//! Loaded once at startup and never mutated afterwards.

mod loader;

pub use loader::load_directory;

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A single directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneEntry {
    pub number: String,
    pub name: String,
}

impl PhoneEntry {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PhoneEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number, self.name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Duplicate phone number: {0}")]
    DuplicateNumber(String),
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
}

/// Lookup table of every phone the exchange knows about
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<PhoneEntry>,
}

impl Directory {
    /// Build a directory, rejecting duplicate numbers and case-insensitive
    /// duplicate names.
    pub fn new(entries: Vec<PhoneEntry>) -> Result<Self, DirectoryError> {
        let mut numbers = HashSet::new();
        let mut names = HashSet::new();
        for entry in &entries {
            if !numbers.insert(entry.number.as_str()) {
                return Err(DirectoryError::DuplicateNumber(entry.number.clone()));
            }
            if !names.insert(entry.name.to_lowercase()) {
                return Err(DirectoryError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Resolve a number or name.
    ///
    /// Exact number matches win over name matches; names compare
    /// case-insensitively. No partial matching.
    pub fn resolve(&self, identifier: &str) -> Option<&PhoneEntry> {
        self.get(identifier).or_else(|| {
            let wanted = identifier.to_lowercase();
            self.entries.iter().find(|e| e.name.to_lowercase() == wanted)
        })
    }

    /// Exact lookup by phone number
    pub fn get(&self, number: &str) -> Option<&PhoneEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    /// Entries in load order
    pub fn entries(&self) -> &[PhoneEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
