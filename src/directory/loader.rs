//! Directory file loading
//!
//! Format: one `<5-digit-number> <1-12 letter name>` entry per line. Blank
//! lines and `#` comments are ignored. Bad lines are skipped with a warning
//! rather than failing the whole load.

use super::{Directory, DirectoryError, PhoneEntry};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const NUMBER_LEN: usize = 5;
const MAX_NAME_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No valid phone entries found")]
    NoValidEntries,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// A line that was skipped during loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    IncorrectFieldCount { line: usize, text: String },
    InvalidFormat { line: usize },
    DuplicateNumber { line: usize },
    DuplicateName { line: usize },
    /// Reported once, for all lines past the entry limit
    AdditionalLinesSkipped,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::IncorrectFieldCount { line, text } => write!(
                f,
                "Unable to read line {line}: '{text}' - reason: incorrect number of fields."
            ),
            LoadWarning::InvalidFormat { line } => {
                write!(f, "Warning: invalid format on line {line}, skipping.")
            }
            LoadWarning::DuplicateNumber { line } => write!(
                f,
                "Warning: duplicate phone number on line {line}, using first occurrence."
            ),
            LoadWarning::DuplicateName { line } => write!(
                f,
                "Warning: duplicate name on line {line}, using first occurrence."
            ),
            LoadWarning::AdditionalLinesSkipped => write!(f, "Warning: additional lines skipped."),
        }
    }
}

/// Loaded directory plus everything that was skipped on the way
#[derive(Debug)]
pub struct LoadReport {
    pub directory: Directory,
    pub warnings: Vec<LoadWarning>,
}

/// Read and parse a directory file
pub fn load_directory(path: &Path, max_entries: usize) -> Result<LoadReport, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    // Undecodable bytes become U+FFFD, which no valid name contains, so the
    // affected lines are skipped like any other malformed line.
    let contents = String::from_utf8_lossy(&bytes);
    if matches!(contents, Cow::Owned(_)) {
        tracing::debug!(path = %path.display(), "Directory file is not valid UTF-8");
    }

    let report = parse_directory(&contents, max_entries)?;
    tracing::info!(
        path = %path.display(),
        entries = report.directory.len(),
        skipped = report.warnings.len(),
        "Loaded phone directory"
    );
    Ok(report)
}

/// Parse directory text, keeping the first occurrence of any duplicate
pub fn parse_directory(contents: &str, max_entries: usize) -> Result<LoadReport, LoadError> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    let mut numbers = HashSet::new();
    let mut names = HashSet::new();
    let mut limit_reported = false;

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if entries.len() >= max_entries {
            if !limit_reported {
                tracing::debug!(line, max_entries, "Entry limit reached");
                warnings.push(LoadWarning::AdditionalLinesSkipped);
                limit_reported = true;
            }
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [number, name] = fields.as_slice() else {
            tracing::debug!(line, fields = fields.len(), "Skipping line with wrong field count");
            warnings.push(LoadWarning::IncorrectFieldCount {
                line,
                text: raw.to_string(),
            });
            continue;
        };

        if !is_valid_number(number) || !is_valid_name(name) {
            tracing::debug!(line, "Skipping malformed line");
            warnings.push(LoadWarning::InvalidFormat { line });
            continue;
        }
        if numbers.contains(*number) {
            tracing::debug!(line, number, "Skipping duplicate number");
            warnings.push(LoadWarning::DuplicateNumber { line });
            continue;
        }
        if names.contains(&name.to_lowercase()) {
            tracing::debug!(line, name, "Skipping duplicate name");
            warnings.push(LoadWarning::DuplicateName { line });
            continue;
        }

        numbers.insert((*number).to_string());
        names.insert(name.to_lowercase());
        entries.push(PhoneEntry::new(*number, *name));
    }

    if entries.is_empty() {
        return Err(LoadError::NoValidEntries);
    }

    Ok(LoadReport {
        directory: Directory::new(entries)?,
        warnings,
    })
}

fn is_valid_number(number: &str) -> bool {
    number.len() == NUMBER_LEN && number.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=MAX_NAME_LEN).contains(&len) && name.chars().all(char::is_alphabetic)
}
