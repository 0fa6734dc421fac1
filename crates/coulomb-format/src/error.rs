//! Error types for saving and loading simulations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use coulomb_core::ValidationError;

/// Errors that can occur while reading or writing a saved simulation.
///
/// Line numbers are 1-based.
#[derive(Debug)]
pub enum FormatError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The requested file does not exist in the given directory.
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },
    /// The first line is not a `SIMULATION` line.
    MissingSimulationHeader,
    /// The document contains no `PARTICLE` line.
    NoParticles,
    /// A line starts with a tag other than `SIMULATION`, `FIELD` or `PARTICLE`.
    UnknownTag {
        /// Line number.
        line: usize,
        /// The unrecognized tag.
        tag: String,
    },
    /// A record that may appear only once appeared again.
    DuplicateRecord {
        /// Line number of the repeat.
        line: usize,
        /// Tag of the repeated record.
        tag: &'static str,
    },
    /// A required key is absent.
    MissingKey {
        /// Line number.
        line: usize,
        /// Tag of the record.
        tag: &'static str,
        /// The missing key.
        key: &'static str,
    },
    /// A key appears more than once on a line.
    DuplicateKey {
        /// Line number.
        line: usize,
        /// The repeated key.
        key: String,
    },
    /// A key is not part of the record's grammar.
    UnknownKey {
        /// Line number.
        line: usize,
        /// Tag of the record.
        tag: &'static str,
        /// The unexpected key.
        key: String,
    },
    /// A token or value could not be read.
    MalformedValue {
        /// Line number.
        line: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A vector value does not have three components.
    WrongArity {
        /// Line number.
        line: usize,
        /// The key carrying the vector.
        key: &'static str,
        /// Number of components found.
        found: usize,
    },
    /// A flag value is neither 0 nor 1.
    InvalidFlag {
        /// Line number.
        line: usize,
        /// The key carrying the flag.
        key: &'static str,
        /// The value found.
        value: f64,
    },
    /// A line parsed but its values are physically invalid.
    InvalidRecord {
        /// Line number.
        line: usize,
        /// The underlying validation failure.
        source: ValidationError,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::FileNotFound { path } => write!(f, "no such file: {}", path.display()),
            Self::MissingSimulationHeader => {
                write!(f, "invalid data format: first line is not a SIMULATION line")
            }
            Self::NoParticles => write!(f, "invalid data format: no PARTICLE lines"),
            Self::UnknownTag { line, tag } => write!(f, "line {line}: unknown tag '{tag}'"),
            Self::DuplicateRecord { line, tag } => {
                write!(f, "line {line}: {tag} may appear only once")
            }
            Self::MissingKey { line, tag, key } => {
                write!(f, "line {line}: {tag} is missing key '{key}'")
            }
            Self::DuplicateKey { line, key } => {
                write!(f, "line {line}: key '{key}' given twice")
            }
            Self::UnknownKey { line, tag, key } => {
                write!(f, "line {line}: {tag} has no key '{key}'")
            }
            Self::MalformedValue { line, detail } => write!(f, "line {line}: {detail}"),
            Self::WrongArity { line, key, found } => {
                write!(f, "line {line}: '{key}' needs 3 components, got {found}")
            }
            Self::InvalidFlag { line, key, value } => {
                write!(f, "line {line}: flag '{key}' must be 0 or 1, got {value}")
            }
            Self::InvalidRecord { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
