//! Error types for scene loading and scenario validation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors arising from scene construction, parameter parsing, or
/// scenario validation.
#[derive(Debug)]
pub enum SceneError {
    /// A grid axis exceeds [`MAX_GRID_DIM`](crate::grid::MAX_GRID_DIM).
    GridTooLarge {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// The category-code buffer does not match `width * height`.
    CodeCountMismatch {
        /// Expected cell count.
        expected: usize,
        /// Number of codes supplied.
        got: usize,
    },
    /// An I/O error occurred while reading a parameter file.
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A parameter-file line is not a `key = value` pair.
    MalformedLine {
        /// 1-based line number.
        line_no: usize,
        /// The offending line.
        line: String,
    },
    /// A required scenario parameter is absent.
    MissingParameter {
        /// The parameter key.
        key: String,
    },
    /// A scenario parameter could not be parsed as the expected type.
    MalformedParameter {
        /// The parameter key.
        key: String,
        /// The raw value.
        value: String,
    },
    /// A scenario parameter violates a structural invariant.
    InvalidScenario {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooLarge { width, height } => {
                write!(f, "scenario is too large: {width}x{height} exceeds 1023 per axis")
            }
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::CodeCountMismatch { expected, got } => {
                write!(f, "expected {expected} category codes, got {got}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading {}: {source}", path.display())
            }
            Self::MalformedLine { line_no, line } => {
                write!(f, "parameter line {line_no} is not a key = value pair: {line:?}")
            }
            Self::MissingParameter { key } => write!(f, "missing parameter {key:?}"),
            Self::MalformedParameter { key, value } => {
                write!(f, "parameter {key:?} has malformed value {value:?}")
            }
            Self::InvalidScenario { reason } => write!(f, "invalid scenario: {reason}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
