//! Error and warning types for readflow.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for readflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the caller boundary.
///
/// The reconstruction core itself never fails on page data; these errors only
/// cover input that has the wrong shape entirely, bad configuration, and I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not match the expected page/fragment shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A layout option is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during rendering (JSON, text, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The worker pool for batch processing could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}

/// Non-fatal conditions recorded while reconstructing a page.
///
/// Warnings never abort processing; the page is always returned best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The page had no usable fragments and produced no blocks.
    EmptyInput,

    /// A fragment was skipped because its position was missing or invalid.
    MalformedFragment {
        /// Index of the fragment in the page's raw fragment list
        index: usize,
        /// Why the fragment was rejected
        reason: String,
    },

    /// A sentence boundary could not be attributed to a single style run,
    /// so the surrounding text was kept as one sentence.
    AmbiguousStyleBoundary {
        /// Index of the paragraph on the page
        paragraph: usize,
        /// Byte offset of the suppressed boundary in the paragraph text
        offset: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptyInput => write!(f, "page has no fragments"),
            Warning::MalformedFragment { index, reason } => {
                write!(f, "skipped fragment {}: {}", index, reason)
            }
            Warning::AmbiguousStyleBoundary { paragraph, offset } => write!(
                f,
                "ambiguous style boundary in paragraph {} at byte {}",
                paragraph, offset
            ),
        }
    }
}
