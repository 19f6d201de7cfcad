//! Error type shared by the shell encodings and the file parsers.

use std::error::Error;
use std::fmt;
use std::io;

/// Failures raised by the core `qbasis` operations.
///
/// Every variant is surfaced to the caller: lookups in the closed tables are never recovered
/// locally, indices are never clamped, and a malformed line aborts the parse of the whole stream.
#[derive(Debug)]
pub enum BasisSetError {
    /// An angular-momentum letter code that is not one of the recognised codes.
    UnknownCode(String),

    /// An angular-momentum integer code outside $`[-5, 21]`$.
    UnknownCodeInt(i32),

    /// An element symbol that is not in the periodic table.
    UnknownElement(String),

    /// An atomic number that is not in the periodic table.
    UnknownAtomicNumber(u32),

    /// Shell data whose counts are inconsistent with one another (*e.g.* a coefficient block
    /// whose size is not the number of contractions times the number of primitives).
    InvalidShell(String),

    /// A caller-supplied index outside the valid range `[0, bound)`.
    IndexOutOfRange {
        /// What was being indexed.
        what: &'static str,

        /// The offending index.
        index: usize,

        /// The exclusive upper bound of valid indices.
        bound: usize,
    },

    /// A line that was classified as parseable but from which the expected fields could not be
    /// extracted.
    MalformedLine {
        /// One-based position of the line in the stream.
        line_number: usize,

        /// The content of the offending line.
        line: String,

        /// What went wrong.
        reason: String,
    },

    /// The underlying stream could not be read.
    Io(io::Error),
}

impl BasisSetError {
    /// Attaches a line position and content to an error raised while extracting fields from it.
    ///
    /// Lookup failures are wrapped into [`BasisSetError::MalformedLine`] so that the offending
    /// line is reported; errors that already carry a position are returned unchanged.
    pub(crate) fn at_line(self, line_number: usize, line: &str) -> Self {
        match self {
            Self::MalformedLine { .. } | Self::Io(_) => self,
            other => Self::MalformedLine {
                line_number,
                line: line.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for BasisSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCode(code) => {
                write!(f, "Unknown angular-momentum code `{code}`.")
            }
            Self::UnknownCodeInt(code) => {
                write!(f, "Unknown angular-momentum integer code {code}.")
            }
            Self::UnknownElement(symbol) => write!(f, "Unknown element symbol `{symbol}`."),
            Self::UnknownAtomicNumber(z) => write!(f, "Unknown atomic number {z}."),
            Self::InvalidShell(reason) => write!(f, "Invalid shell data: {reason}"),
            Self::IndexOutOfRange { what, index, bound } => {
                write!(f, "{what} index {index} is out of range [0, {bound}).")
            }
            Self::MalformedLine {
                line_number,
                line,
                reason,
            } => write!(f, "Malformed line {line_number} `{}`: {reason}", line.trim()),
            Self::Io(err) => write!(f, "Unable to read stream: {err}"),
        }
    }
}

impl Error for BasisSetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BasisSetError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
