//! Line-oriented parsing of basis-set libraries and molecular geometries.
//!
//! Every supported file format is described by a pair of operations applied to one line at a
//! time:
//!
//! 1. *classification*, which decides whether a line is ignorable or what kind of record it
//!    opens or continues, and
//! 2. *extraction*, which pulls the typed fields out of a line deemed worth parsing.
//!
//! A format-independent assembler drives these two operations over a stream and groups the
//! extracted fields into atoms and shells. Adding a format therefore only requires
//! implementing [`basis_file::BasisFileFormat`] or [`geometry_file::GeometryFileFormat`].

pub mod basis_file;
pub mod geometry_file;

use crate::error::BasisSetError;

/// Parses a real number, accepting the Fortran `D` exponent marker.
///
/// # Errors
///
/// Errors with a description of the offending token if it is not a real number.
pub(crate) fn parse_real(token: &str) -> Result<f64, String> {
    token
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|err| format!("`{token}` is not a real number ({err})"))
}

/// Returns `true` if the token can be read as a real number.
pub(crate) fn is_real(token: &str) -> bool {
    parse_real(token).is_ok()
}

/// Places an extraction error at the line it was raised on.
pub(crate) fn relocate(err: BasisSetError, line_number: usize, line: &str) -> BasisSetError {
    match err {
        BasisSetError::MalformedLine { reason, .. } => BasisSetError::MalformedLine {
            line_number,
            line: line.to_string(),
            reason,
        },
        other => other.at_line(line_number, line),
    }
}
