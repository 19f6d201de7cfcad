//! Parsing of basis-set library files.
//!
//! Basis-set libraries all share the same coarse layout:
//!
//! ```text
//! Header (comments and other information)
//!
//! Start of an element
//! Shell 1
//! Shell 2
//! ...
//! Start of the next element
//! Shell 1
//! ...
//!
//! Footer
//! ```
//!
//! [`parse_basis_set_file`] walks over such a file line by line, asking a [`BasisFileFormat`]
//! what each line means and what it contains, and groups the primitives it is given into
//! [`BasisShell`]s keyed by atomic number.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use log;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::angmom::{angmom_to_int, n_components};
use crate::auxiliary::atom::ElementMap;
use crate::basis::shell::{BasisShell, ShellType};
use crate::error::BasisSetError;
use crate::io::parsing::{parse_real, relocate};

#[cfg(test)]
#[path = "basis_file_tests.rs"]
mod basis_file_tests;

// =================
// Trait definitions
// =================

/// An enumerated type for the meaning of a line in a basis-set library file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasisFileAction {
    /// The line carries nothing of interest (blank line, comment, header or footer).
    Skip,

    /// The line opens the block of a new element.
    NewAtom,

    /// The line opens a new shell of the current element.
    NewShell,

    /// The line carries one primitive of the current shell.
    SameShell,

    /// The line closes the block of the current element.
    EndAtom,
}

/// Typed fields extracted from a line of a basis-set library file.
#[derive(Clone, Debug, PartialEq)]
pub enum BasisDatum {
    /// The element whose shells follow.
    Element {
        /// The atomic number of the element.
        atomic_number: u32,
    },

    /// The header of a shell.
    ShellHeader {
        /// The angular-momentum code of the shell.
        l: i32,

        /// The declared number of primitives. This is informative only.
        nprim: usize,

        /// The scale factor whose square multiplies every exponent of the shell.
        scale: f64,
    },

    /// One primitive of the current shell.
    Primitive {
        /// The exponent of the primitive.
        alpha: f64,

        /// The weights of the primitive, one per contraction, in contraction order.
        coefs: Vec<f64>,
    },

    /// The line carries no data.
    Empty,
}

/// A trait describing the layout of one basis-set library format.
pub trait BasisFileFormat {
    /// The type of the shells produced from this format.
    fn shell_type(&self) -> ShellType;

    /// Classifies a line. This must not fail: a line that cannot be understood is
    /// [`BasisFileAction::Skip`].
    fn classify(&self, line: &str) -> BasisFileAction;

    /// Extracts the fields of a line that has been classified as `action`.
    ///
    /// # Errors
    ///
    /// Errors if the fields cannot be extracted from the line.
    fn extract(&self, line: &str, action: BasisFileAction) -> Result<BasisDatum, BasisSetError>;
}

// ==========
// Gaussian94
// ==========

lazy_static! {
    static ref G94_ELEMENT_RE: Regex =
        Regex::new(r"^\s*([A-Za-z]{1,3})\s+0+\s*$").expect("Regex pattern invalid.");
    static ref G94_SHELL_RE: Regex =
        Regex::new(r"^\s*([A-Za-z]+)\s+(\d+)\s+(\S+)\s*$").expect("Regex pattern invalid.");
    static ref G94_PRIMITIVE_RE: Regex =
        Regex::new(r"^\s*[-+]?(\d|\.\d)").expect("Regex pattern invalid.");
    static ref G94_END_RE: Regex = Regex::new(r"^\s*\*{4}\s*$").expect("Regex pattern invalid.");
}

/// The Gaussian94 basis-set library format.
///
/// * An element block opens with `<Symbol> 0` and closes with `****`.
/// * A shell opens with `<Letters> <nprim> <scale>`, *e.g.* `SP 3 1.00`.
/// * Every following numeric line holds one exponent and one coefficient per contraction, in the
///   order of the letters of the shell.
/// * Lines starting with `!` are comments.
pub struct G94 {
    /// The type of the shells produced. Gaussian94 files do not record this themselves.
    shell_type: ShellType,

    /// The element look-up used to resolve element symbols.
    emap: ElementMap<'static>,
}

impl G94 {
    /// Creates a Gaussian94 format producing shells of the given type.
    #[must_use]
    pub fn new(shell_type: ShellType) -> Self {
        Self {
            shell_type,
            emap: ElementMap::new(),
        }
    }
}

impl Default for G94 {
    /// Gaussian94 libraries are conventionally used with spherical Gaussians.
    fn default() -> Self {
        Self::new(ShellType::SphericalGaussian)
    }
}

impl BasisFileFormat for G94 {
    fn shell_type(&self) -> ShellType {
        self.shell_type
    }

    fn classify(&self, line: &str) -> BasisFileAction {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            BasisFileAction::Skip
        } else if G94_END_RE.is_match(line) {
            BasisFileAction::EndAtom
        } else if G94_ELEMENT_RE.is_match(line) {
            BasisFileAction::NewAtom
        } else if G94_SHELL_RE.is_match(line) {
            // Unknown letters are rejected on extraction so that the primitives that follow are
            // never folded into the previous shell.
            BasisFileAction::NewShell
        } else if G94_PRIMITIVE_RE.is_match(line) {
            BasisFileAction::SameShell
        } else {
            BasisFileAction::Skip
        }
    }

    fn extract(&self, line: &str, action: BasisFileAction) -> Result<BasisDatum, BasisSetError> {
        let malformed = |reason: String| BasisSetError::MalformedLine {
            line_number: 0,
            line: line.to_string(),
            reason,
        };
        match action {
            BasisFileAction::NewAtom => {
                let caps = G94_ELEMENT_RE
                    .captures(line)
                    .ok_or_else(|| malformed("expected `<Symbol> 0`".to_string()))?;
                let atomic_number = self.emap.lookup_atomic_number(&caps[1])?;
                Ok(BasisDatum::Element { atomic_number })
            }
            BasisFileAction::NewShell => {
                let caps = G94_SHELL_RE
                    .captures(line)
                    .ok_or_else(|| malformed("expected `<Letters> <nprim> <scale>`".to_string()))?;
                let l = angmom_to_int(&caps[1].to_lowercase())?;
                let nprim = caps[2]
                    .parse::<usize>()
                    .map_err(|err| malformed(format!("invalid primitive count ({err})")))?;
                let scale = parse_real(&caps[3]).map_err(malformed)?;
                Ok(BasisDatum::ShellHeader { l, nprim, scale })
            }
            BasisFileAction::SameShell => {
                let mut fields = line
                    .split_whitespace()
                    .map(parse_real)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(malformed)?
                    .into_iter();
                let alpha = fields
                    .next()
                    .ok_or_else(|| malformed("missing exponent".to_string()))?;
                let coefs = fields.collect::<Vec<_>>();
                if coefs.is_empty() {
                    return Err(malformed("missing contraction coefficients".to_string()));
                }
                Ok(BasisDatum::Primitive { alpha, coefs })
            }
            BasisFileAction::Skip | BasisFileAction::EndAtom => Ok(BasisDatum::Empty),
        }
    }
}

// =========
// Assembler
// =========

/// A shell being accumulated from consecutive primitive lines.
struct OpenShell {
    /// Position and content of the header line, for error reporting.
    header: (usize, String),
    l: i32,
    declared_nprim: usize,
    scale: f64,
    alphas: Vec<f64>,

    /// Coefficients per contraction. Empty until the first primitive fixes the count.
    columns: Vec<Vec<f64>>,
}

impl OpenShell {
    fn push(&mut self, alpha: f64, coefs: Vec<f64>) -> Result<(), String> {
        if self.columns.is_empty() {
            self.columns = vec![Vec::new(); coefs.len()];
        } else if coefs.len() != self.columns.len() {
            return Err(format!(
                "expected {} contraction coefficient(s), found {}",
                self.columns.len(),
                coefs.len()
            ));
        }
        self.alphas.push(alpha * self.scale * self.scale);
        self.columns
            .iter_mut()
            .zip(coefs)
            .for_each(|(column, coef)| column.push(coef));
        Ok(())
    }

    fn close(self, shell_type: ShellType) -> Result<BasisShell, BasisSetError> {
        let (line_number, line) = self.header;
        if self.alphas.len() != self.declared_nprim {
            log::warn!(
                "Shell opened at line {line_number} declares {} primitive(s) but has {}.",
                self.declared_nprim,
                self.alphas.len()
            );
        }
        let ngen = if self.columns.is_empty() {
            if self.l < 0 {
                n_components(self.l).map_err(|err| err.at_line(line_number, &line))?
            } else {
                1
            }
        } else {
            self.columns.len()
        };
        let coefs = self.columns.concat();
        BasisShell::new(shell_type, self.l, ngen, self.alphas, coefs)
            .map_err(|err| err.at_line(line_number, &line))
    }
}

/// Reads a basis-set library from a stream.
///
/// # Arguments
///
/// * `reader` - The stream to read.
/// * `format` - The layout of the library.
///
/// # Returns
///
/// The shells of every element in the library, keyed by atomic number, in file order. Blocks
/// repeated for the same element are merged in file order.
///
/// # Errors
///
/// Errors if the stream cannot be read, or if any line worth parsing is malformed, in which case
/// parsing stops at that line.
pub fn parse_basis_set_file<R, F>(
    reader: R,
    format: &F,
) -> Result<BTreeMap<u32, Vec<BasisShell>>, BasisSetError>
where
    R: BufRead,
    F: BasisFileFormat + ?Sized,
{
    let shell_type = format.shell_type();
    let mut shells: BTreeMap<u32, Vec<BasisShell>> = BTreeMap::new();
    let mut current_z: Option<u32> = None;
    let mut open_shell: Option<OpenShell> = None;

    // Closes the open shell, if any, and files it under the current element.
    let mut flush = |current_z: Option<u32>,
                     open_shell: &mut Option<OpenShell>|
     -> Result<(), BasisSetError> {
        if let Some(shell) = open_shell.take() {
            // A shell is only ever opened under an element.
            let z = current_z.ok_or_else(|| BasisSetError::MalformedLine {
                line_number: shell.header.0,
                line: shell.header.1.clone(),
                reason: "shell outside of an element block".to_string(),
            })?;
            let shell = shell.close(shell_type)?;
            log::debug!("Completed shell for Z = {z}: {shell}");
            shells.entry(z).or_default().push(shell);
        }
        Ok(())
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let action = format.classify(&line);
        if action == BasisFileAction::Skip {
            continue;
        }
        let datum = format
            .extract(&line, action)
            .map_err(|err| relocate(err, line_number, &line))?;
        let malformed = |reason: &str| BasisSetError::MalformedLine {
            line_number,
            line: line.clone(),
            reason: reason.to_string(),
        };

        match (action, datum) {
            (BasisFileAction::NewAtom, BasisDatum::Element { atomic_number }) => {
                flush(current_z, &mut open_shell)?;
                log::debug!("New element block at line {line_number}: Z = {atomic_number}.");
                current_z = Some(atomic_number);
            }
            (BasisFileAction::NewShell, BasisDatum::ShellHeader { l, nprim, scale }) => {
                flush(current_z, &mut open_shell)?;
                if current_z.is_none() {
                    return Err(malformed("shell outside of an element block"));
                }
                open_shell = Some(OpenShell {
                    header: (line_number, line.clone()),
                    l,
                    declared_nprim: nprim,
                    scale,
                    alphas: Vec::with_capacity(nprim),
                    columns: Vec::new(),
                });
            }
            (BasisFileAction::SameShell, BasisDatum::Primitive { alpha, coefs }) => {
                let shell = open_shell
                    .as_mut()
                    .ok_or_else(|| malformed("primitive outside of a shell"))?;
                shell
                    .push(alpha, coefs)
                    .map_err(|reason| malformed(&reason))?;
            }
            (BasisFileAction::EndAtom, _) => {
                flush(current_z, &mut open_shell)?;
                current_z = None;
            }
            (action, datum) => {
                return Err(malformed(&format!(
                    "line classified as {action:?} yielded {datum:?}"
                )));
            }
        }
    }
    flush(current_z, &mut open_shell)?;
    Ok(shells)
}

/// Reads a basis-set library file.
///
/// # Errors
///
/// Errors if the file cannot be opened or parsed.
pub fn read_basis_set_file<P, F>(
    path: P,
    format: &F,
) -> Result<BTreeMap<u32, Vec<BasisShell>>, BasisSetError>
where
    P: AsRef<Path>,
    F: BasisFileFormat + ?Sized,
{
    let reader = BufReader::new(File::open(path)?);
    parse_basis_set_file(reader, format)
}

/// The basis-set library formats that can be named in an input file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisFileFormatKind {
    /// The Gaussian94 format.
    #[default]
    G94,
}

impl BasisFileFormatKind {
    /// Builds the format that parses files of this kind into shells of type `shell_type`.
    pub fn format(&self, shell_type: ShellType) -> Box<dyn BasisFileFormat> {
        match self {
            Self::G94 => Box::new(G94::new(shell_type)),
        }
    }
}
