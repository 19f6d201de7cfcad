//! Parsing of molecular geometry files.
//!
//! As for basis-set libraries, parsing happens in two phases. A [`GeometryFileFormat`] first
//! classifies each line as ignorable, as the start of a new atom, as more data for the current
//! atom, or as data about the whole system. Classification may depend on the kind of the last
//! line that was not skipped, so that a format can tell its header from its body. Lines worth
//! parsing are then handed back to the format to extract their fields, which
//! [`parse_molecule_file`] gathers into a [`Molecule`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub use crate::auxiliary::atom::ANGSTROM_TO_BOHR;

use crate::auxiliary::atom::{Atom, ElementMap};
use crate::auxiliary::molecule::Molecule;
use crate::error::BasisSetError;
use crate::io::parsing::{is_real, parse_real, relocate};

#[cfg(test)]
#[path = "geometry_file_tests.rs"]
mod geometry_file_tests;


// =================
// Trait definitions
// =================

/// An enumerated type for the meaning of a line in a geometry file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryFileAction {
    /// The line carries nothing of interest.
    Skip,

    /// The line starts a new atom.
    NewAtom,

    /// The line carries more data for the current atom.
    SameAtom,

    /// The line carries data about the whole system.
    SystemScope,
}

/// Typed fields extracted from a line of a geometry file.
///
/// Every field is optional: a format fills in whatever a line provides, and the assembler
/// merges the fields of all lines belonging to the same atom.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryDatum {
    /// The atomic number of the atom.
    pub atomic_number: Option<u32>,

    /// The position of the atom, in the length unit the atoms are to be stored in.
    pub coordinates: Option<Point3<f64>>,

    /// The total charge of the system.
    pub charge: Option<f64>,

    /// The spin multiplicity of the system.
    pub multiplicity: Option<f64>,
}

/// A trait describing the layout of one geometry file format.
pub trait GeometryFileFormat {
    /// Classifies a line. This must not fail: a line that cannot be understood is either
    /// [`GeometryFileAction::Skip`] or left to [`Self::extract`] to reject.
    ///
    /// # Arguments
    ///
    /// * `line` - The line to classify.
    /// * `previous` - The kind of the last line that was not skipped, or `None` if every line so
    ///     far has been skipped.
    fn classify(&self, line: &str, previous: Option<GeometryFileAction>) -> GeometryFileAction;

    /// Extracts the fields of a line that has been classified as `action`.
    ///
    /// # Errors
    ///
    /// Errors if the fields cannot be extracted from the line.
    fn extract(
        &self,
        line: &str,
        action: GeometryFileAction,
    ) -> Result<GeometryDatum, BasisSetError>;

    /// The element look-up used to complete atoms.
    fn element_map(&self) -> &ElementMap<'static>;
}

// ===
// XYZ
// ===

/// The XYZ-like geometry format.
///
/// * Blank lines are ignored everywhere.
/// * Before the first record, a line of two numbers gives the total charge and the spin
///   multiplicity, and a line `<Symbol or Z> <x> <y> <z>` gives the first atom. Any other header
///   line, such as the conventional atom-count and comment lines, is ignored. A header line that
///   starts with an element symbol and carries numbers is taken as an atom, so that a damaged
///   first atom line is reported rather than dropped.
/// * After the first record, every line gives one atom.
///
/// Symbols are matched regardless of case.
///
/// Coordinates are multiplied by a fixed length factor on extraction. [`Xyz::new`] keeps them as
/// written, while [`Xyz::angstrom_to_bohr`] converts Ångström input to bohr.
pub struct Xyz {
    /// The factor applied to every coordinate read.
    length_factor: f64,

    emap: ElementMap<'static>,
}

impl Xyz {
    /// Creates an XYZ format that keeps coordinates as written.
    #[must_use]
    pub fn new() -> Self {
        Self::with_length_factor(1.0)
    }

    /// Creates an XYZ format that reads Ångström coordinates and stores them in bohr.
    #[must_use]
    pub fn angstrom_to_bohr() -> Self {
        Self::with_length_factor(ANGSTROM_TO_BOHR)
    }

    /// Creates an XYZ format that multiplies every coordinate by `length_factor`.
    #[must_use]
    pub fn with_length_factor(length_factor: f64) -> Self {
        Self {
            length_factor,
            emap: ElementMap::new(),
        }
    }

    /// Resolves an element token, either an atomic number or a symbol in any case.
    fn atomic_number(&self, token: &str) -> Result<u32, BasisSetError> {
        match token.parse::<u32>() {
            Ok(z) => self.emap.properties(z).map(|props| props.atomic_number),
            Err(_) => self.emap.lookup_atomic_number(token),
        }
    }
}

impl Default for Xyz {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryFileFormat for Xyz {
    fn classify(&self, line: &str, previous: Option<GeometryFileAction>) -> GeometryFileAction {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            return GeometryFileAction::Skip;
        }
        if previous.is_some() {
            return GeometryFileAction::NewAtom;
        }
        match tokens.as_slice() {
            [charge, multiplicity] if is_real(charge) && is_real(multiplicity) => {
                GeometryFileAction::SystemScope
            }
            [_, x, y, z] if is_real(x) && is_real(y) && is_real(z) => GeometryFileAction::NewAtom,
            [element, rest @ ..]
                if self.emap.lookup_atomic_number(element).is_ok()
                    && rest.iter().any(|token| is_real(token)) =>
            {
                GeometryFileAction::NewAtom
            }
            _ => GeometryFileAction::Skip,
        }
    }

    fn extract(
        &self,
        line: &str,
        action: GeometryFileAction,
    ) -> Result<GeometryDatum, BasisSetError> {
        let malformed = |reason: String| BasisSetError::MalformedLine {
            line_number: 0,
            line: line.to_string(),
            reason,
        };
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        match (action, tokens.as_slice()) {
            (GeometryFileAction::SystemScope, [charge, multiplicity]) => Ok(GeometryDatum {
                charge: Some(parse_real(charge).map_err(malformed)?),
                multiplicity: Some(parse_real(multiplicity).map_err(malformed)?),
                ..GeometryDatum::default()
            }),
            (GeometryFileAction::NewAtom | GeometryFileAction::SameAtom, [element, x, y, z]) => {
                let atomic_number = self.atomic_number(element)?;
                let coordinates = Point3::new(
                    parse_real(x).map_err(malformed)?,
                    parse_real(y).map_err(malformed)?,
                    parse_real(z).map_err(malformed)?,
                ) * self.length_factor;
                Ok(GeometryDatum {
                    atomic_number: Some(atomic_number),
                    coordinates: Some(coordinates),
                    ..GeometryDatum::default()
                })
            }
            (GeometryFileAction::Skip, _) => Ok(GeometryDatum::default()),
            (action, tokens) => Err(malformed(format!(
                "{} field(s) cannot describe a line of kind {action:?}",
                tokens.len()
            ))),
        }
    }

    fn element_map(&self) -> &ElementMap<'static> {
        &self.emap
    }
}

// =========
// Assembler
// =========

/// An atom being accumulated from the lines that describe it.
struct OpenAtom {
    /// Position and content of the line that started the atom, for error reporting.
    start: (usize, String),
    atomic_number: Option<u32>,
    coordinates: Option<Point3<f64>>,
}

impl OpenAtom {
    fn merge(&mut self, datum: &GeometryDatum) {
        if datum.atomic_number.is_some() {
            self.atomic_number = datum.atomic_number;
        }
        if datum.coordinates.is_some() {
            self.coordinates = datum.coordinates;
        }
    }

    fn close(self, emap: &ElementMap) -> Result<Atom, BasisSetError> {
        let (line_number, line) = self.start;
        let malformed = |reason: &str| BasisSetError::MalformedLine {
            line_number,
            line: line.clone(),
            reason: reason.to_string(),
        };
        let z = self
            .atomic_number
            .ok_or_else(|| malformed("atom without an element"))?;
        let coordinates = self
            .coordinates
            .ok_or_else(|| malformed("atom without coordinates"))?;
        Atom::new(z, coordinates, emap).map_err(|err| err.at_line(line_number, &line))
    }
}

/// Reads a molecule from a stream.
///
/// # Arguments
///
/// * `reader` - The stream to read.
/// * `format` - The layout of the geometry.
///
/// # Returns
///
/// The molecule with its atoms in file order. Atoms identical to an earlier one are dropped.
/// The charge and multiplicity default to `0` and `1` if the stream does not give them.
///
/// # Errors
///
/// Errors if the stream cannot be read, or if any line worth parsing is malformed, in which case
/// parsing stops at that line.
pub fn parse_molecule_file<R, F>(reader: R, format: &F) -> Result<Molecule, BasisSetError>
where
    R: BufRead,
    F: GeometryFileFormat + ?Sized,
{
    let emap = format.element_map();
    let mut mol = Molecule::new();
    let mut open_atom: Option<OpenAtom> = None;
    let mut previous: Option<GeometryFileAction> = None;

    let flush = |mol: &mut Molecule, open_atom: &mut Option<OpenAtom>| {
        if let Some(atom) = open_atom.take() {
            let atom = atom.close(emap)?;
            log::debug!("Read {atom}");
            mol.insert(atom);
        }
        Ok::<(), BasisSetError>(())
    };

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let action = format.classify(&line, previous);
        if action == GeometryFileAction::Skip {
            continue;
        }
        previous = Some(action);
        let datum = format
            .extract(&line, action)
            .map_err(|err| relocate(err, line_number, &line))?;

        match action {
            GeometryFileAction::NewAtom => {
                flush(&mut mol, &mut open_atom)?;
                let mut atom = OpenAtom {
                    start: (line_number, line.clone()),
                    atomic_number: None,
                    coordinates: None,
                };
                atom.merge(&datum);
                open_atom = Some(atom);
            }
            GeometryFileAction::SameAtom => {
                open_atom
                    .as_mut()
                    .ok_or_else(|| BasisSetError::MalformedLine {
                        line_number,
                        line: line.clone(),
                        reason: "atom data before any atom".to_string(),
                    })?
                    .merge(&datum);
            }
            GeometryFileAction::SystemScope => {
                if let Some(charge) = datum.charge {
                    mol.charge = charge;
                }
                if let Some(multiplicity) = datum.multiplicity {
                    mol.multiplicity = multiplicity;
                }
            }
            GeometryFileAction::Skip => {}
        }
    }
    flush(&mut mol, &mut open_atom)?;
    Ok(mol)
}

/// Reads a molecule from a geometry file.
///
/// # Errors
///
/// Errors if the file cannot be opened or parsed.
pub fn read_molecule_file<P, F>(path: P, format: &F) -> Result<Molecule, BasisSetError>
where
    P: AsRef<Path>,
    F: GeometryFileFormat + ?Sized,
{
    let reader = BufReader::new(File::open(path)?);
    parse_molecule_file(reader, format)
}

/// The geometry formats that can be named in an input file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryFileFormatKind {
    /// XYZ with coordinates kept as written.
    #[default]
    Xyz,

    /// XYZ with Ångström coordinates converted to bohr.
    XyzBohr,
}

impl GeometryFileFormatKind {
    /// Builds the format that parses files of this kind.
    pub fn format(&self) -> Box<dyn GeometryFileFormat> {
        match self {
            Self::Xyz => Box::new(Xyz::new()),
            Self::XyzBohr => Box::new(Xyz::angstrom_to_bohr()),
        }
    }
}
