//! YAML input handling for the `qbasis` binary.

use std::path::PathBuf;

use anyhow::{self, ensure, format_err, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::auxiliary::molecule::Molecule;
use crate::basis::shell::ShellType;
use crate::drivers::basis_assembly::{
    BasisAssemblyDriver, BasisAssemblyParams, BasisAssemblyResult, BasisLibrary,
};
use crate::drivers::QBasisDriver;
use crate::interfaces::InputHandle;
use crate::io::format::{log_macsec_begin, log_macsec_end, qbasis_error, qbasis_output};
use crate::io::parsing::basis_file::{read_basis_set_file, BasisFileFormatKind};
use crate::io::parsing::geometry_file::{read_molecule_file, GeometryFileFormatKind};

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;

/// A structure specifying where and how to read the molecular geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoleculeSource {
    /// Path to the geometry file.
    pub path: PathBuf,

    /// Format of the geometry file.
    #[serde(default)]
    pub format: GeometryFileFormatKind,
}

impl MoleculeSource {
    /// Reads the molecule.
    pub fn read(&self) -> Result<Molecule, anyhow::Error> {
        let format = self.format.format();
        read_molecule_file(&self.path, format.as_ref())
            .with_context(|| format!("Unable to read molecule from `{}`", self.path.display()))
    }
}

/// A structure specifying one basis-set library to read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BasisSetSource {
    /// The name under which the library is attached to atoms.
    pub name: String,

    /// Path to the library file.
    pub path: PathBuf,

    /// Format of the library file.
    #[serde(default)]
    pub format: BasisFileFormatKind,

    /// Type of the shells produced from the library.
    #[serde(default)]
    pub shell_type: ShellType,
}

impl BasisSetSource {
    /// Reads the library.
    pub fn read(&self) -> Result<BasisLibrary, anyhow::Error> {
        let format = self.format.format(self.shell_type);
        read_basis_set_file(&self.path, format.as_ref()).with_context(|| {
            format!(
                "Unable to read basis set `{}` from `{}`",
                self.name,
                self.path.display()
            )
        })
    }
}

/// A structure containing `QBasis` input parameters which can be serialised into and
/// deserialised from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// Specification of the molecule.
    pub molecule: MoleculeSource,

    /// Specifications of the basis-set libraries. Names must be unique.
    pub basis_sets: Vec<BasisSetSource>,

    /// Parameters for basis-set assembly.
    ///
    /// # Default
    ///
    /// If not specified, the `PRIMARY` basis set is assembled with general contractions split.
    #[serde(default)]
    pub basis_assembly: BasisAssemblyParams,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            molecule: MoleculeSource {
                path: PathBuf::from("molecule.xyz"),
                format: GeometryFileFormatKind::XyzBohr,
            },
            basis_sets: vec![BasisSetSource {
                name: "PRIMARY".to_string(),
                path: PathBuf::from("basis.gbs"),
                format: BasisFileFormatKind::G94,
                shell_type: ShellType::SphericalGaussian,
            }],
            basis_assembly: BasisAssemblyParams::default(),
        }
    }
}

impl Input {
    /// Reads the molecule and all libraries, then assembles the requested basis set.
    pub fn assemble(&self) -> Result<BasisAssemblyResult, anyhow::Error> {
        log_macsec_begin("Input reading");
        qbasis_output!("");
        let mol = self.molecule.read()?;
        qbasis_output!(
            "Molecule read from {} ({} centres).",
            self.molecule.path.display(),
            mol.len()
        );

        let mut libraries: IndexMap<String, BasisLibrary> = IndexMap::new();
        for source in self.basis_sets.iter() {
            ensure!(
                !libraries.contains_key(&source.name),
                "Basis set name `{}` is given more than once.",
                source.name
            );
            let library = source.read()?;
            qbasis_output!(
                "Basis set `{}` read from {} ({} elements, {} shells).",
                source.name,
                source.path.display(),
                library.len(),
                library.values().map(Vec::len).sum::<usize>()
            );
            libraries.insert(source.name.clone(), library);
        }
        qbasis_output!("");
        log_macsec_end("Input reading");
        qbasis_output!("");

        let mut driver = BasisAssemblyDriver::builder()
            .parameters(&self.basis_assembly)
            .molecule(&mol)
            .libraries(&libraries)
            .build()
            .map_err(|err| format_err!(err))?;
        driver.run()?;
        driver.result().cloned()
    }
}

impl InputHandle for Input {
    fn handle(&self) -> Result<(), anyhow::Error> {
        match self.assemble() {
            Ok(_) => Ok(()),
            Err(err) => {
                qbasis_error!("{err:#}");
                Err(err)
            }
        }
    }
}
