use std::collections::BTreeMap;
use std::fmt;

use anyhow::{self, bail, ensure, format_err};
use derive_builder::Builder;
use indexmap::IndexMap;
use itertools::Itertools;
use log;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::angmom::angmom_to_str;
use crate::auxiliary::molecule::Molecule;
use crate::basis::shell::BasisShell;
use crate::basis::shell_set::ShellSet;
use crate::drivers::QBasisDriver;
use crate::io::format::{
    log_subtitle, log_title, nice_bool, qbasis_output, qbasis_warn, write_subtitle, QBasisOutput,
};
use crate::io::{write_qbasis_binary, QBasisFileType};


/// Shells per atomic number, as read from one basis-set library.
pub type BasisLibrary = BTreeMap<u32, Vec<BasisShell>>;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_true() -> bool {
    true
}

/// A structure containing control parameters for basis-set assembly.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct BasisAssemblyParams {
    /// The name of the basis set whose shells are gathered into the final shell set.
    #[builder(setter(into))]
    pub basis_name: String,

    /// Boolean indicating if general contractions are to be split into single-momentum shells.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub ungeneralise: bool,

    /// Optional name for saving the assembled shell set as a binary file of type
    /// [`QBasisFileType::Shl`], and the molecule carrying its basis sets as a binary file of
    /// type [`QBasisFileType::Mol`]. If `None`, nothing will be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<String>,
}

impl BasisAssemblyParams {
    /// Returns a builder to construct a [`BasisAssemblyParams`] structure.
    pub fn builder() -> BasisAssemblyParamsBuilder {
        BasisAssemblyParamsBuilder::default()
    }
}

impl Default for BasisAssemblyParams {
    fn default() -> Self {
        Self {
            basis_name: "PRIMARY".to_string(),
            ungeneralise: true,
            result_save_name: None,
        }
    }
}

impl fmt::Display for BasisAssemblyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basis set assembled: {}", self.basis_name)?;
        writeln!(
            f,
            "Split general contractions: {}",
            nice_bool(self.ungeneralise)
        )?;
        if let Some(name) = self.result_save_name.as_ref() {
            writeln!(
                f,
                "Results saved as: {name}.{{{}, {}}}",
                QBasisFileType::Shl.ext(),
                QBasisFileType::Mol.ext()
            )?;
        }
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain basis-set assembly results.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct BasisAssemblyResult {
    /// The control parameters used to obtain this set of results.
    parameters: BasisAssemblyParams,

    /// The molecule with every library attached to its atoms under the library's name.
    molecule: Molecule,

    /// The assembled shell set.
    shell_set: ShellSet,

    /// Indices of ordinary or ghost atoms that received no shells of the assembled basis set.
    bare_atoms: Vec<usize>,
}

impl BasisAssemblyResult {
    /// Returns a builder to construct a [`BasisAssemblyResult`] structure.
    fn builder() -> BasisAssemblyResultBuilder {
        BasisAssemblyResultBuilder::default()
    }

    /// Returns the molecule with the libraries attached to its atoms.
    pub fn molecule(&self) -> &Molecule {
        &self.molecule
    }

    /// Returns the assembled shell set.
    pub fn shell_set(&self) -> &ShellSet {
        &self.shell_set
    }

    /// Returns the indices of atoms that should have, but did not, receive shells.
    pub fn bare_atoms(&self) -> &[usize] {
        &self.bare_atoms
    }
}

impl fmt::Display for BasisAssemblyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, "Assembled shell set")?;
        writeln!(f)?;
        let max_am = self
            .shell_set
            .max_angular_momentum()
            .map(|l| {
                l.to_i32()
                    .and_then(|l| angmom_to_str(l).ok())
                    .map(|letter| format!("{l} ({letter})"))
                    .unwrap_or_else(|| l.to_string())
            })
            .unwrap_or_else(|| "--".to_string());
        writeln!(f, "Number of centres       : {}", self.molecule.len())?;
        writeln!(f, "Number of shells        : {}", self.shell_set.n_shells())?;
        writeln!(f, "Number of primitives    : {}", self.shell_set.n_primitives())?;
        writeln!(f, "Number of functions     : {}", self.shell_set.size())?;
        writeln!(f, "Max. angular momentum   : {max_am}")?;
        if !self.bare_atoms.is_empty() {
            writeln!(
                f,
                "Centres without shells  : {}",
                self.bare_atoms.iter().map(|i| i.to_string()).join(", ")
            )?;
        }
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for basis-set assembly.
///
/// Every library is attached to the atoms of the molecule under its own name, after which the
/// shells of [`BasisAssemblyParams::basis_name`] are gathered atom by atom into one
/// [`ShellSet`].
#[derive(Clone, Builder)]
pub struct BasisAssemblyDriver<'a> {
    /// The control parameters for basis-set assembly.
    parameters: &'a BasisAssemblyParams,

    /// The molecule on whose atoms the basis sets are placed.
    molecule: &'a Molecule,

    /// Basis-set libraries keyed by the name under which they are attached.
    libraries: &'a IndexMap<String, BasisLibrary>,

    /// The result of the basis-set assembly.
    #[builder(setter(skip), default = "None")]
    result: Option<BasisAssemblyResult>,
}

impl<'a> BasisAssemblyDriver<'a> {
    /// Returns a builder to construct a [`BasisAssemblyDriver`] structure.
    pub fn builder() -> BasisAssemblyDriverBuilder<'a> {
        BasisAssemblyDriverBuilder::default()
    }

    /// Executes basis-set assembly.
    fn assemble_basis(&mut self) -> Result<(), anyhow::Error> {
        log_title("Basis-Set Assembly");
        qbasis_output!("");
        let params = self.parameters;
        params.log_output_display();

        ensure!(
            !self.molecule.is_empty(),
            "The molecule contains no centres."
        );
        if !self.libraries.contains_key(&params.basis_name) {
            bail!(
                "Basis set `{}` is not among the libraries read in ({}).",
                params.basis_name,
                self.libraries.keys().join(", ")
            );
        }

        qbasis_output!("Molecule:");
        self.molecule.log_output_display();
        qbasis_output!("");

        let mut mol = self.molecule.clone();
        for (name, library) in self.libraries.iter() {
            log::debug!("Attaching basis set `{name}` ({} elements).", library.len());
            mol = mol.apply_basis_set(name, library);
        }

        let bare_atoms = mol
            .iter()
            .enumerate()
            .filter(|(_, atom)| {
                (atom.is_real() || atom.is_ghost())
                    && atom.basis_shells(&params.basis_name).is_none()
            })
            .map(|(i, _)| i)
            .collect_vec();
        for i in bare_atoms.iter() {
            let atom = mol
                .get(*i)
                .ok_or_else(|| format_err!("Atom index {i} out of range."))?;
            qbasis_warn!(
                "Centre {i} ({}) has no shells in basis set `{}`.",
                atom.atomic_symbol,
                params.basis_name
            );
        }

        log_subtitle("Shells per centre");
        qbasis_output!("");
        qbasis_output!("{:>5} {:>8} {:>8} {:>10}", "#", "Centre", "Shells", "Functions");
        for (i, atom) in mol.iter().enumerate() {
            let atom_set = atom.get_basis(&params.basis_name);
            qbasis_output!(
                "{:>5} {:>8} {:>8} {:>10}",
                i,
                atom.atomic_symbol,
                atom_set.n_shells(),
                atom_set.size()
            );
        }
        qbasis_output!("");

        let shell_set = if params.ungeneralise {
            mol.get_basis(&params.basis_name)
        } else {
            mol.get_general_basis(&params.basis_name)
        };

        self.result = BasisAssemblyResult::builder()
            .parameters(params.clone())
            .molecule(mol)
            .shell_set(shell_set)
            .bare_atoms(bare_atoms)
            .build()
            .ok();

        // Save basis-set assembly result, if requested
        if let Some(res) = self.result.as_ref() {
            res.log_output_display();
            qbasis_output!("");
            if let Some(name) = params.result_save_name.as_ref() {
                write_qbasis_binary(name, QBasisFileType::Shl, &res.shell_set)?;
                write_qbasis_binary(name, QBasisFileType::Mol, &res.molecule)?;
                qbasis_output!(
                    "Assembled shell set saved as {name}.{}.",
                    QBasisFileType::Shl.ext()
                );
                qbasis_output!(
                    "Molecule with basis sets saved as {name}.{}.",
                    QBasisFileType::Mol.ext()
                );
                qbasis_output!("");
            }
        }

        Ok(())
    }
}

impl QBasisDriver for BasisAssemblyDriver<'_> {
    type Params = BasisAssemblyParams;

    type Outcome = BasisAssemblyResult;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No basis-set assembly results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.assemble_basis()
    }
}
