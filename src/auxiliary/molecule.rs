//! Molecules as ordered sets of atoms with a total charge and spin multiplicity.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use log;
use serde::{Deserialize, Serialize};

use crate::auxiliary::atom::Atom;
use crate::basis::shell::BasisShell;
use crate::basis::shell_set::ShellSet;

#[cfg(test)]
#[path = "molecule_tests.rs"]
mod molecule_tests;

/// A struct containing the atoms constituting a molecule.
///
/// Atoms keep their insertion order. Inserting an atom equal to one already present has no
/// effect.
#[derive(Clone, Serialize, Deserialize)]
pub struct Molecule {
    /// The atoms in this molecule, in insertion order.
    atoms: Vec<Atom>,

    /// The total charge of the molecule.
    pub charge: f64,

    /// The spin multiplicity of the molecule.
    pub multiplicity: f64,
}

impl Default for Molecule {
    fn default() -> Self {
        Self {
            atoms: Vec::new(),
            charge: 0.0,
            multiplicity: 1.0,
        }
    }
}

impl Molecule {
    /// Creates an empty, neutral singlet molecule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a molecule from an iterator of atoms, dropping repeated atoms.
    pub fn from_atoms<I: IntoIterator<Item = Atom>>(atoms: I) -> Self {
        let mut mol = Self::new();
        for atom in atoms {
            mol.insert(atom);
        }
        mol
    }

    /// Inserts an atom if no equal atom is present.
    ///
    /// # Returns
    ///
    /// `true` if the atom was inserted.
    pub fn insert(&mut self, atom: Atom) -> bool {
        if self.contains(&atom) {
            log::debug!("Atom {atom} already present in molecule; ignored.");
            false
        } else {
            self.atoms.push(atom);
            true
        }
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.iter().any(|a| a == atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Atom> {
        self.atoms.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> + '_ {
        self.atoms.iter()
    }

    /// Returns the number of electrons carried by all centres, corrected by the total charge.
    pub fn n_electrons(&self) -> f64 {
        self.atoms.iter().map(|atom| atom.nelectrons).sum::<f64>() - self.charge
    }

    /// Returns a copy of this molecule in which every atom has been given the shells that
    /// `basis` lists for its atomic number under the name `basis_name`.
    ///
    /// Atoms whose atomic number is absent from `basis` are copied unchanged.
    ///
    /// # Arguments
    ///
    /// * `basis_name` - The name under which the shells are stored on each atom.
    /// * `basis` - Shells per atomic number, as produced by the basis-file parser.
    #[must_use]
    pub fn apply_basis_set(
        &self,
        basis_name: &str,
        basis: &BTreeMap<u32, Vec<BasisShell>>,
    ) -> Molecule {
        let mut mol = self.clone();
        for atom in mol.atoms.iter_mut() {
            match basis.get(&atom.atomic_number) {
                Some(shells) => {
                    for shell in shells {
                        atom.add_shell(basis_name, shell.clone());
                    }
                }
                None => {
                    if atom.is_real() || atom.is_ghost() {
                        log::warn!(
                            "No `{basis_name}` shells for element {} (Z = {}).",
                            atom.atomic_symbol,
                            atom.atomic_number
                        );
                    }
                }
            }
        }
        mol
    }

    /// Returns the concatenation, in atom order, of the named basis set on every atom, keeping
    /// general contractions.
    pub fn get_general_basis(&self, basis_name: &str) -> ShellSet {
        let mut shell_set = ShellSet::new();
        for atom in self.atoms.iter() {
            shell_set.concatenate(&atom.get_basis(basis_name));
        }
        shell_set
    }

    /// Returns the concatenation, in atom order, of the named basis set on every atom with all
    /// general contractions split into single-momentum shells.
    pub fn get_basis(&self, basis_name: &str) -> ShellSet {
        let mut shell_set = ShellSet::new();
        for atom in self.atoms.iter() {
            shell_set.concatenate(&atom.get_basis(basis_name).ungeneralise());
        }
        shell_set
    }
}

impl PartialEq for Molecule {
    fn eq(&self, other: &Self) -> bool {
        self.charge == other.charge
            && self.multiplicity == other.multiplicity
            && self.atoms == other.atoms
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Molecule")?;
        writeln!(
            f,
            "  Charge: {:+}, multiplicity: {}",
            self.charge, self.multiplicity
        )?;
        writeln!(f, "  Centres:")?;
        writeln!(
            f,
            "{}",
            self.atoms.iter().map(|atom| format!("    {atom}")).join("\n")
        )
    }
}

impl fmt::Debug for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
