//! Atoms and the element look-up used to build them.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use nalgebra::Point3;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::angmom::angmom_to_int;
use crate::basis::shell::BasisShell;
use crate::basis::shell_set::ShellSet;
use crate::error::BasisSetError;

#[cfg(test)]
#[path = "atom_tests.rs"]
mod atom_tests;

/// Number of bohr in one Ångström.
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / 0.529_177_210_903;

// ==========
// ElementMap
// ==========

/// Default properties of an element, taken from the periodic table.
///
/// [`periodic_table`] carries no isotope data, so the isotope number and the isotope mass are
/// not part of this record: [`Self::atomic_mass`] is always the abundance-weighted mass.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementProperties<'a> {
    /// The atomic number.
    pub atomic_number: u32,

    /// The element symbol with its conventional capitalisation.
    pub atomic_symbol: &'a str,

    /// The weighted-average atomic mass for all naturally occuring isotopes.
    pub atomic_mass: f64,

    /// The spin multiplicity of the free atom in its ground-state configuration.
    pub multiplicity: f64,

    /// The covalent radius in bohr, if tabulated.
    pub covalent_radius: Option<f64>,

    /// The van der Waals radius in bohr, if tabulated.
    pub vdw_radius: Option<f64>,
}

/// A struct storing a look-up of element symbols to give atomic numbers and atomic masses, and
/// the reverse look-up from atomic numbers.
pub struct ElementMap<'a> {
    /// A [`HashMap`] from a lowercase symbol string to a tuple of atomic number and atomic mass.
    pub map: HashMap<String, (u32, f64)>,

    /// A [`HashMap`] from an atomic number to the default properties of the element.
    numbers: HashMap<u32, ElementProperties<'a>>,
}

impl Default for ElementMap<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementMap<'static> {
    /// Creates a new [`ElementMap`] for all elements in the periodic table.
    #[must_use]
    pub fn new() -> ElementMap<'static> {
        let mut map = HashMap::new();
        let mut numbers = HashMap::new();
        let elements = periodic_table::periodic_table();
        for element in elements {
            let mass = parse_atomic_mass(element.atomic_mass);
            map.insert(
                element.symbol.to_lowercase(),
                (element.atomic_number, mass),
            );
            numbers.insert(
                element.atomic_number,
                ElementProperties {
                    atomic_number: element.atomic_number,
                    atomic_symbol: element.symbol,
                    atomic_mass: mass,
                    multiplicity: ground_state_multiplicity(element.electronic_configuration),
                    covalent_radius: element.atomic_radius.map(picometre_to_bohr),
                    vdw_radius: element.van_del_waals_radius.map(picometre_to_bohr),
                },
            );
        }
        ElementMap { map, numbers }
    }
}

impl<'a> ElementMap<'a> {
    /// Looks up the atomic number of an element symbol, ignoring case.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisSetError::UnknownElement`] if the symbol is not recognised.
    pub fn lookup_atomic_number(&self, symbol: &str) -> Result<u32, BasisSetError> {
        self.map
            .get(&symbol.to_lowercase())
            .map(|(z, _)| *z)
            .ok_or_else(|| BasisSetError::UnknownElement(symbol.to_string()))
    }

    /// Returns the default properties of the element with atomic number `z`.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisSetError::UnknownAtomicNumber`] if `z` is not in the table.
    pub fn properties(&self, z: u32) -> Result<ElementProperties<'a>, BasisSetError> {
        self.numbers
            .get(&z)
            .cloned()
            .ok_or(BasisSetError::UnknownAtomicNumber(z))
    }
}

/// An auxiliary function that parses the atomic mass string in the format of
/// [`periodic_table`] to a single float value.
///
/// # Arguments
///
/// * `mass_str` - A string of mass value that is either `x.y(z)` where the
///     uncertain digit `z` is enclosed in parentheses, or `[x]` where `x`
///     is the mass number in place of precise experimental values.
///
/// # Returns
///
/// The numeric mass value.
fn parse_atomic_mass(mass_str: &str) -> f64 {
    let mass = mass_str.replace(&['(', ')', '[', ']'][..], "");
    mass.parse::<f64>()
        .unwrap_or_else(|_| panic!("Unable to parse atomic mass string {mass}."))
}

fn picometre_to_bohr(radius: u32) -> f64 {
    f64::from(radius) * 0.01 * ANGSTROM_TO_BOHR
}

/// Estimates the spin multiplicity of a free atom from its electronic configuration in the
/// format of [`periodic_table`], *e.g.* `[He] 2s2 2p4`, by filling every listed subshell
/// according to Hund's rule. Noble-gas cores are closed and contribute nothing.
fn ground_state_multiplicity(configuration: &str) -> f64 {
    let unpaired = configuration
        .split_whitespace()
        .filter(|subshell| !subshell.starts_with('['))
        .filter_map(|subshell| {
            let letter_start = subshell.find(|c: char| c.is_ascii_alphabetic())?;
            let (letter, occupancy) = subshell[letter_start..].split_at(1);
            let norbitals = 2 * angmom_to_int(letter).ok()?.unsigned_abs() + 1;
            let occupancy = occupancy.parse::<u32>().ok()?;
            if occupancy <= norbitals {
                Some(occupancy)
            } else {
                Some((2 * norbitals).saturating_sub(occupancy))
            }
        })
        .sum::<u32>();
    f64::from(unpaired + 1)
}

// ========
// AtomKind
// ========

/// An enum describing the atom kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AtomKind {
    /// An ordinary atom.
    Ordinary,

    /// A ghost atom: it keeps the element identity (and hence can carry that element's basis
    /// functions) but has no nuclear charge, mass or electrons.
    Ghost,

    /// A dummy point with no element identity, used to mark a position.
    Dummy,

    /// A point charge. The associated value is the charge.
    PointCharge(f64),
}

impl fmt::Display for AtomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => write!(f, "Atom"),
            Self::Ghost => write!(f, "GhostAtom"),
            Self::Dummy => write!(f, "DummyAtom"),
            Self::PointCharge(q) => write!(f, "Charge({q:+.3})"),
        }
    }
}

// ====
// Atom
// ====

/// A struct representing an atom, or a ghost, dummy or point-charge centre.
#[derive(Clone, Serialize, Deserialize)]
pub struct Atom {
    /// The atom kind.
    pub kind: AtomKind,

    /// The atomic number of the atom. This is zero for dummies and point charges.
    pub atomic_number: u32,

    /// The atomic symbol of the atom.
    pub atomic_symbol: String,

    /// The weighted-average atomic mass for all naturally occuring isotopes.
    pub atomic_mass: f64,

    /// The charge on the centre.
    pub charge: f64,

    /// The number of electrons assigned to the centre.
    pub nelectrons: f64,

    /// The spin multiplicity assigned to the centre.
    pub multiplicity: f64,

    /// The covalent radius in bohr, if known.
    pub covalent_radius: Option<f64>,

    /// The van der Waals radius in bohr, if known.
    pub vdw_radius: Option<f64>,

    /// The position of the atom.
    pub coordinates: Point3<f64>,

    /// Basis shells placed on this centre, keyed by basis-set name.
    basis_sets: IndexMap<String, Vec<BasisShell>>,
}

impl Atom {
    /// Creates an ordinary, neutral atom of a given element with its default properties: the
    /// abundance-weighted mass, the ground-state multiplicity and the tabulated radii.
    ///
    /// # Arguments
    ///
    /// * `atomic_number` - The atomic number of the element.
    /// * `coordinates` - The position of the atom.
    /// * `emap` - A look-up of element properties.
    ///
    /// # Errors
    ///
    /// Errors if the atomic number is not in the periodic table.
    pub fn new(
        atomic_number: u32,
        coordinates: Point3<f64>,
        emap: &ElementMap,
    ) -> Result<Atom, BasisSetError> {
        let props = emap.properties(atomic_number)?;
        Ok(Atom {
            kind: AtomKind::Ordinary,
            atomic_number,
            atomic_symbol: props.atomic_symbol.to_string(),
            atomic_mass: props.atomic_mass,
            charge: 0.0,
            nelectrons: f64::from(atomic_number),
            multiplicity: props.multiplicity,
            covalent_radius: props.covalent_radius,
            vdw_radius: props.vdw_radius,
            coordinates,
            basis_sets: IndexMap::new(),
        })
    }

    /// Creates an ordinary atom from an element symbol in any letter case.
    ///
    /// # Errors
    ///
    /// Errors if the symbol is not in the periodic table.
    pub fn from_symbol(
        atomic_symbol: &str,
        coordinates: Point3<f64>,
        emap: &ElementMap,
    ) -> Result<Atom, BasisSetError> {
        let atomic_number = emap.lookup_atomic_number(atomic_symbol)?;
        Self::new(atomic_number, coordinates, emap)
    }

    /// Creates a ghost of an atom at the same position.
    #[must_use]
    pub fn ghost(atom: &Atom) -> Atom {
        Atom {
            kind: AtomKind::Ghost,
            atomic_number: atom.atomic_number,
            atomic_symbol: atom.atomic_symbol.clone(),
            atomic_mass: 0.0,
            charge: 0.0,
            nelectrons: 0.0,
            multiplicity: 1.0,
            covalent_radius: atom.covalent_radius,
            vdw_radius: atom.vdw_radius,
            coordinates: atom.coordinates,
            basis_sets: atom.basis_sets.clone(),
        }
    }

    /// Creates a dummy centre.
    #[must_use]
    pub fn dummy(coordinates: Point3<f64>) -> Atom {
        Atom {
            kind: AtomKind::Dummy,
            atomic_number: 0,
            atomic_symbol: "X".to_string(),
            atomic_mass: 0.0,
            charge: 0.0,
            nelectrons: 0.0,
            multiplicity: 1.0,
            covalent_radius: None,
            vdw_radius: None,
            coordinates,
            basis_sets: IndexMap::new(),
        }
    }

    /// Creates a point charge.
    #[must_use]
    pub fn point_charge(coordinates: Point3<f64>, charge: f64) -> Atom {
        Atom {
            kind: AtomKind::PointCharge(charge),
            atomic_number: 0,
            atomic_symbol: "Q".to_string(),
            atomic_mass: 0.0,
            charge,
            nelectrons: 0.0,
            multiplicity: 1.0,
            covalent_radius: None,
            vdw_radius: None,
            coordinates,
            basis_sets: IndexMap::new(),
        }
    }

    pub fn is_ghost(&self) -> bool {
        self.kind == AtomKind::Ghost
    }

    pub fn is_dummy(&self) -> bool {
        self.kind == AtomKind::Dummy
    }

    pub fn is_point_charge(&self) -> bool {
        matches!(self.kind, AtomKind::PointCharge(_))
    }

    /// Returns `true` if this is an ordinary atom, *i.e.* not a ghost, dummy or point charge.
    pub fn is_real(&self) -> bool {
        self.kind == AtomKind::Ordinary
    }

    /// Appends a shell to the named basis set on this centre.
    pub fn add_shell(&mut self, basis_name: &str, shell: BasisShell) {
        self.basis_sets
            .entry(basis_name.to_string())
            .or_default()
            .push(shell);
    }

    /// Returns the shells of the named basis set on this centre, if any.
    pub fn basis_shells(&self, basis_name: &str) -> Option<&[BasisShell]> {
        self.basis_sets.get(basis_name).map(Vec::as_slice)
    }

    /// Iterates over the names of the basis sets placed on this centre.
    pub fn basis_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.basis_sets.keys().map(String::as_str)
    }

    /// Returns the named basis set on this centre as a [`ShellSet`] centred on the atom.
    ///
    /// An unknown basis name gives an empty set.
    pub fn get_basis(&self, basis_name: &str) -> ShellSet {
        let mut shell_set = ShellSet::new();
        if let Some(shells) = self.basis_sets.get(basis_name) {
            for shell in shells {
                shell_set.add_shell(&self.coordinates, shell);
            }
        }
        shell_set
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision: usize = 7;
        let length = (precision + precision.div_euclid(2)).max(6);
        let label = match self.kind {
            AtomKind::Ordinary => format!("{:>13}", format!("Atom {:>3}", self.atomic_symbol)),
            AtomKind::Ghost => format!("{:>13}", format!("Ghost {:>3}", self.atomic_symbol)),
            _ => format!("{:>13}", self.kind),
        };
        write!(
            f,
            "{label} {:+length$.precision$} {:+length$.precision$} {:+length$.precision$}",
            self.coordinates[0], self.coordinates[1], self.coordinates[2],
        )
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl PartialEq for Atom {
    /// Atoms are compared exactly on their kind, element, mass, charge, electron count,
    /// multiplicity, radii and coordinates. Attached basis shells do not take part in the
    /// comparison.
    fn eq(&self, other: &Self) -> bool {
        self.kind_key() == other.kind_key()
            && self.atomic_number == other.atomic_number
            && OrderedFloat(self.atomic_mass) == OrderedFloat(other.atomic_mass)
            && OrderedFloat(self.charge) == OrderedFloat(other.charge)
            && OrderedFloat(self.nelectrons) == OrderedFloat(other.nelectrons)
            && OrderedFloat(self.multiplicity) == OrderedFloat(other.multiplicity)
            && self.covalent_radius.map(OrderedFloat) == other.covalent_radius.map(OrderedFloat)
            && self.vdw_radius.map(OrderedFloat) == other.vdw_radius.map(OrderedFloat)
            && self
                .coordinates
                .iter()
                .zip(other.coordinates.iter())
                .all(|(a, b)| OrderedFloat(*a) == OrderedFloat(*b))
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_key().hash(state);
        self.atomic_number.hash(state);
        OrderedFloat(self.atomic_mass).hash(state);
        OrderedFloat(self.charge).hash(state);
        OrderedFloat(self.nelectrons).hash(state);
        OrderedFloat(self.multiplicity).hash(state);
        self.covalent_radius.map(OrderedFloat).hash(state);
        self.vdw_radius.map(OrderedFloat).hash(state);
        for coord in self.coordinates.iter() {
            OrderedFloat(*coord).hash(state);
        }
    }
}

impl Atom {
    /// Hashable key of the atom kind.
    fn kind_key(&self) -> (u8, OrderedFloat<f64>) {
        match self.kind {
            AtomKind::Ordinary => (0, OrderedFloat(0.0)),
            AtomKind::Ghost => (1, OrderedFloat(0.0)),
            AtomKind::Dummy => (2, OrderedFloat(0.0)),
            AtomKind::PointCharge(q) => (3, OrderedFloat(q)),
        }
    }

    /// Returns the atomic number as an integer nuclear charge for ordinary atoms, and zero
    /// otherwise.
    pub fn nuclear_charge(&self) -> u32 {
        if self.is_real() {
            self.atomic_number
        } else {
            0
        }
    }
}
