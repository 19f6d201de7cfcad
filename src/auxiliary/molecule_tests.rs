use std::collections::BTreeMap;

use nalgebra::Point3;

use crate::auxiliary::atom::{Atom, ElementMap};
use crate::auxiliary::molecule::Molecule;
use crate::basis::shell::{BasisShell, ShellType};
use crate::basis::shell_set::ShellSet;

fn uf6(emap: &ElementMap) -> Molecule {
    let fluorine_positions = [
        [0.0, 0.0, 3.7],
        [0.0, 0.0, -3.7],
        [3.7, 0.0, 0.0],
        [-3.7, 0.0, 0.0],
        [0.0, 3.7, 0.0],
        [0.0, -3.7, 0.0],
    ];
    let mut mol = Molecule::new();
    assert!(mol.insert(Atom::new(92, Point3::origin(), emap).unwrap()));
    for [x, y, z] in fluorine_positions {
        assert!(mol.insert(Atom::new(9, Point3::new(x, y, z), emap).unwrap()));
    }
    mol
}

fn uranium_sp() -> BasisShell {
    BasisShell::new(
        ShellType::CartesianGaussian,
        -1,
        2,
        vec![3.0, 4.0],
        vec![5.0, 6.0, 7.0, 8.0],
    )
    .unwrap()
}

#[test]
fn test_molecule_defaults_and_insert() {
    let emap = ElementMap::new();
    let mut mol = Molecule::new();
    assert!(mol.is_empty());
    assert_eq!(mol.charge, 0.0);
    assert_eq!(mol.multiplicity, 1.0);
    assert_eq!(mol, Molecule::default());

    let he = Atom::new(2, Point3::new(0.1, 0.1, 0.0), &emap).unwrap();
    assert!(mol.insert(he.clone()));
    assert!(!mol.insert(he.clone()));
    assert_eq!(mol.len(), 1);
    assert!(mol.contains(&he));
    assert_eq!(mol.n_electrons(), 2.0);

    let mut charged = mol.clone();
    charged.charge = -1.0;
    assert_ne!(charged, mol);
    assert_eq!(charged.n_electrons(), 3.0);
}

#[test]
fn test_molecule_insertion_order() {
    let emap = ElementMap::new();
    let mol = uf6(&emap);
    assert_eq!(mol.len(), 7);
    assert_eq!(mol.get(0).unwrap().atomic_number, 92);
    assert!(mol.iter().skip(1).all(|atom| atom.atomic_symbol == "F"));

    let from_atoms = Molecule::from_atoms(mol.iter().cloned().chain(mol.iter().cloned()));
    assert_eq!(from_atoms, mol);
}

#[test]
fn test_molecule_apply_basis_set() {
    let emap = ElementMap::new();
    let mol = uf6(&emap);
    let basis = BTreeMap::from([(92, vec![uranium_sp()])]);

    let with_basis = mol.apply_basis_set("PRIMARY", &basis);
    // Basis shells do not take part in atom equality.
    assert_eq!(with_basis, mol);
    assert_eq!(mol.get_general_basis("PRIMARY"), ShellSet::new());

    let mut corr_general = ShellSet::new();
    corr_general.add_shell(&Point3::origin(), &uranium_sp());
    assert_eq!(with_basis.get_general_basis("PRIMARY"), corr_general);

    let mut corr = ShellSet::new();
    corr.add_shell(
        &Point3::origin(),
        &BasisShell::new(ShellType::CartesianGaussian, 0, 1, vec![3.0, 4.0], vec![5.0, 6.0])
            .unwrap(),
    );
    corr.add_shell(
        &Point3::origin(),
        &BasisShell::new(ShellType::CartesianGaussian, 1, 1, vec![3.0, 4.0], vec![7.0, 8.0])
            .unwrap(),
    );
    assert_eq!(with_basis.get_basis("PRIMARY"), corr);
    assert_eq!(with_basis.get_basis("PRIMARY").size(), 4);
    assert_eq!(with_basis.get_basis("AUX"), ShellSet::new());
}

#[test]
fn test_molecule_basis_order_follows_atoms() {
    let emap = ElementMap::new();
    let s = BasisShell::new(ShellType::SphericalGaussian, 0, 1, vec![1.0], vec![1.0]).unwrap();
    let mut mol = Molecule::new();
    mol.insert(Atom::new(1, Point3::new(0.0, 0.0, 1.0), &emap).unwrap());
    mol.insert(Atom::new(92, Point3::origin(), &emap).unwrap());
    mol.insert(Atom::new(1, Point3::new(0.0, 0.0, -1.0), &emap).unwrap());
    let basis = BTreeMap::from([(1, vec![s]), (92, vec![uranium_sp()])]);

    let shells = mol.apply_basis_set("PRIMARY", &basis).get_basis("PRIMARY");
    assert_eq!(shells.ls(), &[0, 0, 1, 0]);
    assert_eq!(
        shells.centers(),
        &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]
    );
}
