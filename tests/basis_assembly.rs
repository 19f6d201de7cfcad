use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::process;

use indexmap::IndexMap;
use nalgebra::Point3;

use qbasis::auxiliary::molecule::Molecule;
use qbasis::basis::shell::{BasisShell, ShellType};
use qbasis::basis::shell_set::ShellSet;
use qbasis::drivers::basis_assembly::{BasisAssemblyDriver, BasisAssemblyParams};
use qbasis::drivers::QBasisDriver;
use qbasis::io::parsing::basis_file::{read_basis_set_file, G94};
use qbasis::io::parsing::geometry_file::{read_molecule_file, Xyz};
use qbasis::io::{read_qbasis_binary, QBasisFileType};

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_read_fixtures() {
    let _ = env_logger::builder().is_test(true).try_init();

    let library = read_basis_set_file(format!("{ROOT}/tests/data/sto-3g.gbs"), &G94::default())
        .unwrap();
    assert_eq!(library.keys().copied().collect::<Vec<_>>(), vec![1, 2, 8]);
    let oxygen = &library[&8];
    assert_eq!(oxygen.len(), 2);
    assert_eq!(oxygen[1].l(), -1);
    assert_eq!(oxygen[1].ngen(), 2);
    assert_eq!(oxygen[1].alphas(), &[5.0331513, 1.1695961, 0.3803890]);
    assert_eq!(
        oxygen[1].contraction(0).unwrap(),
        &[-0.09996723, 0.39951283, 0.70011547]
    );
    assert_eq!(
        oxygen[1].contraction(1).unwrap(),
        &[0.15591627, 0.60768372, 0.39195739]
    );

    let mol = read_molecule_file(format!("{ROOT}/tests/data/h2o.xyz"), &Xyz::new()).unwrap();
    assert_eq!(mol.len(), 3);
    assert_eq!(mol.charge, 0.0);
    assert_eq!(mol.multiplicity, 1.0);
    assert_eq!(
        mol.get(0).unwrap().coordinates,
        Point3::new(0.0, 0.0, 0.1173)
    );
}

#[test]
fn test_basis_assembly_driver_save() {
    let _ = env_logger::builder().is_test(true).try_init();

    let library = read_basis_set_file(format!("{ROOT}/tests/data/sto-3g.gbs"), &G94::default())
        .unwrap();
    let mol = read_molecule_file(
        format!("{ROOT}/tests/data/h2o.xyz"),
        &Xyz::angstrom_to_bohr(),
    )
    .unwrap();
    let libraries = IndexMap::from([("PRIMARY".to_string(), library)]);

    let save_name = env::temp_dir().join(format!("qbasis_assembly_{}", process::id()));
    let params = BasisAssemblyParams::builder()
        .basis_name("PRIMARY")
        .result_save_name(Some(save_name.display().to_string()))
        .build()
        .unwrap();
    let mut driver = BasisAssemblyDriver::builder()
        .parameters(&params)
        .molecule(&mol)
        .libraries(&libraries)
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    driver.run().unwrap();
    let res = driver.result().unwrap();

    let shell_set = res.shell_set();
    assert_eq!(shell_set.n_shells(), 5);
    assert_eq!(shell_set.size(), 7);
    assert!(shell_set.ngens().iter().all(|g| *g == 1));
    assert_eq!(shell_set, &res.molecule().get_basis("PRIMARY"));
    assert_eq!(
        shell_set.ungeneralise(),
        res.molecule().get_general_basis("PRIMARY").ungeneralise()
    );

    let saved_set: ShellSet = read_qbasis_binary(&save_name, QBasisFileType::Shl).unwrap();
    assert_eq!(&saved_set, shell_set);
    let saved_mol: Molecule = read_qbasis_binary(&save_name, QBasisFileType::Mol).unwrap();
    assert_eq!(&saved_mol, res.molecule());
    assert_eq!(saved_mol.get_basis("PRIMARY"), saved_set);

    for file_type in [QBasisFileType::Shl, QBasisFileType::Mol] {
        let mut path = save_name.clone();
        path.set_extension(file_type.ext());
        fs::remove_file(path).unwrap();
    }
}

#[test]
fn test_basis_assembly_driver_reports_bare_atoms() {
    let _ = env_logger::builder().is_test(true).try_init();

    let hydrogen_only = BTreeMap::from([(
        1,
        vec![BasisShell::new(ShellType::SphericalGaussian, 0, 1, vec![0.5], vec![1.0]).unwrap()],
    )]);
    let mol = read_molecule_file(format!("{ROOT}/tests/data/h2o.xyz"), &Xyz::new()).unwrap();
    let libraries = IndexMap::from([("MINIMAL".to_string(), hydrogen_only)]);
    let params = BasisAssemblyParams::builder()
        .basis_name("MINIMAL")
        .ungeneralise(false)
        .build()
        .unwrap();
    let mut driver = BasisAssemblyDriver::builder()
        .parameters(&params)
        .molecule(&mol)
        .libraries(&libraries)
        .build()
        .unwrap();
    driver.run().unwrap();
    let res = driver.result().unwrap();
    assert_eq!(res.bare_atoms(), &[0]);
    assert_eq!(res.shell_set().n_shells(), 2);
    assert_eq!(res.shell_set().max_angular_momentum(), Some(0));
}

#[test]
fn test_basis_assembly_driver_rejects_empty_molecule() {
    let libraries = IndexMap::from([("PRIMARY".to_string(), BTreeMap::new())]);
    let params = BasisAssemblyParams::default();
    let mol = Molecule::new();
    let mut driver = BasisAssemblyDriver::builder()
        .parameters(&params)
        .molecule(&mol)
        .libraries(&libraries)
        .build()
        .unwrap();
    assert!(driver.run().is_err());
    assert!(driver.result().is_err());
}
