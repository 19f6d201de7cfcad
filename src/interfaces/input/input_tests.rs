use crate::basis::shell::ShellType;
use crate::interfaces::input::Input;
use crate::io::parsing::basis_file::BasisFileFormatKind;
use crate::io::parsing::geometry_file::GeometryFileFormatKind;
use crate::io::read_qbasis_yaml;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_interfaces_input_basis_assembly() {
    let name = format!("{ROOT}/tests/input/test_input_basis_assembly.yml");
    let mut inp = read_qbasis_yaml::<Input, _>(&name).unwrap();

    assert_eq!(inp.molecule.format, GeometryFileFormatKind::XyzBohr);
    assert_eq!(inp.basis_sets.len(), 2);
    assert_eq!(inp.basis_sets[0].name, "PRIMARY");
    assert_eq!(inp.basis_sets[1].format, BasisFileFormatKind::G94);
    assert_eq!(inp.basis_sets[1].shell_type, ShellType::CartesianGaussian);
    assert_eq!(inp.basis_assembly.basis_name, "PRIMARY");
    assert!(!inp.basis_assembly.ungeneralise);
    assert!(inp.basis_assembly.result_save_name.is_none());

    inp.molecule.path = format!("{ROOT}/{}", inp.molecule.path.display()).into();
    for source in inp.basis_sets.iter_mut() {
        source.path = format!("{ROOT}/{}", source.path.display()).into();
    }
    let res = inp.assemble().unwrap();
    let shell_set = res.shell_set();
    assert_eq!(res.molecule().len(), 3);
    assert_eq!(shell_set.n_shells(), 4);
    assert_eq!(shell_set.n_primitives(), 12);
    assert_eq!(shell_set.size(), 7);
    assert_eq!(shell_set.max_angular_momentum(), Some(1));
    assert_eq!(shell_set.ls(), &[0, -1, 0, 0]);
    assert!(res.bare_atoms().is_empty());

    let oxygen = res.molecule().get(0).unwrap();
    assert_eq!(oxygen.basis_names().collect::<Vec<_>>(), vec!["PRIMARY", "POLARISATION"]);
    let polarisation = oxygen.get_basis("POLARISATION");
    assert_eq!(polarisation.types(), &[ShellType::CartesianGaussian]);
    assert_eq!(polarisation.size(), 6);
}

#[test]
fn test_interfaces_input_basis_assembly_defaults() {
    let name = format!("{ROOT}/tests/input/test_input_basis_assembly_defaults.yml");
    let mut inp = read_qbasis_yaml::<Input, _>(&name).unwrap();

    assert_eq!(inp.molecule.format, GeometryFileFormatKind::Xyz);
    assert_eq!(inp.basis_sets[0].format, BasisFileFormatKind::G94);
    assert_eq!(inp.basis_sets[0].shell_type, ShellType::SphericalGaussian);
    assert_eq!(inp.basis_assembly.basis_name, "PRIMARY");
    assert!(inp.basis_assembly.ungeneralise);

    inp.molecule.path = format!("{ROOT}/{}", inp.molecule.path.display()).into();
    inp.basis_sets[0].path = format!("{ROOT}/{}", inp.basis_sets[0].path.display()).into();
    let res = inp.assemble().unwrap();
    assert_eq!(res.molecule().charge, 1.0);
    assert_eq!(res.molecule().multiplicity, 2.0);
    assert_eq!(res.shell_set().n_shells(), 5);
    assert_eq!(res.shell_set().n_primitives(), 15);
    assert_eq!(res.shell_set().size(), 7);
    assert_eq!(res.shell_set().ls(), &[0, 0, 1, 0, 0]);
    assert_eq!(
        res.molecule()
            .get(2)
            .unwrap()
            .coordinates
            .coords
            .as_slice(),
        &[0.0, -0.7572, -0.4692]
    );
}

#[test]
fn test_interfaces_input_errors() {
    let name = format!("{ROOT}/tests/input/test_input_basis_assembly.yml");
    let mut inp = read_qbasis_yaml::<Input, _>(&name).unwrap();
    inp.molecule.path = format!("{ROOT}/{}", inp.molecule.path.display()).into();
    for source in inp.basis_sets.iter_mut() {
        source.path = format!("{ROOT}/{}", source.path.display()).into();
    }

    let mut unknown_name = inp.clone();
    unknown_name.basis_assembly.basis_name = "AUX".to_string();
    assert!(unknown_name.assemble().is_err());

    let mut repeated_name = inp.clone();
    repeated_name.basis_sets[1].name = "PRIMARY".to_string();
    assert!(repeated_name.assemble().is_err());

    let mut missing_file = inp;
    missing_file.basis_sets[0].path = format!("{ROOT}/tests/data/missing.gbs").into();
    assert!(missing_file.assemble().is_err());
}

#[test]
fn test_interfaces_input_template_round_trip() {
    let template = serde_yaml::to_string(&Input::default()).unwrap();
    let inp: Input = serde_yaml::from_str(&template).unwrap();
    assert_eq!(inp.molecule.format, GeometryFileFormatKind::XyzBohr);
    assert_eq!(inp.basis_sets[0].name, "PRIMARY");
    assert!(inp.basis_assembly.ungeneralise);
}
