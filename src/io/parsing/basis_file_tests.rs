use std::collections::BTreeMap;
use std::io::Cursor;

use crate::basis::shell::{BasisShell, ShellType};
use crate::error::BasisSetError;
use crate::io::parsing::basis_file::{
    parse_basis_set_file, BasisDatum, BasisFileAction, BasisFileFormat, G94,
};

// A shortened Gaussian94 library, with parts from aug-cc-pVDZ and others from 6-31G*.
const G94_EXAMPLE: &str = "\
! Elements                             References
! --------                             ----------
! Ca     : J. Koput and K.A. Peterson, J. Phys. Chem. A, 106, 9595 (2002).
! 

****
H     0 
S   3   1.00
     13.0100000              0.0196850        
      1.9620000              0.1379770        
      0.4446000              0.4781480        
S   1   1.00
      0.1220000              1.0000000        
****
C     0 
S   8   1.00
   6665.0000000              0.0006920        
   1000.0000000              0.0053290        
    228.0000000              0.0270770        
     64.7100000              0.1017180        
     21.0600000              0.2747400        
      7.4950000              0.4485640        
      2.7970000              0.2850740        
      0.5215000              0.0152040        
D   1   1.00
      0.1510000              1.0000000        
SP   1   1.00
    0.1687144              1.0000000              1.0000000 
****



";

fn pure(l: i32, ngen: usize, alphas: Vec<f64>, coefs: Vec<f64>) -> BasisShell {
    BasisShell::new(ShellType::SphericalGaussian, l, ngen, alphas, coefs).unwrap()
}

#[test]
fn test_g94_classify() {
    let g94 = G94::default();
    assert_eq!(g94.classify(""), BasisFileAction::Skip);
    assert_eq!(g94.classify("   "), BasisFileAction::Skip);
    assert_eq!(g94.classify("! comment 1.0 2.0"), BasisFileAction::Skip);
    assert_eq!(g94.classify("****"), BasisFileAction::EndAtom);
    assert_eq!(g94.classify("H     0 "), BasisFileAction::NewAtom);
    assert_eq!(g94.classify("S   0"), BasisFileAction::NewAtom);
    assert_eq!(g94.classify("S   3   1.00"), BasisFileAction::NewShell);
    assert_eq!(g94.classify("sp 1 1.00"), BasisFileAction::NewShell);
    assert_eq!(g94.classify("BASIS 1 2"), BasisFileAction::NewShell);
    assert_eq!(g94.classify("L 3 1.00"), BasisFileAction::NewShell);
    assert!(matches!(
        g94.extract("L 3 1.00", BasisFileAction::NewShell),
        Err(BasisSetError::UnknownCode(_))
    ));
    assert_eq!(
        g94.classify("     13.0100000              0.0196850"),
        BasisFileAction::SameShell
    );
    assert_eq!(g94.classify("-.5 1.0"), BasisFileAction::SameShell);
    assert_eq!(g94.classify("spherical"), BasisFileAction::Skip);
}

#[test]
fn test_g94_extract() {
    let g94 = G94::default();
    assert_eq!(
        g94.extract("C     0 ", BasisFileAction::NewAtom).unwrap(),
        BasisDatum::Element { atomic_number: 6 }
    );
    assert_eq!(
        g94.extract("SP   1   1.00", BasisFileAction::NewShell).unwrap(),
        BasisDatum::ShellHeader {
            l: -1,
            nprim: 1,
            scale: 1.0
        }
    );
    assert_eq!(
        g94.extract(
            "    0.1687144              1.0000000              1.0000000 ",
            BasisFileAction::SameShell
        )
        .unwrap(),
        BasisDatum::Primitive {
            alpha: 0.1687144,
            coefs: vec![1.0, 1.0]
        }
    );
    assert_eq!(
        g94.extract("  0.1D+02  0.5d0", BasisFileAction::SameShell)
            .unwrap(),
        BasisDatum::Primitive {
            alpha: 10.0,
            coefs: vec![0.5]
        }
    );
    assert!(matches!(
        g94.extract("Qq 0", BasisFileAction::NewAtom),
        Err(BasisSetError::UnknownElement(_))
    ));
    assert!(matches!(
        g94.extract("1.0 abc", BasisFileAction::SameShell),
        Err(BasisSetError::MalformedLine { .. })
    ));
    assert!(matches!(
        g94.extract("1.0", BasisFileAction::SameShell),
        Err(BasisSetError::MalformedLine { .. })
    ));
}

#[test]
fn test_g94_parse_file() {
    let parsed = parse_basis_set_file(Cursor::new(G94_EXAMPLE), &G94::default()).unwrap();

    let mut corr = BTreeMap::new();
    corr.insert(
        1,
        vec![
            pure(
                0,
                1,
                vec![13.0100000, 1.9620000, 0.4446000],
                vec![0.0196850, 0.1379770, 0.4781480],
            ),
            pure(0, 1, vec![0.1220000], vec![1.0000000]),
        ],
    );
    corr.insert(
        6,
        vec![
            pure(
                0,
                1,
                vec![
                    6665.0000000,
                    1000.0000000,
                    228.0000000,
                    64.7100000,
                    21.0600000,
                    7.4950000,
                    2.7970000,
                    0.5215000,
                ],
                vec![
                    0.0006920, 0.0053290, 0.0270770, 0.1017180, 0.2747400, 0.4485640, 0.2850740,
                    0.0152040,
                ],
            ),
            pure(2, 1, vec![0.1510000], vec![1.0000000]),
            pure(-1, 2, vec![0.1687144], vec![1.0000000, 1.0000000]),
        ],
    );
    assert_eq!(parsed, corr);
}

#[test]
fn test_g94_general_contraction_columns() {
    let text = "\
Li 0
SP 2 1.00
  2.0  0.1  0.3
  1.0  0.2  0.4
****
";
    let parsed = parse_basis_set_file(Cursor::new(text), &G94::default()).unwrap();
    let sp = &parsed[&3][0];
    assert_eq!(sp.l(), -1);
    assert_eq!(sp.ngen(), 2);
    assert_eq!(sp.alphas(), &[2.0, 1.0]);
    assert_eq!(sp.contraction(0).unwrap(), &[0.1, 0.2]);
    assert_eq!(sp.contraction(1).unwrap(), &[0.3, 0.4]);
}

#[test]
fn test_g94_scale_factor_and_shell_type() {
    let text = "\
He 0
S 1 2.00
  1.5  1.0
P 1 1.00
  0.7  1.0
";
    let parsed =
        parse_basis_set_file(Cursor::new(text), &G94::new(ShellType::CartesianGaussian)).unwrap();
    let shells = &parsed[&2];
    assert_eq!(shells.len(), 2);
    approx::assert_relative_eq!(shells[0].alphas()[0], 6.0);
    assert_eq!(shells[1].alphas(), &[0.7]);
    assert!(shells
        .iter()
        .all(|shell| shell.shell_type() == ShellType::CartesianGaussian));
}

#[test]
fn test_g94_repeated_element_blocks_merge() {
    let text = "\
H 0
S 1 1.00
  1.0 1.0
****
He 0
S 1 1.00
  2.0 1.0
****
H 0
P 1 1.00
  0.5 1.0
****
";
    let parsed = parse_basis_set_file(Cursor::new(text), &G94::default()).unwrap();
    assert_eq!(parsed.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        parsed[&1].iter().map(BasisShell::l).collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn test_g94_malformed_files() {
    let orphan_shell = "S 1 1.00\n 1.0 1.0\n";
    assert!(matches!(
        parse_basis_set_file(Cursor::new(orphan_shell), &G94::default()),
        Err(BasisSetError::MalformedLine { line_number: 1, .. })
    ));

    let orphan_primitive = "H 0\n 1.0 1.0\n";
    assert!(matches!(
        parse_basis_set_file(Cursor::new(orphan_primitive), &G94::default()),
        Err(BasisSetError::MalformedLine { line_number: 2, .. })
    ));

    let ragged = "H 0\nS 2 1.00\n 1.0 1.0\n 0.5 1.0 2.0\n****\n";
    assert!(matches!(
        parse_basis_set_file(Cursor::new(ragged), &G94::default()),
        Err(BasisSetError::MalformedLine { line_number: 4, .. })
    ));

    // A combined sp shell must carry one coefficient per constituent momentum.
    let short_sp = "H 0\nSP 1 1.00\n 1.0 1.0\n****\n";
    match parse_basis_set_file(Cursor::new(short_sp), &G94::default()) {
        Err(BasisSetError::MalformedLine {
            line_number, line, ..
        }) => {
            assert_eq!(line_number, 2);
            assert_eq!(line, "SP 1 1.00");
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    // Primitives after an unrecognised shell header must not join the preceding shell.
    let unknown_shell = "H 0\nS 1 1.00\n 0.5 1.0\nE 1 1.00\n 0.2 1.0\n****\n";
    match parse_basis_set_file(Cursor::new(unknown_shell), &G94::default()) {
        Err(BasisSetError::MalformedLine {
            line_number, line, ..
        }) => {
            assert_eq!(line_number, 4);
            assert_eq!(line, "E 1 1.00");
        }
        other => panic!("Unexpected result: {other:?}"),
    }

    let bad_element = "\n\nXx 0\n";
    assert!(matches!(
        parse_basis_set_file(Cursor::new(bad_element), &G94::default()),
        Err(BasisSetError::MalformedLine { line_number: 3, .. })
    ));
}

#[test]
fn test_g94_declared_nprim_is_informative() {
    let text = "H 0\nS 3 1.00\n 1.0 1.0\n****\n";
    let parsed = parse_basis_set_file(Cursor::new(text), &G94::default()).unwrap();
    assert_eq!(parsed[&1][0].nprim(), 1);
}
