//! # QBasis: quantum-chemistry basis sets in a flat numeric layout
//!
//! `qbasis` reads basis-set libraries and molecular geometries from their line-oriented text
//! formats, places the basis sets on the atoms of a molecule, and gathers the resulting shells
//! into a [`basis::shell_set::ShellSet`], a flattened layout of six parallel arrays suited to
//! integral-evaluation code.
//!
//! ## Overview
//!
//! - [`angmom`] maps angular-momentum letters (`s`, `p`, ..., and the combined codes `sp`,
//!   `spd`, ...) to signed integer codes and back.
//! - [`basis`] contains [`basis::shell::BasisShell`], one contracted shell, and
//!   [`basis::shell_set::ShellSet`], the flattened encoding of many shells with support for
//!   splitting general contractions and concatenation.
//! - [`auxiliary`] contains atoms and molecules, which carry named basis sets.
//! - [`io::parsing`] reads Gaussian94 basis-set libraries and XYZ geometries through a two-phase
//!   classify-then-extract protocol that new formats can implement.
//! - [`drivers`] and [`interfaces`] run basis-set assembly from a YAML input file, as done by
//!   the `qbasis` binary.
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//!
//! use qbasis::io::parsing::basis_file::{parse_basis_set_file, G94};
//! use qbasis::io::parsing::geometry_file::{parse_molecule_file, Xyz};
//!
//! let library = parse_basis_set_file(
//!     Cursor::new("H 0\nS 1 1.00\n  0.5  1.0\n****\n"),
//!     &G94::default(),
//! )
//! .unwrap();
//! let mol = parse_molecule_file(
//!     Cursor::new("0 1\nH 0.0 0.0 0.7\nH 0.0 0.0 -0.7\n"),
//!     &Xyz::new(),
//! )
//! .unwrap();
//! let shells = mol.apply_basis_set("PRIMARY", &library).get_basis("PRIMARY");
//! assert_eq!(shells.n_shells(), 2);
//! assert_eq!(shells.size(), 2);
//! ```

pub mod angmom;
pub mod auxiliary;
pub mod basis;
pub mod drivers;
pub mod error;
pub mod interfaces;
pub mod io;
