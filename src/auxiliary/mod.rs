//! Atoms, molecules and the element data needed to build them.

pub mod atom;
pub mod molecule;
