//! Basis shells and their flattened shell-set encoding.

pub mod shell;
pub mod shell_set;
