//! Single basis shells with their primitive exponents and contraction coefficients.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::angmom::{angmom_to_str, n_components, nth_component};
use crate::error::BasisSetError;

#[cfg(test)]
#[path = "shell_tests.rs"]
mod shell_tests;

// =========
// ShellType
// =========

/// Enumerated type for the kinds of radial/angular functions in a shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellType {
    /// Real solid-harmonic Gaussians.
    #[default]
    SphericalGaussian,

    /// Cartesian Gaussians.
    CartesianGaussian,

    /// Slater-type functions.
    Slater,
}

impl ShellType {
    /// Returns the number of functions of a single angular momentum $`l`$ for this shell type.
    ///
    /// Cartesian shells have $`(l + 1)(l + 2) / 2`$ functions, *i.e.* the number of ways to
    /// choose $`l`$ of the three Cartesian directions with repetition. Spherical and Slater shells
    /// have $`2l + 1`$ functions.
    pub fn n_funcs(&self, l: u32) -> usize {
        let lsize = l as usize;
        match self {
            ShellType::CartesianGaussian => ((lsize + 1) * (lsize + 2)).div_euclid(2),
            ShellType::SphericalGaussian | ShellType::Slater => 2 * lsize + 1,
        }
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellType::SphericalGaussian => write!(f, "SphericalGaussian"),
            ShellType::CartesianGaussian => write!(f, "CartesianGaussian"),
            ShellType::Slater => write!(f, "Slater"),
        }
    }
}

// ==========
// BasisShell
// ==========

/// Structure holding one shell of a basis set: its primitive exponents and one row of
/// contraction coefficients per (general) contraction.
///
/// A shell does not know where it is centred. Shells are immutable once built; they are placed in
/// space when added to a [`ShellSet`](crate::basis::shell_set::ShellSet).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisShell {
    /// The kind of functions in this shell.
    shell_type: ShellType,

    /// The integer angular-momentum code of this shell. Negative codes denote combined shells
    /// such as `sp`.
    l: i32,

    /// The number of general contractions.
    ngen: usize,

    /// The `nprim` primitive exponents.
    alphas: Vec<f64>,

    /// The `ngen` by `nprim` contraction coefficients in row-major order.
    coefs: Vec<f64>,
}

impl BasisShell {
    /// Constructs a new shell.
    ///
    /// # Arguments
    ///
    /// * `shell_type` - The kind of functions in the shell.
    /// * `l` - The integer angular-momentum code of the shell.
    /// * `ngen` - The number of general contractions.
    /// * `alphas` - The primitive exponents.
    /// * `coefs` - The contraction coefficients, `ngen` rows of `alphas.len()` values each.
    ///
    /// # Errors
    ///
    /// Errors if `l` is not a valid code, if there is no contraction, if the size of `coefs` is
    /// not `ngen * alphas.len()`, or if a combined code does not have one contraction per
    /// constituent momentum.
    pub fn new(
        shell_type: ShellType,
        l: i32,
        ngen: usize,
        alphas: Vec<f64>,
        coefs: Vec<f64>,
    ) -> Result<Self, BasisSetError> {
        validate_counts(l, ngen, alphas.len(), coefs.len())?;
        Ok(Self {
            shell_type,
            l,
            ngen,
            alphas,
            coefs,
        })
    }

    /// The kind of functions in this shell.
    pub fn shell_type(&self) -> ShellType {
        self.shell_type
    }

    /// The integer angular-momentum code of this shell.
    pub fn l(&self) -> i32 {
        self.l
    }

    /// The number of general contractions in this shell.
    pub fn ngen(&self) -> usize {
        self.ngen
    }

    /// The number of primitives in this shell.
    pub fn nprim(&self) -> usize {
        self.alphas.len()
    }

    /// All primitive exponents.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// All contraction coefficients, row-major over contractions.
    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    /// Returns the `i`-th primitive exponent.
    ///
    /// # Errors
    ///
    /// Errors if `i` is not smaller than the number of primitives.
    pub fn exponent(&self, i: usize) -> Result<f64, BasisSetError> {
        self.alphas
            .get(i)
            .copied()
            .ok_or(BasisSetError::IndexOutOfRange {
                what: "Primitive",
                index: i,
                bound: self.alphas.len(),
            })
    }

    /// Returns the coefficient of the `i`-th primitive in the `j`-th contraction.
    ///
    /// # Errors
    ///
    /// Errors if either index is out of range.
    pub fn coefficient(&self, i: usize, j: usize) -> Result<f64, BasisSetError> {
        let nprim = self.nprim();
        if i >= nprim {
            return Err(BasisSetError::IndexOutOfRange {
                what: "Primitive",
                index: i,
                bound: nprim,
            });
        }
        if j >= self.ngen {
            return Err(BasisSetError::IndexOutOfRange {
                what: "Contraction",
                index: j,
                bound: self.ngen,
            });
        }
        Ok(self.coefs[j * nprim + i])
    }

    /// Returns the coefficient row of the `j`-th contraction.
    ///
    /// # Errors
    ///
    /// Errors if `j` is not smaller than the number of contractions.
    pub fn contraction(&self, j: usize) -> Result<&[f64], BasisSetError> {
        if j >= self.ngen {
            return Err(BasisSetError::IndexOutOfRange {
                what: "Contraction",
                index: j,
                bound: self.ngen,
            });
        }
        let nprim = self.nprim();
        Ok(&self.coefs[j * nprim..(j + 1) * nprim])
    }

    /// Returns the number of basis functions described by the `j`-th contraction.
    ///
    /// This is not the number of primitives, but the number of angular functions of the
    /// momentum carried by that contraction (see [`ShellType::n_funcs`]).
    ///
    /// # Errors
    ///
    /// Errors if `j` is not smaller than the number of contractions.
    pub fn n_funcs(&self, j: usize) -> Result<usize, BasisSetError> {
        if j >= self.ngen {
            return Err(BasisSetError::IndexOutOfRange {
                what: "Contraction",
                index: j,
                bound: self.ngen,
            });
        }
        Ok(self.shell_type.n_funcs(nth_component(self.l, j)?))
    }

    /// Returns the number of basis functions described by all contractions of this shell.
    pub fn n_funcs_total(&self) -> Result<usize, BasisSetError> {
        (0..self.ngen).map(|j| self.n_funcs(j)).sum()
    }
}

impl fmt::Display for BasisShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = angmom_to_str(self.l).unwrap_or("?");
        writeln!(
            f,
            "{} shell ({}): {} primitive(s), {} contraction(s)",
            label.to_uppercase(),
            self.shell_type,
            self.nprim(),
            self.ngen
        )?;
        let nprim = self.nprim();
        for (i, alpha) in self.alphas.iter().enumerate() {
            writeln!(
                f,
                "  {alpha:>16.7e} {}",
                (0..self.ngen)
                    .map(|j| format!("{:>+14.7e}", self.coefs[j * nprim + i]))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

/// Checks the counts describing one shell for consistency.
pub(crate) fn validate_counts(
    l: i32,
    ngen: usize,
    nprim: usize,
    ncoefs: usize,
) -> Result<(), BasisSetError> {
    let ncomps = n_components(l)?;
    if ngen == 0 {
        return Err(BasisSetError::InvalidShell(
            "a shell must have at least one contraction".to_string(),
        ));
    }
    if l < 0 && ngen != ncomps {
        return Err(BasisSetError::InvalidShell(format!(
            "combined shell `{}` needs {ncomps} contractions, got {ngen}",
            angmom_to_str(l)?
        )));
    }
    if ncoefs != ngen * nprim {
        return Err(BasisSetError::InvalidShell(format!(
            "expected {ngen} x {nprim} = {} coefficients, got {ncoefs}",
            ngen * nprim
        )));
    }
    Ok(())
}
