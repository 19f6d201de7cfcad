//! Flattened, offset-addressed encoding of a collection of centred basis shells.
//!
//! A [`ShellSet`] stores $`N`$ shells as six parallel sequences in insertion order:
//!
//! | Sequence  | Length                                 | Contents of shell $`i`$                                    |
//! |-----------|----------------------------------------|------------------------------------------------------------|
//! | `centers` | $`3N`$                                 | $`x, y, z`$ at $`[3i, 3i + 3)`$                            |
//! | `types`   | $`N`$                                  | the [`ShellType`]                                          |
//! | `ls`      | $`N`$                                  | the integer angular-momentum code                          |
//! | `nprims`  | $`N`$                                  | the number of primitives $`p_i`$                           |
//! | `ngens`   | $`N`$                                  | the number of contractions $`g_i`$                         |
//! | `alphas`  | $`\sum_i p_i`$                         | $`p_i`$ exponents from $`\sum_{j<i} p_j`$                  |
//! | `coefs`   | $`\sum_i g_i p_i`$                     | $`g_i`$ rows of $`p_i`$ from $`\sum_{j<i} g_j p_j`$        |
//!
//! The offsets into `alphas` and `coefs` are never stored: they are recomputed by a
//! left-to-right scan of `nprims` and `ngens`. Shells can only be appended.

use std::fmt;

use itertools::{izip, Itertools};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::angmom::nth_component;
use crate::basis::shell::{validate_counts, BasisShell, ShellType};
use crate::error::BasisSetError;

#[cfg(test)]
#[path = "shell_set_tests.rs"]
mod shell_set_tests;

// ========
// ShellSet
// ========

/// Structure holding any number of centred shells in six parallel flattened arrays.
///
/// Two shell sets are equal only if all six arrays are exactly equal element-wise.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShellSetData")]
pub struct ShellSet {
    /// Shell centres, three per shell.
    centers: Vec<f64>,

    /// Shell types, one per shell.
    types: Vec<ShellType>,

    /// Integer angular-momentum codes, one per shell.
    ls: Vec<i32>,

    /// Numbers of primitives, one per shell.
    nprims: Vec<usize>,

    /// Numbers of general contractions, one per shell.
    ngens: Vec<usize>,

    /// Primitive exponents, jagged over shells.
    alphas: Vec<f64>,

    /// Contraction coefficients, jagged over shells, row-major over contractions within a shell.
    coefs: Vec<f64>,
}

/// Unchecked mirror of [`ShellSet`] used when deserialising.
#[derive(Deserialize)]
struct ShellSetData {
    centers: Vec<f64>,
    types: Vec<ShellType>,
    ls: Vec<i32>,
    nprims: Vec<usize>,
    ngens: Vec<usize>,
    alphas: Vec<f64>,
    coefs: Vec<f64>,
}

impl TryFrom<ShellSetData> for ShellSet {
    type Error = BasisSetError;

    fn try_from(data: ShellSetData) -> Result<Self, Self::Error> {
        ShellSet::from_raw_parts(
            data.centers,
            data.types,
            data.ls,
            data.nprims,
            data.ngens,
            data.alphas,
            data.coefs,
        )
    }
}

/// Read-only view of one shell inside a [`ShellSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellView<'a> {
    /// The $`x, y, z`$ coordinates of the shell centre.
    pub center: &'a [f64],

    /// The kind of functions in the shell.
    pub shell_type: ShellType,

    /// The integer angular-momentum code.
    pub l: i32,

    /// The number of primitives.
    pub nprim: usize,

    /// The number of general contractions.
    pub ngen: usize,

    /// The primitive exponents.
    pub alphas: &'a [f64],

    /// The contraction coefficients, `ngen` rows of `nprim`.
    pub coefs: &'a [f64],
}

impl ShellView<'_> {
    /// Copies the viewed shell into an owned [`BasisShell`], leaving the centre behind.
    pub fn to_basis_shell(&self) -> Result<BasisShell, BasisSetError> {
        BasisShell::new(
            self.shell_type,
            self.l,
            self.ngen,
            self.alphas.to_vec(),
            self.coefs.to_vec(),
        )
    }
}

impl ShellSet {
    /// Creates an empty shell set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a shell set directly from its six flattened arrays.
    ///
    /// # Errors
    ///
    /// Errors if the array lengths are mutually inconsistent or if any shell's counts are
    /// invalid.
    pub fn from_raw_parts(
        centers: Vec<f64>,
        types: Vec<ShellType>,
        ls: Vec<i32>,
        nprims: Vec<usize>,
        ngens: Vec<usize>,
        alphas: Vec<f64>,
        coefs: Vec<f64>,
    ) -> Result<Self, BasisSetError> {
        let nshells = ls.len();
        if types.len() != nshells
            || nprims.len() != nshells
            || ngens.len() != nshells
            || centers.len() != 3 * nshells
        {
            return Err(BasisSetError::InvalidShell(format!(
                "per-shell arrays disagree on the number of shells: {} centre values, {} types, \
                 {nshells} codes, {} primitive counts, {} contraction counts",
                centers.len(),
                types.len(),
                nprims.len(),
                ngens.len()
            )));
        }
        for (l, nprim, ngen) in izip!(ls.iter(), nprims.iter(), ngens.iter()) {
            validate_counts(*l, *ngen, *nprim, ngen * nprim)?;
        }
        let nalphas: usize = nprims.iter().sum();
        let ncoefs: usize = nprims.iter().zip(ngens.iter()).map(|(p, g)| p * g).sum();
        if alphas.len() != nalphas || coefs.len() != ncoefs {
            return Err(BasisSetError::InvalidShell(format!(
                "expected {nalphas} exponents and {ncoefs} coefficients, got {} and {}",
                alphas.len(),
                coefs.len()
            )));
        }
        Ok(Self {
            centers,
            types,
            ls,
            nprims,
            ngens,
            alphas,
            coefs,
        })
    }

    // ----------------
    // Flattened arrays
    // ----------------

    /// Shell centres, three consecutive values per shell.
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Shell types, one per shell.
    pub fn types(&self) -> &[ShellType] {
        &self.types
    }

    /// Integer angular-momentum codes, one per shell.
    pub fn ls(&self) -> &[i32] {
        &self.ls
    }

    /// Numbers of primitives, one per shell.
    pub fn nprims(&self) -> &[usize] {
        &self.nprims
    }

    /// Numbers of general contractions, one per shell.
    pub fn ngens(&self) -> &[usize] {
        &self.ngens
    }

    /// All primitive exponents.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    /// All contraction coefficients.
    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    // --------
    // Building
    // --------

    /// Appends a shell centred at `center`.
    ///
    /// The centre, the exponents, the row-major coefficients and the per-shell scalars are
    /// appended to their respective arrays.
    pub fn add_shell(&mut self, center: &Point3<f64>, shell: &BasisShell) {
        self.centers.extend(center.iter());
        self.alphas.extend_from_slice(shell.alphas());
        self.coefs.extend_from_slice(shell.coefs());
        self.ls.push(shell.l());
        self.nprims.push(shell.nprim());
        self.ngens.push(shell.ngen());
        self.types.push(shell.shell_type());
    }

    /// Appends all shells of `other` after the shells of `self`, element-wise on each of the
    /// parallel arrays.
    ///
    /// # Returns
    ///
    /// `self`, so that concatenations can be chained.
    pub fn concatenate(&mut self, other: &ShellSet) -> &mut Self {
        self.centers.extend_from_slice(&other.centers);
        self.coefs.extend_from_slice(&other.coefs);
        self.alphas.extend_from_slice(&other.alphas);
        self.nprims.extend_from_slice(&other.nprims);
        self.ngens.extend_from_slice(&other.ngens);
        self.types.extend_from_slice(&other.types);
        self.ls.extend_from_slice(&other.ls);
        self
    }

    /// Splits every general contraction into single-contraction shells.
    ///
    /// Contraction $`j`$ of a shell with $`g > 1`$ becomes a shell of its own with the same
    /// centre, type and exponents, the angular momentum of the $`j`$-th constituent momentum, and
    /// the $`j`$-th coefficient row. Shells with a single contraction are copied unchanged.
    ///
    /// # Returns
    ///
    /// A new shell set in which every shell has exactly one contraction.
    pub fn ungeneralise(&self) -> ShellSet {
        let mut ungeneralised = ShellSet::new();
        for (shell_i, (alpha_offset, coef_offset)) in self.offsets().enumerate() {
            let nprim = self.nprims[shell_i];
            let alphas = &self.alphas[alpha_offset..alpha_offset + nprim];
            for gen_j in 0..self.ngens[shell_i] {
                let row_start = coef_offset + gen_j * nprim;
                ungeneralised
                    .centers
                    .extend_from_slice(&self.centers[3 * shell_i..3 * shell_i + 3]);
                ungeneralised.types.push(self.types[shell_i]);
                ungeneralised.ls.push(self.component_l(shell_i, gen_j));
                ungeneralised.nprims.push(nprim);
                ungeneralised.ngens.push(1);
                ungeneralised.alphas.extend_from_slice(alphas);
                ungeneralised
                    .coefs
                    .extend_from_slice(&self.coefs[row_start..row_start + nprim]);
            }
        }
        ungeneralised
    }

    // -------
    // Queries
    // -------

    /// The number of shells.
    pub fn n_shells(&self) -> usize {
        self.ls.len()
    }

    /// The total number of primitives over all shells.
    pub fn n_primitives(&self) -> usize {
        self.alphas.len()
    }

    /// Returns `true` if the set holds no shells.
    pub fn is_empty(&self) -> bool {
        self.ls.is_empty()
    }

    /// Returns the maximum angular momentum contained in any shell, or `None` for an empty set.
    ///
    /// Combined shells count with the highest momentum they contain, *e.g.* an `spd` shell
    /// (code $`-2`$) contributes $`2`$.
    pub fn max_angular_momentum(&self) -> Option<u32> {
        let (min, max) = self.ls.iter().copied().minmax().into_option()?;
        if min < 0 {
            Some(max.max(-min).unsigned_abs())
        } else {
            Some(max.unsigned_abs())
        }
    }

    /// Returns the total number of basis functions, summed over every contraction of every
    /// shell. A combined `sp` shell of spherical Gaussians therefore contributes four functions.
    pub fn size(&self) -> usize {
        self.types
            .iter()
            .zip(self.ngens.iter())
            .enumerate()
            .map(|(shell_i, (shell_type, ngen))| {
                (0..*ngen)
                    .map(|gen_j| {
                        shell_type.n_funcs(self.component_l(shell_i, gen_j).unsigned_abs())
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    /// Iterates over the `(alpha_offset, coef_offset)` pairs locating each shell's blocks.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nprims
            .iter()
            .zip(self.ngens.iter())
            .scan((0, 0), |(alpha_offset, coef_offset), (nprim, ngen)| {
                let offsets = (*alpha_offset, *coef_offset);
                *alpha_offset += nprim;
                *coef_offset += nprim * ngen;
                Some(offsets)
            })
    }

    /// Returns a view of shell `i`.
    ///
    /// # Errors
    ///
    /// Errors if `i` is not smaller than the number of shells.
    pub fn shell(&self, i: usize) -> Result<ShellView<'_>, BasisSetError> {
        let (alpha_offset, coef_offset) =
            self.offsets()
                .nth(i)
                .ok_or(BasisSetError::IndexOutOfRange {
                    what: "Shell",
                    index: i,
                    bound: self.n_shells(),
                })?;
        Ok(self.view(i, alpha_offset, coef_offset))
    }

    /// Returns the centre of shell `i`.
    pub fn shell_center(&self, i: usize) -> Result<&[f64], BasisSetError> {
        Ok(self.shell(i)?.center)
    }

    /// Returns the exponents of shell `i`.
    pub fn shell_alphas(&self, i: usize) -> Result<&[f64], BasisSetError> {
        Ok(self.shell(i)?.alphas)
    }

    /// Returns the coefficient block of shell `i`.
    pub fn shell_coefs(&self, i: usize) -> Result<&[f64], BasisSetError> {
        Ok(self.shell(i)?.coefs)
    }

    /// Iterates over views of all shells in insertion order.
    pub fn shells(&self) -> impl Iterator<Item = ShellView<'_>> + '_ {
        self.offsets()
            .enumerate()
            .map(|(i, (alpha_offset, coef_offset))| self.view(i, alpha_offset, coef_offset))
    }

    fn view(&self, i: usize, alpha_offset: usize, coef_offset: usize) -> ShellView<'_> {
        let nprim = self.nprims[i];
        let ngen = self.ngens[i];
        ShellView {
            center: &self.centers[3 * i..3 * i + 3],
            shell_type: self.types[i],
            l: self.ls[i],
            nprim,
            ngen,
            alphas: &self.alphas[alpha_offset..alpha_offset + nprim],
            coefs: &self.coefs[coef_offset..coef_offset + nprim * ngen],
        }
    }

    /// Returns the integer code of the momentum carried by contraction `gen_j` of shell
    /// `shell_i`.
    ///
    /// # Panics
    ///
    /// Panics if the stored code is invalid, which construction rules out.
    fn component_l(&self, shell_i: usize, gen_j: usize) -> i32 {
        let l = self.ls[shell_i];
        let component = nth_component(l, gen_j).unwrap_or_else(|err| {
            panic!("Shell {shell_i} carries an invalid angular-momentum code {l}: {err}")
        });
        i32::try_from(component).unwrap_or_else(|_| {
            panic!("Angular momentum {component} cannot be converted to `i32`.")
        })
    }
}

impl fmt::Display for ShellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of shells: {}", self.n_shells())?;
        writeln!(f, "Number of primitives: {}", self.n_primitives())?;
        writeln!(f, "Number of basis functions: {}", self.size())?;
        if let Some(lmax) = self.max_angular_momentum() {
            writeln!(f, "Maximum angular momentum: {lmax}")?;
        }
        Ok(())
    }
}
