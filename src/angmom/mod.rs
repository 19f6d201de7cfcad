//! Angular-momentum letter codes and their integer encodings.
//!
//! Single momenta `s`, `p`, `d`, ... `z` are encoded as the non-negative integers $`0`$ to
//! $`21`$ in table order (`e` is not used, and neither are `p` and `s` a second time, so `q`
//! follows `o` and `t` follows `r`). Combined shells spanning several momenta starting at `s` (`sp`, `spd`, ...,
//! `spdfgh`) are encoded as the negative integers $`-1`$ to $`-5`$, where $`-k`$ denotes the
//! first $`k + 1`$ single momenta.

use phf::phf_map;

use crate::error::BasisSetError;


/// The smallest valid integer code (`spdfgh`).
pub const MIN_ANGMOM_CODE: i32 = -5;

/// The largest valid integer code (`z`).
pub const MAX_ANGMOM_CODE: i32 = 21;

/// Letter codes of angular momenta, indexed by integer code offset by $`5`$.
pub static ANGMOM_LABELS: [&str; 27] = [
    "spdfgh", "spdfg", "spdf", "spd", "sp", "s", "p", "d", "f", "g", "h", "i", "j", "k", "l", "m",
    "n", "o", "q", "r", "t", "u", "v", "w", "x", "y", "z",
];

/// Integer codes of angular-momentum letter codes.
pub static ANGMOM_INDICES: phf::Map<&'static str, i32> = phf_map! {
    "spdfgh" => -5,
    "spdfg" => -4,
    "spdf" => -3,
    "spd" => -2,
    "sp" => -1,
    "s" => 0,
    "p" => 1,
    "d" => 2,
    "f" => 3,
    "g" => 4,
    "h" => 5,
    "i" => 6,
    "j" => 7,
    "k" => 8,
    "l" => 9,
    "m" => 10,
    "n" => 11,
    "o" => 12,
    "q" => 13,
    "r" => 14,
    "t" => 15,
    "u" => 16,
    "v" => 17,
    "w" => 18,
    "x" => 19,
    "y" => 20,
    "z" => 21,
};

/// Converts an angular-momentum letter code into its integer code.
///
/// # Arguments
///
/// * `letters` - A lowercase letter code, either a single momentum (`s` to `z`) or a combined
/// code (`sp` to `spdfgh`).
///
/// # Errors
///
/// Errors with [`BasisSetError::UnknownCode`] if `letters` is not a recognised code.
pub fn angmom_to_int(letters: &str) -> Result<i32, BasisSetError> {
    ANGMOM_INDICES
        .get(letters)
        .copied()
        .ok_or_else(|| BasisSetError::UnknownCode(letters.to_string()))
}

/// Converts an integer code into its angular-momentum letter code.
///
/// # Errors
///
/// Errors with [`BasisSetError::UnknownCodeInt`] if `code` is outside $`[-5, 21]`$.
pub fn angmom_to_str(code: i32) -> Result<&'static str, BasisSetError> {
    if !(MIN_ANGMOM_CODE..=MAX_ANGMOM_CODE).contains(&code) {
        return Err(BasisSetError::UnknownCodeInt(code));
    }
    let index = usize::try_from(code - MIN_ANGMOM_CODE)
        .map_err(|_| BasisSetError::UnknownCodeInt(code))?;
    Ok(ANGMOM_LABELS[index])
}

/// Returns the number of single momenta described by an integer code: one for a single
/// momentum, $`k + 1`$ for the combined code $`-k`$.
///
/// # Errors
///
/// Errors if `code` is not a valid code.
pub fn n_components(code: i32) -> Result<usize, BasisSetError> {
    Ok(angmom_to_str(code)?.len())
}

/// Returns the `i`-th single momentum contained in an integer code.
///
/// For a single-momentum code the code itself is returned whatever `i` is, since only `i = 0`
/// is meaningful. For a combined code the `i`-th letter of its letter code is re-encoded.
///
/// # Arguments
///
/// * `code` - An integer angular-momentum code.
/// * `i` - The index of the constituent momentum.
///
/// # Errors
///
/// Errors with [`BasisSetError::UnknownCodeInt`] if `code` is invalid, or with
/// [`BasisSetError::IndexOutOfRange`] if `i` is not smaller than the number of letters in a
/// combined code.
pub fn nth_component(code: i32, i: usize) -> Result<u32, BasisSetError> {
    let letters = angmom_to_str(code)?;
    if code >= 0 {
        return Ok(code.unsigned_abs());
    }
    let letter = letters
        .get(i..=i)
        .ok_or(BasisSetError::IndexOutOfRange {
            what: "Angular-momentum component",
            index: i,
            bound: letters.len(),
        })?;
    Ok(angmom_to_int(letter)?.unsigned_abs())
}

/// Returns the highest single momentum contained in an integer code.
///
/// # Errors
///
/// Errors if `code` is not a valid code.
pub fn max_component(code: i32) -> Result<u32, BasisSetError> {
    angmom_to_str(code)?;
    Ok(code.unsigned_abs())
}
