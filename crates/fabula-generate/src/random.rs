//! Uniform random primitives shared by the pattern engine and the resolver.
//!
//! Everything except [`random_alphanumeric`] draws from the caller's
//! general-purpose source so runs can be replayed from a seed.

use rand::distr::{Alphanumeric, SampleString};
use rand::{Rng, RngCore};

pub const DIGITS: &[u8] = b"0123456789";
pub const UPPER_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Uniform integer in `[min, max]`. Returns `min` when `max <= min`.
pub fn random_int(rng: &mut dyn RngCore, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Uniform integer in `[min, max]`. Returns `min` when `max <= min`.
pub fn random_int64(rng: &mut dyn RngCore, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Random string of `len` characters from `0-9A-Za-z`.
///
/// Uses the thread-local OS-seeded CSPRNG rather than a caller-supplied
/// source, so identifiers never repeat across seeded runs.
pub fn random_alphanumeric(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

/// Uniformly chosen element, `None` for an empty slice.
pub fn random_choice<'a, T>(rng: &mut dyn RngCore, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..items.len());
    Some(&items[idx])
}

/// `value` concatenated `random_int(min, max)` times.
pub fn random_repeat(rng: &mut dyn RngCore, value: &str, min: i32, max: i32) -> String {
    let count = usize::try_from(random_int(rng, min, max)).unwrap_or(0);
    value.repeat(count)
}

pub(crate) fn random_byte_char(rng: &mut dyn RngCore, alphabet: &[u8]) -> char {
    random_choice(rng, alphabet).map_or('0', |byte| char::from(*byte))
}

pub(crate) fn random_digit(rng: &mut dyn RngCore) -> char {
    random_byte_char(rng, DIGITS)
}

pub(crate) fn random_nonzero_digit(rng: &mut dyn RngCore) -> char {
    random_byte_char(rng, &DIGITS[1..])
}

pub(crate) fn random_upper_letter(rng: &mut dyn RngCore) -> char {
    random_byte_char(rng, UPPER_LETTERS)
}

pub(crate) fn random_letter(rng: &mut dyn RngCore) -> char {
    random_byte_char(rng, LETTERS)
}
