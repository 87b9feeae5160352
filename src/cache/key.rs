//! Cache file names
//!
//! A key is split into two halves of UTF-16 code units, each half is hashed
//! with the classic `31 * h + c` string hash and the two decimal values are
//! concatenated. The names are stable across runs and platforms, but they are
//! not collision free: two keys whose halves collide pairwise share a name.

/// `31 * h + c` over UTF-16 code units with wrapping 32-bit arithmetic
pub fn string_hash(units: &[u16]) -> i32 {
    units
        .iter()
        .fold(0i32, |h, &unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Derive the file name for a cache key, e.g. `derive_filename(url, ".apk")`
pub fn derive_filename(key: &str, extension: &str) -> String {
    let units: Vec<u16> = key.encode_utf16().collect();
    let (first, second) = units.split_at(units.len() / 2);
    format!("{}{}{}", string_hash(first), string_hash(second), extension)
}
