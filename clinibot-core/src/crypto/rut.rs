//! Chilean RUT handling: weighted modulo-11 checksum, display masking and
//! the one-way digest stored in place of the raw number.
//!
//! All functions are total. Malformed input is reported as `false` (or
//! passed through unchanged by [`mask`]), never as an error.

use sha2::{Digest, Sha256};

const SEPARATOR: char = '-';
const WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];

/// Drops thousands separators and uppercases (`12.345.678-k` ⇒ `12345678-K`).
pub fn normalize(id: &str) -> String {
    id.replace('.', "").to_uppercase()
}

/// `true` iff the normalized input is `<digits>-<check>` and the check
/// character matches the one computed from the digits.
pub fn is_valid(id: &str) -> bool {
    let cleaned = normalize(id);
    let Some((body, check)) = split_body(&cleaned) else {
        return false;
    };
    if body.is_empty() || check.is_empty() {
        return false;
    }
    match check_digit(body) {
        Some(expected) => {
            let mut chars = check.chars();
            chars.next() == Some(expected) && chars.next().is_none()
        }
        None => false,
    }
}

/// Computes the check character for a run of ASCII digits.
/// Returns `None` if `body` is empty or contains anything but digits.
pub fn check_digit(body: &str) -> Option<char> {
    if body.is_empty() {
        return None;
    }
    let mut sum = 0u32;
    for (i, c) in body.chars().rev().enumerate() {
        let digit = c.to_digit(10)?;
        sum += digit * WEIGHTS[i % WEIGHTS.len()];
    }
    match 11 - (sum % 11) {
        11 => Some('0'),
        10 => Some('K'),
        d => char::from_digit(d, 10),
    }
}

/// Display-safe form: the last three digits of the body are replaced by
/// `***`. Short bodies collapse to `***-<check>`.
pub fn mask(id: &str) -> String {
    let cleaned = normalize(id);
    let Some((body, check)) = split_body(&cleaned) else {
        return cleaned;
    };
    let len = body.chars().count();
    if len <= 3 {
        return format!("***-{}", check);
    }
    let kept: String = body.chars().take(len - 3).collect();
    format!("{}***-{}", kept, check)
}

/// SHA-256 hex of the raw input. Unsalted so the same RUT always maps to
/// the same identifier in the scheduling system.
pub fn hash(id: &str) -> String {
    hex::encode(Sha256::digest(id.as_bytes()))
}

/// Splits on the separator; exactly one must be present.
fn split_body(cleaned: &str) -> Option<(&str, &str)> {
    let (body, check) = cleaned.split_once(SEPARATOR)?;
    if check.contains(SEPARATOR) {
        return None;
    }
    Some((body, check))
}
