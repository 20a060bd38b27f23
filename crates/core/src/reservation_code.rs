//! Reservation codes.
//!
//! A code reads `MT-<timestamp>-<random>`: the creation time in Unix
//! milliseconds and a three-digit random suffix, both in upper-case base 36.
//! Codes are short enough to read over the phone and sort roughly by
//! creation time. Uniqueness is probabilistic; the `reservations` table
//! backs it with a unique constraint.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fixed prefix of every code.
pub const CODE_PREFIX: &str = "MT";

/// Number of base-36 digits in the random suffix.
pub const RANDOM_SUFFIX_LEN: usize = 3;

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `u64::MAX` needs 13 base-36 digits.
const U64_BASE36_DIGITS: usize = 13;

/// A generated reservation code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationCode(String);

impl ReservationCode {
    /// Accept `raw` if it has the shape of a generated code.
    ///
    /// Lower-case input is normalised to upper case, since codes are often
    /// typed in by hand.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let mut parts = upper.split('-');

        let prefix = parts.next()?;
        let timestamp = parts.next()?;
        let random = parts.next()?;
        if parts.next().is_some() || prefix != CODE_PREFIX {
            return None;
        }

        let is_base36 = |s: &str| s.bytes().all(|b| DIGITS.contains(&b));
        if timestamp.is_empty() || !is_base36(timestamp) {
            return None;
        }
        if random.len() != RANDOM_SUFFIX_LEN || !is_base36(random) {
            return None;
        }

        Some(Self(upper))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Creation time encoded in the code, in Unix milliseconds.
    pub fn created_at_millis(&self) -> Option<u64> {
        let timestamp = self.0.split('-').nth(1)?;
        u64::from_str_radix(timestamp, 36).ok()
    }
}

impl fmt::Display for ReservationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReservationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a code for "now" using the thread-local RNG.
pub fn generate() -> ReservationCode {
    let now_millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    generate_at(now_millis, &mut rand::rng())
}

/// Generate a code for the given instant and random source.
pub fn generate_at<R: Rng>(unix_millis: u64, rng: &mut R) -> ReservationCode {
    let fraction: f64 = rng.random();
    ReservationCode(format!(
        "{CODE_PREFIX}-{}-{}",
        to_base36(unix_millis),
        fraction_to_base36(fraction, RANDOM_SUFFIX_LEN),
    ))
}

/// Upper-case base-36 rendering of `number`.
pub fn to_base36(number: u64) -> String {
    if number == 0 {
        return "0".into();
    }

    let mut buf = [0u8; U64_BASE36_DIGITS];
    let mut index = U64_BASE36_DIGITS;
    let mut n = number;
    while n > 0 {
        index -= 1;
        buf[index] = DIGITS[(n % 36) as usize];
        n /= 36;
    }

    buf[index..].iter().map(|&b| b as char).collect()
}

/// The first `digits` base-36 digits after the radix point of `fraction`
/// (expected in `[0, 1)`). Always exactly `digits` long, so a draw of 0
/// renders as zeros.
fn fraction_to_base36(fraction: f64, digits: usize) -> String {
    let mut rest = fraction.clamp(0.0, 1.0);
    let mut out = String::with_capacity(digits);
    for _ in 0..digits {
        rest *= 36.0;
        let digit = (rest.trunc() as usize).min(35);
        out.push(DIGITS[digit] as char);
        rest -= digit as f64;
    }
    out
}
