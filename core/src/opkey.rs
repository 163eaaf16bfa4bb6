//! Operation key normalization.
//!
//! Operation numbers arrive as free-form text or spreadsheet numbers
//! ("12", "12.3", 100.0) but identity must not depend on formatting. Keys
//! are canonicalized to `D.DDDD` form: fractional part right-padded with
//! zeros to at least four digits, integer-only input gets `.0000` appended,
//! longer fractions are kept as written. The canonical string is the
//! identity; the parsed numeric value only drives ordering and the
//! realignment scans.

use crate::error_codes;
use crate::route::CellScalar;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MIN_FRACTION_DIGITS: usize = 4;

/// A canonicalized operation key.
///
/// Equality and hashing use the canonical string only. Ordering compares the
/// numeric value first so "9.0000" sorts before "10.0000".
#[derive(Debug, Clone)]
pub struct OpKey {
    canonical: String,
    numeric: f64,
}

impl OpKey {
    /// Parse and canonicalize a raw key.
    ///
    /// Leading/trailing whitespace is ignored. Anything other than a plain
    /// non-negative decimal (no sign, no exponent, at most one dot) is
    /// rejected. An empty digit run on either side of the dot is padded
    /// with zeros ("12." becomes "12.0000", ".5" becomes ".5000"), matching
    /// how upstream reports round-trip such keys.
    pub fn parse(raw: &str) -> Result<OpKey, MalformedKeyError> {
        let trimmed = raw.trim();
        let canonical = match trimmed.split_once('.') {
            Some((int_part, frac_part)) => {
                if !is_digit_run(int_part)
                    || !is_digit_run(frac_part)
                    || (int_part.is_empty() && frac_part.is_empty())
                {
                    return Err(MalformedKeyError {
                        input: raw.to_string(),
                    });
                }
                if frac_part.len() >= MIN_FRACTION_DIGITS {
                    trimmed.to_string()
                } else {
                    format!("{int_part}.{frac_part:0<width$}", width = MIN_FRACTION_DIGITS)
                }
            }
            None => {
                if !is_digits(trimmed) {
                    return Err(MalformedKeyError {
                        input: raw.to_string(),
                    });
                }
                format!("{trimmed}.0000")
            }
        };
        let numeric = canonical.parse::<f64>().map_err(|_| MalformedKeyError {
            input: raw.to_string(),
        })?;
        Ok(OpKey { canonical, numeric })
    }

    /// Derive a key from the key cell of an operation's first row.
    pub fn from_cell(cell: Option<&CellScalar>) -> Result<OpKey, MalformedKeyError> {
        match cell {
            Some(CellScalar::Text(s)) => OpKey::parse(s),
            Some(CellScalar::Number(n)) => OpKey::parse(&n.to_string()),
            Some(CellScalar::Bool(b)) => Err(MalformedKeyError {
                input: b.to_string(),
            }),
            None => Err(MalformedKeyError {
                input: String::new(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn numeric(&self) -> f64 {
        self.numeric
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && is_digit_run(s)
}

fn is_digit_run(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl PartialEq for OpKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for OpKey {}

impl std::hash::Hash for OpKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for OpKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.numeric
            .total_cmp(&other.numeric)
            .then_with(|| self.canonical.cmp(&other.canonical))
    }
}

impl std::fmt::Display for OpKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for OpKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for OpKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OpKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Key text that cannot be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "[RTDIFF_KEY_001] operation key '{input}' is not a plain decimal number. Suggestion: keys must look like '12' or '12.3000'."
)]
pub struct MalformedKeyError {
    pub input: String,
}

impl MalformedKeyError {
    pub fn code(&self) -> &'static str {
        error_codes::KEY_MALFORMED
    }
}
