//! Canonical string encoding of bounding-box token lists.

use serde::{Deserialize, Serialize};

/// One element of a bounding box as received from a client or a
/// capabilities document: either a number or a string that may hold a number
/// or a spatial reference code such as `EPSG:4326`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BboxToken {
    Number(f64),
    Text(String),
}

impl From<f64> for BboxToken {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for BboxToken {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BboxToken {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

enum Decoded<'a> {
    Coordinate(f64),
    Reference(&'a str),
    Ignored,
}

impl BboxToken {
    fn decode(&self) -> Decoded<'_> {
        match self {
            Self::Number(value) => Decoded::Coordinate(*value),
            Self::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => Decoded::Coordinate(value),
                Err(_) if text.contains("EPSG") => Decoded::Reference(text),
                Err(_) => Decoded::Ignored,
            },
        }
    }
}

/// Normalise a bounding box into fixed-precision strings.
///
/// Every coordinate is rounded to two decimals and then printed with fifteen,
/// so `67.891` becomes `"67.890000000000001"`. Tokens that are neither
/// numbers nor `EPSG` codes are dropped. Non-finite coordinates are dropped
/// too, on purpose: `NaN` and infinities never come out as `"nan"` or
/// `"inf"`. The
/// reference code, if any, is appended once after all coordinates; when
/// several are present the last one is kept.
#[must_use]
pub fn decimal_encode(tokens: &[BboxToken]) -> Vec<String> {
    let mut encoded = Vec::with_capacity(tokens.len());
    let mut srid = None;

    for token in tokens {
        match token.decode() {
            Decoded::Coordinate(value) if value.is_finite() => {
                encoded.push(format!("{:.15}", round2(value)));
            }
            Decoded::Coordinate(value) => {
                tracing::debug!(value, "dropping non-finite bbox coordinate");
            }
            Decoded::Reference(code) => srid = Some(code),
            Decoded::Ignored => tracing::debug!(token = ?token, "dropping bbox token"),
        }
    }

    if let Some(code) = srid {
        encoded.push(code.to_string());
    }
    encoded
}

// Rounds on the exact decimal expansion of `value`, then reads the result
// back as the nearest f64.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
