//! Axis-aligned bounding boxes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::projection;

/// Rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingBox {
    /// Build a box, rejecting non-finite coordinates.
    ///
    /// Corners are normalised so that `min <= max` on both axes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBoundingBox`] if any coordinate is
    /// NaN or infinite.
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Result<Self, ValidationError> {
        if [minx, miny, maxx, maxy].iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidBoundingBox {
                value: format!("{minx},{miny},{maxx},{maxy}"),
            });
        }
        Ok(Self {
            minx: minx.min(maxx),
            miny: miny.min(maxy),
            maxx: minx.max(maxx),
            maxy: miny.max(maxy),
        })
    }

    /// Whether the two boxes share at least one point (edges included).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.minx <= other.maxx
            && other.minx <= self.maxx
            && self.miny <= other.maxy
            && other.miny <= self.maxy
    }

    /// Reproject a Web-Mercator box into geographic degrees.
    #[must_use]
    pub fn to_geographic(&self) -> Self {
        let (minx, miny) = projection::to_geographic(self.minx, self.miny);
        let (maxx, maxy) = projection::to_geographic(self.maxx, self.maxy);
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.minx, self.miny, self.maxx, self.maxy)
    }
}

/// Parses `minx,miny,maxx,maxy`.
impl FromStr for BoundingBox {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidBoundingBox {
            value: s.to_string(),
        };
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match values.as_slice() {
            [minx, miny, maxx, maxy] => Self::new(*minx, *miny, *maxx, *maxy),
            _ => Err(invalid()),
        }
    }
}
