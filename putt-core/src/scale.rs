//! Scale mapping between real-world feet and simulation units.
//!
//! Long putts are shrunk so that an 8ft and a 200ft putt both fit inside the
//! same camera frustum. The scale is chosen once per putt from the nominal
//! hole distance and stays fixed for the whole simulation.
//!
//! ```text
//! hole distance   units per foot
//!   <= 10 ft          1.00
//!   <= 25 ft          0.80
//!   <= 50 ft          0.60
//!   <= 100 ft         0.40
//!   beyond            0.25
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PuttError;

/// One distance band of the scale table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBand {
    /// Inclusive upper bound; `f64::INFINITY` marks the catch-all.
    pub max_distance_feet: f64,
    pub units_per_foot: f64,
}

/// Ordered scale bands, evaluated top-down.
///
/// Deserialized tables go through [`ScaleTable::new`], so every table in
/// hand has a catch-all band and positive scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScaleTableDef")]
pub struct ScaleTable {
    bands: Vec<ScaleBand>,
}

#[derive(Deserialize)]
struct ScaleTableDef {
    bands: Vec<ScaleBand>,
}

impl TryFrom<ScaleTableDef> for ScaleTable {
    type Error = PuttError;

    fn try_from(def: ScaleTableDef) -> Result<Self, Self::Error> {
        Self::new(def.bands)
    }
}

impl ScaleTable {
    /// Build a table. Bands must be sorted, have positive scales, and end
    /// in a catch-all band.
    pub fn new(bands: Vec<ScaleBand>) -> Result<Self, PuttError> {
        let last = bands.last().ok_or(PuttError::EmptyTable("scale"))?;
        if last.max_distance_feet != f64::INFINITY {
            return Err(PuttError::MissingCatchAll("scale"));
        }
        if let Some(bad) = bands
            .iter()
            .find(|b| !b.units_per_foot.is_finite() || b.units_per_foot <= 0.0)
        {
            return Err(PuttError::InvalidConfig(format!(
                "scale band up to {} ft has non-positive scale {}",
                bad.max_distance_feet, bad.units_per_foot
            )));
        }
        if bands
            .windows(2)
            .any(|w| w[0].max_distance_feet >= w[1].max_distance_feet)
        {
            return Err(PuttError::InvalidConfig(
                "scale bands must be sorted by distance".to_string(),
            ));
        }
        Ok(Self { bands })
    }

    pub fn standard() -> Self {
        Self {
            bands: vec![
                ScaleBand {
                    max_distance_feet: 10.0,
                    units_per_foot: 1.0,
                },
                ScaleBand {
                    max_distance_feet: 25.0,
                    units_per_foot: 0.8,
                },
                ScaleBand {
                    max_distance_feet: 50.0,
                    units_per_foot: 0.6,
                },
                ScaleBand {
                    max_distance_feet: 100.0,
                    units_per_foot: 0.4,
                },
                ScaleBand {
                    max_distance_feet: f64::INFINITY,
                    units_per_foot: 0.25,
                },
            ],
        }
    }

    pub fn bands(&self) -> &[ScaleBand] {
        &self.bands
    }

    /// World units per foot for a putt of the given length.
    pub fn units_per_foot(&self, hole_distance_feet: f64) -> Result<f64, PuttError> {
        if !hole_distance_feet.is_finite() || hole_distance_feet <= 0.0 {
            return Err(PuttError::InvalidDistance(hole_distance_feet));
        }
        let band = self
            .bands
            .iter()
            .find(|b| hole_distance_feet <= b.max_distance_feet)
            .or_else(|| self.bands.last())
            .ok_or(PuttError::EmptyTable("scale"))?;
        tracing::debug!(
            hole_distance_feet,
            units_per_foot = band.units_per_foot,
            "scale selected"
        );
        Ok(band.units_per_foot)
    }
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Scale for `hole_distance_feet` using the standard table.
pub fn units_per_foot(hole_distance_feet: f64) -> Result<f64, PuttError> {
    ScaleTable::standard().units_per_foot(hole_distance_feet)
}

pub fn feet_to_units(feet: f64, units_per_foot: f64) -> f64 {
    feet * units_per_foot
}

pub fn units_to_feet(units: f64, units_per_foot: f64) -> f64 {
    units / units_per_foot
}
