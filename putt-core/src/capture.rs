//! Hole capture: deciding whether the ball drops.
//!
//! A ball drops when it is close enough to the hole centre *and* slow enough,
//! with both limits taken from one precision tier. Short putts get a tight
//! tier; longer putts a more forgiving one.
//!
//! ```text
//! tier         up to    radius    speed cap
//! very-close    3 ft    0.25 ft   0.50 ft/step
//! close         8 ft    0.30 ft   0.60 ft/step
//! medium       15 ft    0.35 ft   0.70 ft/step
//! long         30 ft    0.40 ft   0.90 ft/step
//! (beyond 30 ft falls back to the last tier)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PuttError;
use crate::integrator::StepMonitor;
use crate::types::{SimulationState, Vec3};

/// Detection radius and speed cap for one distance band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionTier {
    /// Inclusive upper bound of the nominal hole distance.
    pub max_distance_feet: f64,
    pub detection_radius_feet: f64,
    pub speed_threshold_feet_per_step: f64,
    pub label: String,
}

impl PrecisionTier {
    pub fn new(
        label: &str,
        max_distance_feet: f64,
        detection_radius_feet: f64,
        speed_threshold_feet_per_step: f64,
    ) -> Self {
        Self {
            max_distance_feet,
            detection_radius_feet,
            speed_threshold_feet_per_step,
            label: label.to_string(),
        }
    }

    /// Both capture conditions, in feet and feet per step.
    pub fn admits(&self, distance_feet: f64, speed_feet_per_step: f64) -> bool {
        distance_feet <= self.detection_radius_feet
            && speed_feet_per_step <= self.speed_threshold_feet_per_step
    }
}

/// Ordered precision tiers, evaluated top-down.
///
/// The last tier doubles as the fallback for putts longer than every band.
/// Deserialized tables go through [`TierTable::new`], so a table is never
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TierTableDef")]
pub struct TierTable {
    tiers: Vec<PrecisionTier>,
}

#[derive(Deserialize)]
struct TierTableDef {
    tiers: Vec<PrecisionTier>,
}

impl TryFrom<TierTableDef> for TierTable {
    type Error = PuttError;

    fn try_from(def: TierTableDef) -> Result<Self, Self::Error> {
        Self::new(def.tiers)
    }
}

impl TierTable {
    pub fn new(tiers: Vec<PrecisionTier>) -> Result<Self, PuttError> {
        if tiers.is_empty() {
            return Err(PuttError::EmptyTable("precision tier"));
        }
        if let Some(bad) = tiers.iter().find(|t| {
            !(t.detection_radius_feet >= 0.0 && t.speed_threshold_feet_per_step >= 0.0)
        }) {
            return Err(PuttError::InvalidConfig(format!(
                "precision tier '{}' has a negative threshold",
                bad.label
            )));
        }
        if tiers
            .windows(2)
            .any(|w| w[0].max_distance_feet >= w[1].max_distance_feet)
        {
            return Err(PuttError::InvalidConfig(
                "precision tiers must be sorted by distance".to_string(),
            ));
        }
        Ok(Self { tiers })
    }

    pub fn standard() -> Self {
        Self {
            tiers: vec![
                PrecisionTier::new("very-close", 3.0, 0.25, 0.50),
                PrecisionTier::new("close", 8.0, 0.30, 0.60),
                PrecisionTier::new("medium", 15.0, 0.35, 0.70),
                PrecisionTier::new("long", 30.0, 0.40, 0.90),
            ],
        }
    }

    pub fn tiers(&self) -> &[PrecisionTier] {
        &self.tiers
    }

    /// Tier for a putt of the given nominal length.
    pub fn tier_for(&self, hole_distance_feet: f64) -> &PrecisionTier {
        match self
            .tiers
            .iter()
            .find(|t| hole_distance_feet <= t.max_distance_feet)
        {
            Some(tier) => tier,
            None => {
                // Non-empty: every constructor validates.
                let fallback = &self.tiers[self.tiers.len() - 1];
                tracing::debug!(
                    hole_distance_feet,
                    tier = %fallback.label,
                    "distance beyond all precision tiers; using most lenient tier"
                );
                fallback
            }
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Step monitor that ends the roll when the ball drops.
#[derive(Debug, Clone)]
pub struct HoleCapture<'a> {
    tier: &'a PrecisionTier,
    hole: Vec3,
    units_per_foot: f64,
    timestep: f64,
    captured_at: Option<usize>,
}

impl<'a> HoleCapture<'a> {
    pub fn new(tier: &'a PrecisionTier, hole: Vec3, units_per_foot: f64, timestep: f64) -> Self {
        Self {
            tier,
            hole,
            units_per_foot,
            timestep,
            captured_at: None,
        }
    }

    pub fn tier(&self) -> &PrecisionTier {
        self.tier
    }

    /// Step at which the ball dropped, if it did.
    pub fn captured_at(&self) -> Option<usize> {
        self.captured_at
    }

    pub fn distance_to_hole_feet(&self, position: &Vec3) -> f64 {
        position.horizontal_distance(&self.hole) / self.units_per_foot
    }

    /// Convert a speed in units/s to feet per step.
    pub fn feet_per_step(&self, speed: f64) -> f64 {
        speed * self.timestep / self.units_per_foot
    }

    pub fn qualifies(&self, position: &Vec3, speed: f64) -> bool {
        self.tier.admits(
            self.distance_to_hole_feet(position),
            self.feet_per_step(speed),
        )
    }

    /// Re-test the resting point of a roll that was never captured.
    ///
    /// Catches the ball that comes to rest exactly on the edge between two
    /// steps' worth of checks.
    pub fn backstop(&mut self, final_state: &SimulationState, final_speed: f64) -> bool {
        if self.captured_at.is_some() {
            return true;
        }
        if self.qualifies(&final_state.position, final_speed) {
            tracing::debug!(step = final_state.step, "captured on final-point backstop");
            self.captured_at = Some(final_state.step);
            return true;
        }
        false
    }
}

impl StepMonitor for HoleCapture<'_> {
    fn observe(&mut self, state: &SimulationState, speed: f64) -> bool {
        if self.qualifies(&state.position, speed) {
            tracing::debug!(step = state.step, tier = %self.tier.label, "ball captured");
            self.captured_at = Some(state.step);
            return true;
        }
        false
    }
}

/// Cosmetic points that carry a captured ball to the hole centre and below
/// the surface.
pub fn drop_tail(from: Vec3, hole: Vec3, steps: usize, depth: f64) -> Vec<Vec3> {
    let bottom = Vec3::new(hole.x, hole.y - depth, hole.z);
    (1..=steps)
        .map(|i| from.lerp(&bottom, i as f64 / steps as f64))
        .collect()
}
