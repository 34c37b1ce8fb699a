//! Canonical world placement of ball and hole.
//!
//! Renderers position the ball, the hole and the flag independently; this
//! module is the one place that turns the logical hole distance (feet) into
//! world positions, and checks what a renderer is showing against them.
//!
//! ## Layout
//!
//! The green centre is the world origin. The ball and the hole sit on the Z
//! axis, symmetric about the centre:
//!
//! ```text
//!   hole (0, 0, -d/2)        centre (0, 0, 0)        ball (0, 0, +d/2)
//!        ●─────────────────────────┼─────────────────────────○
//!                          d = hole_distance_feet · units_per_foot
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PuttError;
use crate::scale::ScaleTable;
use crate::types::Vec3;

/// Positions further than this (world units) from canonical are drifted.
pub const DRIFT_TOLERANCE_UNITS: f64 = 0.1;

/// Distance mismatch (feet) above which a displayed layout is invalid.
pub const SYNC_ERROR_LIMIT_FEET: f64 = 0.5;

/// World positions a renderer is currently showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedPositions {
    pub ball: Option<Vec3>,
    pub hole: Option<Vec3>,
}

/// An observed position that disagrees with the canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub observed: Vec3,
    pub canonical: Vec3,
    /// Offset to add to `observed` to land on `canonical`.
    pub correction: Vec3,
    pub distance_units: f64,
}

/// Synchronizer output: logical distance, canonical positions, and how far
/// the renderer's view is from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceState {
    pub logical_distance_feet: f64,
    pub units_per_foot: f64,
    pub world_distance_units: f64,
    pub ball_position: Vec3,
    pub hole_position: Vec3,
    pub observed_distance_feet: Option<f64>,
    pub sync_error_feet: f64,
    pub is_valid: bool,
    pub ball_drift: Option<Drift>,
    pub hole_drift: Option<Drift>,
}

impl DistanceState {
    pub fn green_center(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Boundary radius (units) leaving `margin_feet` beyond ball and hole.
    pub fn green_radius_units(&self, margin_feet: f64) -> f64 {
        self.world_distance_units / 2.0 + margin_feet * self.units_per_foot
    }

    pub fn has_drift(&self) -> bool {
        self.ball_drift.is_some() || self.hole_drift.is_some()
    }
}

/// Single authority for ball and hole world positions.
#[derive(Debug, Clone)]
pub struct DistanceSynchronizer {
    scale: ScaleTable,
    drift_tolerance_units: f64,
    sync_error_limit_feet: f64,
}

impl Default for DistanceSynchronizer {
    fn default() -> Self {
        Self::new(ScaleTable::standard())
    }
}

impl DistanceSynchronizer {
    pub fn new(scale: ScaleTable) -> Self {
        Self {
            scale,
            drift_tolerance_units: DRIFT_TOLERANCE_UNITS,
            sync_error_limit_feet: SYNC_ERROR_LIMIT_FEET,
        }
    }

    pub fn with_tolerances(mut self, drift_tolerance_units: f64, sync_error_limit_feet: f64) -> Self {
        self.drift_tolerance_units = drift_tolerance_units;
        self.sync_error_limit_feet = sync_error_limit_feet;
        self
    }

    pub fn scale(&self) -> &ScaleTable {
        &self.scale
    }

    /// Canonical layout with nothing observed.
    pub fn canonical(&self, hole_distance_feet: f64) -> Result<DistanceState, PuttError> {
        self.reconcile(hole_distance_feet, &ObservedPositions::default())
    }

    /// Compare what a renderer shows with the canonical layout.
    ///
    /// A missing observation is taken to be at its canonical position.
    pub fn reconcile(
        &self,
        hole_distance_feet: f64,
        observed: &ObservedPositions,
    ) -> Result<DistanceState, PuttError> {
        let units_per_foot = self.scale.units_per_foot(hole_distance_feet)?;
        let world_distance_units = hole_distance_feet * units_per_foot;
        let half = world_distance_units / 2.0;
        let ball_position = Vec3::ground(0.0, half);
        let hole_position = Vec3::ground(0.0, -half);

        let ball_drift = observed
            .ball
            .and_then(|seen| self.drift(seen, ball_position));
        let hole_drift = observed
            .hole
            .and_then(|seen| self.drift(seen, hole_position));

        let observed_distance_feet = if observed.ball.is_some() || observed.hole.is_some() {
            let ball = observed.ball.unwrap_or(ball_position);
            let hole = observed.hole.unwrap_or(hole_position);
            Some(ball.horizontal_distance(&hole) / units_per_foot)
        } else {
            None
        };

        let sync_error_feet = observed_distance_feet
            .map(|feet| (feet - hole_distance_feet).abs())
            .unwrap_or(0.0);
        let is_valid = sync_error_feet <= self.sync_error_limit_feet;

        if ball_drift.is_some() || hole_drift.is_some() {
            tracing::warn!(
                hole_distance_feet,
                sync_error_feet,
                is_valid,
                ball_drift = ball_drift.map(|d| d.distance_units),
                hole_drift = hole_drift.map(|d| d.distance_units),
                "displayed positions drifted from canonical layout"
            );
        }

        Ok(DistanceState {
            logical_distance_feet: hole_distance_feet,
            units_per_foot,
            world_distance_units,
            ball_position,
            hole_position,
            observed_distance_feet,
            sync_error_feet,
            is_valid,
            ball_drift,
            hole_drift,
        })
    }

    fn drift(&self, observed: Vec3, canonical: Vec3) -> Option<Drift> {
        let distance_units = observed.distance(&canonical);
        if distance_units > self.drift_tolerance_units {
            Some(Drift {
                observed,
                canonical,
                correction: canonical - observed,
                distance_units,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_layout() {
        let sync = DistanceSynchronizer::default();
        let state = sync.canonical(20.0).unwrap();

        assert_eq!(state.units_per_foot, 0.8);
        assert!((state.world_distance_units - 16.0).abs() < 1e-12);
        assert_eq!(state.ball_position, Vec3::ground(0.0, 8.0));
        assert_eq!(state.hole_position, Vec3::ground(0.0, -8.0));
        assert!(state.is_valid);
        assert_eq!(state.sync_error_feet, 0.0);
        assert_eq!(state.observed_distance_feet, None);
        assert!(!state.has_drift());
    }

    #[test]
    fn test_canonical_is_deterministic() {
        let sync = DistanceSynchronizer::default();
        assert_eq!(sync.canonical(37.5).unwrap(), sync.canonical(37.5).unwrap());
    }

    #[test]
    fn test_small_drift_is_tolerated() {
        let sync = DistanceSynchronizer::default();
        let observed = ObservedPositions {
            ball: Some(Vec3::ground(0.05, 5.0)),
            hole: Some(Vec3::ground(0.0, -5.0)),
        };
        let state = sync.reconcile(10.0, &observed).unwrap();
        assert!(!state.has_drift());
        assert!(state.is_valid);
        assert!(state.sync_error_feet < 0.01);
    }

    #[test]
    fn test_drifted_hole_is_corrected() {
        let sync = DistanceSynchronizer::default();
        // Renderer placed the hole at 11ft instead of 10ft.
        let observed = ObservedPositions {
            ball: Some(Vec3::ground(0.0, 5.0)),
            hole: Some(Vec3::ground(0.0, -6.0)),
        };
        let state = sync.reconcile(10.0, &observed).unwrap();

        let drift = state.hole_drift.expect("hole should be flagged");
        assert!((drift.distance_units - 1.0).abs() < 1e-12);
        assert_eq!(drift.observed + drift.correction, state.hole_position);
        assert!(state.ball_drift.is_none());
        assert!((state.sync_error_feet - 1.0).abs() < 1e-12);
        assert!(!state.is_valid);
    }

    #[test]
    fn test_drift_within_sync_limit_stays_valid() {
        let sync = DistanceSynchronizer::default();
        // 0.3 units of drift at 1 unit per foot: flagged, but only 0.3ft off.
        let observed = ObservedPositions {
            ball: None,
            hole: Some(Vec3::ground(0.0, -5.3)),
        };
        let state = sync.reconcile(10.0, &observed).unwrap();
        assert!(state.hole_drift.is_some());
        assert!((state.observed_distance_feet.unwrap() - 10.3).abs() < 1e-9);
        assert!(state.is_valid);
    }

    #[test]
    fn test_error_measured_in_feet() {
        let sync = DistanceSynchronizer::default();
        // 200ft putt at 0.25 units per foot: 0.2 units short is 0.8ft.
        let state = sync.canonical(200.0).unwrap();
        let observed = ObservedPositions {
            ball: Some(state.ball_position),
            hole: Some(state.hole_position + Vec3::ground(0.0, 0.2)),
        };
        let state = sync.reconcile(200.0, &observed).unwrap();
        assert!((state.sync_error_feet - 0.8).abs() < 1e-9);
        assert!(!state.is_valid);
    }

    #[test]
    fn test_green_radius_covers_ball_and_hole() {
        let state = DistanceSynchronizer::default().canonical(30.0).unwrap();
        let radius = state.green_radius_units(15.0);
        assert!(radius > state.ball_position.horizontal_magnitude());
        assert!(radius > state.hole_position.horizontal_magnitude());
    }

    #[test]
    fn test_rejects_invalid_distance() {
        let sync = DistanceSynchronizer::default();
        assert!(matches!(
            sync.canonical(0.0),
            Err(PuttError::InvalidDistance(_))
        ));
    }
}
